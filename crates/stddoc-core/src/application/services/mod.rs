//! Application services - orchestrate use cases.
//!
//! `DocBuildService` runs the whole pipeline; the stage services it drives
//! borrow its ports for the length of one run.

pub mod build_service;
pub mod discovery;
pub mod overlay_service;
pub mod packaging_service;
pub mod postprocess_service;

pub use build_service::{BuildReport, BuildRequest, BuildWarning, DocBuildService};
pub use discovery::SourceDiscovery;
pub use overlay_service::{ComposedOverlays, OverlayComposer};
pub use packaging_service::Packager;
pub use postprocess_service::PostProcessor;
