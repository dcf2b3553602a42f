//! Core domain layer for stddoc.
//!
//! Pure logic only: value objects, entities, library profiles and the text
//! rewrite rules. All filesystem and process access is done through ports
//! defined in the application layer.
//!
//! - **No I/O**: no filesystem, process, or network calls
//! - **Immutable entities**: all domain objects are Clone + PartialEq
//! - **Deterministic**: the same inputs always give the same overlays,
//!   manifests and rewrites

pub mod entities;
pub mod error;
pub mod rewrite;
pub mod value_objects;

mod validation;

pub use entities::{
    AssetCopy, BuildManifest, BuildManifestBuilder, DestinationLayout, DocumentOrder,
    KandilBundle, LibraryKind, LibraryProfile, MacroOverlay, MacroTable, ManifestDocument,
    OverlayBody, OverlayKind, PdfParams, PdfSettings, SourceFile, SourceFilter, ToolResources,
};

pub use error::{DomainError, ErrorCategory};

pub use rewrite::ModuleLinkPattern;

pub use value_objects::{ArchiveFormat, DocVersion, FrontEnd, GeneratorFlag, VersionSet};

pub use validation::DomainValidator;
