//! stddoc core - documentation build pipeline for D standard libraries.
//!
//! This crate provides the domain and application layers of `stddoc`,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stddoc-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (DocBuildService and its stages)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, DocGenerator, PdfAssembler,│
//! │  Archiver)                              │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stddoc-adapters (Infrastructure)     │
//! │ (LocalFilesystem, DilGenerator, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (LibraryProfile, overlays, manifest,    │
//! │  rewrite rules)                         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stddoc_core::prelude::*;
//!
//! # fn run(fs: Box<dyn Filesystem>, dil: Box<dyn DocGenerator>, zip: Box<dyn Archiver>) -> StddocResult<()> {
//! let version = DocVersion::parse_phobos("2.032")?;
//! let request = BuildRequest {
//!     profile: LibraryProfile::phobos(version, "dmd/src/phobos"),
//!     front_end: FrontEnd::Default,
//!     destination: "phobosdoc".into(),
//!     tools: ToolResources::from_root("dil"),
//!     pdf: false,
//!     archives: vec![ArchiveFormat::SevenZip],
//! };
//! let report = DocBuildService::new(fs, dil, zip).build(&request)?;
//! println!("{} modules, generator {}", report.modules, report.generator_status);
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, BuildReport, BuildRequest, BuildWarning, DocBuildService,
        ports::{
            ArchiveRequest, Archiver, DocGenerator, Filesystem, GeneratorStatus, PdfAssembler,
            PdfJob,
        },
    };
    pub use crate::domain::{
        ArchiveFormat, BuildManifest, DestinationLayout, DocVersion, DomainError, FrontEnd,
        GeneratorFlag, LibraryKind, LibraryProfile, ManifestDocument, PdfParams, SourceFile,
        ToolResources, VersionSet,
    };
    pub use crate::error::{Context, ErrorCategory, StddocError, StddocResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
