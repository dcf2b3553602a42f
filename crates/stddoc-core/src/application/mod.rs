//! Application layer for stddoc.
//!
//! This layer contains:
//! - **Services**: the documentation build pipeline and its stages
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All rewrite rules and ordering live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{BuildReport, BuildRequest, BuildWarning, DocBuildService};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ArchiveRequest, Archiver, DocGenerator, Filesystem, GeneratorStatus, PdfAssembler, PdfJob,
};

pub use error::ApplicationError;
