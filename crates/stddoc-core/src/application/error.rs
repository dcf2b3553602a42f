//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! logic. Business logic errors are `DomainError` from `crate::domain`.
//!
//! A generator that runs and exits non-zero is not an error here: the exit
//! status is carried in the build report and post-processing continues.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The library source root is missing. Raised before any destination
    /// directory is created.
    #[error("The path '{}' doesn't exist.", path.display())]
    SourceRootNotFound { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The generator executable is not where the configuration says.
    #[error("Documentation generator not found at {path}")]
    GeneratorNotFound { path: PathBuf },

    /// The generator process could not be started at all.
    #[error("Failed to launch {program}: {reason}")]
    GeneratorLaunch { program: PathBuf, reason: String },

    #[error("PDF assembly failed: {reason}")]
    PdfAssemblyFailed { reason: String },

    #[error("Creating {format} archive failed: {reason}")]
    ArchiveFailed { format: String, reason: String },

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SourceRootNotFound { path } => vec![
                format!("Check the library path: {}", path.display()),
                "Pass the directory that contains the library's source files".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::GeneratorNotFound { path } => vec![
                format!("Build dil so that {} exists", path.display()),
                "Or point tool.dil_root / tool.dil_exe at an existing installation".into(),
                "Try: stddoc config path".into(),
            ],
            Self::GeneratorLaunch { .. } => vec![
                "Check that the generator is executable".into(),
            ],
            Self::PdfAssemblyFailed { .. } => vec![
                "Check the pdf.command setting and that the tool is installed".into(),
            ],
            Self::ArchiveFailed { format, .. } => vec![
                format!("Check that the {} archiver is installed and on PATH", format),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceRootNotFound { .. } => ErrorCategory::NotFound,
            Self::GeneratorNotFound { .. } | Self::AdapterNotConfigured { .. } => {
                ErrorCategory::Configuration
            }
            Self::FilesystemError { .. }
            | Self::GeneratorLaunch { .. }
            | Self::PdfAssemblyFailed { .. }
            | Self::ArchiveFailed { .. } => ErrorCategory::Internal,
        }
    }
}
