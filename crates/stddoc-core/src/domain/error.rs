// ============================================================================
// domain/error.rs - DOCUMENTATION DOMAIN ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so reports can carry them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("invalid version '{input}': expected {expected}")]
    InvalidVersion {
        input: String,
        expected: &'static str,
    },

    #[error("could not read the library version: {reason}")]
    VersionUnreadable { reason: String },

    #[error("macro '{key}' is defined twice in overlay '{overlay}'")]
    DuplicateMacro { key: String, overlay: String },

    #[error("unknown archive format '{input}'")]
    UnknownArchiveFormat { input: String },

    #[error("invalid macro name '{key}'")]
    InvalidMacroName { key: String },

    #[error("source file {path} is not under the module prefix {prefix}")]
    OutsideModulePrefix { path: PathBuf, prefix: PathBuf },

    // ========================================================================
    // Manifest Constraint Violations
    // ========================================================================
    #[error("build manifest has no source documents")]
    EmptyManifest,

    #[error("document listed twice in build manifest: {path}")]
    DuplicateDocument { path: PathBuf },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidVersion { expected, .. } => vec![
                format!("The version must look like {}", expected),
                "Example: stddoc phobos 2.032 ~/phobos/src/phobos".into(),
            ],
            Self::VersionUnreadable { .. } => vec![
                "Check that tango/core/Version.d exists and declares Major and Minor".into(),
            ],
            Self::DuplicateMacro { key, .. } => vec![
                format!("Remove one of the '{}' definitions", key),
                "Later overlays may override a macro; a single overlay may not".into(),
            ],
            Self::OutsideModulePrefix { prefix, .. } => vec![format!(
                "Source files must live below {}",
                prefix.display()
            )],
            Self::EmptyManifest => vec![
                "No source files were found under the library root".into(),
                "Check that the directory really contains .d files".into(),
            ],
            Self::UnknownArchiveFormat { .. } => {
                vec!["Supported archive formats: 7z, zip, tar.gz, tar.bz2".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidVersion { .. }
            | Self::InvalidMacroName { .. }
            | Self::UnknownArchiveFormat { .. } => ErrorCategory::Validation,
            Self::VersionUnreadable { .. } | Self::EmptyManifest => ErrorCategory::NotFound,
            Self::DuplicateMacro { .. }
            | Self::OutsideModulePrefix { .. }
            | Self::DuplicateDocument { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
