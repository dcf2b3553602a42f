use std::collections::HashSet;

use crate::domain::{
    entities::{BuildManifest, MacroOverlay},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_manifest(manifest: &BuildManifest) -> Result<(), DomainError> {
        manifest.validate()
    }

    /// Overlays written in one run must not share a destination path.
    pub fn validate_overlays(overlays: &[MacroOverlay]) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for overlay in overlays {
            if !seen.insert(overlay.path()) {
                return Err(DomainError::DuplicateDocument {
                    path: overlay.path().to_path_buf(),
                });
            }
        }
        Ok(())
    }
}
