pub mod layout;
pub mod manifest;
pub mod overlay;
pub mod profile;
pub mod source_file;

pub use crate::domain::DomainError;
pub use layout::{DestinationLayout, KandilBundle, ToolResources};
pub use manifest::{BuildManifest, BuildManifestBuilder, DocumentOrder, ManifestDocument};
pub use overlay::{MacroOverlay, MacroTable, OverlayBody, OverlayKind};
pub use profile::{AssetCopy, LibraryKind, LibraryProfile, PdfParams, PdfSettings, SourceFilter};
pub use source_file::SourceFile;
