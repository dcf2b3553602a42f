//! The ordered document list, flags and version labels for one generator run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::entities::source_file::SourceFile;
use crate::domain::error::DomainError;
use crate::domain::value_objects::{GeneratorFlag, VersionSet};

/// One entry of the generator's document list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestDocument {
    /// A macro/template document (generated overlay or front-end bundle).
    Overlay(PathBuf),
    /// The library's root aggregator module.
    Aggregator(PathBuf),
    Source(SourceFile),
}

impl ManifestDocument {
    pub fn path(&self) -> &Path {
        match self {
            Self::Overlay(path) | Self::Aggregator(path) => path,
            Self::Source(source) => source.path(),
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}

/// Where the front-end wants its overlays relative to the sources.
///
/// Precedence is positional: for a repeated macro key, the document that
/// appears later wins. The two orders are fixed per front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrder {
    /// `sources + aggregator + overlays`.
    SourcesFirst,
    /// `overlays + aggregator + sources`.
    OverlaysFirst,
}

/// Parameters for a single generator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildManifest {
    destination: PathBuf,
    module_list: PathBuf,
    documents: Vec<ManifestDocument>,
    flags: Vec<GeneratorFlag>,
    versions: VersionSet,
}

impl BuildManifest {
    pub fn builder(destination: impl Into<PathBuf>, module_list: impl Into<PathBuf>) -> BuildManifestBuilder {
        BuildManifestBuilder {
            destination: destination.into(),
            module_list: module_list.into(),
            order: DocumentOrder::SourcesFirst,
            overlays: Vec::new(),
            aggregator: None,
            sources: Vec::new(),
            flags: Vec::new(),
            versions: VersionSet::default(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Where the generator records the modules it processed.
    pub fn module_list(&self) -> &Path {
        &self.module_list
    }

    pub fn documents(&self) -> &[ManifestDocument] {
        &self.documents
    }

    pub fn flags(&self) -> &[GeneratorFlag] {
        &self.flags
    }

    pub fn versions(&self) -> &VersionSet {
        &self.versions
    }

    pub fn source_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_source()).count()
    }

    /// Check the manifest's invariants: at least one source, no path twice.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.source_count() == 0 {
            return Err(DomainError::EmptyManifest);
        }
        let mut seen = HashSet::new();
        for doc in &self.documents {
            if !seen.insert(doc.path()) {
                return Err(DomainError::DuplicateDocument {
                    path: doc.path().to_path_buf(),
                });
            }
        }
        Ok(())
    }
}

/// Assembles a [`BuildManifest`] in the order the front-end requires.
#[derive(Debug, Clone)]
pub struct BuildManifestBuilder {
    destination: PathBuf,
    module_list: PathBuf,
    order: DocumentOrder,
    overlays: Vec<PathBuf>,
    aggregator: Option<PathBuf>,
    sources: Vec<SourceFile>,
    flags: Vec<GeneratorFlag>,
    versions: VersionSet,
}

impl BuildManifestBuilder {
    pub fn order(mut self, order: DocumentOrder) -> Self {
        self.order = order;
        self
    }

    /// Append an overlay. Overlays keep the order they are added in.
    pub fn overlay(mut self, path: impl Into<PathBuf>) -> Self {
        self.overlays.push(path.into());
        self
    }

    pub fn aggregator(mut self, path: Option<PathBuf>) -> Self {
        self.aggregator = path;
        self
    }

    pub fn sources(mut self, sources: impl IntoIterator<Item = SourceFile>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn flags(mut self, flags: impl IntoIterator<Item = GeneratorFlag>) -> Self {
        self.flags.extend(flags);
        self
    }

    pub fn versions(mut self, versions: VersionSet) -> Self {
        self.versions = versions;
        self
    }

    pub fn build(self) -> Result<BuildManifest, DomainError> {
        let overlays = self.overlays.into_iter().map(ManifestDocument::Overlay);
        let aggregator = self.aggregator.into_iter().map(ManifestDocument::Aggregator);
        let sources = self.sources.into_iter().map(ManifestDocument::Source);

        let documents: Vec<_> = match self.order {
            DocumentOrder::SourcesFirst => sources.chain(aggregator).chain(overlays).collect(),
            DocumentOrder::OverlaysFirst => overlays.chain(aggregator).chain(sources).collect(),
        };

        let manifest = BuildManifest {
            destination: self.destination,
            module_list: self.module_list,
            documents,
            flags: self.flags,
            versions: self.versions,
        };
        manifest.validate()?;
        Ok(manifest)
    }
}
