//! Source discovery: walk the library tree and keep the documentable files.

use std::path::{Component, Path};
use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{LibraryProfile, SourceFile, SourceFilter, entities::source_file::is_source_path},
    error::StddocResult,
};

pub struct SourceDiscovery<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> SourceDiscovery<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Every source file below the profile's root that survives its filter,
    /// sorted by path.
    ///
    /// Fails with `SourceRootNotFound` if the root is missing.
    #[instrument(skip_all, fields(root = %profile.source_root().display()))]
    pub fn discover(&self, profile: &LibraryProfile) -> StddocResult<Vec<SourceFile>> {
        let root = profile.source_root();
        if !self.filesystem.is_dir(root) {
            return Err(ApplicationError::SourceRootNotFound {
                path: root.to_path_buf(),
            }
            .into());
        }

        let mut paths: Vec<_> = self
            .filesystem
            .walk_files(root, profile.filter())?
            .into_iter()
            .filter(|path| is_source_path(path))
            .filter(|path| keep(root, path, profile.filter()))
            .collect();
        paths.sort();
        paths.dedup();

        let sources = paths
            .into_iter()
            .map(|path| SourceFile::new(profile.module_prefix(), path))
            .collect::<Result<Vec<_>, _>>()?;

        info!(modules = sources.len(), "Discovered source files");
        Ok(sources)
    }
}

/// Drop files whose name is ignored or that sit below a pruned directory.
fn keep(root: &Path, path: &Path, filter: &SourceFilter) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if filter.is_ignored_file(&name) {
        debug!(path = %path.display(), "Ignored by name");
        return false;
    }

    let relative = path.strip_prefix(root).unwrap_or(path);
    let pruned = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .any(|c| matches!(c, Component::Normal(dir) if filter.is_pruned_dir(&dir.to_string_lossy())));
    if pruned {
        debug!(path = %path.display(), "Inside a pruned directory");
    }
    !pruned
}
