use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::DomainError;

/// Extension of a documented D module. Interface files (`.di`) are left
/// out so that every module name appears once.
pub const SOURCE_EXTENSION: &str = "d";

/// A discovered source document.
///
/// Invariant: `fqn` is derived from `path` relative to the module prefix
/// and never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFile {
    path: PathBuf,
    fqn: String,
}

impl SourceFile {
    /// Build a source file, deriving its module name from `prefix`.
    ///
    /// `prefix/std/c/stdio.d` becomes `std.c.stdio`.
    pub fn new(prefix: &Path, path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let fqn = module_fqn(prefix, &path)?;
        Ok(Self { path, fqn })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fully-qualified module name, e.g. `std.string`.
    pub fn fqn(&self) -> &str {
        &self.fqn
    }

    /// Module name with `.` replaced by `_`, as used in upstream filenames.
    pub fn flattened_name(&self) -> String {
        self.fqn.replace('.', "_")
    }

    /// Top-level package, or `None` for a module that sits at the root.
    pub fn package(&self) -> Option<&str> {
        self.fqn.split_once('.').map(|(head, _)| head)
    }

    /// Name of the page the generator emits for this module.
    pub fn page_name(&self) -> String {
        format!("{}.html", self.fqn)
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqn)
    }
}

/// Derive a module's fully-qualified name from its path below `prefix`.
pub fn module_fqn(prefix: &Path, path: &Path) -> Result<String, DomainError> {
    let relative = path
        .strip_prefix(prefix)
        .map_err(|_| DomainError::OutsideModulePrefix {
            path: path.to_path_buf(),
            prefix: prefix.to_path_buf(),
        })?;

    let stem = relative.with_extension("");
    let parts: Vec<String> = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return Err(DomainError::OutsideModulePrefix {
            path: path.to_path_buf(),
            prefix: prefix.to_path_buf(),
        });
    }
    Ok(parts.join("."))
}

/// Whether `path` ends in [`SOURCE_EXTENSION`].
pub fn is_source_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fqn_replaces_separators_and_strips_extension() {
        let f = SourceFile::new(Path::new("/lib/src"), "/lib/src/std/c/stdio.d").unwrap();
        assert_eq!(f.fqn(), "std.c.stdio");
        assert_eq!(f.flattened_name(), "std_c_stdio");
        assert_eq!(f.package(), Some("std"));
        assert_eq!(f.page_name(), "std.c.stdio.html");
    }

    #[test]
    fn root_module_has_no_package() {
        let f = SourceFile::new(Path::new("src"), "src/object.d").unwrap();
        assert_eq!(f.fqn(), "object");
        assert_eq!(f.package(), None);
    }

    #[test]
    fn path_outside_prefix_is_rejected() {
        assert!(matches!(
            SourceFile::new(Path::new("/a"), "/b/c.d"),
            Err(DomainError::OutsideModulePrefix { .. })
        ));
    }

    #[test]
    fn only_module_sources_count() {
        assert!(is_source_path(Path::new("x/y.d")));
        assert!(!is_source_path(Path::new("x/y.di")));
        assert!(!is_source_path(Path::new("x/y.D")));
        assert!(!is_source_path(Path::new("x/y.ddoc")));
        assert!(!is_source_path(Path::new("x/README")));
    }
}
