//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stddoc-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{ArchiveFormat, BuildManifest, PdfParams, SourceFilter};
use crate::error::StddocResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stddoc_adapters::filesystem::LocalFilesystem` (production)
/// - `stddoc_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StddocResult<()>;

    fn read_to_string(&self, path: &Path) -> StddocResult<String>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> StddocResult<()>;

    /// Copy a single file; `to` is the full target path.
    fn copy_file(&self, from: &Path, to: &Path) -> StddocResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Files directly inside `dir`, sorted by path.
    fn list_files(&self, dir: &Path) -> StddocResult<Vec<PathBuf>>;

    /// Every file below `root`, at any depth. Order is unspecified.
    ///
    /// Directories whose name `filter` prunes are not entered, and symlinks
    /// that do not resolve to a file are skipped.
    fn walk_files(&self, root: &Path, filter: &SourceFilter) -> StddocResult<Vec<PathBuf>>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StddocResult<()>;
}

/// Exit status of one generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorStatus {
    code: i32,
}

impl GeneratorStatus {
    pub const SUCCESS: Self = Self { code: 0 };

    /// `-1` stands for a process killed by a signal.
    pub const fn new(code: i32) -> Self {
        Self { code }
    }

    pub const fn code(&self) -> i32 {
        self.code
    }

    pub const fn success(&self) -> bool {
        self.code == 0
    }
}

impl fmt::Display for GeneratorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success() {
            f.write_str("ok")
        } else {
            write!(f, "exit code {}", self.code)
        }
    }
}

/// Port for the external documentation generator.
///
/// Implemented by:
/// - `stddoc_adapters::generator::DilGenerator` (spawns dil)
/// - `stddoc_adapters::generator::ScriptedGenerator` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait DocGenerator: Send + Sync {
    /// Run the generator to completion.
    ///
    /// A process that runs and exits non-zero is `Ok` with a failed status;
    /// `Err` means it could not be run at all.
    fn generate(&self, manifest: &BuildManifest) -> StddocResult<GeneratorStatus>;
}

/// Input for one PDF assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfJob {
    /// Pages to merge, in order.
    pub pages: Vec<PathBuf>,
    pub output: PathBuf,
    pub scratch: PathBuf,
    pub params: PdfParams,
}

#[cfg_attr(test, mockall::automock)]
pub trait PdfAssembler: Send + Sync {
    fn assemble(&self, job: &PdfJob) -> StddocResult<()>;
}

/// Compress `source_dir` into `<parent of source_dir>/<base_name>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub source_dir: PathBuf,
    pub format: ArchiveFormat,
    pub base_name: String,
}

impl ArchiveRequest {
    /// Where the archive ends up.
    pub fn output_path(&self) -> PathBuf {
        let name = self.format.file_name(&self.base_name);
        match self.source_dir.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Archiver: Send + Sync {
    /// Returns the path of the archive written.
    fn archive(&self, request: &ArchiveRequest) -> StddocResult<PathBuf>;
}
