//! Archive adapters.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use stddoc_core::{
    application::{
        ApplicationError,
        ports::{ArchiveRequest, Archiver, Filesystem},
    },
    domain::{ArchiveFormat, SourceFilter},
    error::{StddocError, StddocResult},
};

use crate::process;

/// Shells out to `7zr`, `zip` or `tar`, run from the destination's parent so
/// the archive holds a single top-level directory.
#[derive(Debug, Clone)]
pub struct CommandArchiver {
    seven_zip: PathBuf,
}

impl CommandArchiver {
    pub fn new() -> Self {
        Self {
            seven_zip: PathBuf::from("7zr"),
        }
    }

    /// Use a different 7-Zip executable (`7z`, `7za`, a full path).
    pub fn with_seven_zip(mut self, program: impl Into<PathBuf>) -> Self {
        self.seven_zip = program.into();
        self
    }

    /// Program and arguments for one request.
    pub fn command_line(&self, request: &ArchiveRequest) -> (PathBuf, Vec<OsString>) {
        let name: OsString = request.format.file_name(&request.base_name).into();
        let dir: OsString = request
            .source_dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| request.source_dir.clone().into_os_string());

        match request.format {
            ArchiveFormat::SevenZip => (self.seven_zip.clone(), vec!["a".into(), name, dir]),
            ArchiveFormat::Zip => ("zip".into(), vec!["-r".into(), name, dir]),
            ArchiveFormat::TarGz => ("tar".into(), vec!["-czf".into(), name, dir]),
            ArchiveFormat::TarBz2 => ("tar".into(), vec!["-cjf".into(), name, dir]),
        }
    }
}

impl Default for CommandArchiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Archiver for CommandArchiver {
    #[instrument(skip_all, fields(format = %request.format))]
    fn archive(&self, request: &ArchiveRequest) -> StddocResult<PathBuf> {
        let (program, args) = self.command_line(request);
        let mut command = Command::new(&program);
        command.args(&args);
        if let Some(parent) = request.source_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            command.current_dir(parent);
        }
        debug!(command = %process::describe(&command), "Running archiver");

        let failed = |reason: String| {
            StddocError::from(ApplicationError::ArchiveFailed {
                format: request.format.to_string(),
                reason,
            })
        };
        let code = process::exit_code(&mut command)
            .map_err(|e| failed(format!("could not run {}: {e}", program.display())))?;
        if code != 0 {
            return Err(failed(format!("{} exited with code {code}", program.display())));
        }
        Ok(request.output_path())
    }
}

/// What [`RecordingArchiver`] saw for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSnapshot {
    pub request: ArchiveRequest,
    /// Files under the source directory at archive time, relative and sorted.
    pub entries: Vec<PathBuf>,
}

/// Snapshots the tree instead of compressing it, and writes the entry list
/// to the archive path.
#[derive(Debug, Clone)]
pub struct RecordingArchiver<F> {
    filesystem: F,
    snapshots: Arc<Mutex<Vec<ArchiveSnapshot>>>,
}

impl<F: Filesystem> RecordingArchiver<F> {
    pub fn new(filesystem: F) -> Self {
        Self {
            filesystem,
            snapshots: Arc::default(),
        }
    }

    pub fn snapshots(&self) -> Vec<ArchiveSnapshot> {
        self.snapshots.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl<F: Filesystem> Archiver for RecordingArchiver<F> {
    fn archive(&self, request: &ArchiveRequest) -> StddocResult<PathBuf> {
        let mut entries: Vec<PathBuf> = self
            .filesystem
            .walk_files(&request.source_dir, &SourceFilter::new())?
            .into_iter()
            .filter_map(|p| p.strip_prefix(&request.source_dir).ok().map(PathBuf::from))
            .collect();
        entries.sort();

        let output = request.output_path();
        let listing: String = entries
            .iter()
            .map(|p| format!("{}\n", p.display()))
            .collect();
        self.filesystem.write_file(&output, &listing)?;

        if let Ok(mut snapshots) = self.snapshots.lock() {
            snapshots.push(ArchiveSnapshot {
                request: request.clone(),
                entries,
            });
        }
        Ok(output)
    }
}
