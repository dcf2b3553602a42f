//! PDF assembler adapters.
//!
//! Merging HTML pages into a PDF is delegated to an external program; this
//! module only hands it a job description.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info, instrument};

use stddoc_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, PdfAssembler, PdfJob},
    },
    domain::PdfParams,
    error::{Context, StddocError, StddocResult},
};

use crate::process;

/// Name of the job file written into the scratch directory.
pub const JOB_FILE: &str = "pdf_params.json";

#[derive(Debug, Serialize)]
struct JobFile<'a> {
    #[serde(flatten)]
    params: &'a PdfParams,
    pages: &'a [PathBuf],
    output: &'a Path,
}

/// Runs `<program> [args...] <scratch>/pdf_params.json`.
#[derive(Debug, Clone)]
pub struct CommandPdfAssembler<F> {
    filesystem: F,
    program: PathBuf,
    args: Vec<String>,
}

impl<F: Filesystem> CommandPdfAssembler<F> {
    pub fn new(filesystem: F, program: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Extra arguments placed before the job file.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// JSON job description handed to the program.
    pub fn job_json(job: &PdfJob) -> StddocResult<String> {
        let file = JobFile {
            params: &job.params,
            pages: &job.pages,
            output: &job.output,
        };
        serde_json::to_string_pretty(&file).context("serializing PDF job")
    }
}

impl<F: Filesystem> PdfAssembler for CommandPdfAssembler<F> {
    #[instrument(skip_all, fields(output = %job.output.display()))]
    fn assemble(&self, job: &PdfJob) -> StddocResult<()> {
        let job_file = job.scratch.join(JOB_FILE);
        self.filesystem.write_file(&job_file, &Self::job_json(job)?)?;

        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(&job_file);
        debug!(command = %process::describe(&command), "Running PDF assembler");

        let failed = |reason: String| StddocError::from(ApplicationError::PdfAssemblyFailed { reason });
        let code = process::exit_code(&mut command)
            .map_err(|e| failed(format!("could not run {}: {e}", self.program.display())))?;
        if code != 0 {
            return Err(failed(format!(
                "{} exited with code {code}",
                self.program.display()
            )));
        }
        info!(pages = job.pages.len(), "PDF written");
        Ok(())
    }
}

/// Records jobs and writes the page list to the output path.
#[derive(Debug, Clone)]
pub struct RecordingPdfAssembler<F> {
    filesystem: F,
    jobs: Arc<Mutex<Vec<PdfJob>>>,
}

impl<F: Filesystem> RecordingPdfAssembler<F> {
    pub fn new(filesystem: F) -> Self {
        Self {
            filesystem,
            jobs: Arc::default(),
        }
    }

    pub fn jobs(&self) -> Vec<PdfJob> {
        self.jobs.lock().map(|j| j.clone()).unwrap_or_default()
    }
}

impl<F: Filesystem> PdfAssembler for RecordingPdfAssembler<F> {
    fn assemble(&self, job: &PdfJob) -> StddocResult<()> {
        let listing: String = job
            .pages
            .iter()
            .map(|p| format!("{}\n", p.display()))
            .collect();
        self.filesystem.write_file(&job.output, &listing)?;
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.push(job.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFilesystem;

    fn job() -> PdfJob {
        PdfJob {
            pages: vec![PathBuf::from("/out/std.array.html")],
            output: PathBuf::from("/out/Phobos.2.032.API.pdf"),
            scratch: PathBuf::from("/out/tmp"),
            params: PdfParams {
                pdf_title: "Phobos 2.032 API".into(),
                cover_title: "Phobos 2.032<br/><b>API</b>".into(),
                author: "Walter Bright".into(),
                subject: "Programming API".into(),
                keywords: "Phobos D Standard Library".into(),
                nested_toc: true,
                sym_url: "http://dl.dropbox.com/u/17101773/doc/phobos.2.032/{0}".into(),
            },
        }
    }

    #[test]
    fn job_file_flattens_params() {
        let json = CommandPdfAssembler::<MemoryFilesystem>::job_json(&job()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["author"], "Walter Bright");
        assert_eq!(value["nested_toc"], true);
        assert_eq!(value["pages"][0], "/out/std.array.html");
        assert_eq!(value["output"], "/out/Phobos.2.032.API.pdf");
    }

    #[test]
    fn missing_program_is_an_assembly_failure() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out/tmp")).unwrap();
        let err = CommandPdfAssembler::new(fs.clone(), "/definitely/not/here/htmltopdf")
            .assemble(&job())
            .unwrap_err();

        assert!(matches!(
            err,
            StddocError::Application(ApplicationError::PdfAssemblyFailed { .. })
        ));
        assert!(fs.exists(Path::new("/out/tmp/pdf_params.json")));
    }

    #[test]
    fn recording_assembler_keeps_jobs() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out")).unwrap();
        let pdf = RecordingPdfAssembler::new(fs.clone());
        pdf.assemble(&job()).unwrap();

        assert_eq!(pdf.jobs(), vec![job()]);
        assert!(fs.exists(Path::new("/out/Phobos.2.032.API.pdf")));
    }
}
