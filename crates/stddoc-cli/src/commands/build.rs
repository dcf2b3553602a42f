//! Shared runner behind `stddoc phobos` and `stddoc tango`.

use std::path::Path;

use tracing::{debug, info, instrument};

use stddoc_adapters::{CommandArchiver, CommandPdfAssembler, DilGenerator, LocalFilesystem};
use stddoc_core::{
    application::{ApplicationError, BuildRequest, DocBuildService},
    error::StddocError,
};

use crate::{
    config::BuildConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Fail with the "path doesn't exist" error unless `path` is a directory.
///
/// Runs before anything else touches the disk, the generator lookup
/// included.
pub fn require_dir(path: &Path) -> CliResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(StddocError::from(ApplicationError::SourceRootNotFound {
            path: path.to_path_buf(),
        })
        .into())
    }
}

/// Wire the production adapters, run the pipeline and print the summary.
///
/// A generator that exited non-zero becomes [`CliError::GeneratorFailed`]
/// once the summary has been printed.
#[instrument(skip_all, fields(library = %request.profile.kind()))]
pub fn run(request: BuildRequest, config: &BuildConfig, output: &OutputManager) -> CliResult<()> {
    if request.destination.exists() && !request.destination.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!(
                "destination '{}' exists and is not a directory",
                request.destination.display()
            ),
            source: None,
        });
    }

    let generator = DilGenerator::new(config.tools.executable())?;
    debug!(exe = %generator.executable().display(), "Using dil");

    let archiver = CommandArchiver::new().with_seven_zip(&config.seven_zip);
    let mut service = DocBuildService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(generator),
        Box::new(archiver),
    );
    if let Some((program, args)) = &config.pdf_command {
        service = service.with_pdf_assembler(Box::new(
            CommandPdfAssembler::new(LocalFilesystem::new(), program).with_args(args.clone()),
        ));
    }

    output.header(&format!(
        "Building {} {} documentation into {}",
        request.profile.kind(),
        request.profile.version(),
        request.destination.display()
    ))?;
    let report = service.build(&request)?;
    output.report(&report)?;

    if report.succeeded() {
        info!(modules = report.modules, "Build succeeded");
        Ok(())
    } else {
        Err(CliError::GeneratorFailed {
            status: report.generator_status.to_string(),
        })
    }
}
