//! `stddoc phobos`: build the Phobos documentation.

use tracing::instrument;

use stddoc_core::{
    application::BuildRequest,
    domain::{DocVersion, FrontEnd, LibraryKind, LibraryProfile},
};

use crate::{
    cli::PhobosArgs, commands::build, config::AppConfig, error::CliResult, output::OutputManager,
};

#[instrument(skip_all, fields(version = %args.version))]
pub fn execute(args: PhobosArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let request = build_request(args, &config)?;
    build::require_dir(request.profile.source_root())?;
    build::run(request, &config.build_config(), &output)
}

/// Validate the arguments and turn them into a [`BuildRequest`].
fn build_request(args: PhobosArgs, config: &AppConfig) -> CliResult<BuildRequest> {
    let version = DocVersion::parse_phobos(&args.version)?;
    let front_end = if args.kandil {
        FrontEnd::Kandil
    } else {
        FrontEnd::Default
    };

    Ok(BuildRequest {
        profile: LibraryProfile::phobos(version, args.phobos_dir),
        front_end,
        destination: args
            .dest
            .unwrap_or_else(|| LibraryKind::Phobos.default_destination().into()),
        tools: config.build_config().tools,
        pdf: args.pdf,
        archives: args.packaging.archives,
    })
}
