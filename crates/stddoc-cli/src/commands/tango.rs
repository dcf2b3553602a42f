//! `stddoc tango`: build the Tango documentation.

use tracing::{debug, instrument};

use stddoc_adapters::LocalFilesystem;
use stddoc_core::{
    application::{BuildRequest, ports::Filesystem},
    domain::{DocVersion, FrontEnd, LibraryKind, LibraryProfile},
};

use crate::{
    cli::TangoArgs, commands::build, config::AppConfig, error::CliResult, output::OutputManager,
};

#[instrument(skip_all, fields(dir = %args.tango_dir.display()))]
pub fn execute(args: TangoArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    build::require_dir(&args.tango_dir)?;
    let version = read_version(&LocalFilesystem::new(), &args)?;
    debug!(version = %version, "Tango version read");

    let request = BuildRequest {
        profile: LibraryProfile::tango(version, &args.tango_dir, args.revision),
        front_end: FrontEnd::Kandil,
        destination: args
            .dest
            .unwrap_or_else(|| LibraryKind::Tango.default_destination().into()),
        tools: config.build_config().tools,
        pdf: args.pdf,
        archives: args.packaging.archives,
    };
    build::run(request, &config.build_config(), &output)
}

/// The release number lives in `tango/core/Version.d`.
fn read_version(fs: &dyn Filesystem, args: &TangoArgs) -> CliResult<DocVersion> {
    let path = LibraryProfile::tango_version_file(&args.tango_dir);
    let source = fs.read_to_string(&path)?;
    Ok(DocVersion::from_tango_source(&source)?)
}
