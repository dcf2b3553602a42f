//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stddoc_core::domain::ArchiveFormat;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "stddoc",
    bin_name = "stddoc",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Build API documentation for the D standard libraries with dil",
    long_about = "stddoc runs the dil documentation generator over Phobos or Tango, \
                  post-processes the HTML and optionally packages it as a PDF \
                  and archives.",
    after_help = "EXAMPLES:\n\
        \x20 stddoc phobos 2.032 ~/dmd/src/phobos\n\
        \x20 stddoc phobos 2.032 ~/dmd/src/phobos phobosdoc --kandil --pdf --archive 7z\n\
        \x20 stddoc tango ~/tango --rev 5400\n\
        \x20 stddoc completions bash > /usr/share/bash-completion/completions/stddoc",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the Phobos documentation.
    #[command(
        about = "Build Phobos documentation",
        after_help = "EXAMPLES:\n\
            \x20 stddoc phobos 2.032 dmd/src/phobos\n\
            \x20 stddoc phobos 2.032 dmd/src/phobos out --kandil --pdf\n\
            \x20 stddoc phobos 2.032 dmd/src/phobos --archive 7z --archive tar.gz"
    )]
    Phobos(PhobosArgs),

    /// Build the Tango documentation.
    #[command(
        about = "Build Tango documentation",
        after_help = "EXAMPLES:\n\
            \x20 stddoc tango ~/tango\n\
            \x20 stddoc tango ~/tango tangodoc --rev 5400 --archive zip"
    )]
    Tango(TangoArgs),

    /// Write a configuration file with the default values.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stddoc init           # platform config directory\n\
            \x20 stddoc init --local   # .stddoc.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stddoc completions bash > ~/.local/share/bash-completion/completions/stddoc\n\
            \x20 stddoc completions zsh  > ~/.zfunc/_stddoc\n\
            \x20 stddoc completions fish > ~/.config/fish/completions/stddoc.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the resolved configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stddoc config get tool.dil_root\n\
            \x20 stddoc config list\n\
            \x20 stddoc config path"
    )]
    Config(ConfigCommands),
}

// ── phobos ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PhobosArgs {
    /// Release label such as `2.032`; only `<major>.<minor:3>` is accepted.
    #[arg(value_name = "VERSION", help = "Phobos version, e.g. 2.032")]
    pub version: String,

    #[arg(value_name = "PHOBOS_DIR", help = "Directory holding the Phobos sources")]
    pub phobos_dir: PathBuf,

    #[arg(value_name = "DEST", help = "Destination directory (default: phobosdoc)")]
    pub dest: Option<PathBuf>,

    #[arg(long = "kandil", help = "Use the kandil front-end")]
    pub kandil: bool,

    /// Only honoured together with `--kandil`.
    #[arg(long = "pdf", help = "Also assemble a PDF (kandil output only)")]
    pub pdf: bool,

    #[command(flatten)]
    pub packaging: PackagingArgs,
}

// ── tango ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TangoArgs {
    #[arg(value_name = "TANGO_DIR", help = "Tango checkout (contains tango/)")]
    pub tango_dir: PathBuf,

    #[arg(value_name = "DEST", help = "Destination directory (default: tangodoc)")]
    pub dest: Option<PathBuf>,

    /// Pins repository links to a revision.
    #[arg(long = "rev", value_name = "N", help = "Repository revision for source links")]
    pub revision: Option<u32>,

    /// Tango has no PDF layout; the request is reported and skipped.
    #[arg(long = "pdf", help = "Request a PDF (not supported for Tango)")]
    pub pdf: bool,

    #[command(flatten)]
    pub packaging: PackagingArgs,
}

#[derive(Debug, Args)]
pub struct PackagingArgs {
    #[arg(
        long = "archive",
        value_name = "FMT",
        help = "Create an archive of the output: 7z, zip, tar.gz, tar.bz2 (repeatable)"
    )]
    pub archives: Vec<ArchiveFormat>,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.stddoc.toml` in the current directory.
    #[arg(long = "local", help = "Create .stddoc.toml in the current directory")]
    pub local: bool,

    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `tool.dil_root`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_phobos_command() {
        let cli = Cli::parse_from([
            "stddoc",
            "phobos",
            "2.032",
            "dmd/src/phobos",
            "--kandil",
            "--archive",
            "7z",
            "--archive",
            "tar.gz",
        ]);
        let Commands::Phobos(args) = cli.command else {
            panic!("expected Phobos command");
        };
        assert_eq!(args.version, "2.032");
        assert!(args.kandil);
        assert_eq!(args.dest, None);
        assert_eq!(
            args.packaging.archives,
            vec![ArchiveFormat::SevenZip, ArchiveFormat::TarGz]
        );
    }

    #[test]
    fn parse_tango_revision() {
        let cli = Cli::parse_from(["stddoc", "tango", "/src/tango", "out", "--rev", "5400"]);
        let Commands::Tango(args) = cli.command else {
            panic!("expected Tango command");
        };
        assert_eq!(args.revision, Some(5400));
        assert_eq!(args.dest, Some(PathBuf::from("out")));
    }

    #[test]
    fn unknown_archive_format_is_rejected() {
        let result = Cli::try_parse_from([
            "stddoc", "phobos", "2.032", "src", "--archive", "rar",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn phobos_requires_version_and_dir() {
        assert!(Cli::try_parse_from(["stddoc", "phobos", "2.032"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["stddoc", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
