//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate only ever sees the [`BuildConfig`]
//! derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STDDOC_TOOL__DIL_ROOT`, `STDDOC_PDF__COMMAND`, ...
//! 3. Config file: `--config FILE`, else the platform config file, else
//!    `.stddoc.toml` in the current directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use stddoc_core::domain::ToolResources;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG: &str = ".stddoc.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub tool: ToolConfig,
    pub pdf: PdfConfig,
    pub archive: ArchiveConfig,
    pub output: OutputConfig,
}

/// Where dil and its data files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Installation root holding `bin/dil` and `data/`.
    pub dil_root: PathBuf,
    /// Overrides `<dil_root>/bin/dil`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dil_exe: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Program that turns a job file into a PDF. PDFs cannot be built
    /// without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    pub seven_zip: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tool: ToolConfig {
                dil_root: PathBuf::from("dil"),
                dil_exe: None,
            },
            pdf: PdfConfig::default(),
            archive: ArchiveConfig {
                seven_zip: PathBuf::from("7zr"),
            },
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
        }
    }
}

/// The settings a build actually needs, resolved from [`AppConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub tools: ToolResources,
    pub pdf_command: Option<(PathBuf, Vec<String>)>,
    pub seven_zip: PathBuf,
}

impl AppConfig {
    /// Layer defaults, the config file and `STDDOC_*` variables.
    ///
    /// An explicit `config_file` must exist; the default locations are
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;
        let mut builder = config::Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                builder = builder
                    .add_source(config::File::from(Self::config_path()).required(false))
                    .add_source(config::File::from(Path::new(LOCAL_CONFIG)).required(false));
            }
        }

        builder
            .add_source(
                config::Environment::with_prefix("STDDOC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.stddoc.toml` in
    /// the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "stddoc", "stddoc")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
    }

    pub fn build_config(&self) -> BuildConfig {
        let mut tools = ToolResources::from_root(&self.tool.dil_root);
        if let Some(exe) = &self.tool.dil_exe {
            tools = tools.with_executable(exe);
        }
        BuildConfig {
            tools,
            pdf_command: self
                .pdf
                .command
                .clone()
                .map(|command| (command, self.pdf.args.clone())),
            seven_zip: self.archive.seven_zip.clone(),
        }
    }
}
