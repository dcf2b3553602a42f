//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;
use stddoc_core::application::BuildReport;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// The flag wins over `output.format`; `auto` becomes human on a
    /// terminal and plain otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => parse_format(&config.output.format),
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}")
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}")
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}")
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// End-of-run summary. JSON output ignores `--quiet`.
    pub fn report(&self, report: &BuildReport) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            let json = serde_json::to_string_pretty(&ReportSummary::from(report))
                .map_err(io::Error::other)?;
            return self.term.write_line(&json);
        }

        self.header(&format!(
            "{} {} documentation ({} front-end)",
            report.library, report.version, report.front_end
        ))?;
        self.info(&format!("Modules: {}", report.modules))?;
        self.info(&format!("Destination: {}", report.destination.display()))?;
        for warning in &report.warnings {
            self.warning(&warning.to_string())?;
        }
        if let Some(pdf) = &report.pdf {
            self.info(&format!("PDF: {}", pdf.display()))?;
        }
        for archive in &report.archives {
            self.info(&format!("Archive: {}", archive.display()))?;
        }
        if report.succeeded() {
            self.success(&format!("dil: {}", report.generator_status))?;
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

fn parse_format(value: &str) -> OutputFormat {
    match value.to_ascii_lowercase().as_str() {
        "human" => OutputFormat::Human,
        "plain" => OutputFormat::Plain,
        "json" => OutputFormat::Json,
        _ => OutputFormat::Auto,
    }
}

/// Serialisable view of a [`BuildReport`].
#[derive(Debug, Serialize)]
struct ReportSummary {
    library: String,
    version: String,
    front_end: String,
    destination: PathBuf,
    modules: usize,
    generator_exit_code: i32,
    succeeded: bool,
    assets_copied: usize,
    warnings: Vec<String>,
    pdf: Option<PathBuf>,
    archives: Vec<PathBuf>,
}

impl From<&BuildReport> for ReportSummary {
    fn from(report: &BuildReport) -> Self {
        Self {
            library: report.library.to_string(),
            version: report.version.clone(),
            front_end: report.front_end.to_string(),
            destination: report.destination.clone(),
            modules: report.modules,
            generator_exit_code: report.generator_status.code(),
            succeeded: report.succeeded(),
            assets_copied: report.assets_copied,
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
            pdf: report.pdf.clone(),
            archives: report.archives.clone(),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use stddoc_core::application::ports::GeneratorStatus;
    use stddoc_core::application::BuildWarning;
    use stddoc_core::domain::{FrontEnd, LibraryKind};

    fn make_manager(format: OutputFormat, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn explicit_flag_beats_config() {
        let out = make_manager(OutputFormat::Json, false);
        assert_eq!(out.format(), OutputFormat::Json);
    }

    #[test]
    fn config_format_used_when_flag_is_auto() {
        let mut config = AppConfig::default();
        config.output.format = "plain".into();
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Auto,
        };
        let out = OutputManager::new(&args, &config);
        assert_eq!(out.format(), OutputFormat::Plain);
        assert!(!out.supports_color());
    }

    #[test]
    fn no_color_flag_reported() {
        assert!(make_manager(OutputFormat::Human, false).supports_color());
        assert!(!make_manager(OutputFormat::Human, true).supports_color());
    }

    #[test]
    fn summary_carries_status_and_warnings() {
        let report = BuildReport {
            library: LibraryKind::Phobos,
            version: "2.032".into(),
            front_end: FrontEnd::Default,
            destination: PathBuf::from("phobosdoc"),
            modules: 2,
            generator_status: GeneratorStatus::new(1),
            warnings: vec![BuildWarning::MissingAsset {
                path: PathBuf::from("erf.gif"),
            }],
            assets_copied: 4,
            pdf: None,
            archives: vec![],
        };
        let summary = ReportSummary::from(&report);
        assert_eq!(summary.library, "Phobos");
        assert_eq!(summary.generator_exit_code, 1);
        assert!(!summary.succeeded);
        assert_eq!(summary.warnings, vec!["asset erf.gif not found, skipped"]);
    }
}
