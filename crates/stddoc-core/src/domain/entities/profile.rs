//! Library profiles: everything that differs between documenting Phobos and
//! documenting Tango, fixed when the profile is built.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::entities::layout::{DestinationLayout, ToolResources};
use crate::domain::entities::manifest::DocumentOrder;
use crate::domain::entities::overlay::{self, MacroTable};
use crate::domain::error::DomainError;
use crate::domain::rewrite;
use crate::domain::value_objects::{DocVersion, FrontEnd, GeneratorFlag, VersionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryKind {
    Phobos,
    Tango,
}

impl LibraryKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Phobos => "Phobos",
            Self::Tango => "Tango",
        }
    }

    /// Destination used when the caller does not name one.
    pub const fn default_destination(&self) -> &'static str {
        match self {
            Self::Phobos => "phobosdoc",
            Self::Tango => "tangodoc",
        }
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directory-prune and filename-ignore predicates for discovery.
///
/// Both match exact names: `internal` prunes `std/internal/` but not
/// `std/internals/`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceFilter {
    prune_dirs: Vec<String>,
    ignore_files: Vec<String>,
}

impl SourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prune_dir(mut self, name: impl Into<String>) -> Self {
        self.prune_dirs.push(name.into());
        self
    }

    pub fn ignore_file(mut self, name: impl Into<String>) -> Self {
        self.ignore_files.push(name.into());
        self
    }

    pub fn is_pruned_dir(&self, name: &str) -> bool {
        self.prune_dirs.iter().any(|d| d == name)
    }

    pub fn is_ignored_file(&self, name: &str) -> bool {
        self.ignore_files.iter().any(|f| f == name)
    }
}

/// Parameters handed to the PDF assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfParams {
    pub pdf_title: String,
    pub cover_title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub nested_toc: bool,
    pub sym_url: String,
}

/// How a library's PDF is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfSettings {
    pub params: PdfParams,
    /// Page names left out of the PDF.
    pub excluded_pages: Vec<String>,
    pub file_name: String,
    /// Files in the destination root that the assembler needs in its
    /// scratch directory.
    pub scratch_assets: Vec<String>,
}

impl PdfSettings {
    pub fn includes_page(&self, name: &str) -> bool {
        !self.excluded_pages.iter().any(|p| p == name)
    }
}

/// A static asset to place into the destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetCopy {
    File { from: PathBuf, to: PathBuf },
    /// Every file directly inside `from`, copied into `to`.
    Contents { from: PathBuf, to: PathBuf },
}

fn into_dir(from: PathBuf, dir: &Path) -> AssetCopy {
    let to = match from.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    };
    AssetCopy::File { from, to }
}

/// Everything the pipeline needs to know about one library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryProfile {
    kind: LibraryKind,
    version: DocVersion,
    source_root: PathBuf,
    module_prefix: PathBuf,
    filter: SourceFilter,
    base_template: Option<PathBuf>,
    aggregator: Option<PathBuf>,
    aggregator_page: Option<String>,
    versions: VersionSet,
    html_dir: Option<PathBuf>,
    license: Option<PathBuf>,
    revision: Option<u32>,
    archive_base: String,
    pdf: Option<PdfSettings>,
}

impl LibraryProfile {
    /// Phobos sources live directly in `phobos_dir`; its static HTML assets
    /// live in `phobos_dir/../../html/d/phobos`.
    pub fn phobos(version: DocVersion, phobos_dir: impl Into<PathBuf>) -> Self {
        let root = phobos_dir.into();
        let label = version.label().to_string();
        let html_dir = root.join("..").join("..").join("html").join("d").join("phobos");

        let pdf = PdfSettings {
            params: PdfParams {
                pdf_title: format!("Phobos {label} API"),
                cover_title: format!("Phobos {label}<br/><b>API</b>"),
                author: "Walter Bright".into(),
                subject: "Programming API".into(),
                keywords: "Phobos D Standard Library".into(),
                nested_toc: true,
                sym_url: format!("http://dl.dropbox.com/u/17101773/doc/phobos.{label}/{{0}}"),
            },
            excluded_pages: vec![
                "phobos.html".into(),
                "std.c.windows.windows.html".into(),
                "index.html".into(),
            ],
            file_name: format!("Phobos.{label}.API.pdf"),
            scratch_assets: vec!["erf.gif".into(), "erfc.gif".into()],
        };

        Self {
            kind: LibraryKind::Phobos,
            filter: SourceFilter::new()
                .prune_dir("internal")
                .ignore_file("phobos.d")
                .ignore_file("unittest.d"),
            base_template: Some(root.join("std.ddoc")),
            aggregator: Some(root.join("phobos.d")),
            aggregator_page: Some("phobos.html".into()),
            versions: VersionSet::new(["Windows", "DDoc"]),
            html_dir: Some(html_dir),
            license: None,
            revision: None,
            archive_base: format!("Phobos.{label}_doc"),
            pdf: Some(pdf),
            source_root: root.clone(),
            module_prefix: root,
            version,
        }
    }

    /// Tango sources live in `tango_dir/tango`; module names keep the
    /// `tango.` package.
    pub fn tango(version: DocVersion, tango_dir: impl Into<PathBuf>, revision: Option<u32>) -> Self {
        let root = tango_dir.into();
        Self {
            kind: LibraryKind::Tango,
            source_root: root.join("tango"),
            filter: SourceFilter::new(),
            base_template: None,
            aggregator: None,
            aggregator_page: None,
            versions: VersionSet::new(["Windows", "Tango", "DDoc"]),
            html_dir: None,
            license: Some(root.join("LICENSE")),
            revision,
            archive_base: format!("Tango.{}_doc", version.label()),
            pdf: None,
            module_prefix: root,
            version,
        }
    }

    /// File the Tango version is read from.
    pub fn tango_version_file(tango_dir: &Path) -> PathBuf {
        tango_dir.join("tango").join("core").join("Version.d")
    }

    pub fn kind(&self) -> LibraryKind {
        self.kind
    }

    pub fn version(&self) -> &DocVersion {
        &self.version
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn module_prefix(&self) -> &Path {
        &self.module_prefix
    }

    pub fn filter(&self) -> &SourceFilter {
        &self.filter
    }

    /// Upstream macro template to rewrite into the base overlay.
    pub fn base_template(&self) -> Option<&Path> {
        self.base_template.as_deref()
    }

    /// Root aggregator module handed to the generator.
    pub fn aggregator(&self) -> Option<&Path> {
        self.aggregator.as_deref()
    }

    /// Name of the page the generator emits for the aggregator module.
    pub fn aggregator_page(&self) -> Option<&str> {
        self.aggregator_page.as_deref()
    }

    pub fn versions(&self) -> &VersionSet {
        &self.versions
    }

    pub fn archive_base(&self) -> &str {
        &self.archive_base
    }

    pub fn pdf(&self) -> Option<&PdfSettings> {
        self.pdf.as_ref()
    }

    /// Absolute documentation URL that parent-relative links resolve to.
    pub fn url_base(&self) -> String {
        rewrite::doc_url_base(self.version.url_version())
    }

    /// Name of the library's own overlay in `tmp/`: the rewritten base
    /// template for Phobos, the macro table for Tango.
    pub fn overlay_name(&self) -> String {
        format!("{}.ddoc", self.kind.as_str().to_ascii_lowercase())
    }

    /// Tango only has the kandil front-end; Phobos takes what it is given.
    pub fn front_end(&self, requested: FrontEnd) -> FrontEnd {
        match self.kind {
            LibraryKind::Phobos => requested,
            LibraryKind::Tango => FrontEnd::Kandil,
        }
    }

    pub fn document_order(&self, front_end: FrontEnd) -> DocumentOrder {
        match front_end {
            FrontEnd::Default => DocumentOrder::SourcesFirst,
            FrontEnd::Kandil => DocumentOrder::OverlaysFirst,
        }
    }

    pub fn flags(&self, front_end: FrontEnd) -> Vec<GeneratorFlag> {
        let mut flags = vec![GeneratorFlag::Verbose];
        if self.kind == LibraryKind::Phobos {
            flags.push(GeneratorFlag::IncludeUndocumented);
        }
        flags.push(GeneratorFlag::Highlight);
        if front_end == FrontEnd::Kandil {
            flags.push(GeneratorFlag::Kandil);
        }
        flags
    }

    /// PDFs need the kandil layout for symbol links to resolve.
    pub fn pdf_supported(&self, front_end: FrontEnd) -> bool {
        self.pdf.is_some() && front_end == FrontEnd::Kandil
    }

    /// Library macros that have no upstream template.
    pub fn library_macros(&self) -> Result<Option<MacroTable>, DomainError> {
        match self.kind {
            LibraryKind::Phobos => Ok(None),
            LibraryKind::Tango => overlay::tango_macros(self.revision).map(Some),
        }
    }

    /// Static assets to copy once generation has finished.
    pub fn asset_plan(
        &self,
        front_end: FrontEnd,
        layout: &DestinationLayout,
        tools: &ToolResources,
    ) -> Vec<AssetCopy> {
        let root = layout.root();
        let mut plan = Vec::new();

        if let Some(html) = &self.html_dir {
            for gif in ["erfc.gif", "erf.gif"] {
                plan.push(into_dir(html.join(gif), root));
            }
            if front_end == FrontEnd::Default {
                for name in ["style.css", "holy.gif", "dmlogo.gif"] {
                    plan.push(into_dir(html.join("..").join(name), root));
                }
            }
        }
        if let Some(license) = &self.license {
            plan.push(AssetCopy::File {
                from: license.clone(),
                to: root.join("License.txt"),
            });
        }

        plan.push(into_dir(tools.html_css().to_path_buf(), layout.htmlsrc()));

        if let (Some(css), Some(js), Some(img)) = (layout.css(), layout.js(), layout.img()) {
            let kandil = tools.kandil();
            plan.push(into_dir(kandil.style(), css));
            plan.push(AssetCopy::Contents {
                from: kandil.scripts_dir(),
                to: js.to_path_buf(),
            });
            plan.push(AssetCopy::Contents {
                from: kandil.images_dir(),
                to: img.to_path_buf(),
            });
        }
        plan
    }
}
