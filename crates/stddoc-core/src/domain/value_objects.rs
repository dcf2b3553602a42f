//! Domain value objects: FrontEnd, DocVersion, VersionSet, GeneratorFlag,
//! ArchiveFormat.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. This
//! file's only job is to define the types, their string representations,
//! and their parsers.

use crate::domain::error::DomainError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// ── FrontEnd ─────────────────────────────────────────────────────────────────

/// The presentation family selected for the generated site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrontEnd {
    /// Plain HTML driven by the library's own template.
    #[default]
    Default,
    /// dil's kandil bundle: its own macros plus scripts, styles and images.
    Kandil,
}

impl FrontEnd {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Kandil => "kandil",
        }
    }

    /// Whether the destination needs `js/`, `css/` and `img/` directories.
    pub const fn ships_assets(&self) -> bool {
        matches!(self, Self::Kandil)
    }
}

impl fmt::Display for FrontEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DocVersion ───────────────────────────────────────────────────────────────

static PHOBOS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((\d)\.(\d\d\d))").expect("valid version regex"));
static TANGO_MAJOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Major\s*=\s*(\d+)").expect("valid major regex"));
static TANGO_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Minor\s*=\s*(\d+)").expect("valid minor regex"));

/// The version of the library being documented.
///
/// `label` is the full release (`2.032`) used for PDF and archive names;
/// `url_version` is the series (`2.0`) used in absolute website links.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocVersion {
    label: String,
    url_version: String,
}

impl DocVersion {
    pub fn new(label: impl Into<String>, url_version: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url_version: url_version.into(),
        }
    }

    /// Parse a Phobos release such as `1.123` or `2.032`.
    ///
    /// Only the leading `d.ddd` is significant; anything after it is ignored.
    pub fn parse_phobos(input: &str) -> Result<Self, DomainError> {
        let caps = PHOBOS_VERSION
            .captures(input)
            .ok_or_else(|| DomainError::InvalidVersion {
                input: input.to_string(),
                expected: "d.ddd (e.g. 1.123)",
            })?;
        let label = caps[1].to_string();
        let url_version = format!("{}.0", &caps[2]);
        Ok(Self { label, url_version })
    }

    /// Read the version out of Tango's `tango/core/Version.d`.
    ///
    /// The last `Major = N` and `Minor = M` assignments win; the result is
    /// rendered `N.(M / 10).(M % 10)`.
    pub fn from_tango_source(source: &str) -> Result<Self, DomainError> {
        let mut major = None;
        let mut minor = None;
        for line in source.lines() {
            if let Some(c) = TANGO_MAJOR.captures(line) {
                major = c[1].parse::<u32>().ok();
            }
            if let Some(c) = TANGO_MINOR.captures(line) {
                minor = c[1].parse::<u32>().ok();
            }
        }
        match (major, minor) {
            (Some(major), Some(minor)) => {
                let label = format!("{}.{}.{}", major, minor / 10, minor % 10);
                Ok(Self::new(label.clone(), label))
            }
            (None, _) => Err(DomainError::VersionUnreadable {
                reason: "no 'Major = N' declaration found".into(),
            }),
            (_, None) => Err(DomainError::VersionUnreadable {
                reason: "no 'Minor = N' declaration found".into(),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn url_version(&self) -> &str {
        &self.url_version
    }
}

impl fmt::Display for DocVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

// ── VersionSet ───────────────────────────────────────────────────────────────

/// Ordered, duplicate-free set of version labels handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionSet(Vec<String>);

impl VersionSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for label in labels {
            set.insert(label);
        }
        set
    }

    /// Append a label unless it is already present.
    pub fn insert(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.0.contains(&label) {
            self.0.push(label);
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── GeneratorFlag ────────────────────────────────────────────────────────────

/// Option flags understood by the external generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorFlag {
    Verbose,
    IncludeUndocumented,
    Highlight,
    Kandil,
}

impl GeneratorFlag {
    pub const fn as_flag(&self) -> &'static str {
        match self {
            Self::Verbose => "-v",
            Self::IncludeUndocumented => "-i",
            Self::Highlight => "-hl",
            Self::Kandil => "--kandil",
        }
    }
}

impl fmt::Display for GeneratorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

// ── ArchiveFormat ────────────────────────────────────────────────────────────

/// Archive containers the packaging step can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    SevenZip,
    Zip,
    TarGz,
    TarBz2,
}

impl ArchiveFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::SevenZip => "7z",
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
        }
    }

    /// `<base>.<ext>`, e.g. `Phobos.2.032_doc.7z`.
    pub fn file_name(&self, base: &str) -> String {
        format!("{}.{}", base, self.extension())
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "7z" => Ok(Self::SevenZip),
            "zip" => Ok(Self::Zip),
            "tar.gz" | "tgz" => Ok(Self::TarGz),
            "tar.bz2" | "tbz2" => Ok(Self::TarBz2),
            other => Err(DomainError::UnknownArchiveFormat {
                input: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phobos_version_splits_label_and_series() {
        let v = DocVersion::parse_phobos("2.032").unwrap();
        assert_eq!(v.label(), "2.032");
        assert_eq!(v.url_version(), "2.0");

        let v = DocVersion::parse_phobos("1.123-beta").unwrap();
        assert_eq!(v.label(), "1.123");
        assert_eq!(v.url_version(), "1.0");
    }

    #[test]
    fn phobos_version_rejects_bad_input() {
        for bad in ["2.0", "v2.032", "", "2.03"] {
            assert!(
                matches!(
                    DocVersion::parse_phobos(bad),
                    Err(DomainError::InvalidVersion { .. })
                ),
                "accepted: {bad}"
            );
        }
    }

    #[test]
    fn tango_version_from_source() {
        let src = "module tango.core.Version;\n\
                   enum { Major = 0,\n       Minor = 998 }\n";
        let v = DocVersion::from_tango_source(src).unwrap();
        assert_eq!(v.label(), "0.99.8");
        assert_eq!(v.url_version(), "0.99.8");
    }

    #[test]
    fn tango_version_requires_both_parts() {
        assert!(matches!(
            DocVersion::from_tango_source("Minor = 1"),
            Err(DomainError::VersionUnreadable { .. })
        ));
        assert!(matches!(
            DocVersion::from_tango_source("Major = 1"),
            Err(DomainError::VersionUnreadable { .. })
        ));
    }

    #[test]
    fn version_set_keeps_order_and_drops_duplicates() {
        let set = VersionSet::new(["Windows", "DDoc", "Windows"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Windows", "DDoc"]);
        assert!(set.contains("DDoc"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn archive_names() {
        assert_eq!(
            ArchiveFormat::SevenZip.file_name("Phobos.2.032_doc"),
            "Phobos.2.032_doc.7z"
        );
        assert_eq!("tgz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
        assert!("rar".parse::<ArchiveFormat>().is_err());
    }

    #[test]
    fn generator_flags_render() {
        let flags: Vec<_> = [
            GeneratorFlag::Verbose,
            GeneratorFlag::IncludeUndocumented,
            GeneratorFlag::Highlight,
            GeneratorFlag::Kandil,
        ]
        .iter()
        .map(GeneratorFlag::as_flag)
        .collect();
        assert_eq!(flags, vec!["-v", "-i", "-hl", "--kandil"]);
    }
}
