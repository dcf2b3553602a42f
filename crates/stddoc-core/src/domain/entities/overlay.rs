//! Macro overlays: generated documents that supply or override DDoc macro
//! definitions for the external generator.
//!
//! Overlays are rendered deterministically: the same inputs always produce
//! byte-identical text. Precedence *between* overlays is positional in the
//! build manifest (later wins) and is a contract with the generator; within
//! a single [`MacroTable`] every key is unique.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::entities::source_file::SourceFile;
use crate::domain::error::DomainError;
use crate::domain::value_objects::FrontEnd;

// ── MacroTable ───────────────────────────────────────────────────────────────

/// Ordered key → replacement-template pairs with unique keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MacroTable {
    name: String,
    entries: Vec<(String, String)>,
}

impl MacroTable {
    /// Create an empty table; `name` only appears in error messages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Build a table from literal pairs, rejecting duplicate keys.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(&str, &str)]) -> Result<Self, DomainError> {
        let mut table = Self::new(name);
        for (key, value) in pairs {
            table.define(*key, *value)?;
        }
        Ok(table)
    }

    /// Add a definition. A key may be defined only once per table.
    pub fn define(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        let key = key.into();
        if !is_macro_name(&key) {
            return Err(DomainError::InvalidMacroName { key });
        }
        if self.get(&key).is_some() {
            return Err(DomainError::DuplicateMacro {
                key,
                overlay: self.name.clone(),
            });
        }
        self.entries.push((key, value.into()));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `KEY = value` line per entry, in definition order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            if value.is_empty() {
                out.push_str(&format!("{key} =\n"));
            } else {
                out.push_str(&format!("{key} = {value}\n"));
            }
        }
        out
    }
}

fn is_macro_name(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ── MacroOverlay ─────────────────────────────────────────────────────────────

/// Which role an overlay plays in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// The library's own template, rewritten.
    Base,
    /// Macros the generator needs but the upstream template never defines.
    MissingMacros,
    /// Front-end specific overrides (attribution or symbol-link format).
    Overrides,
    /// Module index page (default front-end only).
    Index,
    /// Library-specific macros that have no upstream template.
    Library,
}

impl OverlayKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::MissingMacros => "missing-macros",
            Self::Overrides => "overrides",
            Self::Index => "index",
            Self::Library => "library",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of an overlay: either a macro table or pre-rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayBody {
    Macros(MacroTable),
    Text(String),
}

/// A generated overlay document and where it will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroOverlay {
    kind: OverlayKind,
    path: PathBuf,
    body: OverlayBody,
}

impl MacroOverlay {
    pub fn new(kind: OverlayKind, path: impl Into<PathBuf>, body: OverlayBody) -> Self {
        Self {
            kind,
            path: path.into(),
            body,
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(&self) -> String {
        match &self.body {
            OverlayBody::Macros(table) => table.render(),
            OverlayBody::Text(text) => text.clone(),
        }
    }
}

// ── Fixed overlay catalogue ──────────────────────────────────────────────────

/// Definitions the generator requires that upstream `std.ddoc` omits.
pub fn missing_macros() -> Result<MacroTable, DomainError> {
    MacroTable::from_pairs(
        "missing.ddoc",
        &[
            ("WIKI", ""),
            ("COMMENT", "<!-- -->"),
            ("D", "$0"),
            ("DOLLAR", "$"),
            ("_PI", "&pi;"),
            ("POW", "$1<sup>$2</sup>"),
            ("TABLE_DOMRG", "$(TABLE_SV $0)"),
            ("std_boilerplate", "<!-- undefined macro in std/outbuffer.d -->"),
            ("DOMAIN", "<!-- undefined macro in std/math.d -->"),
            ("RANGE", "<!-- undefined macro in std/math.d -->"),
            // Phobos 2
            ("s", "$0"),
            ("SUB", "<sub>$0</sub>"),
            ("PRE", "<pre>$0</pre>"),
            ("TDNW", "$0"),
            ("XREFMODULE", "$0"),
        ],
    )
}

/// Front-end specific overrides. The two variants are alternatives, never
/// merged: exactly one is written per run.
pub fn overrides(front_end: FrontEnd) -> Result<MacroTable, DomainError> {
    match front_end {
        FrontEnd::Default => MacroTable::from_pairs(
            "overrides.ddoc",
            &[
                (
                    "GENERATED_BY",
                    "Page generated by $(LINK2 http://code.google.com/p/dil, DIL) on $(DATETIME)",
                ),
                ("SRCFILE", "./htmlsrc/$(DIL_MODFQN).html"),
                (
                    "DIL_SYMBOL",
                    r#"<a href="$(SRCFILE)#L$4" class="sym$3" name="$2" title="At line $4.">$1</a>"#,
                ),
            ],
        ),
        FrontEnd::Kandil => MacroTable::from_pairs(
            "overrides.ddoc",
            &[(
                "COPYRIGHT",
                "Copyright © 1999-2009 by Digital Mars ®, All Rights Reserved.",
            )],
        ),
    }
}

/// Tango has no upstream template; these are its macros. `revision` pins
/// the repository browser links to one changeset.
pub fn tango_macros(revision: Option<u32>) -> Result<MacroTable, DomainError> {
    let rev = revision.map(|r| format!("?rev={r}")).unwrap_or_default();
    let repofile = format!(
        "http://www.dsource.org/projects/tango/browser/trunk/$(DIL_MODPATH){rev}"
    );
    let mut table = MacroTable::new("tango.ddoc");
    table.define(
        "LICENSE",
        "see $(LINK2 http://www.dsource.org/projects/tango/wiki/LibraryLicense, license.txt)",
    )?;
    table.define("REPOFILE", repofile)?;
    for (key, value) in [
        ("CODEURL", ""),
        ("MEMBERTABLE", "<table>$0</table>"),
        ("ANCHOR", r#"<a name="$0"></a>"#),
        ("LP", "("),
        ("RP", ")"),
        ("LB", "["),
        ("RB", "]"),
        ("SQRT", "√"),
        ("NAN", "NaN"),
        ("SUP", "<sup>$0</sup>"),
        ("BR", "<br/>"),
    ] {
        table.define(key, value)?;
    }
    Ok(table)
}

/// A DDoc page listing every module, in the order given.
pub fn module_index(sources: &[SourceFile]) -> String {
    let mut text = String::from("Ddoc\n<ul>\n");
    for source in sources {
        let page = source.page_name();
        text.push_str(&format!("  <li><a href=\"{page}\">{page}</a></li>\n"));
    }
    text.push_str("</ul>\nMacros:\nTITLE = Index\n");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut table = MacroTable::new("t.ddoc");
        table.define("A", "1").unwrap();
        assert!(matches!(
            table.define("A", "2"),
            Err(DomainError::DuplicateMacro { .. })
        ));
        assert_eq!(table.get("A"), Some("1"));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut table = MacroTable::new("t.ddoc");
        assert!(table.define("1ABC", "x").is_err());
        assert!(table.define("A B", "x").is_err());
        assert!(table.define("", "x").is_err());
        assert!(table.define("_PI", "x").is_ok());
    }

    #[test]
    fn render_keeps_definition_order() {
        let table = MacroTable::from_pairs("t", &[("B", "2"), ("A", ""), ("C", "$0")]).unwrap();
        assert_eq!(table.render(), "B = 2\nA =\nC = $0\n");
    }

    #[test]
    fn catalogue_tables_are_valid_and_stable() {
        let missing = missing_macros().unwrap();
        assert_eq!(missing.len(), 15);
        assert_eq!(missing.render(), missing_macros().unwrap().render());

        let default = overrides(FrontEnd::Default).unwrap();
        assert!(default.get("GENERATED_BY").is_some());
        assert!(default.get("COPYRIGHT").is_none());

        let kandil = overrides(FrontEnd::Kandil).unwrap();
        assert!(kandil.get("COPYRIGHT").is_some());
        assert!(kandil.get("GENERATED_BY").is_none());
    }

    #[test]
    fn tango_revision_pins_repository_links() {
        let pinned = tango_macros(Some(5000)).unwrap();
        assert!(pinned.get("REPOFILE").unwrap().ends_with("$(DIL_MODPATH)?rev=5000"));

        let head = tango_macros(None).unwrap();
        assert!(head.get("REPOFILE").unwrap().ends_with("$(DIL_MODPATH)"));
    }

    #[test]
    fn module_index_lists_modules_in_order() {
        let prefix = Path::new("/p");
        let sources = vec![
            SourceFile::new(prefix, "/p/std/array.d").unwrap(),
            SourceFile::new(prefix, "/p/std/string.d").unwrap(),
        ];
        let text = module_index(&sources);
        let array = text.find("std.array.html").unwrap();
        let string = text.find("std.string.html").unwrap();
        assert!(array < string);
        assert!(text.starts_with("Ddoc\n"));
        assert!(text.ends_with("TITLE = Index\n"));
    }

    #[test]
    fn overlay_renders_its_body() {
        let text = MacroOverlay::new(
            OverlayKind::Index,
            "/tmp/index.d",
            OverlayBody::Text("Ddoc".into()),
        );
        assert_eq!(text.render(), "Ddoc");

        let table = MacroTable::from_pairs("m", &[("A", "1")]).unwrap();
        let macros = MacroOverlay::new(OverlayKind::MissingMacros, "/tmp/m", OverlayBody::Macros(table));
        assert_eq!(macros.render(), "A = 1\n");
        assert_eq!(macros.kind(), OverlayKind::MissingMacros);
    }
}
