//! Text rewrites applied to the upstream macro template and to the
//! generated aggregator page.
//!
//! Every rule is a pure function. Each one leaves its input untouched when
//! the pattern it looks for is absent, and applying a rule to its own output
//! changes nothing.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};

use crate::domain::entities::SourceFile;

const SITE_ICON: &str = r#"<link rel="icon" type="image/gif" href="./holy.gif">"#;
const INDEX_NAV_TITLE: &str = "Index of all HTML files";

static LOCAL_ASSETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\./(style\.css|dmlogo\.gif)").expect("valid asset regex"));
static ATTRIBUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Page generated by[^\r\n]+").expect("valid attribution regex"));
static NAV_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"NAVIGATION_PHOBOS=(\r?\n)<div class="navblock">"#).expect("valid nav regex")
});
static LINKED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<h1><a[^>]+>(.+?)</a></h1>").expect("valid title regex"));

/// Absolute URL base for parent-relative links, e.g. `http://www.digitalmars.com/d/2.0/`.
pub fn doc_url_base(url_version: &str) -> String {
    format!("http://www.digitalmars.com/d/{url_version}/")
}

fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

// ── Base template rules, in application order ────────────────────────────────

/// 1. Put a site icon link before `</head>`.
pub fn add_site_icon(text: &str) -> String {
    if text.contains(SITE_ICON) || !text.contains("</head>") {
        return text.to_string();
    }
    let eol = line_ending(text);
    text.replace("</head>", &format!("{SITE_ICON}{eol}</head>"))
}

/// 2. `../style.css` and `../dmlogo.gif` become same-directory references.
pub fn localize_assets(text: &str) -> String {
    LOCAL_ASSETS.replace_all(text, "./${1}").into_owned()
}

/// 3. Every remaining `../` becomes the absolute documentation URL.
pub fn absolutize_parent_links(text: &str, url_base: &str) -> String {
    text.replace("../", url_base)
}

/// 4. The trailing "Page generated by ..." line becomes `$(GENERATED_BY)`.
pub fn macroize_attribution(text: &str) -> String {
    ATTRIBUTION
        .replace_all(text, NoExpand("$(GENERATED_BY)"))
        .into_owned()
}

/// Matches hrefs whose file name is a flattened module name such as
/// `std_c_stdio.html`, for a fixed set of top-level packages.
#[derive(Debug, Clone)]
pub struct ModuleLinkPattern {
    regex: Regex,
}

impl ModuleLinkPattern {
    /// `None` when there are no packages to match.
    pub fn for_packages<I, S>(packages: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: BTreeSet<String> = packages
            .into_iter()
            .map(|p| regex::escape(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        if alternatives.is_empty() {
            return None;
        }
        let joined = alternatives.into_iter().collect::<Vec<_>>().join("|");
        let regex = Regex::new(&format!(r##"href="((?:{joined})_[^"#]*)"##)).ok()?;
        Some(Self { regex })
    }

    /// Packages of the discovered modules; root-level modules contribute none.
    pub fn from_sources(sources: &[SourceFile]) -> Option<Self> {
        Self::for_packages(sources.iter().filter_map(SourceFile::package))
    }
}

/// 5. `href="std_c_stdio.html"` becomes `href="std.c.stdio.html"`. Only the
/// file name is touched; fragments after `#` keep their underscores.
pub fn unflatten_module_links(text: &str, links: &ModuleLinkPattern) -> String {
    links
        .regex
        .replace_all(text, |caps: &Captures| {
            format!("href=\"{}", caps[1].replace('_', "."))
        })
        .into_owned()
}

/// 6. The page title links to the highlighted source file.
pub fn linkify_title(text: &str) -> String {
    text.replace(
        "<h1>$(TITLE)</h1>",
        r#"<h1><a href="$(SRCFILE)">$(TITLE)</a></h1>"#,
    )
}

/// 7. An "Index" entry at the top of the navigation sidebar.
pub fn add_index_nav(text: &str) -> String {
    if text.contains(INDEX_NAV_TITLE) {
        return text.to_string();
    }
    NAV_BLOCK
        .replace_all(text, |caps: &Captures| {
            let eol = &caps[1];
            format!(
                "{whole}{eol}$(UL{eol}$(LI<a href=\"index.html\" title=\"{INDEX_NAV_TITLE}\">Index</a>){eol})",
                whole = &caps[0],
            )
        })
        .into_owned()
}

/// Apply rules 1 to 7 in order.
pub fn rewrite_base_template(
    text: &str,
    url_base: &str,
    links: Option<&ModuleLinkPattern>,
) -> String {
    let text = add_site_icon(text);
    let text = localize_assets(&text);
    let text = absolutize_parent_links(&text, url_base);
    let text = macroize_attribution(&text);
    let text = match links {
        Some(links) => unflatten_module_links(&text, links),
        None => text,
    };
    let text = linkify_title(&text);
    add_index_nav(&text)
}

// ── Aggregator page ──────────────────────────────────────────────────────────

/// Undo [`linkify_title`] on a generated page: `<h1><a ...>T</a></h1>` becomes `<h1>T</h1>`.
pub fn delinkify_title(text: &str) -> String {
    LINKED_TITLE.replace_all(text, "<h1>${1}</h1>").into_owned()
}

/// Post-process the generator's top-level page.
pub fn rewrite_aggregator_page(
    text: &str,
    url_base: &str,
    links: Option<&ModuleLinkPattern>,
) -> String {
    let text = absolutize_parent_links(text, url_base);
    let text = match links {
        Some(links) => unflatten_module_links(&text, links),
        None => text,
    };
    delinkify_title(&text)
}
