//! Typed directory layouts, fixed once at construction.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::FrontEnd;

/// The destination tree of one run.
///
/// `tmp` is scratch space for overlays and the generator's module list; it
/// is removed when the run ends. The asset directories exist only for
/// front-ends that ship their own scripts and styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationLayout {
    root: PathBuf,
    htmlsrc: PathBuf,
    tmp: PathBuf,
    module_list: PathBuf,
    js: Option<PathBuf>,
    css: Option<PathBuf>,
    img: Option<PathBuf>,
}

impl DestinationLayout {
    pub fn new(root: impl Into<PathBuf>, front_end: FrontEnd) -> Self {
        let root = root.into();
        let tmp = root.join("tmp");
        let asset_dir = |name: &str| front_end.ships_assets().then(|| root.join(name));
        Self {
            htmlsrc: root.join("htmlsrc"),
            module_list: tmp.join("modules.txt"),
            js: asset_dir("js"),
            css: asset_dir("css"),
            img: asset_dir("img"),
            tmp,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Syntax-highlighted sources.
    pub fn htmlsrc(&self) -> &Path {
        &self.htmlsrc
    }

    pub fn tmp(&self) -> &Path {
        &self.tmp
    }

    pub fn module_list(&self) -> &Path {
        &self.module_list
    }

    pub fn js(&self) -> Option<&Path> {
        self.js.as_deref()
    }

    pub fn css(&self) -> Option<&Path> {
        self.css.as_deref()
    }

    pub fn img(&self) -> Option<&Path> {
        self.img.as_deref()
    }

    pub fn tmp_file(&self, name: &str) -> PathBuf {
        self.tmp.join(name)
    }

    /// Every directory that must exist before the generator runs, parents first.
    pub fn directories(&self) -> Vec<&Path> {
        let mut dirs = vec![self.root.as_path(), self.htmlsrc.as_path(), self.tmp.as_path()];
        dirs.extend([self.js(), self.css(), self.img()].into_iter().flatten());
        dirs
    }
}

/// dil's kandil front-end bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KandilBundle {
    root: PathBuf,
}

impl KandilBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Macro document that must precede the generic overlays.
    pub fn overlay(&self) -> PathBuf {
        self.root.join("kandil.ddoc")
    }

    pub fn style(&self) -> PathBuf {
        self.root.join("css").join("style.css")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("js")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("img")
    }
}

/// Where the generator and its data files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResources {
    root: PathBuf,
    executable: PathBuf,
    html_css: PathBuf,
    kandil: KandilBundle,
}

impl ToolResources {
    /// Standard dil installation: `bin/dil`, `data/html.css`, `data/kandil/`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data = root.join("data");
        Self {
            executable: root.join("bin").join("dil"),
            html_css: data.join("html.css"),
            kandil: KandilBundle::new(data.join("kandil")),
            root,
        }
    }

    /// Use a generator executable outside the installation root.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Stylesheet for the syntax-highlighted sources.
    pub fn html_css(&self) -> &Path {
        &self.html_css
    }

    pub fn kandil(&self) -> &KandilBundle {
        &self.kandil
    }
}
