//! Post-processing of generator output: the aggregator page rewrite and the
//! static asset copies.

use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ports::Filesystem, services::BuildWarning},
    domain::{AssetCopy, DestinationLayout, LibraryProfile, ModuleLinkPattern, rewrite},
    error::StddocResult,
};

pub struct PostProcessor<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> PostProcessor<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Rewrite the generated aggregator page in place.
    ///
    /// Returns the page's path, or `None` when the library has no aggregator
    /// or the generator did not produce one (a warning is recorded).
    #[instrument(skip_all)]
    pub fn rewrite_aggregator(
        &self,
        profile: &LibraryProfile,
        layout: &DestinationLayout,
        links: Option<&ModuleLinkPattern>,
        warnings: &mut Vec<BuildWarning>,
    ) -> StddocResult<Option<PathBuf>> {
        let Some(page) = profile.aggregator_page() else {
            return Ok(None);
        };
        let path = layout.root().join(page);
        if !self.filesystem.exists(&path) {
            warn!(path = %path.display(), "Aggregator page was not generated");
            warnings.push(BuildWarning::MissingAggregatorPage { path });
            return Ok(None);
        }

        let text = self.filesystem.read_to_string(&path)?;
        let rewritten = rewrite::rewrite_aggregator_page(&text, &profile.url_base(), links);
        self.filesystem.write_file(&path, &rewritten)?;
        info!(path = %path.display(), "Aggregator page rewritten");
        Ok(Some(path))
    }

    /// Copy static assets. Missing sources are skipped with a warning.
    ///
    /// Returns the number of files copied.
    #[instrument(skip_all, fields(entries = plan.len()))]
    pub fn copy_assets(
        &self,
        plan: &[AssetCopy],
        warnings: &mut Vec<BuildWarning>,
    ) -> StddocResult<usize> {
        let mut copied = 0;
        for asset in plan {
            match asset {
                AssetCopy::File { from, to } => {
                    if !self.filesystem.exists(from) {
                        warn!(path = %from.display(), "Asset missing, skipped");
                        warnings.push(BuildWarning::MissingAsset { path: from.clone() });
                        continue;
                    }
                    debug!(from = %from.display(), to = %to.display(), "Copying asset");
                    self.filesystem.copy_file(from, to)?;
                    copied += 1;
                }
                AssetCopy::Contents { from, to } => {
                    if !self.filesystem.is_dir(from) {
                        warn!(path = %from.display(), "Asset directory missing, skipped");
                        warnings.push(BuildWarning::MissingAsset { path: from.clone() });
                        continue;
                    }
                    for file in self.filesystem.list_files(from)? {
                        let Some(name) = file.file_name() else { continue };
                        let target = to.join(name);
                        debug!(from = %file.display(), to = %target.display(), "Copying asset");
                        self.filesystem.copy_file(&file, &target)?;
                        copied += 1;
                    }
                }
            }
        }
        info!(copied, "Static assets copied");
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::{DocVersion, FrontEnd, LibraryProfile};
    use std::path::Path;

    fn phobos() -> LibraryProfile {
        LibraryProfile::phobos(DocVersion::parse_phobos("2.032").unwrap(), "/phobos")
    }

    #[test]
    fn aggregator_page_is_rewritten_in_place() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string()
            .withf(|path| path == Path::new("/out/phobos.html"))
            .returning(|_| Ok(r#"<h1><a href="x">Phobos</a></h1><a href="../lex.html">"#.into()));
        fs.expect_write_file()
            .withf(|path, content| {
                path == Path::new("/out/phobos.html")
                    && content
                        == r#"<h1>Phobos</h1><a href="http://www.digitalmars.com/d/2.0/lex.html">"#
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let layout = DestinationLayout::new("/out", FrontEnd::Default);
        let mut warnings = Vec::new();
        let page = PostProcessor::new(&fs)
            .rewrite_aggregator(&phobos(), &layout, None, &mut warnings)
            .unwrap();
        assert_eq!(page, Some(PathBuf::from("/out/phobos.html")));
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_aggregator_page_is_a_warning() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_read_to_string().never();
        fs.expect_write_file().never();

        let layout = DestinationLayout::new("/out", FrontEnd::Default);
        let mut warnings = Vec::new();
        let page = PostProcessor::new(&fs)
            .rewrite_aggregator(&phobos(), &layout, None, &mut warnings)
            .unwrap();
        assert_eq!(page, None);
        assert!(matches!(warnings[0], BuildWarning::MissingAggregatorPage { .. }));
    }

    #[test]
    fn missing_assets_are_skipped() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|path| path == Path::new("/src/present.css"));
        fs.expect_is_dir().returning(|_| true);
        fs.expect_list_files()
            .returning(|_| Ok(vec![PathBuf::from("/kandil/js/a.js"), PathBuf::from("/kandil/js/b.js")]));
        fs.expect_copy_file().times(3).returning(|_, _| Ok(()));

        let plan = vec![
            AssetCopy::File {
                from: "/src/present.css".into(),
                to: "/out/present.css".into(),
            },
            AssetCopy::File {
                from: "/src/absent.gif".into(),
                to: "/out/absent.gif".into(),
            },
            AssetCopy::Contents {
                from: "/kandil/js".into(),
                to: "/out/js".into(),
            },
        ];
        let mut warnings = Vec::new();
        let copied = PostProcessor::new(&fs).copy_assets(&plan, &mut warnings).unwrap();

        assert_eq!(copied, 3);
        assert_eq!(
            warnings,
            vec![BuildWarning::MissingAsset {
                path: "/src/absent.gif".into()
            }]
        );
    }
}
