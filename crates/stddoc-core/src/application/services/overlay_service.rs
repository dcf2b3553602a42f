//! Writes the run's macro overlays into the scratch directory.

use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{
        DestinationLayout, DomainValidator, FrontEnd, LibraryProfile, MacroOverlay,
        ModuleLinkPattern, OverlayBody, OverlayKind, SourceFile, entities::overlay, rewrite,
    },
    error::StddocResult,
};

/// The overlays written for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedOverlays {
    overlays: Vec<MacroOverlay>,
}

impl ComposedOverlays {
    pub fn get(&self, kind: OverlayKind) -> Option<&MacroOverlay> {
        self.overlays.iter().find(|o| o.kind() == kind)
    }

    pub fn path(&self, kind: OverlayKind) -> Option<PathBuf> {
        self.get(kind).map(|o| o.path().to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}

pub struct OverlayComposer<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> OverlayComposer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Build every overlay the profile and front-end call for, then write
    /// them into `layout.tmp()`.
    #[instrument(skip_all, fields(library = %profile.kind(), front_end = %front_end))]
    pub fn compose(
        &self,
        profile: &LibraryProfile,
        front_end: FrontEnd,
        layout: &DestinationLayout,
        sources: &[SourceFile],
        links: Option<&ModuleLinkPattern>,
    ) -> StddocResult<ComposedOverlays> {
        let mut overlays = Vec::new();

        if let Some(template) = profile.base_template() {
            let upstream = self.filesystem.read_to_string(template)?;
            let rewritten = rewrite::rewrite_base_template(&upstream, &profile.url_base(), links);
            overlays.push(MacroOverlay::new(
                OverlayKind::Base,
                layout.tmp_file(&profile.overlay_name()),
                OverlayBody::Text(rewritten),
            ));
            overlays.push(MacroOverlay::new(
                OverlayKind::MissingMacros,
                layout.tmp_file("missing.ddoc"),
                OverlayBody::Macros(overlay::missing_macros()?),
            ));
            overlays.push(MacroOverlay::new(
                OverlayKind::Overrides,
                layout.tmp_file("overrides.ddoc"),
                OverlayBody::Macros(overlay::overrides(front_end)?),
            ));
        }

        if let Some(macros) = profile.library_macros()? {
            overlays.push(MacroOverlay::new(
                OverlayKind::Library,
                layout.tmp_file(&profile.overlay_name()),
                OverlayBody::Macros(macros),
            ));
        }

        if front_end == FrontEnd::Default && profile.aggregator().is_some() {
            overlays.push(MacroOverlay::new(
                OverlayKind::Index,
                layout.tmp_file("index.d"),
                OverlayBody::Text(overlay::module_index(sources)),
            ));
        }

        DomainValidator::validate_overlays(&overlays)?;
        for overlay in &overlays {
            debug!(kind = %overlay.kind(), path = %overlay.path().display(), "Writing overlay");
            self.filesystem.write_file(overlay.path(), &overlay.render())?;
        }

        info!(count = overlays.len(), "Overlays written");
        Ok(ComposedOverlays { overlays })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::DocVersion;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    type Written = Arc<Mutex<Vec<(PathBuf, String)>>>;

    fn recording_fs(template: &'static str) -> (MockFilesystem, Written) {
        let written: Written = Arc::default();
        let sink = Arc::clone(&written);
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .returning(move |_| Ok(template.to_string()));
        fs.expect_write_file().returning(move |path, content| {
            sink.lock()
                .unwrap()
                .push((path.to_path_buf(), content.to_string()));
            Ok(())
        });
        (fs, written)
    }

    fn sources() -> Vec<SourceFile> {
        let prefix = Path::new("/phobos");
        vec![
            SourceFile::new(prefix, "/phobos/std/array.d").unwrap(),
            SourceFile::new(prefix, "/phobos/std/string.d").unwrap(),
        ]
    }

    fn phobos() -> LibraryProfile {
        LibraryProfile::phobos(DocVersion::parse_phobos("2.032").unwrap(), "/phobos")
    }

    #[test]
    fn default_front_end_writes_four_overlays() {
        let (fs, written) = recording_fs("<a href=\"../phobos.html\">");
        let layout = DestinationLayout::new("/out", FrontEnd::Default);
        let links = ModuleLinkPattern::from_sources(&sources());

        let composed = OverlayComposer::new(&fs)
            .compose(&phobos(), FrontEnd::Default, &layout, &sources(), links.as_ref())
            .unwrap();

        assert_eq!(composed.len(), 4);
        assert_eq!(
            composed.path(OverlayKind::Base),
            Some(PathBuf::from("/out/tmp/phobos.ddoc"))
        );
        assert_eq!(
            composed.path(OverlayKind::Index),
            Some(PathBuf::from("/out/tmp/index.d"))
        );

        let written = written.lock().unwrap();
        let base = &written.iter().find(|(p, _)| p.ends_with("phobos.ddoc")).unwrap().1;
        assert_eq!(base, "<a href=\"http://www.digitalmars.com/d/2.0/phobos.html\">");
        let overrides = &written.iter().find(|(p, _)| p.ends_with("overrides.ddoc")).unwrap().1;
        assert!(overrides.contains("GENERATED_BY"));
    }

    #[test]
    fn kandil_front_end_has_no_index() {
        let (fs, written) = recording_fs("");
        let layout = DestinationLayout::new("/out", FrontEnd::Kandil);

        let composed = OverlayComposer::new(&fs)
            .compose(&phobos(), FrontEnd::Kandil, &layout, &sources(), None)
            .unwrap();

        assert!(composed.get(OverlayKind::Index).is_none());
        let written = written.lock().unwrap();
        let overrides = &written.iter().find(|(p, _)| p.ends_with("overrides.ddoc")).unwrap().1;
        assert!(overrides.contains("COPYRIGHT"));
        assert!(!overrides.contains("GENERATED_BY"));
    }

    #[test]
    fn tango_writes_only_its_library_overlay() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().never();
        fs.expect_write_file()
            .withf(|path, content| {
                path == Path::new("/out/tmp/tango.ddoc") && content.contains("REPOFILE")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let profile = LibraryProfile::tango(DocVersion::new("0.99.8", "0.99.8"), "/tango", None);
        let layout = DestinationLayout::new("/out", FrontEnd::Kandil);
        let composed = OverlayComposer::new(&fs)
            .compose(&profile, FrontEnd::Kandil, &layout, &[], None)
            .unwrap();

        assert_eq!(composed.len(), 1);
        assert!(composed.get(OverlayKind::Library).is_some());
    }

    #[test]
    fn overlays_are_byte_identical_across_runs() {
        let layout = DestinationLayout::new("/out", FrontEnd::Default);
        let run = || {
            let (fs, written) = recording_fs("NAVIGATION_PHOBOS=\n<div class=\"navblock\">\n</head>");
            OverlayComposer::new(&fs)
                .compose(&phobos(), FrontEnd::Default, &layout, &sources(), None)
                .unwrap();
            let out = written.lock().unwrap().clone();
            out
        };
        assert_eq!(run(), run());
    }
}
