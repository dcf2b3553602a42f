//! Packaging: PDF assembly, archives, and scratch cleanup.

use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ArchiveRequest, Archiver, Filesystem, PdfAssembler, PdfJob},
    },
    domain::{ArchiveFormat, DestinationLayout, PdfSettings},
    error::StddocResult,
};

pub struct Packager<'a> {
    filesystem: &'a dyn Filesystem,
    archiver: &'a dyn Archiver,
    pdf: Option<&'a dyn PdfAssembler>,
}

impl<'a> Packager<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        archiver: &'a dyn Archiver,
        pdf: Option<&'a dyn PdfAssembler>,
    ) -> Self {
        Self {
            filesystem,
            archiver,
            pdf,
        }
    }

    /// Pages of the destination root that go into the PDF, sorted.
    pub fn pdf_pages(
        &self,
        layout: &DestinationLayout,
        settings: &PdfSettings,
    ) -> StddocResult<Vec<PathBuf>> {
        Ok(self
            .filesystem
            .list_files(layout.root())?
            .into_iter()
            .filter(|p| p.extension().is_some_and(|e| e == "html"))
            .filter(|p| {
                p.file_name()
                    .is_some_and(|n| settings.includes_page(&n.to_string_lossy()))
            })
            .collect())
    }

    /// Merge the generated pages into `<root>/<settings.file_name>`, using
    /// `tmp/` as scratch space.
    #[instrument(skip_all, fields(file = %settings.file_name))]
    pub fn assemble_pdf(
        &self,
        layout: &DestinationLayout,
        settings: &PdfSettings,
    ) -> StddocResult<PathBuf> {
        let assembler = self.pdf.ok_or(ApplicationError::AdapterNotConfigured {
            name: "PDF assembler",
        })?;

        for name in &settings.scratch_assets {
            let from = layout.root().join(name);
            if self.filesystem.exists(&from) {
                debug!(asset = %name, "Staging PDF asset");
                self.filesystem.copy_file(&from, &layout.tmp_file(name))?;
            } else {
                warn!(asset = %name, "PDF asset missing, not staged");
            }
        }

        let job = PdfJob {
            pages: self.pdf_pages(layout, settings)?,
            output: layout.root().join(&settings.file_name),
            scratch: layout.tmp().to_path_buf(),
            params: settings.params.clone(),
        };
        info!(pages = job.pages.len(), "Assembling PDF");
        assembler.assemble(&job)?;
        Ok(job.output)
    }

    /// One archive per requested format, in request order.
    #[instrument(skip_all, fields(base = %base_name))]
    pub fn archive(
        &self,
        layout: &DestinationLayout,
        base_name: &str,
        formats: &[ArchiveFormat],
    ) -> StddocResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(formats.len());
        for &format in formats {
            let request = ArchiveRequest {
                source_dir: layout.root().to_path_buf(),
                format,
                base_name: base_name.to_string(),
            };
            let path = self.archiver.archive(&request)?;
            info!(archive = %path.display(), "Archive created");
            written.push(path);
        }
        Ok(written)
    }

    /// Remove the scratch directory if it exists.
    pub fn cleanup(&self, layout: &DestinationLayout) -> StddocResult<()> {
        if self.filesystem.exists(layout.tmp()) {
            self.filesystem.remove_dir_all(layout.tmp())?;
            debug!(path = %layout.tmp().display(), "Scratch directory removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockArchiver, MockFilesystem, MockPdfAssembler};
    use crate::domain::{DocVersion, FrontEnd, LibraryProfile};
    use crate::error::StddocError;

    fn settings() -> PdfSettings {
        LibraryProfile::phobos(DocVersion::parse_phobos("2.032").unwrap(), "/phobos")
            .pdf()
            .cloned()
            .unwrap()
    }

    #[test]
    fn pdf_skips_excluded_pages() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_copy_file().times(2).returning(|_, _| Ok(()));
        fs.expect_list_files().returning(|_| {
            Ok(vec![
                PathBuf::from("/out/erf.gif"),
                PathBuf::from("/out/index.html"),
                PathBuf::from("/out/phobos.html"),
                PathBuf::from("/out/std.array.html"),
                PathBuf::from("/out/std.c.windows.windows.html"),
                PathBuf::from("/out/std.string.html"),
            ])
        });

        let mut pdf = MockPdfAssembler::new();
        pdf.expect_assemble()
            .withf(|job| {
                job.pages
                    == vec![
                        PathBuf::from("/out/std.array.html"),
                        PathBuf::from("/out/std.string.html"),
                    ]
                    && job.output == PathBuf::from("/out/Phobos.2.032.API.pdf")
                    && job.scratch == PathBuf::from("/out/tmp")
                    && job.params.author == "Walter Bright"
            })
            .times(1)
            .returning(|_| Ok(()));
        let archiver = MockArchiver::new();

        let layout = DestinationLayout::new("/out", FrontEnd::Kandil);
        let out = Packager::new(&fs, &archiver, Some(&pdf))
            .assemble_pdf(&layout, &settings())
            .unwrap();
        assert_eq!(out, PathBuf::from("/out/Phobos.2.032.API.pdf"));
    }

    #[test]
    fn pdf_without_assembler_is_a_configuration_error() {
        let fs = MockFilesystem::new();
        let archiver = MockArchiver::new();
        let layout = DestinationLayout::new("/out", FrontEnd::Kandil);

        let err = Packager::new(&fs, &archiver, None)
            .assemble_pdf(&layout, &settings())
            .unwrap_err();
        assert!(matches!(
            err,
            StddocError::Application(ApplicationError::AdapterNotConfigured { .. })
        ));
    }

    #[test]
    fn archives_follow_request_order() {
        let fs = MockFilesystem::new();
        let mut archiver = MockArchiver::new();
        archiver
            .expect_archive()
            .times(2)
            .returning(|request| Ok(request.output_path()));

        let layout = DestinationLayout::new("/work/phobosdoc", FrontEnd::Default);
        let written = Packager::new(&fs, &archiver, None)
            .archive(
                &layout,
                "Phobos.2.032_doc",
                &[ArchiveFormat::SevenZip, ArchiveFormat::TarGz],
            )
            .unwrap();
        assert_eq!(
            written,
            vec![
                PathBuf::from("/work/Phobos.2.032_doc.7z"),
                PathBuf::from("/work/Phobos.2.032_doc.tar.gz"),
            ]
        );
    }

    #[test]
    fn cleanup_only_removes_existing_scratch() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_remove_dir_all().never();
        let archiver = MockArchiver::new();
        let layout = DestinationLayout::new("/out", FrontEnd::Default);
        Packager::new(&fs, &archiver, None).cleanup(&layout).unwrap();
    }
}
