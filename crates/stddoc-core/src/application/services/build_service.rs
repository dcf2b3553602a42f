//! Documentation build service - main application orchestrator.
//!
//! One run goes through these stages, strictly in order:
//! 1. Check the source root and resolve the destination layout
//! 2. Discover source files and create the destination tree
//! 3. Write macro overlays into the scratch directory
//! 4. Run the generator over the ordered manifest
//! 5. Post-process the aggregator page and copy static assets
//! 6. Assemble the PDF (kandil output only)
//! 7. Remove the scratch directory, whatever happened in 2 to 6
//! 8. Create archives
//!
//! A generator that exits non-zero does not stop the run: its status ends
//! up in the [`BuildReport`] and the partial output is kept.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Archiver, DocGenerator, Filesystem, GeneratorStatus, PdfAssembler},
        services::{
            ComposedOverlays, OverlayComposer, Packager, PostProcessor, SourceDiscovery,
        },
    },
    domain::{
        ArchiveFormat, BuildManifest, DestinationLayout, DomainError, DomainValidator, FrontEnd,
        LibraryKind, LibraryProfile, ModuleLinkPattern, OverlayKind, SourceFile, ToolResources,
    },
    error::StddocResult,
};

/// Everything one run needs, built once by the caller.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub profile: LibraryProfile,
    /// Requested front-end; the profile may override it.
    pub front_end: FrontEnd,
    pub destination: PathBuf,
    pub tools: ToolResources,
    pub pdf: bool,
    pub archives: Vec<ArchiveFormat>,
}

/// Conditions reported at the end of a run that did not stop it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// A PDF was requested for output that cannot produce one.
    UnsupportedPackaging {
        library: LibraryKind,
        front_end: FrontEnd,
    },
    MissingAggregatorPage { path: PathBuf },
    MissingAsset { path: PathBuf },
    CleanupFailed { path: PathBuf, reason: String },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPackaging { library, front_end } => write!(
                f,
                "can only create a PDF document from kandil HTML files ({library} with the {front_end} front-end); no PDF written"
            ),
            Self::MissingAggregatorPage { path } => {
                write!(f, "aggregator page {} was not generated", path.display())
            }
            Self::MissingAsset { path } => write!(f, "asset {} not found, skipped", path.display()),
            Self::CleanupFailed { path, reason } => {
                write!(f, "could not remove {}: {reason}", path.display())
            }
        }
    }
}

/// Outcome of a run that reached the end of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub library: LibraryKind,
    pub version: String,
    pub front_end: FrontEnd,
    pub destination: PathBuf,
    pub modules: usize,
    pub generator_status: GeneratorStatus,
    pub warnings: Vec<BuildWarning>,
    pub assets_copied: usize,
    pub pdf: Option<PathBuf>,
    pub archives: Vec<PathBuf>,
}

impl BuildReport {
    /// Terminal status of the run: the generator's.
    pub fn succeeded(&self) -> bool {
        self.generator_status.success()
    }
}

/// Main documentation build service.
pub struct DocBuildService {
    filesystem: Box<dyn Filesystem>,
    generator: Box<dyn DocGenerator>,
    archiver: Box<dyn Archiver>,
    pdf: Option<Box<dyn PdfAssembler>>,
}

impl DocBuildService {
    /// Create a new build service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        generator: Box<dyn DocGenerator>,
        archiver: Box<dyn Archiver>,
    ) -> Self {
        Self {
            filesystem,
            generator,
            archiver,
            pdf: None,
        }
    }

    pub fn with_pdf_assembler(mut self, pdf: Box<dyn PdfAssembler>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    fn packager(&self) -> Packager<'_> {
        Packager::new(
            self.filesystem.as_ref(),
            self.archiver.as_ref(),
            self.pdf.as_deref(),
        )
    }

    /// Run the whole pipeline.
    #[instrument(
        skip_all,
        fields(
            library = %request.profile.kind(),
            version = %request.profile.version(),
            destination = %request.destination.display()
        )
    )]
    pub fn build(&self, request: &BuildRequest) -> StddocResult<BuildReport> {
        let profile = &request.profile;
        let front_end = profile.front_end(request.front_end);
        info!(front_end = %front_end, "Building {} {} documentation", profile.kind(), profile.version());

        // 1. Up-front checks, before anything is written.
        if !self.filesystem.is_dir(profile.source_root()) {
            return Err(ApplicationError::SourceRootNotFound {
                path: profile.source_root().to_path_buf(),
            }
            .into());
        }
        if request.pdf && profile.pdf_supported(front_end) && self.pdf.is_none() {
            return Err(ApplicationError::AdapterNotConfigured {
                name: "PDF assembler",
            }
            .into());
        }

        // 2. Discovery
        let sources = SourceDiscovery::new(self.filesystem.as_ref()).discover(profile)?;
        if sources.is_empty() {
            return Err(DomainError::EmptyManifest.into());
        }
        let layout = DestinationLayout::new(&request.destination, front_end);

        // 3-6. Everything that writes into tmp/
        let mut warnings = Vec::new();
        let outcome = layout
            .directories()
            .into_iter()
            .try_for_each(|dir| self.filesystem.create_dir_all(dir))
            .and_then(|()| self.run_pipeline(request, front_end, &layout, sources, &mut warnings));

        // 7. Cleanup runs on every outcome of the pipeline.
        if let Err(e) = self.packager().cleanup(&layout) {
            warn!(error = %e, "Scratch cleanup failed");
            warnings.push(BuildWarning::CleanupFailed {
                path: layout.tmp().to_path_buf(),
                reason: e.to_string(),
            });
        }
        let mut report = match outcome {
            Ok(report) => report,
            Err(e) => {
                for warning in &warnings {
                    warn!(%warning, "Raised before the run failed");
                }
                return Err(e);
            }
        };
        report.warnings = warnings;

        // 8. Archives cover the finished tree.
        report.archives =
            self.packager()
                .archive(&layout, profile.archive_base(), &request.archives)?;

        if report.succeeded() {
            info!(modules = report.modules, "Documentation build finished");
        } else {
            warn!(status = %report.generator_status, "Documentation build finished with a failed generator run");
        }
        Ok(report)
    }

    fn run_pipeline(
        &self,
        request: &BuildRequest,
        front_end: FrontEnd,
        layout: &DestinationLayout,
        sources: Vec<SourceFile>,
        warnings: &mut Vec<BuildWarning>,
    ) -> StddocResult<BuildReport> {
        let profile = &request.profile;
        let fs = self.filesystem.as_ref();
        let modules = sources.len();
        let links = ModuleLinkPattern::from_sources(&sources);

        let overlays = OverlayComposer::new(fs).compose(
            profile,
            front_end,
            layout,
            &sources,
            links.as_ref(),
        )?;

        let manifest = BuildManifest::builder(layout.root(), layout.module_list())
            .order(profile.document_order(front_end))
            .sources(sources)
            .aggregator(profile.aggregator().map(Path::to_path_buf));
        let manifest = overlay_sequence(front_end, &overlays, &request.tools)
            .into_iter()
            .fold(manifest, |m, path| m.overlay(path))
            .flags(profile.flags(front_end))
            .versions(profile.versions().clone())
            .build()?;
        DomainValidator::validate_manifest(&manifest)?;

        info!(documents = manifest.documents().len(), "Running generator");
        let generator_status = self.generator.generate(&manifest)?;
        if !generator_status.success() {
            warn!(status = %generator_status, "Generator failed; keeping partial output");
        }

        let post = PostProcessor::new(fs);
        post.rewrite_aggregator(profile, layout, links.as_ref(), warnings)?;
        let assets_copied = post.copy_assets(
            &profile.asset_plan(front_end, layout, &request.tools),
            warnings,
        )?;

        let mut pdf = None;
        if request.pdf {
            match profile.pdf().filter(|_| profile.pdf_supported(front_end)) {
                Some(settings) => pdf = Some(self.packager().assemble_pdf(layout, settings)?),
                None => {
                    let warning = BuildWarning::UnsupportedPackaging {
                        library: profile.kind(),
                        front_end,
                    };
                    warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        Ok(BuildReport {
            library: profile.kind(),
            version: profile.version().label().to_string(),
            front_end,
            destination: layout.root().to_path_buf(),
            modules,
            generator_status,
            warnings: Vec::new(),
            assets_copied,
            pdf,
            archives: Vec::new(),
        })
    }
}

/// Overlay documents in manifest order.
///
/// Default: index, base, missing macros, overrides. Kandil: base, kandil's
/// own overlay, missing macros, overrides, then library macros.
fn overlay_sequence(
    front_end: FrontEnd,
    overlays: &ComposedOverlays,
    tools: &ToolResources,
) -> Vec<PathBuf> {
    use OverlayKind::*;
    match front_end {
        FrontEnd::Default => [Index, Base, MissingMacros, Overrides]
            .into_iter()
            .filter_map(|kind| overlays.path(kind))
            .collect(),
        FrontEnd::Kandil => {
            let mut sequence: Vec<_> = overlays.path(Base).into_iter().collect();
            sequence.push(tools.kandil().overlay());
            sequence.extend(
                [MissingMacros, Overrides, Library]
                    .into_iter()
                    .filter_map(|kind| overlays.path(kind)),
            );
            sequence
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockArchiver, MockDocGenerator, MockFilesystem, MockPdfAssembler,
    };
    use crate::domain::{DocVersion, ManifestDocument};
    use crate::error::StddocError;
    use std::sync::{Arc, Mutex};

    fn request(pdf: bool, front_end: FrontEnd) -> BuildRequest {
        BuildRequest {
            profile: LibraryProfile::phobos(
                DocVersion::parse_phobos("2.032").unwrap(),
                "/phobos",
            ),
            front_end,
            destination: PathBuf::from("/out"),
            tools: ToolResources::from_root("/dil"),
            pdf,
            archives: Vec::new(),
        }
    }

    /// A filesystem where the source tree holds two modules and every
    /// write succeeds.
    fn lenient_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_exists().returning(|_| false);
        fs.expect_walk_files().returning(|_, _| {
            Ok(vec![
                PathBuf::from("/phobos/std/string.d"),
                PathBuf::from("/phobos/std/array.d"),
            ])
        });
        fs.expect_read_to_string().returning(|_| Ok(String::new()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_list_files().returning(|_| Ok(Vec::new()));
        fs
    }

    fn service(fs: MockFilesystem, generator: MockDocGenerator) -> DocBuildService {
        DocBuildService::new(Box::new(fs), Box::new(generator), Box::new(MockArchiver::new()))
    }

    fn capture_manifest(code: i32) -> (MockDocGenerator, Arc<Mutex<Option<BuildManifest>>>) {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let mut generator = MockDocGenerator::new();
        generator.expect_generate().times(1).returning(move |m| {
            *sink.lock().unwrap() = Some(m.clone());
            Ok(GeneratorStatus::new(code))
        });
        (generator, seen)
    }

    fn document_names(manifest: &BuildManifest) -> Vec<String> {
        manifest
            .documents()
            .iter()
            .map(|d| d.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn default_manifest_puts_sources_first() {
        let (generator, seen) = capture_manifest(0);
        let report = service(lenient_fs(), generator)
            .build(&request(false, FrontEnd::Default))
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(report.modules, 2);
        let manifest = seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            document_names(&manifest),
            vec![
                "array.d",
                "string.d",
                "phobos.d",
                "index.d",
                "phobos.ddoc",
                "missing.ddoc",
                "overrides.ddoc"
            ]
        );
        assert!(matches!(manifest.documents()[2], ManifestDocument::Aggregator(_)));
        let flags: Vec<_> = manifest.flags().iter().map(|f| f.as_flag()).collect();
        assert_eq!(flags, vec!["-v", "-i", "-hl"]);
        assert_eq!(manifest.module_list(), Path::new("/out/tmp/modules.txt"));
    }

    #[test]
    fn kandil_manifest_puts_overlays_first() {
        let (generator, seen) = capture_manifest(0);
        service(lenient_fs(), generator)
            .build(&request(false, FrontEnd::Kandil))
            .unwrap();

        let manifest = seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            document_names(&manifest),
            vec![
                "phobos.ddoc",
                "kandil.ddoc",
                "missing.ddoc",
                "overrides.ddoc",
                "phobos.d",
                "array.d",
                "string.d"
            ]
        );
        assert!(manifest.flags().contains(&crate::domain::GeneratorFlag::Kandil));
    }

    #[test]
    fn failed_generator_still_post_processes() {
        let (generator, _) = capture_manifest(3);
        let report = service(lenient_fs(), generator)
            .build(&request(false, FrontEnd::Default))
            .unwrap();
        assert!(!report.succeeded());
        assert_eq!(report.generator_status.code(), 3);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, BuildWarning::MissingAggregatorPage { .. })));
    }

    #[test]
    fn pdf_without_kandil_is_a_warning() {
        let (generator, _) = capture_manifest(0);
        let mut pdf = MockPdfAssembler::new();
        pdf.expect_assemble().never();

        let report = service(lenient_fs(), generator)
            .with_pdf_assembler(Box::new(pdf))
            .build(&request(true, FrontEnd::Default))
            .unwrap();
        assert!(report.pdf.is_none());
        assert!(report.warnings.contains(&BuildWarning::UnsupportedPackaging {
            library: LibraryKind::Phobos,
            front_end: FrontEnd::Default,
        }));
    }

    #[test]
    fn pdf_with_kandil_but_no_assembler_fails_before_writing() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_create_dir_all().never();
        let mut generator = MockDocGenerator::new();
        generator.expect_generate().never();

        let err = service(fs, generator)
            .build(&request(true, FrontEnd::Kandil))
            .unwrap_err();
        assert!(matches!(
            err,
            StddocError::Application(ApplicationError::AdapterNotConfigured { .. })
        ));
    }

    #[test]
    fn missing_root_aborts_before_any_work() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| false);
        fs.expect_create_dir_all().never();
        fs.expect_walk_files().never();
        let mut generator = MockDocGenerator::new();
        generator.expect_generate().never();

        let err = service(fs, generator)
            .build(&request(false, FrontEnd::Default))
            .unwrap_err();
        assert_eq!(err.to_string(), "The path '/phobos' doesn't exist.");
    }

    #[test]
    fn failed_layout_creation_still_cleans_up() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_walk_files()
            .returning(|_, _| Ok(vec![PathBuf::from("/phobos/std/a.d")]));
        fs.expect_create_dir_all().returning(|path| {
            if path == Path::new("/out/js") {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "read-only".into(),
                }
                .into())
            } else {
                Ok(())
            }
        });
        fs.expect_write_file().never();
        fs.expect_exists()
            .returning(|path| path == Path::new("/out/tmp"));
        fs.expect_remove_dir_all()
            .withf(|path| path == Path::new("/out/tmp"))
            .times(1)
            .returning(|_| Ok(()));
        let mut generator = MockDocGenerator::new();
        generator.expect_generate().never();

        let err = service(fs, generator)
            .build(&request(false, FrontEnd::Kandil))
            .unwrap_err();
        assert!(matches!(
            err,
            StddocError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn pdf_failure_after_warnings_is_still_an_error() {
        let (generator, _) = capture_manifest(0);
        let mut pdf = MockPdfAssembler::new();
        pdf.expect_assemble().times(1).returning(|_| {
            Err(ApplicationError::PdfAssemblyFailed {
                reason: "exit status 1".into(),
            }
            .into())
        });
        let mut archiver = MockArchiver::new();
        archiver.expect_archive().never();

        let mut request = request(true, FrontEnd::Kandil);
        request.archives = vec![ArchiveFormat::SevenZip];
        let err = DocBuildService::new(Box::new(lenient_fs()), Box::new(generator), Box::new(archiver))
            .with_pdf_assembler(Box::new(pdf))
            .build(&request)
            .unwrap_err();
        assert!(matches!(
            err,
            StddocError::Application(ApplicationError::PdfAssemblyFailed { .. })
        ));
    }

    #[test]
    fn generator_launch_failure_still_cleans_up() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_walk_files()
            .returning(|_, _| Ok(vec![PathBuf::from("/phobos/std/a.d")]));
        fs.expect_read_to_string().returning(|_| Ok(String::new()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_exists()
            .returning(|path| path == Path::new("/out/tmp"));
        fs.expect_remove_dir_all()
            .withf(|path| path == Path::new("/out/tmp"))
            .times(1)
            .returning(|_| Ok(()));

        let mut generator = MockDocGenerator::new();
        generator.expect_generate().returning(|_| {
            Err(ApplicationError::GeneratorLaunch {
                program: "/dil/bin/dil".into(),
                reason: "permission denied".into(),
            }
            .into())
        });

        let err = service(fs, generator)
            .build(&request(false, FrontEnd::Default))
            .unwrap_err();
        assert!(matches!(
            err,
            StddocError::Application(ApplicationError::GeneratorLaunch { .. })
        ));
    }
}
