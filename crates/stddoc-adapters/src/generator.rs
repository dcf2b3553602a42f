//! Generator adapters: the `dil` process and a scripted stand-in for tests.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument};

use stddoc_core::{
    application::{
        ApplicationError,
        ports::{DocGenerator, Filesystem, GeneratorStatus},
    },
    domain::{BuildManifest, ManifestDocument, SourceFile},
    error::{StddocError, StddocResult},
};

use crate::process;

/// Runs `dil ddoc` as a child process.
#[derive(Debug, Clone)]
pub struct DilGenerator {
    executable: PathBuf,
}

impl DilGenerator {
    /// Fails with `GeneratorNotFound` when `executable` is not a file.
    pub fn new(executable: impl Into<PathBuf>) -> StddocResult<Self> {
        let executable = executable.into();
        if !executable.is_file() {
            return Err(ApplicationError::GeneratorNotFound { path: executable }.into());
        }
        Ok(Self { executable })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// `ddoc <DEST> -m=<module list> <flags> -version=<v>... <documents>`
    pub fn command_args(manifest: &BuildManifest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["ddoc".into(), manifest.destination().into()];

        let mut module_list = OsString::from("-m=");
        module_list.push(manifest.module_list());
        args.push(module_list);

        args.extend(manifest.flags().iter().map(|flag| flag.as_flag().into()));
        args.extend(
            manifest
                .versions()
                .iter()
                .map(|label| format!("-version={label}").into()),
        );
        args.extend(
            manifest
                .documents()
                .iter()
                .map(|doc| doc.path().as_os_str().to_os_string()),
        );
        args
    }
}

impl DocGenerator for DilGenerator {
    #[instrument(skip_all, fields(exe = %self.executable.display()))]
    fn generate(&self, manifest: &BuildManifest) -> StddocResult<GeneratorStatus> {
        let mut command = Command::new(&self.executable);
        command.args(Self::command_args(manifest));
        debug!(command = %process::describe(&command), "Spawning generator");

        let code = process::exit_code(&mut command).map_err(|e| {
            StddocError::from(ApplicationError::GeneratorLaunch {
                program: self.executable.clone(),
                reason: e.to_string(),
            })
        })?;
        let status = GeneratorStatus::new(code);
        info!(status = %status, "Generator exited");
        Ok(status)
    }
}

/// Writes a plausible output tree instead of running `dil`.
///
/// For every source module it writes `<fqn>.html` and `htmlsrc/<fqn>.html`;
/// for an aggregator document `<stem>.html` with the same link shapes the
/// real generator emits (a linked title, `../` references and flattened
/// module links). The module list is filled in as well. Every manifest it
/// receives is recorded.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator<F> {
    filesystem: F,
    exit_code: i32,
    module_limit: Option<usize>,
    calls: Arc<Mutex<Vec<BuildManifest>>>,
}

impl<F: Filesystem> ScriptedGenerator<F> {
    pub fn new(filesystem: F) -> Self {
        Self {
            filesystem,
            exit_code: 0,
            module_limit: None,
            calls: Arc::default(),
        }
    }

    /// Exit with `code` after writing the output.
    pub fn exiting_with(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Only write pages for the first `count` modules, as a crashed run would.
    pub fn stopping_after(mut self, count: usize) -> Self {
        self.module_limit = Some(count);
        self
    }

    /// Manifests received so far. Clones share the record.
    pub fn calls(&self) -> Vec<BuildManifest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn write_module(&self, manifest: &BuildManifest, source: &SourceFile) -> StddocResult<()> {
        let page = format!(
            "<html><head><title>{fqn}</title></head>\n<body>\n<h1><a href=\"htmlsrc/{page}\">{fqn}</a></h1>\n</body></html>\n",
            fqn = source.fqn(),
            page = source.page_name(),
        );
        self.filesystem
            .write_file(&manifest.destination().join(source.page_name()), &page)?;

        let listing = format!("<html><body><pre>module {};</pre></body></html>\n", source.fqn());
        self.filesystem.write_file(
            &manifest.destination().join("htmlsrc").join(source.page_name()),
            &listing,
        )
    }

    fn write_aggregator(
        &self,
        manifest: &BuildManifest,
        aggregator: &Path,
        modules: &[&SourceFile],
    ) -> StddocResult<()> {
        let Some(stem) = aggregator.file_stem() else {
            return Ok(());
        };
        let stem = stem.to_string_lossy();
        let mut page = format!(
            "<html><head><title>{stem}</title></head>\n<body>\n<h1><a href=\"htmlsrc/{stem}.html\">{stem}</a></h1>\n<a href=\"../index.html\">D</a>\n<ul>\n"
        );
        for module in modules {
            page.push_str(&format!(
                "  <li><a href=\"{}.html\">{}</a></li>\n",
                module.flattened_name(),
                module.fqn()
            ));
        }
        page.push_str("</ul>\n</body></html>\n");
        self.filesystem
            .write_file(&manifest.destination().join(format!("{stem}.html")), &page)
    }
}

impl<F: Filesystem> DocGenerator for ScriptedGenerator<F> {
    fn generate(&self, manifest: &BuildManifest) -> StddocResult<GeneratorStatus> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(manifest.clone());
        }

        let sources: Vec<&SourceFile> = manifest
            .documents()
            .iter()
            .filter_map(|doc| match doc {
                ManifestDocument::Source(source) => Some(source),
                _ => None,
            })
            .collect();
        let written = self.module_limit.unwrap_or(sources.len()).min(sources.len());

        for source in &sources[..written] {
            self.write_module(manifest, source)?;
        }
        if written == sources.len() {
            for doc in manifest.documents() {
                if let ManifestDocument::Aggregator(path) = doc {
                    self.write_aggregator(manifest, path, &sources)?;
                }
            }
        }

        let list: String = sources[..written]
            .iter()
            .map(|s| format!("{}\n", s.fqn()))
            .collect();
        self.filesystem.write_file(manifest.module_list(), &list)?;

        Ok(GeneratorStatus::new(self.exit_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFilesystem;
    use stddoc_core::domain::{DocumentOrder, GeneratorFlag, VersionSet};

    fn manifest() -> BuildManifest {
        let prefix = Path::new("/phobos");
        BuildManifest::builder("/out", "/out/tmp/modules.txt")
            .order(DocumentOrder::SourcesFirst)
            .sources([
                SourceFile::new(prefix, "/phobos/std/array.d").unwrap(),
                SourceFile::new(prefix, "/phobos/std/c/stdio.d").unwrap(),
            ])
            .aggregator(Some(PathBuf::from("/phobos/phobos.d")))
            .overlay("/out/tmp/phobos.ddoc")
            .flags([GeneratorFlag::Verbose, GeneratorFlag::Highlight])
            .versions(VersionSet::new(["Windows", "DDoc"]))
            .build()
            .unwrap()
    }

    #[test]
    fn dil_arguments_follow_manifest_order() {
        let args = DilGenerator::command_args(&manifest());
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "ddoc",
                "/out",
                "-m=/out/tmp/modules.txt",
                "-v",
                "-hl",
                "-version=Windows",
                "-version=DDoc",
                "/phobos/std/array.d",
                "/phobos/std/c/stdio.d",
                "/phobos/phobos.d",
                "/out/tmp/phobos.ddoc",
            ]
        );
    }

    #[test]
    fn missing_executable_is_not_found() {
        let err = DilGenerator::new("/definitely/not/here/dil").unwrap_err();
        assert!(matches!(
            err,
            StddocError::Application(ApplicationError::GeneratorNotFound { .. })
        ));
    }

    #[test]
    fn scripted_generator_writes_pages_and_module_list() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out/htmlsrc")).unwrap();
        fs.create_dir_all(Path::new("/out/tmp")).unwrap();

        let generator = ScriptedGenerator::new(fs.clone());
        let status = generator.generate(&manifest()).unwrap();

        assert!(status.success());
        assert!(fs.exists(Path::new("/out/std.c.stdio.html")));
        assert!(fs.exists(Path::new("/out/htmlsrc/std.array.html")));
        let aggregator = fs.read_file(Path::new("/out/phobos.html")).unwrap();
        assert!(aggregator.contains("href=\"std_c_stdio.html\""));
        assert_eq!(
            fs.read_file(Path::new("/out/tmp/modules.txt")).as_deref(),
            Some("std.array\nstd.c.stdio\n")
        );
        assert_eq!(generator.calls().len(), 1);
    }

    #[test]
    fn scripted_failure_leaves_partial_output() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out/htmlsrc")).unwrap();
        fs.create_dir_all(Path::new("/out/tmp")).unwrap();

        let status = ScriptedGenerator::new(fs.clone())
            .exiting_with(1)
            .stopping_after(1)
            .generate(&manifest())
            .unwrap();

        assert_eq!(status.code(), 1);
        assert!(fs.exists(Path::new("/out/std.array.html")));
        assert!(!fs.exists(Path::new("/out/std.c.stdio.html")));
        assert!(!fs.exists(Path::new("/out/phobos.html")));
    }
}
