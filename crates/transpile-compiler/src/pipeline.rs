//! Batch orchestration: discover sources, render every class for every
//! enabled target, then prune, export the manifest and run the one-off
//! transpilations.
//!
//! The batch stops at the first fatal error. Files written before it stay on
//! disk.

use crate::catalogs::RuleLibrary;
use crate::class_registry::ClassRegistry;
use crate::config::TranspileConfig;
use crate::decomposer::StructuralDecomposer;
use crate::files;
use crate::fixtures::{FragmentTranspiler, FIXTURES};
use crate::identifiers::IdentifierRegistry;
use crate::inclusion::InclusionList;
use crate::inference::DependencyInferencer;
use crate::pruner::{PruneTarget, StalePruner};
use crate::renderer::{MethodRenderer, PhpRenderer, PythonRenderer, RenderContext, RenderOptions};
use crate::sync_driver::SyncDriverDeriver;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use transpile_core::{
    Diagnostic, DiagnosticCollector, DiagnosticKind, RenderedArtifact, SourceClass, Target, TranspileError,
    TranspileResult,
};

/// One source file rendered for every enabled target, not yet written
#[derive(Debug, Clone)]
pub struct TranspiledClass {
    pub source: PathBuf,
    pub class: SourceClass,
    pub artifacts: Vec<RenderedArtifact>,
    pub diagnostics: Vec<Diagnostic>,
}

/// What a run did
#[derive(Debug, Default)]
pub struct BatchReport {
    pub classes: ClassRegistry,
    pub written: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub diagnostics: DiagnosticCollector,
}

impl BatchReport {
    pub fn transpiled_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Main transpilation pipeline
pub struct TranspilePipeline {
    config: TranspileConfig,
    decomposer: StructuralDecomposer,
    renderer: MethodRenderer,
    python: PythonRenderer,
    php: PhpRenderer,
}

impl TranspilePipeline {
    /// Build every catalog and renderer the configuration asks for
    pub fn new(config: TranspileConfig) -> TranspileResult<Self> {
        config.validate()?;

        let hierarchy = config.load_error_hierarchy()?;
        let registry = IdentifierRegistry::curated()?;
        let library = Arc::new(RuleLibrary::new(&registry, &hierarchy, config.nesting_passes)?);
        let inferencer = Arc::new(DependencyInferencer::new(&hierarchy)?);
        let options = RenderOptions {
            strict_nesting: config.strict_nesting,
        };

        let renderer = MethodRenderer::for_targets(
            &config.enabled_targets(),
            Arc::clone(&library),
            Arc::clone(&inferencer),
            options,
        )?;
        let python = PythonRenderer::new(Target::Python3, Arc::clone(&library), inferencer)?;
        let php = PhpRenderer::new(library, options)?;

        log::debug!("Pipeline ready for targets {:?}", renderer.targets());

        Ok(Self {
            config,
            decomposer: StructuralDecomposer::new()?,
            renderer,
            python,
            php,
        })
    }

    pub fn config(&self) -> &TranspileConfig {
        &self.config
    }

    /// Source files eligible for this run, sorted by file name
    pub fn discover_sources(&self) -> TranspileResult<Vec<PathBuf>> {
        let inclusion = InclusionList::from_file(&self.config.resolve(&self.config.inclusion_list))?;
        let pattern = self.config.pattern.as_str();

        let sources = files::list_files(&self.config.resolve(&self.config.js_dir))?
            .into_iter()
            .filter(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let id = name.strip_suffix(pattern).unwrap_or(&name);
                name.contains(pattern) && inclusion.is_included(id)
            })
            .collect();
        Ok(sources)
    }

    /// Decompose and render one class held in memory.
    ///
    /// `file` names the source in errors and diagnostics; artifacts are placed
    /// under the configured output directories with the file's stem.
    pub fn transpile_text(&self, file: &str, contents: &str) -> TranspileResult<TranspiledClass> {
        let class = self.decomposer.decompose(file, contents)?;
        let mut context = RenderContext::new(file);
        let rendered = self
            .renderer
            .render_class(&class, &mut context)
            .map_err(|e| e.in_file(file))?;

        let stem = Path::new(file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| class.name.clone());

        let artifacts = rendered
            .into_iter()
            .map(|(target, text)| RenderedArtifact {
                target,
                path: self
                    .config
                    .output_dir(target)
                    .join(format!("{}.{}", stem, target.extension())),
                text,
            })
            .collect();

        Ok(TranspiledClass {
            source: PathBuf::from(file),
            class,
            artifacts,
            diagnostics: context.diagnostics.into_vec(),
        })
    }

    /// Read, decompose and render one source file
    pub fn transpile_file(&self, path: &Path) -> TranspileResult<TranspiledClass> {
        let contents = files::read_file(path)?;
        let file = path.display().to_string();
        let mut transpiled = self.transpile_text(&file, &contents)?;
        transpiled.source = path.to_path_buf();
        Ok(transpiled)
    }

    /// Decompose only
    pub fn check_file(&self, path: &Path) -> TranspileResult<SourceClass> {
        let contents = files::read_file(path)?;
        self.decomposer.decompose(&path.display().to_string(), &contents)
    }

    fn write_artifacts(&self, transpiled: &TranspiledClass, report: &mut BatchReport) -> TranspileResult<()> {
        for artifact in &transpiled.artifacts {
            files::overwrite_file(&artifact.path, &artifact.text)?;
            log::info!("Wrote {}", artifact.path.display());
            report.written.push(artifact.path.clone());
        }
        Ok(())
    }

    /// Run the whole batch
    pub fn run(&self) -> TranspileResult<BatchReport> {
        let mut report = BatchReport::default();

        for target in self.renderer.targets() {
            let dir = self.config.output_dir(target);
            std::fs::create_dir_all(&dir).map_err(|e| TranspileError::file_access(&dir, e))?;
        }

        for source in self.discover_sources()? {
            log::info!("Transpiling from {}", source.display());
            let transpiled = self.transpile_file(&source).map_err(|e| {
                log::error!("Failed to transpile source code from {}", source.display());
                e
            })?;

            self.write_artifacts(&transpiled, &mut report)?;
            report
                .classes
                .register(transpiled.class.name.clone(), transpiled.class.base_class.clone());
            report.diagnostics.extend(transpiled.diagnostics);
        }

        if report.is_empty() {
            log::warn!("0 files transpiled.");
            return Ok(report);
        }

        if self.config.prune.enabled {
            self.prune(&mut report)?;
        }

        self.export_manifest(&report.classes)?;

        if self.config.auxiliary.enabled {
            self.run_auxiliary(&mut report)?;
        }

        log::info!(
            "Transpiled successfully: {} classes, {} files written, {} stale files deleted",
            report.transpiled_count(),
            report.written.len(),
            report.deleted.len()
        );
        Ok(report)
    }

    fn prune(&self, report: &mut BatchReport) -> TranspileResult<()> {
        let pruner = StalePruner::new(self.config.prune.exclusions.as_slice())?;
        let targets = self
            .renderer
            .targets()
            .into_iter()
            .map(|target| {
                let dir = self.config.output_dir(target);
                match target {
                    Target::Php => PruneTarget::php(dir),
                    Target::Python2 | Target::Python3 => PruneTarget::python(dir),
                }
            })
            .collect::<TranspileResult<Vec<_>>>()?;

        for diagnostic in pruner.prune(&targets, &report.classes)? {
            if let DiagnosticKind::StaleArtifact { path } = &diagnostic.kind {
                report.deleted.push(path.clone());
            }
            report.diagnostics.add(diagnostic);
        }
        Ok(())
    }

    fn export_manifest(&self, classes: &ClassRegistry) -> TranspileResult<()> {
        let manifest = self.config.resolve(&self.config.manifest);
        if !manifest.is_file() {
            log::warn!("No manifest at {}, skipping class declarations", manifest.display());
            return Ok(());
        }
        classes.write_manifest(&manifest)?;
        Ok(())
    }

    /// Error hierarchy splice, the three fixtures and the sync test driver.
    /// A step whose source file is absent is skipped with a warning.
    pub fn run_auxiliary(&self, report: &mut BatchReport) -> TranspileResult<()> {
        let root = self.config.root.as_path();
        let settings = &self.config.auxiliary;
        let fragments = FragmentTranspiler::new(&self.python, &self.php, &self.decomposer);

        if root.join(&settings.error_hierarchy_source).is_file() {
            report
                .diagnostics
                .extend(fragments.transpile_error_hierarchy(root, settings)?);
        } else {
            log::warn!(
                "No error hierarchy source at {}, skipping",
                root.join(&settings.error_hierarchy_source).display()
            );
        }

        for fixture in &FIXTURES {
            let source = root.join(&settings.fixture_dir).join(fixture.source);
            if !source.is_file() {
                log::warn!("No fixture source at {}, skipping", source.display());
                continue;
            }
            let (written, diagnostics) = fragments.transpile_fixture(fixture, root, settings)?;
            report.written.extend(written);
            report.diagnostics.extend(diagnostics);
        }

        self.derive_sync_driver(report)
    }

    /// Derive the synchronous test driver from the asynchronous one
    pub fn derive_sync_driver(&self, report: &mut BatchReport) -> TranspileResult<()> {
        let settings = &self.config.auxiliary;
        let async_path = self.config.resolve(&settings.async_test_driver);
        if !async_path.is_file() {
            log::warn!("No async test driver at {}, skipping", async_path.display());
            return Ok(());
        }

        let sync_path = self.config.resolve(&settings.sync_test_driver);
        SyncDriverDeriver::new()?.derive_file(&async_path, &sync_path)?;
        report.written.push(sync_path);
        Ok(())
    }
}
