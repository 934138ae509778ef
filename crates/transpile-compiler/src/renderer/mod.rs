//! Per-target method rendering and class assembly
//!
//! Each target is a [`TargetRenderer`]; the [`MethodRenderer`] drives a list of
//! them over one decomposed class and returns every artifact text in memory,
//! so a failure on any target leaves nothing half-written.

pub mod php;
pub mod python;

pub use php::PhpRenderer;
pub use python::PythonRenderer;

use crate::catalogs::RuleLibrary;
use crate::inference::DependencyInferencer;
use std::sync::Arc;
use transpile_core::{Diagnostic, DiagnosticCollector, MethodUnit, SourceClass, Target, TranspileResult};

/// Options shared by all renderers
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Fail the file instead of warning when a collection literal is nested past the bound
    pub strict_nesting: bool,
}

/// Mutable state for rendering one source file
#[derive(Debug, Default)]
pub struct RenderContext {
    pub file: String,
    pub diagnostics: DiagnosticCollector,
}

impl RenderContext {
    pub fn new<S: Into<String>>(file: S) -> Self {
        Self {
            file: file.into(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Record a diagnostic for this file. Returns `false` if an identical one
    /// was already recorded, as happens when several targets hit the same condition.
    pub fn report(&mut self, diagnostic: Diagnostic) -> bool {
        let seen = self
            .diagnostics
            .diagnostics()
            .iter()
            .any(|existing| existing.kind == diagnostic.kind);
        if seen {
            return false;
        }
        self.diagnostics.add(diagnostic.in_file(self.file.clone()));
        true
    }
}

/// One method rendered for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMethod {
    pub name: String,
    pub signature: String,
    pub body: String,
}

/// One output language (and generation)
pub trait TargetRenderer {
    fn target(&self) -> Target;

    /// Signature line with parameter defaults in the target's literal spelling
    fn render_signature(&self, method: &MethodUnit) -> String;

    /// Body text after the target's catalog and structural passes
    fn render_body(&self, class: &SourceClass, method: &MethodUnit, context: &mut RenderContext)
        -> TranspileResult<String>;

    /// Wrap the rendered methods into a complete file
    fn assemble(
        &self,
        class: &SourceClass,
        methods: &[RenderedMethod],
        context: &mut RenderContext,
    ) -> TranspileResult<String>;

    fn render_method(
        &self,
        class: &SourceClass,
        method: &MethodUnit,
        context: &mut RenderContext,
    ) -> TranspileResult<RenderedMethod> {
        log::trace!("Rendering {}.{} for {}", class.name, method.name, self.target());
        Ok(RenderedMethod {
            name: method.name.clone(),
            signature: self.render_signature(method),
            body: self.render_body(class, method, context)?,
        })
    }
}

/// Drives every enabled target renderer over a class
pub struct MethodRenderer {
    renderers: Vec<Box<dyn TargetRenderer>>,
}

impl MethodRenderer {
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Renderer set for the given targets, in the given order
    pub fn for_targets(
        targets: &[Target],
        library: Arc<RuleLibrary>,
        inferencer: Arc<DependencyInferencer>,
        options: RenderOptions,
    ) -> TranspileResult<Self> {
        let mut renderer = Self::new();
        for target in targets {
            let boxed: Box<dyn TargetRenderer> = match target {
                Target::Python3 | Target::Python2 => Box::new(PythonRenderer::new(
                    *target,
                    Arc::clone(&library),
                    Arc::clone(&inferencer),
                )?),
                Target::Php => Box::new(PhpRenderer::new(Arc::clone(&library), options)?),
            };
            renderer.add_renderer(boxed);
        }
        Ok(renderer)
    }

    pub fn add_renderer(&mut self, renderer: Box<dyn TargetRenderer>) {
        self.renderers.push(renderer);
    }

    pub fn targets(&self) -> Vec<Target> {
        self.renderers.iter().map(|r| r.target()).collect()
    }

    /// Render the class for every target. Either all texts come back or none do.
    pub fn render_class(
        &self,
        class: &SourceClass,
        context: &mut RenderContext,
    ) -> TranspileResult<Vec<(Target, String)>> {
        let mut outputs = Vec::with_capacity(self.renderers.len());

        for renderer in &self.renderers {
            let methods = class
                .methods
                .iter()
                .map(|method| renderer.render_method(class, method, context))
                .collect::<TranspileResult<Vec<_>>>()?;
            let text = renderer.assemble(class, &methods, context)?;
            outputs.push((renderer.target(), text));
        }

        Ok(outputs)
    }
}

impl Default for MethodRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Respell canonical literals (`undefined`, `true`, `{}`, ...) inside a default value
pub(crate) fn respell_literals(text: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}
