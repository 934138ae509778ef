//! Python renderer for both generations

use super::{respell_literals, RenderContext, RenderedMethod, TargetRenderer};
use crate::assembler;
use crate::catalogs::RuleLibrary;
use crate::identifiers::{rename_method_calls, CaseConverter};
use crate::inference::DependencyInferencer;
use regex::{Captures, Regex};
use std::sync::Arc;
use transpile_core::{Diagnostic, MethodUnit, SourceClass, Target, TranspileError, TranspileResult};

const PYTHON_LITERALS: &[(&str, &str)] = &[("undefined", "None"), ("false", "False"), ("true", "True")];

/// Structural passes that run after the generation 3 catalog
struct PythonPasses {
    empty_lines: Regex,
    non_ascii_literals: Regex,
    ordered_dict: Regex,
    ordered_entry: Regex,
    super_call: Regex,
}

impl PythonPasses {
    fn new() -> TranspileResult<Self> {
        Ok(Self {
            empty_lines: Regex::new(r"(?m)$\s*$")?,
            non_ascii_literals: Regex::new(
                r"'([абвгдеёжзийклмнопрстуфхцчшщъыьэюя服务端忙碌]+)'",
            )?,
            ordered_dict: Regex::new(r"\.ordered\s*\(\{([^}]+)\}\)")?,
            ordered_entry: Regex::new(r"(?m)^(\s+)([^:]+):\s*([^,]+),$")?,
            super_call: Regex::new(r"super\.")?,
        })
    }
}

/// Renders the dynamic target. Generation 2 is always derived from the
/// generation 3 body by the single `await`-stripping pass.
pub struct PythonRenderer {
    generation: Target,
    library: Arc<RuleLibrary>,
    inferencer: Arc<DependencyInferencer>,
    converter: CaseConverter,
    passes: PythonPasses,
}

impl PythonRenderer {
    pub fn new(
        generation: Target,
        library: Arc<RuleLibrary>,
        inferencer: Arc<DependencyInferencer>,
    ) -> TranspileResult<Self> {
        if !generation.is_python() {
            return Err(TranspileError::render_with_context(
                "python renderer needs a python target",
                generation.id(),
            ));
        }

        Ok(Self {
            generation,
            library,
            inferencer,
            converter: CaseConverter::new()?,
            passes: PythonPasses::new()?,
        })
    }

    /// Generation 3 text for a fragment of canonical source.
    ///
    /// `class_name` enables the explicit `super(...)` rewrite; fixtures pass `None`.
    pub fn transpile_python3(&self, source: &str, class_name: Option<&str>, remove_empty_lines: bool) -> String {
        let mut text = self.library.python3().apply(source);

        if remove_empty_lines {
            text = self.passes.empty_lines.replace_all(&text, "").into_owned();
        }

        text = self
            .passes
            .non_ascii_literals
            .replace_all(&text, "u'${1}'")
            .into_owned();

        text = self
            .passes
            .ordered_dict
            .replace_all(&text, |caps: &Captures| {
                let pairs = self.passes.ordered_entry.replace_all(&caps[1], "${1}(${2}, ${3}),");
                format!(".ordered([{}])", pairs)
            })
            .into_owned();

        if let Some(class_name) = class_name {
            let explicit = format!("super({}, self).", class_name);
            text = self
                .passes
                .super_call
                .replace_all(&text, regex::NoExpand(&explicit))
                .into_owned();
        }

        text
    }

    /// Generation 2 text derived from generation 3 text
    pub fn derive_python2(&self, python3: &str) -> String {
        self.library.python2().apply(python3)
    }
}

impl TargetRenderer for PythonRenderer {
    fn target(&self) -> Target {
        self.generation
    }

    fn render_signature(&self, method: &MethodUnit) -> String {
        let mut arguments = vec!["self".to_string()];
        arguments.extend(method.parameters.iter().map(|p| match &p.default {
            Some(default) => format!("{}={}", p.name, respell_literals(default, PYTHON_LITERALS)),
            None => p.name.clone(),
        }));

        let keyword = if method.is_async && self.generation.is_async() {
            "async "
        } else {
            ""
        };

        format!(
            "{}def {}({}):",
            keyword,
            self.converter.un_camel_case(&method.name),
            arguments.join(", ")
        )
    }

    fn render_body(
        &self,
        class: &SourceClass,
        method: &MethodUnit,
        _context: &mut RenderContext,
    ) -> TranspileResult<String> {
        let python3 = self.transpile_python3(&method.body, Some(&class.name), true);
        Ok(match self.generation {
            Target::Python2 => self.derive_python2(&python3),
            _ => python3,
        })
    }

    fn assemble(
        &self,
        class: &SourceClass,
        methods: &[RenderedMethod],
        context: &mut RenderContext,
    ) -> TranspileResult<String> {
        let body = assembler::python_methods_text(methods);

        let imports = self.inferencer.infer(&body);
        for missing in &imports.missing {
            if context.report(Diagnostic::missing_registry_entry(missing.clone())) {
                log::warn!(
                    "{}: {} is raised but has no error hierarchy entry, no import emitted",
                    context.file,
                    missing
                );
            }
        }

        let body = rename_method_calls(
            &body,
            &class.method_names(),
            r"self\.",
            "self.",
            "",
            &self.converter,
        )?;

        Ok(assembler::python_class(
            &class.name,
            &class.base_class,
            self.generation.is_async(),
            &body,
            &imports,
        ))
    }
}
