//! PHP renderer

use super::{respell_literals, RenderContext, RenderOptions, RenderedMethod, TargetRenderer};
use crate::assembler;
use crate::catalogs::php::{variable_rules, COLLECTION_RULES};
use crate::catalogs::RuleLibrary;
use crate::identifiers::{rename_method_calls, CaseConverter};
use crate::rules::RuleCatalog;
use std::sync::Arc;
use transpile_core::{Diagnostic, MethodUnit, SourceClass, Target, TranspileError, TranspileResult};

const PHP_LITERALS: &[(&str, &str)] = &[("undefined", "null"), ("{}", "array ()")];

/// A collection literal the bounded passes did not reach
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingOverflow {
    pub line: String,
}

pub struct PhpRenderer {
    library: Arc<RuleLibrary>,
    options: RenderOptions,
    converter: CaseConverter,
    collection_rules: RuleCatalog,
}

impl PhpRenderer {
    pub fn new(library: Arc<RuleLibrary>, options: RenderOptions) -> TranspileResult<Self> {
        Ok(Self {
            library,
            options,
            converter: CaseConverter::new()?,
            collection_rules: RuleCatalog::from_table("php-collections", &COLLECTION_RULES)?,
        })
    }

    /// PHP text for a fragment of canonical source whose variables are `bindings`.
    ///
    /// Returns the text with placeholders restored, plus any line where a
    /// collection literal was nested deeper than the configured bound.
    pub fn transpile_php(&self, source: &str, bindings: &[String]) -> TranspileResult<(String, Vec<NestingOverflow>)> {
        let text = self.library.php().apply(source);

        let names: Vec<String> = bindings
            .iter()
            .map(|name| self.library.common().apply(name))
            .collect();
        let text = variable_rules(&names)?.apply(&text);

        let overflows = self.nesting_overflows(&text);
        Ok((self.library.php_restore().apply(&text), overflows))
    }

    fn nesting_overflows(&self, text: &str) -> Vec<NestingOverflow> {
        let mut overflows: Vec<NestingOverflow> = Vec::new();
        for index in self.collection_rules.residual_matches(text) {
            for found in self.collection_rules.rules()[index].find_iter(text) {
                let start = text[..found.start()].rfind('\n').map_or(0, |i| i + 1);
                let end = text[found.start()..]
                    .find('\n')
                    .map_or(text.len(), |i| found.start() + i);
                let line = text[start..end].trim().to_string();
                if !overflows.iter().any(|o| o.line == line) {
                    overflows.push(NestingOverflow { line });
                }
            }
        }
        overflows
    }
}

impl TargetRenderer for PhpRenderer {
    fn target(&self) -> Target {
        Target::Php
    }

    fn render_signature(&self, method: &MethodUnit) -> String {
        let arguments = method
            .parameters
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("${} = {}", p.name, respell_literals(default, PHP_LITERALS)),
                None => format!("${}", p.name),
            })
            .collect::<Vec<_>>();

        format!(
            "public function {} ({}) {{",
            self.converter.un_camel_case(&method.name),
            arguments.join(", ")
        )
    }

    fn render_body(
        &self,
        class: &SourceClass,
        method: &MethodUnit,
        context: &mut RenderContext,
    ) -> TranspileResult<String> {
        let (body, overflows) = self.transpile_php(&method.body, &method.bindings)?;

        for overflow in overflows {
            if self.options.strict_nesting {
                return Err(TranspileError::render_with_context(
                    format!(
                        "collection literal nested deeper than {} levels: {}",
                        self.library.nesting_passes(),
                        overflow.line
                    ),
                    format!("{}.{}", class.name, method.name),
                ));
            }
            log::warn!(
                "{}: {}.{} nests a collection literal deeper than {} levels, left unconverted: {}",
                context.file,
                class.name,
                method.name,
                self.library.nesting_passes(),
                overflow.line
            );
            context.report(Diagnostic::nesting_bound_exceeded(overflow.line));
        }

        Ok(body)
    }

    fn assemble(
        &self,
        class: &SourceClass,
        methods: &[RenderedMethod],
        _context: &mut RenderContext,
    ) -> TranspileResult<String> {
        let body = assembler::php_methods_text(methods);
        let body = rename_method_calls(
            &body,
            &class.method_names(),
            r"this->",
            "this->",
            " ",
            &self.converter,
        )?;
        Ok(assembler::php_class(&class.name, &class.base_class, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::IdentifierRegistry;
    use transpile_core::{DiagnosticKind, ErrorHierarchy, Parameter};

    fn renderer(passes: usize, strict_nesting: bool) -> PhpRenderer {
        let library = RuleLibrary::new(&IdentifierRegistry::curated().unwrap(), &ErrorHierarchy::builtin(), passes)
            .unwrap();
        PhpRenderer::new(Arc::new(library), RenderOptions { strict_nesting }).unwrap()
    }

    fn nested_brackets(depth: usize) -> String {
        format!("        const x = {}1{};", "[ ".repeat(depth), " ]".repeat(depth))
    }

    fn method(body: String) -> (SourceClass, MethodUnit) {
        let unit = MethodUnit {
            name: "nested".to_string(),
            is_async: false,
            parameters: Vec::new(),
            body,
            bindings: vec!["x".to_string()],
        };
        let class = SourceClass {
            name: "foo".to_string(),
            base_class: "Exchange".to_string(),
            methods: vec![unit.clone()],
        };
        (class, unit)
    }

    #[test]
    fn test_signature_defaults() {
        let unit = MethodUnit {
            name: "fetchOrderBook".to_string(),
            is_async: true,
            parameters: vec![
                Parameter::new("symbol"),
                Parameter::with_default("limit", "undefined"),
                Parameter::with_default("params", "{}"),
            ],
            body: String::new(),
            bindings: Vec::new(),
        };
        assert_eq!(
            renderer(20, false).render_signature(&unit),
            "public function fetch_order_book ($symbol, $limit = null, $params = array ()) {"
        );

        let bare = MethodUnit {
            name: "describe".to_string(),
            parameters: Vec::new(),
            ..unit
        };
        assert_eq!(renderer(20, false).render_signature(&bare), "public function describe () {");
    }

    #[test]
    fn test_nesting_within_bound_converts_fully() {
        let php = renderer(20, false);
        let (class, unit) = method(nested_brackets(20));
        let mut context = RenderContext::new("foo.js");

        let body = php.render_body(&class, &unit, &mut context).unwrap();

        assert!(!body.contains('['));
        assert!(body.starts_with("        $x = array ("));
        assert!(context.diagnostics.diagnostics().is_empty());
    }

    #[test]
    fn test_nesting_past_bound_is_reported() {
        let php = renderer(20, false);
        let (class, unit) = method(nested_brackets(21));
        let mut context = RenderContext::new("foo.js");

        let body = php.render_body(&class, &unit, &mut context).unwrap();

        assert!(body.contains('['));
        let diagnostics = context.diagnostics.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0].kind, DiagnosticKind::NestingBoundExceeded { .. }));
        assert_eq!(diagnostics[0].file.as_deref(), Some("foo.js"));
    }

    #[test]
    fn test_strict_nesting_fails_the_file() {
        let php = renderer(3, true);
        let (class, unit) = method(nested_brackets(4));
        let mut context = RenderContext::new("foo.js");

        let error = php.render_body(&class, &unit, &mut context).unwrap_err();
        match error {
            TranspileError::Render { context, .. } => assert_eq!(context.as_deref(), Some("foo.nested")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_placeholders_do_not_trip_nesting_check() {
        let php = renderer(20, false);
        let (body, overflows) = php
            .transpile_php("        const url = '/order/{id}';", &["url".to_string()])
            .unwrap();
        assert_eq!(body, "        $url = '/order/{id}';");
        assert!(overflows.is_empty());
    }

    #[test]
    fn test_overflow_lines_come_from_leftover_collection_literals() {
        let php = renderer(3, false);

        let (body, overflows) = php.transpile_php(&nested_brackets(4), &["x".to_string()]).unwrap();
        assert_eq!(overflows.len(), 1);
        assert!(overflows[0].line.starts_with("$x = array ("));
        assert!(overflows[0].line.contains('['));
        assert_eq!(overflows[0].line, body.trim());

        let (_, overflows) = php.transpile_php(&nested_brackets(3), &["x".to_string()]).unwrap();
        assert!(overflows.is_empty());
    }
}
