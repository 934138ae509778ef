//! Tests for rendering whole classes

#[cfg(test)]
mod tests {
    use crate::catalogs::RuleLibrary;
    use crate::decomposer::StructuralDecomposer;
    use crate::inference::DependencyInferencer;
    use crate::renderer::{MethodRenderer, RenderContext, RenderOptions};
    use regex::Regex;
    use std::sync::Arc;
    use transpile_core::{DiagnosticKind, ErrorHierarchy, SourceClass, Target};

    const FOO: &str = "'use strict';

//  ---------------------------------------------------------------------------

const Bar = require ('./bar.js');
const { ExchangeError, ArgumentsRequired } = require ('./base/errors');

//  ---------------------------------------------------------------------------

module.exports = class Foo extends Bar {
    describe () {
        return this.deepExtend (super.describe (), {
            'id': 'foo',
            'has': {
                'fetchOrderBook': true,
            },
        });
    }

    async fetchOrderBook (symbol, limit = undefined) {
        const response = await this.publicGetDepth (symbol);
        return this.safeInteger (response, 'id');
    }

    async fetchOrder (id, symbol = undefined, params = {}) {
        if (symbol === undefined) {
            throw new ArgumentsRequired (this.id + ' fetchOrder requires a symbol');
        }
        const book = await this.fetchOrderBook (symbol);
        const digest = this.hash (this.encode (id), 'sha256');
        return this.extend (book, { 'digest': digest });
    }
};
";

    fn decompose(source: &str) -> SourceClass {
        StructuralDecomposer::new().unwrap().decompose("foo.js", source).unwrap()
    }

    fn render_all(source: &str) -> (Vec<(Target, String)>, RenderContext) {
        let hierarchy = ErrorHierarchy::builtin();
        let library = Arc::new(RuleLibrary::standard().unwrap());
        let inferencer = Arc::new(DependencyInferencer::new(&hierarchy).unwrap());
        let renderer =
            MethodRenderer::for_targets(&Target::ALL, library, inferencer, RenderOptions::default()).unwrap();

        let mut context = RenderContext::new("foo.js");
        let outputs = renderer.render_class(&decompose(source), &mut context).unwrap();
        (outputs, context)
    }

    fn text_for(outputs: &[(Target, String)], target: Target) -> &str {
        outputs
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, text)| text.as_str())
            .unwrap()
    }

    #[test]
    fn test_renders_every_target_in_order() {
        let (outputs, _) = render_all(FOO);
        let targets: Vec<_> = outputs.iter().map(|(t, _)| *t).collect();
        assert_eq!(targets, vec![Target::Python2, Target::Python3, Target::Php]);
    }

    #[test]
    fn test_scenario_signatures_and_calls() {
        let (outputs, _) = render_all(FOO);

        let php = text_for(&outputs, Target::Php);
        assert!(php.contains("    public function fetch_order_book ($symbol, $limit = null) {\n"));
        assert!(php.contains("return $this->safe_integer ($response, 'id');"));
        assert!(php.contains("$response = $this->publicGetDepth ($symbol);"));

        let python3 = text_for(&outputs, Target::Python3);
        assert!(python3.contains("    async def fetch_order_book(self, symbol, limit=None):\n"));
        assert!(python3.contains("        return self.safe_integer(response, 'id')"));

        let python2 = text_for(&outputs, Target::Python2);
        assert!(python2.contains("    def fetch_order_book(self, symbol, limit=None):\n"));
        assert!(python2.contains("        response = self.publicGetDepth(symbol)\n"));
    }

    #[test]
    fn test_signature_round_trip() {
        let class = decompose(FOO);
        let (outputs, _) = render_all(FOO);

        let python_signature = Regex::new(r"(?m)^    (?:async )?def \w+\(self(?:, (.*))?\):$").unwrap();
        let php_signature = Regex::new(r"(?m)^    public function \w+ \((.*)\) \{$").unwrap();

        let expected = |to_target: &dyn Fn(&str) -> String| -> Vec<Vec<(String, Option<String>)>> {
            class
                .methods
                .iter()
                .map(|m| {
                    m.parameters
                        .iter()
                        .map(|p| (p.name.clone(), p.default.as_deref().map(to_target)))
                        .collect()
                })
                .collect()
        };

        let python_defaults = |d: &str| d.replace("undefined", "None");
        let recovered_python: Vec<Vec<(String, Option<String>)>> = python_signature
            .captures_iter(text_for(&outputs, Target::Python2))
            .map(|caps| {
                caps.get(1)
                    .map(|args| {
                        args.as_str()
                            .split(", ")
                            .map(|arg| match arg.split_once('=') {
                                Some((name, default)) => (name.to_string(), Some(default.to_string())),
                                None => (arg.to_string(), None),
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();
        assert_eq!(recovered_python, expected(&python_defaults));

        let php_defaults = |d: &str| d.replace("undefined", "null").replace("{}", "array ()");
        let recovered_php: Vec<Vec<(String, Option<String>)>> = php_signature
            .captures_iter(text_for(&outputs, Target::Php))
            .map(|caps| {
                let args = &caps[1];
                if args.is_empty() {
                    return Vec::new();
                }
                args.split(", ")
                    .map(|arg| {
                        let arg = arg.trim_start_matches('$');
                        match arg.split_once(" = ") {
                            Some((name, default)) => (name.to_string(), Some(default.to_string())),
                            None => (arg.to_string(), None),
                        }
                    })
                    .collect()
            })
            .collect();
        assert_eq!(recovered_php, expected(&php_defaults));
    }

    #[test]
    fn test_method_order_is_preserved() {
        let (outputs, _) = render_all(FOO);
        let python_names = Regex::new(r"(?m)^    (?:async )?def (\w+)\(").unwrap();
        let php_names = Regex::new(r"(?m)^    public function (\w+) \(").unwrap();
        let expected = vec!["describe", "fetch_order_book", "fetch_order"];

        for (target, text) in &outputs {
            let pattern = if target.is_python() { &python_names } else { &php_names };
            let names: Vec<_> = pattern.captures_iter(text).map(|c| c[1].to_string()).collect();
            assert_eq!(names, expected, "method order for {}", target);
        }
    }

    #[test]
    fn test_registry_and_own_methods_are_renamed_everywhere() {
        let (outputs, _) = render_all(FOO);
        for (target, text) in &outputs {
            assert!(!text.contains("safeInteger"), "{} kept safeInteger", target);
            assert!(!text.contains("deepExtend"), "{} kept deepExtend", target);
            assert!(!text.contains("fetchOrderBook ("), "{} kept a fetchOrderBook call", target);
        }

        let python3 = text_for(&outputs, Target::Python3);
        assert!(python3.contains("book = await self.fetch_order_book(symbol)"));
        assert!(python3.contains("return self.deep_extend(super(Foo, self).describe(), {"));
        assert!(python3.contains("'fetchOrderBook': True,"));

        let php = text_for(&outputs, Target::Php);
        assert!(php.contains("$book = $this->fetch_order_book ($symbol);"));
        assert!(php.contains("return array_replace_recursive (parent::describe (), array ("));
    }

    #[test]
    fn test_python_imports_follow_usage() {
        let (outputs, context) = render_all(FOO);
        let python3 = text_for(&outputs, Target::Python3);

        assert!(python3.contains("from ccxt.async_support.Bar import Bar\n"));
        assert!(python3.contains("from ccxt.base.errors import ArgumentsRequired\n"));
        assert!(!python3.contains("import ExchangeError"));
        assert!(!python3.contains("import hashlib"));
        assert!(!python3.contains("basestring"));
        assert!(context.diagnostics.diagnostics().is_empty());

        let python2 = text_for(&outputs, Target::Python2);
        assert!(python2.contains("from ccxt.Bar import Bar\n"));
    }

    #[test]
    fn test_generation_parity() {
        let (outputs, _) = render_all(FOO);
        let python3 = text_for(&outputs, Target::Python3);
        let python2 = text_for(&outputs, Target::Python2);

        let derived = python3
            .replace("ccxt.async_support.", "ccxt.")
            .replace("async def ", "def ")
            .replace(" await ", " ");
        assert_eq!(derived, python2);
    }

    #[test]
    fn test_unknown_raised_error_reported_once_per_file() {
        let source = "module.exports = class foo extends Exchange {
    sign (path) {
        throw new MysteryError (path);
    }
};
";
        let (outputs, context) = render_all(source);
        let diagnostics = context.diagnostics.diagnostics();

        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0].kind,
            DiagnosticKind::MissingRegistryEntry { class_name } if class_name == "MysteryError"
        ));
        assert!(!text_for(&outputs, Target::Python3).contains("import MysteryError"));
    }

    #[test]
    fn test_empty_line_in_any_method_fails_the_class() {
        let source = "module.exports = class foo extends Exchange {
    describe () {
        return {};
    }

    sign (path) {
        const url = path;

        return url;
    }
};
";
        let result = StructuralDecomposer::new().unwrap().decompose("foo.js", source);
        assert!(result.unwrap_err().is_format_error());
    }
}
