//! Splits a canonical class file into its header and method units

use regex::Regex;
use transpile_core::{MethodUnit, Parameter, SourceClass, TranspileError, TranspileResult};

/// Regex-driven decomposer for `module.exports = class X extends Y { ... }` files
pub struct StructuralDecomposer {
    class_regex: Regex,
    block_separator: Regex,
    signature_regex: Regex,
    local_regex: Regex,
    catch_regex: Regex,
    identifier_regex: Regex,
}

impl StructuralDecomposer {
    pub fn new() -> TranspileResult<Self> {
        Ok(Self {
            class_regex: Regex::new(
                r"(?m)^module\.exports\s*=\s*class\s+(\S+)\s+extends\s+(\S+)\s+\{([\s\S]+?)^\};*",
            )?,
            block_separator: Regex::new(r"\n\s*\n")?,
            signature_regex: Regex::new(r"^(async )?(\S+)\s\(([^)]*)\)\s*\{")?,
            local_regex: Regex::new(
                r"(?:^|[^a-zA-Z0-9_])(?:let|const|var)\s+(?:\[([^\]]+)\]|\{([^}]+)\}|([a-zA-Z0-9_]+))",
            )?,
            catch_regex: Regex::new(r"catch \(([^)]+)\)")?,
            identifier_regex: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$")?,
        })
    }

    /// Decompose one file. `file` only names the source in errors.
    pub fn decompose(&self, file: &str, contents: &str) -> TranspileResult<SourceClass> {
        let captures = self.class_regex.captures(contents).ok_or_else(|| {
            TranspileError::format(
                file,
                "no `module.exports = class <Name> extends <Base> {` header found",
            )
        })?;

        let name = captures[1].to_string();
        let base_class = captures[2].to_string();
        let body = captures[3].trim();

        let mut methods = Vec::new();
        for block in self.block_separator.split(body) {
            let method = self.parse_method(file, block.trim())?;
            log::trace!("{}: method {} ({} bindings)", file, method.name, method.bindings.len());
            methods.push(method);
        }

        log::debug!("Decomposed {} into {} extends {} with {} methods", file, name, base_class, methods.len());

        Ok(SourceClass {
            name,
            base_class,
            methods,
        })
    }

    fn parse_method(&self, file: &str, block: &str) -> TranspileResult<MethodUnit> {
        let lines: Vec<&str> = block.lines().collect();
        let signature = lines.first().map(|line| line.trim()).unwrap_or_default();

        let captures = self.signature_regex.captures(signature).ok_or_else(|| {
            TranspileError::format_in_method(
                file,
                "method block does not start with `[async ]name (args) {`; methods must not contain empty lines",
                signature,
            )
        })?;

        let is_async = captures.get(1).is_some();
        let name = captures[2].to_string();
        let parameters = self.parse_parameters(&captures[3]);

        let body = if lines.len() > 2 {
            lines[1..lines.len() - 1].join("\n")
        } else {
            String::new()
        };

        let bindings = self.collect_bindings(&parameters, &body);

        Ok(MethodUnit {
            name,
            is_async,
            parameters,
            body,
            bindings,
        })
    }

    fn parse_parameters(&self, args: &str) -> Vec<Parameter> {
        let args = args.trim();
        if args.is_empty() {
            return Vec::new();
        }

        args.split(',')
            .map(|arg| match arg.split_once('=') {
                Some((name, default)) => Parameter::with_default(name.trim(), default.trim()),
                None => Parameter::new(arg.trim()),
            })
            .collect()
    }

    /// Parameters, then locals in order of appearance, then catch bindings
    pub fn collect_bindings(&self, parameters: &[Parameter], body: &str) -> Vec<String> {
        let mut bindings: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            let name = name.trim();
            if self.identifier_regex.is_match(name) && !bindings.iter().any(|b| b == name) {
                bindings.push(name.to_string());
            }
        };

        for parameter in parameters {
            push(&parameter.name);
        }

        for captures in self.local_regex.captures_iter(body) {
            if let Some(destructured) = captures.get(1).or_else(|| captures.get(2)) {
                for part in destructured.as_str().split(',') {
                    push(part);
                }
            } else if let Some(single) = captures.get(3) {
                push(single.as_str());
            }
        }

        for captures in self.catch_regex.captures_iter(body) {
            push(&captures[1]);
        }

        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "'use strict';

const Exchange = require ('./base/Exchange');

module.exports = class foo extends Exchange {
    describe () {
        return this.deepExtend (super.describe (), {
            'id': 'foo',
        });
    }

    async fetchOrderBook (symbol, limit = undefined, params = {}) {
        await this.loadMarkets ();
        const [ base, quote ] = symbol.split ('/');
        let { id, side } = params;
        try {
            const response = await this.publicGetDepth (params);
        } catch (e) {
            throw e;
        }
    }
};
";

    #[test]
    fn test_header_and_method_order() {
        let decomposer = StructuralDecomposer::new().unwrap();
        let class = decomposer.decompose("foo.js", SOURCE).unwrap();

        assert_eq!(class.name, "foo");
        assert_eq!(class.base_class, "Exchange");
        assert_eq!(class.method_names(), vec!["describe", "fetchOrderBook"]);
        assert!(!class.methods[0].is_async);
        assert!(class.methods[1].is_async);
    }

    #[test]
    fn test_parameters_keep_defaults() {
        let decomposer = StructuralDecomposer::new().unwrap();
        let class = decomposer.decompose("foo.js", SOURCE).unwrap();
        let method = &class.methods[1];

        assert_eq!(
            method.parameters,
            vec![
                Parameter::new("symbol"),
                Parameter::with_default("limit", "undefined"),
                Parameter::with_default("params", "{}"),
            ]
        );
    }

    #[test]
    fn test_body_excludes_signature_and_closing_line() {
        let decomposer = StructuralDecomposer::new().unwrap();
        let class = decomposer.decompose("foo.js", SOURCE).unwrap();
        let body = &class.methods[0].body;

        assert!(body.starts_with("        return this.deepExtend"));
        assert!(body.ends_with("        });"));
    }

    #[test]
    fn test_bindings_cover_locals_destructuring_and_catch() {
        let decomposer = StructuralDecomposer::new().unwrap();
        let class = decomposer.decompose("foo.js", SOURCE).unwrap();

        assert_eq!(
            class.methods[1].bindings,
            vec!["symbol", "limit", "params", "base", "quote", "id", "side", "response", "e"]
        );
    }

    #[test]
    fn test_missing_header_is_format_error() {
        let decomposer = StructuralDecomposer::new().unwrap();
        let error = decomposer.decompose("broken.js", "class foo {}\n").unwrap_err();

        assert!(error.is_format_error());
        assert_eq!(error.source_file(), Some("broken.js"));
    }

    #[test]
    fn test_empty_line_inside_method_is_fatal() {
        let source = "module.exports = class foo extends Exchange {
    sign (path) {
        const url = path;

        return url;
    }
};
";
        let decomposer = StructuralDecomposer::new().unwrap();
        let error = decomposer.decompose("foo.js", source).unwrap_err();

        match error {
            TranspileError::Format { file, method, .. } => {
                assert_eq!(file, "foo.js");
                assert_eq!(method.as_deref(), Some("return url;"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
