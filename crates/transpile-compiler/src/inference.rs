//! Import inference for the Python targets
//!
//! The rendered file text is scanned against the fixed registries; a symbol is
//! imported if and only if its name occurs outside a string literal delimiter
//! and as a whole word.

use regex::Regex;
use std::collections::BTreeSet;
use transpile_core::{ErrorHierarchy, TranspileResult, BUILTIN_EXCEPTIONS, PRECISION_CONSTANTS, STDLIB_MODULES};

/// The import preamble computed for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    pub stdlib: Vec<String>,
    pub errors: Vec<String>,
    pub precision: Vec<String>,
    /// Raised exception classes that have no hierarchy entry and therefore no import
    pub missing: Vec<String>,
}

impl ImportSet {
    /// Import statements in emission order: standard library, errors, precision constants
    pub fn python_lines(&self) -> Vec<String> {
        let stdlib = self.stdlib.iter().map(|m| format!("import {}", m));
        let errors = self
            .errors
            .iter()
            .map(|e| format!("from ccxt.base.errors import {}", e));
        let precision = self
            .precision
            .iter()
            .map(|c| format!("from ccxt.base.decimal_to_precision import {}", c));
        stdlib.chain(errors).chain(precision).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stdlib.is_empty() && self.errors.is_empty() && self.precision.is_empty()
    }
}

struct SymbolPattern {
    name: String,
    pattern: Regex,
}

impl SymbolPattern {
    fn module(name: &str) -> TranspileResult<Self> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(&format!(r#"(^|[^'"\w.]){}\."#, regex::escape(name)))?,
        })
    }

    fn word(name: &str) -> TranspileResult<Self> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(&format!(r#"(^|[^'"\w]){}([^'"\w]|$)"#, regex::escape(name)))?,
        })
    }
}

/// Scans rendered text against the standard-library, error and precision registries
pub struct DependencyInferencer {
    stdlib: Vec<SymbolPattern>,
    errors: Vec<SymbolPattern>,
    precision: Vec<SymbolPattern>,
    raised: Regex,
    hierarchy: ErrorHierarchy,
}

impl DependencyInferencer {
    pub fn new(hierarchy: &ErrorHierarchy) -> TranspileResult<Self> {
        let stdlib = STDLIB_MODULES
            .iter()
            .map(|m| SymbolPattern::module(m))
            .collect::<TranspileResult<Vec<_>>>()?;
        let errors = hierarchy
            .names()
            .map(SymbolPattern::word)
            .collect::<TranspileResult<Vec<_>>>()?;
        let precision = PRECISION_CONSTANTS
            .iter()
            .map(|c| SymbolPattern::word(c))
            .collect::<TranspileResult<Vec<_>>>()?;

        Ok(Self {
            stdlib,
            errors,
            precision,
            raised: Regex::new(r"raise ([A-Z][A-Za-z0-9_]*)")?,
            hierarchy: hierarchy.clone(),
        })
    }

    pub fn infer(&self, text: &str) -> ImportSet {
        let matching = |patterns: &[SymbolPattern]| -> Vec<String> {
            patterns
                .iter()
                .filter(|symbol| symbol.pattern.is_match(text))
                .map(|symbol| symbol.name.clone())
                .collect()
        };

        let missing: BTreeSet<String> = self
            .raised
            .captures_iter(text)
            .map(|captures| captures[1].to_string())
            .filter(|name| !self.hierarchy.contains(name) && !BUILTIN_EXCEPTIONS.contains(&name.as_str()))
            .collect();

        ImportSet {
            stdlib: matching(self.stdlib.as_slice()),
            errors: matching(self.errors.as_slice()),
            precision: matching(self.precision.as_slice()),
            missing: missing.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inferencer() -> DependencyInferencer {
        DependencyInferencer::new(&ErrorHierarchy::builtin()).unwrap()
    }

    #[test]
    fn test_imports_only_referenced_symbols() {
        let text = "        if x is None:\n            raise ArgumentsRequired(self.id + ' requires symbol')\n        digest = hashlib.sha256\n        return self.decimal_to_precision(x, ROUND, p, TICK_SIZE)";
        let imports = inferencer().infer(text);

        assert_eq!(imports.stdlib, vec!["hashlib"]);
        assert_eq!(imports.errors, vec!["ArgumentsRequired"]);
        assert_eq!(imports.precision, vec!["ROUND", "TICK_SIZE"]);
        assert!(imports.missing.is_empty());
    }

    #[test]
    fn test_quoted_and_partial_names_are_not_imported() {
        let text = "        name = 'ExchangeError'\n        mode = ROUND_UP\n        self.math_helper.json_value = 1";
        let imports = inferencer().infer(text);

        assert!(imports.errors.is_empty());
        assert_eq!(imports.precision, vec!["ROUND_UP"]);
        assert!(imports.stdlib.is_empty());
    }

    #[test]
    fn test_unknown_raised_class_is_reported() {
        let text = "        raise MysteryError(message)\n        raise ValueError('x')";
        let imports = inferencer().infer(text);

        assert_eq!(imports.missing, vec!["MysteryError"]);
        assert!(imports.errors.is_empty());
    }

    #[test]
    fn test_python_lines_order() {
        let imports = ImportSet {
            stdlib: vec!["math".into()],
            errors: vec!["ExchangeError".into()],
            precision: vec!["TRUNCATE".into()],
            missing: vec![],
        };
        assert_eq!(
            imports.python_lines(),
            vec![
                "import math",
                "from ccxt.base.errors import ExchangeError",
                "from ccxt.base.decimal_to_precision import TRUNCATE",
            ]
        );
    }
}
