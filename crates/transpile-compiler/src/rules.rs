//! Ordered rewrite rules and the catalogs that replay them
//!
//! A [`Rule`] is a regex and a replacement template. Every rule substitutes
//! globally and without overlap over the whole accumulated text, so a rule
//! always sees what the rules before it produced. Catalogs are immutable once
//! built and are composed by plain concatenation.

use regex::Regex;
use transpile_core::{TranspileError, TranspileResult};

/// A single pattern → template substitution
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    /// Compile a rule. Templates use `${n}` for groups and `$$` for a literal dollar.
    pub fn new(pattern: &str, replacement: &str) -> TranspileResult<Self> {
        let compiled = Regex::new(pattern).map_err(|e| TranspileError::rule(pattern, e.to_string()))?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Spans the rule would rewrite
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> regex::Matches<'r, 't> {
        self.pattern.find_iter(text)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// A named, ordered list of rules
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    name: String,
    rules: Vec<Rule>,
}

impl RuleCatalog {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn from_rules<S: Into<String>>(name: S, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Compile a table of `(pattern, replacement)` pairs in order
    pub fn from_table<S: Into<String>>(name: S, table: &[(&str, &str)]) -> TranspileResult<Self> {
        let rules = table
            .iter()
            .map(|(pattern, replacement)| Rule::new(pattern, replacement))
            .collect::<TranspileResult<Vec<_>>>()?;
        Ok(Self::from_rules(name, rules))
    }

    /// The same rule replayed `times` times, to reach one more level of nesting per pass
    pub fn repeated<S: Into<String>>(
        name: S,
        pattern: &str,
        replacement: &str,
        times: usize,
    ) -> TranspileResult<Self> {
        let rule = Rule::new(pattern, replacement)?;
        Ok(Self::from_rules(name, vec![rule; times]))
    }

    /// Concatenate catalogs in the given order under a new name
    pub fn compose<S: Into<String>>(name: S, parts: &[&RuleCatalog]) -> Self {
        let rules = parts
            .iter()
            .flat_map(|part| part.rules.iter().cloned())
            .collect();
        Self::from_rules(name, rules)
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Replay every rule in order over the text
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Indices of rules whose pattern still matches `text`.
    ///
    /// Replaying the catalog over its own output only changes text at these
    /// rules; an empty result means the output is a fixpoint.
    pub fn residual_matches(&self, text: &str) -> Vec<usize> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.is_match(text))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
