//! Data model shared by the decomposer, the renderers and the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Output ecosystem (and generation) an artifact is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Dynamic target with native concurrency syntax
    Python3,
    /// Dynamic target with concurrency keywords stripped
    Python2,
    /// Sigil-based target
    Php,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Python2, Target::Python3, Target::Php];

    pub fn id(&self) -> &'static str {
        match self {
            Target::Python3 => "python3",
            Target::Python2 => "python2",
            Target::Php => "php",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Target::Python3 | Target::Python2 => "py",
            Target::Php => "php",
        }
    }

    pub fn is_python(&self) -> bool {
        matches!(self, Target::Python3 | Target::Python2)
    }

    /// Whether the target keeps `async`/`await`
    pub fn is_async(&self) -> bool {
        matches!(self, Target::Python3)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One formal parameter of a method signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Default value exactly as written in the canonical source
    pub default: Option<String>,
}

impl Parameter {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default<S: Into<String>, D: Into<String>>(name: S, default: D) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// A single method of a canonical class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodUnit {
    pub name: String,
    pub is_async: bool,
    pub parameters: Vec<Parameter>,
    /// Lines between the signature line and the closing brace line
    pub body: String,
    /// Parameters, locals (destructured ones included) and catch bindings,
    /// in discovery order, without duplicates
    pub bindings: Vec<String>,
}

impl MethodUnit {
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }
}

/// A canonical class split into its header and methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceClass {
    pub name: String,
    pub base_class: String,
    pub methods: Vec<MethodUnit>,
}

impl SourceClass {
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }
}

/// One generated file for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub target: Target,
    pub path: PathBuf,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_extensions() {
        assert_eq!(Target::Python2.extension(), "py");
        assert_eq!(Target::Python3.extension(), "py");
        assert_eq!(Target::Php.extension(), "php");
        assert!(Target::Python3.is_async());
        assert!(!Target::Python2.is_async());
        assert!(!Target::Php.is_python());
    }

    #[test]
    fn test_target_serde_names() {
        let json = serde_json::to_string(&Target::Python3).unwrap();
        assert_eq!(json, "\"python3\"");
        let parsed: Target = serde_json::from_str("\"php\"").unwrap();
        assert_eq!(parsed, Target::Php);
    }
}
