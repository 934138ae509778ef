//! Fixed symbol registries consulted by the renderers and the import scan

use crate::error::{TranspileError, TranspileResult};
use serde_json::Value;

/// Rounding, counting and padding constants exported by the precision module
pub const PRECISION_CONSTANTS: &[&str] = &[
    "ROUND",
    "TRUNCATE",
    "ROUND_UP",
    "ROUND_DOWN",
    "DECIMAL_PLACES",
    "SIGNIFICANT_DIGITS",
    "TICK_SIZE",
    "NO_PADDING",
    "PAD_WITH_ZERO",
];

/// Standard-library modules the dynamic target may need to import
pub const STDLIB_MODULES: &[&str] = &["base64", "hashlib", "math", "json"];

/// Names that are always in scope in the dynamic target and never need an import
pub const BUILTIN_EXCEPTIONS: &[&str] = &[
    "Exception",
    "ValueError",
    "TypeError",
    "KeyError",
    "NameError",
    "NotImplementedError",
];

/// One entry of the exception hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClass {
    pub name: String,
    pub parent: Option<String>,
}

/// Exception class name → parent name, in declaration order (parents first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorHierarchy {
    classes: Vec<ErrorClass>,
}

impl ErrorHierarchy {
    /// The hierarchy shipped with the exchange library
    pub fn builtin() -> Self {
        const TREE: &[(&str, Option<&str>)] = &[
            ("BaseError", None),
            ("ExchangeError", Some("BaseError")),
            ("AuthenticationError", Some("ExchangeError")),
            ("PermissionDenied", Some("AuthenticationError")),
            ("AccountSuspended", Some("AuthenticationError")),
            ("ArgumentsRequired", Some("ExchangeError")),
            ("BadRequest", Some("ExchangeError")),
            ("BadSymbol", Some("BadRequest")),
            ("BadResponse", Some("ExchangeError")),
            ("NullResponse", Some("BadResponse")),
            ("InsufficientFunds", Some("ExchangeError")),
            ("InvalidAddress", Some("ExchangeError")),
            ("AddressPending", Some("InvalidAddress")),
            ("InvalidOrder", Some("ExchangeError")),
            ("OrderNotFound", Some("InvalidOrder")),
            ("OrderNotCached", Some("InvalidOrder")),
            ("CancelPending", Some("InvalidOrder")),
            ("OrderImmediatelyFillable", Some("InvalidOrder")),
            ("OrderNotFillable", Some("InvalidOrder")),
            ("DuplicateOrderId", Some("InvalidOrder")),
            ("NotSupported", Some("ExchangeError")),
            ("NetworkError", Some("BaseError")),
            ("DDoSProtection", Some("NetworkError")),
            ("RateLimitExceeded", Some("DDoSProtection")),
            ("ExchangeNotAvailable", Some("NetworkError")),
            ("OnMaintenance", Some("ExchangeNotAvailable")),
            ("InvalidNonce", Some("NetworkError")),
            ("RequestTimeout", Some("NetworkError")),
        ];

        Self::from_pairs(TREE.iter().copied())
    }

    /// Build from `(name, parent)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<S>)>,
        S: Into<String>,
    {
        Self {
            classes: pairs
                .into_iter()
                .map(|(name, parent)| ErrorClass {
                    name: name.into(),
                    parent: parent.map(Into::into),
                })
                .collect(),
        }
    }

    /// Parse the nested JSON form `{"BaseError": {"ExchangeError": {...}}}`.
    ///
    /// Siblings come out in key order of the parsed object.
    pub fn from_json(text: &str) -> TranspileResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let mut classes = Vec::new();
        Self::flatten(&value, None, &mut classes)?;
        Ok(Self { classes })
    }

    fn flatten(value: &Value, parent: Option<&str>, out: &mut Vec<ErrorClass>) -> TranspileResult<()> {
        let object = value.as_object().ok_or_else(|| {
            TranspileError::configuration_with_field(
                "error hierarchy entries must be JSON objects",
                parent.unwrap_or("<root>"),
            )
        })?;

        for (name, children) in object {
            out.push(ErrorClass {
                name: name.clone(),
                parent: parent.map(str::to_string),
            });
            Self::flatten(children, Some(name.as_str()), out)?;
        }

        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for ErrorHierarchy {
    fn default() -> Self {
        Self::builtin()
    }
}
