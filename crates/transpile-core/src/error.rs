//! Error handling for the transpiler
//!
//! Fatal conditions are [`TranspileError`] values and abort the current file
//! (and with it the rest of the batch). Non-fatal conditions are reported as
//! [`crate::diagnostics::Diagnostic`] values instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for transpiler operations
#[derive(Error, Debug)]
pub enum TranspileError {
    /// Source text violates the expected class or method grammar
    #[error("Format error in {file}: {message}")]
    Format {
        file: String,
        message: String,
        method: Option<String>,
    },

    /// A rewrite rule could not be compiled
    #[error("Rule error: {message}")]
    Rule {
        message: String,
        pattern: Option<String>,
    },

    /// A rendering step did not find the shape it expects
    #[error("Rendering error{}{}: {message}", location(.file, " in "), location(.context, " at "))]
    Render {
        message: String,
        context: Option<String>,
        file: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// I/O errors tied to a specific path
    #[error("I/O error on {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl TranspileError {
    /// Create a format error for a source file
    pub fn format<F: Into<String>, S: Into<String>>(file: F, message: S) -> Self {
        Self::Format {
            file: file.into(),
            message: message.into(),
            method: None,
        }
    }

    /// Create a format error pointing at one method block
    pub fn format_in_method<F: Into<String>, S: Into<String>, M: Into<String>>(
        file: F,
        message: S,
        method: M,
    ) -> Self {
        Self::Format {
            file: file.into(),
            message: message.into(),
            method: Some(method.into()),
        }
    }

    /// Create a rule compilation error
    pub fn rule<P: Into<String>, S: Into<String>>(pattern: P, message: S) -> Self {
        Self::Rule {
            message: message.into(),
            pattern: Some(pattern.into()),
        }
    }

    /// Create a rendering error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
            context: None,
            file: None,
        }
    }

    /// Create a rendering error with context
    pub fn render_with_context<S: Into<String>, C: Into<String>>(message: S, context: C) -> Self {
        Self::Render {
            message: message.into(),
            context: Some(context.into()),
            file: None,
        }
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
        }
    }

    /// Create a configuration error with field information
    pub fn configuration_with_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn file_access<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Attach the source file being transpiled when the error does not name one yet
    pub fn in_file<F: Into<String>>(self, source: F) -> Self {
        match self {
            Self::Render {
                message,
                context,
                file: None,
            } => Self::Render {
                message,
                context,
                file: Some(source.into()),
            },
            other => other,
        }
    }

    /// Whether this error stems from malformed source text
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// The source file named by the error, if any
    pub fn source_file(&self) -> Option<&str> {
        match self {
            Self::Format { file, .. } => Some(file.as_str()),
            Self::Render { file, .. } => file.as_deref(),
            _ => None,
        }
    }
}

fn location(value: &Option<String>, prefix: &str) -> String {
    value
        .as_deref()
        .map(|value| format!("{}{}", prefix, value))
        .unwrap_or_default()
}

/// Result type for transpiler operations
pub type TranspileResult<T> = Result<T, TranspileError>;
