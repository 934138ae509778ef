//! Non-fatal diagnostics collected during a batch
//!
//! Missing error-hierarchy entries, stale artifacts that were pruned, and
//! collection literals nested past the rewrite bound are all reported here
//! rather than failing the run.

use std::fmt;
use std::path::PathBuf;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warning,
    Info,
}

/// What kind of condition a diagnostic describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An exception class is referenced but has no hierarchy entry, so no import is emitted
    MissingRegistryEntry { class_name: String },
    /// A generated file had no matching source and was deleted
    StaleArtifact { path: PathBuf },
    /// A collection literal was still unconverted after the bounded rewrite passes
    NestingBoundExceeded { line: String },
}

/// Diagnostic information for a non-fatal condition
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub kind: DiagnosticKind,
    pub file: Option<String>,
}

impl Diagnostic {
    pub fn missing_registry_entry<S: Into<String>>(class_name: S) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            kind: DiagnosticKind::MissingRegistryEntry {
                class_name: class_name.into(),
            },
            file: None,
        }
    }

    pub fn stale_artifact<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            kind: DiagnosticKind::StaleArtifact { path: path.into() },
            file: None,
        }
    }

    pub fn nesting_bound_exceeded<S: Into<String>>(line: S) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            kind: DiagnosticKind::NestingBoundExceeded { line: line.into() },
            file: None,
        }
    }

    /// Attach the source file the diagnostic belongs to
    pub fn in_file<S: Into<String>>(mut self, file: S) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.level == DiagnosticLevel::Warning
    }
}

/// Diagnostic collector for gathering batch issues
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_warning)
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Info => write!(f, "info"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.level)?;
        match &self.kind {
            DiagnosticKind::MissingRegistryEntry { class_name } => {
                write!(f, "exception class {} has no hierarchy entry, no import emitted", class_name)?
            }
            DiagnosticKind::StaleArtifact { path } => {
                write!(f, "deleted stale artifact {}", path.display())?
            }
            DiagnosticKind::NestingBoundExceeded { line } => {
                write!(f, "collection literal nested past the rewrite bound: {}", line.trim())?
            }
        }

        if let Some(file) = &self.file {
            write!(f, " [{}]", file)?;
        }

        Ok(())
    }
}
