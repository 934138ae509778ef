//! Deletes generated files whose class is no longer part of the batch

use crate::class_registry::ClassRegistry;
use crate::files;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use transpile_core::{Diagnostic, TranspileError, TranspileResult};

/// File names never pruned: base classes, error definitions, package init files, hidden files
pub const DEFAULT_EXCLUSIONS: &[&str] = &[r"^Exchange", "errors", "__init__", r"^\."];

/// One output directory and the file names it holds generated artifacts under
#[derive(Debug, Clone)]
pub struct PruneTarget {
    pub directory: PathBuf,
    pub extension: Regex,
}

impl PruneTarget {
    pub fn python<P: Into<PathBuf>>(directory: P) -> TranspileResult<Self> {
        Ok(Self {
            directory: directory.into(),
            extension: Regex::new(r"\.pyc?$")?,
        })
    }

    pub fn php<P: Into<PathBuf>>(directory: P) -> TranspileResult<Self> {
        Ok(Self {
            directory: directory.into(),
            extension: Regex::new(r"\.php$")?,
        })
    }
}

pub struct StalePruner {
    exclusions: Option<Regex>,
    base_name: Regex,
}

impl StalePruner {
    pub fn new<S: AsRef<str>>(exclusions: &[S]) -> TranspileResult<Self> {
        let alternation = exclusions
            .iter()
            .map(|pattern| format!("(?:{})", pattern.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let exclusions = if alternation.is_empty() {
            None
        } else {
            Some(Regex::new(&alternation).map_err(|e| {
                TranspileError::configuration_with_field(
                    format!("invalid prune exclusion pattern: {}", e),
                    "prune_exclusions",
                )
            })?)
        };

        Ok(Self {
            exclusions,
            base_name: Regex::new(r"\.[a-z]+$")?,
        })
    }

    /// Files in the target directory that would be deleted for this class set
    pub fn stale_files(&self, target: &PruneTarget, classes: &ClassRegistry) -> TranspileResult<Vec<PathBuf>> {
        if !target.directory.is_dir() {
            return Ok(Vec::new());
        }

        let stale = files::list_files(&target.directory)?
            .into_iter()
            .filter(|path| {
                let name = file_name(path);
                target.extension.is_match(&name)
                    && !classes.contains(&self.base_name.replace(&name, ""))
                    && !self.is_protected(&name)
            })
            .collect();
        Ok(stale)
    }

    pub fn is_protected(&self, file_name: &str) -> bool {
        self.exclusions
            .as_ref()
            .map_or(false, |exclusions| exclusions.is_match(file_name))
    }

    /// Delete the stale files of every target, one diagnostic per deletion
    pub fn prune(&self, targets: &[PruneTarget], classes: &ClassRegistry) -> TranspileResult<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        for target in targets {
            for path in self.stale_files(target, classes)? {
                log::info!("Deleting {}", path.display());
                fs::remove_file(&path).map_err(|e| TranspileError::file_access(&path, e))?;
                diagnostics.push(Diagnostic::stale_artifact(path));
            }
        }
        Ok(diagnostics)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
