//! Batch-wide record of transpiled classes and the type-declaration manifest

use crate::files;
use regex::Regex;
use std::path::Path;
use transpile_core::TranspileResult;

/// Contiguous run of declaration lines the manifest fragment replaces
const MANIFEST_REGION: &str = r"(?:    export class [^\s]+ extends [^\s]+ \{\}\r?\n)+";

/// className → baseClassName, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    classes: Vec<(String, String)>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a class. The registry only grows; a name seen twice keeps its first base.
    pub fn register<N: Into<String>, B: Into<String>>(&mut self, name: N, base_class: B) {
        let name = name.into();
        let base_class = base_class.into();
        match self.classes.iter().find(|(existing, _)| *existing == name) {
            Some((_, existing_base)) => {
                log::warn!(
                    "{} registered twice, keeping base {} over {}",
                    name,
                    existing_base,
                    base_class
                );
            }
            None => self.classes.push((name, base_class)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.iter().any(|(existing, _)| existing == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes.iter().map(|(name, base)| (name.as_str(), base.as_str()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// One `    export class N extends B {}` line per class, newline-terminated
    pub fn manifest_fragment(&self) -> String {
        let lines: Vec<String> = self
            .iter()
            .map(|(name, base)| format!("    export class {} extends {} {{}}", name, base))
            .collect();
        format!("{}\n", lines.join("\n"))
    }

    /// Splice the fragment into the manifest's declaration region.
    ///
    /// Returns `false` when the manifest has no declaration region.
    pub fn write_manifest(&self, path: &Path) -> TranspileResult<bool> {
        let region = Regex::new(MANIFEST_REGION)?;
        let replaced = files::replace_in_file(path, &region, &self.manifest_fragment())?;
        if replaced {
            log::info!("Exported {} class declarations to {}", self.len(), path.display());
        }
        Ok(replaced)
    }
}
