//! The newline-delimited list of class ids a run is restricted to

use crate::files;
use std::path::Path;
use transpile_core::TranspileResult;

/// Ids from the inclusion list. An empty list includes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionList {
    ids: Vec<String>,
}

impl InclusionList {
    /// A list that includes every discovered class
    pub fn all() -> Self {
        Self::default()
    }

    /// Each line is cut at its first `#` and trimmed; blank lines are dropped
    pub fn parse(text: &str) -> Self {
        let ids = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        Self { ids }
    }

    /// Read the list; a missing file includes everything
    pub fn from_file(path: &Path) -> TranspileResult<Self> {
        if !path.exists() {
            log::debug!("No inclusion list at {}, including every class", path.display());
            return Ok(Self::all());
        }
        let list = Self::parse(&files::read_file(path)?);
        log::debug!("Inclusion list {} names {} ids", path.display(), list.ids.len());
        Ok(list)
    }

    pub fn is_included(&self, id: &str) -> bool {
        self.ids.is_empty() || self.ids.iter().any(|included| included == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
