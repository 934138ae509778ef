//! Named rule catalogs for every target, built once per run

pub mod common;
pub mod php;
pub mod python;

use crate::identifiers::IdentifierRegistry;
use crate::rules::RuleCatalog;
use transpile_core::{ErrorHierarchy, TranspileError, TranspileResult};

/// Number of times each bracket-restructuring rule is replayed; one nesting level per pass
pub const COLLECTION_NESTING_PASSES: usize = 20;

/// All catalogs a run needs, composed at construction and immutable afterwards
#[derive(Debug, Clone)]
pub struct RuleLibrary {
    common: RuleCatalog,
    python3: RuleCatalog,
    python2: RuleCatalog,
    php: RuleCatalog,
    php_restore: RuleCatalog,
    nesting_passes: usize,
}

impl RuleLibrary {
    pub fn new(
        registry: &IdentifierRegistry,
        hierarchy: &ErrorHierarchy,
        nesting_passes: usize,
    ) -> TranspileResult<Self> {
        if nesting_passes == 0 {
            return Err(TranspileError::configuration_with_field(
                "nesting passes must be at least 1",
                "nesting_passes",
            ));
        }

        let common = common::common_catalog(registry)?;
        let python3 = python::python3_catalog(&common)?;
        let python2 = python::python2_catalog()?;
        let php = php::php_catalog(&common, hierarchy, nesting_passes)?;
        let php_restore = php::placeholder_restore()?;

        log::debug!(
            "Rule library ready: common={} python3={} python2={} php={} rules",
            common.len(),
            python3.len(),
            python2.len(),
            php.len()
        );

        Ok(Self {
            common,
            python3,
            python2,
            php,
            php_restore,
            nesting_passes,
        })
    }

    /// Library with the curated registry, the built-in hierarchy and the default bound
    pub fn standard() -> TranspileResult<Self> {
        Self::new(
            &IdentifierRegistry::curated()?,
            &ErrorHierarchy::builtin(),
            COLLECTION_NESTING_PASSES,
        )
    }

    pub fn common(&self) -> &RuleCatalog {
        &self.common
    }

    pub fn python3(&self) -> &RuleCatalog {
        &self.python3
    }

    pub fn python2(&self) -> &RuleCatalog {
        &self.python2
    }

    pub fn php(&self) -> &RuleCatalog {
        &self.php
    }

    pub fn php_restore(&self) -> &RuleCatalog {
        &self.php_restore
    }

    pub fn nesting_passes(&self) -> usize {
        self.nesting_passes
    }
}
