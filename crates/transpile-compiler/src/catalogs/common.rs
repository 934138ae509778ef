//! Cross-target rules, spliced into the middle of every target catalog

use crate::identifiers::IdentifierRegistry;
use crate::rules::RuleCatalog;
use transpile_core::TranspileResult;

const COMMON_TAIL: &[(&str, &str)] = &[
    (r"errorHierarchy", "error_hierarchy"),
    (r"'use strict';?\s+", ""),
];

/// Curated call-site renames followed by the shared clean-ups
pub fn common_catalog(registry: &IdentifierRegistry) -> TranspileResult<RuleCatalog> {
    let renames = registry.call_site_rules()?;
    let tail = RuleCatalog::from_table("common-tail", COMMON_TAIL)?;
    Ok(RuleCatalog::compose("common", &[&renames, &tail]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_catalog_renames_and_cleans() {
        let registry = IdentifierRegistry::curated().unwrap();
        let catalog = common_catalog(&registry).unwrap();

        let text = "'use strict';\n\nconst x = this.safeString (errorHierarchy, 'a');";
        assert_eq!(catalog.apply(text), "const x = this.safe_string (error_hierarchy, 'a');");
    }
}
