//! Canonical exchange class → Python and PHP transpilation
//!
//! This crate provides the rule catalogs, the structural decomposer, the
//! per-target renderers and the batch pipeline that turns a directory of
//! canonical class files into generated Python 3, Python 2 and PHP sources.

pub mod assembler;
pub mod catalogs;
pub mod class_registry;
pub mod config;
pub mod decomposer;
pub mod files;
pub mod fixtures;
pub mod identifiers;
pub mod inclusion;
pub mod inference;
pub mod pipeline;
pub mod pruner;
pub mod renderer;
pub mod rules;
pub mod sync_driver;

pub use catalogs::{RuleLibrary, COLLECTION_NESTING_PASSES};
pub use class_registry::ClassRegistry;
pub use config::*;
pub use decomposer::StructuralDecomposer;
pub use identifiers::{CaseConverter, IdentifierRegistry};
pub use inclusion::InclusionList;
pub use inference::{DependencyInferencer, ImportSet};
pub use pipeline::*;
pub use pruner::{PruneTarget, StalePruner};
pub use renderer::{MethodRenderer, PhpRenderer, PythonRenderer, RenderContext, RenderOptions, TargetRenderer};
pub use rules::{Rule, RuleCatalog};
pub use sync_driver::SyncDriverDeriver;

#[cfg(test)]
mod tests;
