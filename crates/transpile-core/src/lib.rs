//! Core types, errors and symbol registries shared by the transpiler crates

pub mod types;
pub mod error;
pub mod diagnostics;
pub mod symbols;

pub use types::{MethodUnit, Parameter, RenderedArtifact, SourceClass, Target};
pub use error::*;
pub use diagnostics::*;
pub use symbols::{ErrorClass, ErrorHierarchy, BUILTIN_EXCEPTIONS, PRECISION_CONSTANTS, STDLIB_MODULES};
