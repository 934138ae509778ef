//! Configuration structures for the transpilation pipeline
//!
//! Every path is relative to `root` unless it is absolute. The defaults
//! describe the conventional source tree, so an empty TOML file is valid.

use crate::pruner::DEFAULT_EXCLUSIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use transpile_core::{ErrorHierarchy, Target, TranspileError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    fn invalid<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for TranspileError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidValue { field, message } => {
                TranspileError::configuration_with_field(message, field)
            }
            other => TranspileError::configuration(other.to_string()),
        }
    }
}

/// Configuration for a transpilation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileConfig {
    /// Directory all relative paths are resolved against
    pub root: PathBuf,

    /// Canonical class sources
    pub js_dir: PathBuf,

    /// Synchronous Python output
    pub python2_dir: PathBuf,

    /// Asynchronous Python output
    pub python3_dir: PathBuf,

    /// PHP output
    pub php_dir: PathBuf,

    /// Type declaration file whose `export class` region is regenerated
    pub manifest: PathBuf,

    /// Newline-delimited ids to transpile; missing or empty means all
    pub inclusion_list: PathBuf,

    /// Substring a source file name must contain
    pub pattern: String,

    /// Replay count of the collection-literal rules, one nesting level each
    pub nesting_passes: usize,

    /// Fail instead of warning when a literal nests past `nesting_passes`
    pub strict_nesting: bool,

    /// JSON object of error class → parent overriding the built-in hierarchy
    pub error_hierarchy_json: Option<PathBuf>,

    pub targets: TargetSettings,

    pub prune: PruneSettings,

    pub auxiliary: AuxiliarySettings,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            js_dir: PathBuf::from("js"),
            python2_dir: PathBuf::from("python/ccxt"),
            python3_dir: PathBuf::from("python/ccxt/async_support"),
            php_dir: PathBuf::from("php"),
            manifest: PathBuf::from("ccxt.d.ts"),
            inclusion_list: PathBuf::from("exchanges.cfg"),
            pattern: ".js".to_string(),
            nesting_passes: crate::catalogs::COLLECTION_NESTING_PASSES,
            strict_nesting: false,
            error_hierarchy_json: None,
            targets: TargetSettings::default(),
            prune: PruneSettings::default(),
            auxiliary: AuxiliarySettings::default(),
        }
    }
}

impl TranspileConfig {
    /// Configuration for a source tree rooted at `root`
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ConfigError::IoError(format!("Failed to read config file {:?}: {}", path.as_ref(), e))
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.is_empty() {
            return Err(ConfigError::invalid("pattern", "source pattern cannot be empty"));
        }

        if self.nesting_passes == 0 {
            return Err(ConfigError::invalid("nesting_passes", "must be at least 1"));
        }

        self.targets.validate()?;
        self.prune.validate()?;

        Ok(())
    }

    /// `path` resolved against the root
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.root.join(path)
    }

    /// Enabled targets in write order
    pub fn enabled_targets(&self) -> Vec<Target> {
        Target::ALL
            .iter()
            .copied()
            .filter(|target| self.targets.is_enabled(*target))
            .collect()
    }

    /// Output directory for a target, resolved against the root
    pub fn output_dir(&self, target: Target) -> PathBuf {
        match target {
            Target::Python2 => self.resolve(&self.python2_dir),
            Target::Python3 => self.resolve(&self.python3_dir),
            Target::Php => self.resolve(&self.php_dir),
        }
    }

    /// The built-in hierarchy, or the one named by `error_hierarchy_json`
    pub fn load_error_hierarchy(&self) -> Result<ErrorHierarchy, TranspileError> {
        match &self.error_hierarchy_json {
            Some(path) => {
                let path = self.resolve(path);
                let text = crate::files::read_file(&path)?;
                log::debug!("Loading error hierarchy from {}", path.display());
                ErrorHierarchy::from_json(&text)
            }
            None => Ok(ErrorHierarchy::builtin()),
        }
    }
}

/// Which targets are rendered and written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    pub python2: bool,
    pub python3: bool,
    pub php: bool,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            python2: true,
            python3: true,
            php: true,
        }
    }
}

impl TargetSettings {
    pub fn is_enabled(&self, target: Target) -> bool {
        match target {
            Target::Python2 => self.python2,
            Target::Python3 => self.python3,
            Target::Php => self.php,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.python2 || self.python3 || self.php) {
            return Err(ConfigError::invalid("targets", "at least one target must be enabled"));
        }
        Ok(())
    }
}

/// Stale artifact deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneSettings {
    pub enabled: bool,

    /// Regexes over file names; a matching file is never deleted
    pub exclusions: Vec<String>,
}

impl Default for PruneSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PruneSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pattern in &self.exclusions {
            regex::Regex::new(pattern)
                .map_err(|e| ConfigError::invalid("prune.exclusions", format!("{}: {}", pattern, e)))?;
        }
        Ok(())
    }
}

/// Paths of the one-off transpilations that follow the class batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuxiliarySettings {
    pub enabled: bool,
    pub error_hierarchy_source: PathBuf,
    pub python_errors: PathBuf,
    pub php_errors: PathBuf,
    /// Directory holding `test.number.js`, `test.datetime.js` and `test.crypto.js`
    pub fixture_dir: PathBuf,
    pub python_test_dir: PathBuf,
    pub php_test_dir: PathBuf,
    pub async_test_driver: PathBuf,
    pub sync_test_driver: PathBuf,
}

impl Default for AuxiliarySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            error_hierarchy_source: PathBuf::from("js/base/errorHierarchy.js"),
            python_errors: PathBuf::from("python/ccxt/base/errors.py"),
            php_errors: PathBuf::from("php/base/errors.php"),
            fixture_dir: PathBuf::from("js/test/base/functions"),
            python_test_dir: PathBuf::from("python/test"),
            php_test_dir: PathBuf::from("php/test"),
            async_test_driver: PathBuf::from("python/test/test_async.py"),
            sync_test_driver: PathBuf::from("python/test/test.py"),
        }
    }
}
