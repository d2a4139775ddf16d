//! Run configuration for loading and linting.
//!
//! # Responsibility
//! - Describe where records come from and how strict validation is.
//! - Layer a JSON config file, environment variables and explicit overrides.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - Environment overlay never clears a value, it only sets one.

use crate::validate::ValidationPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Directory holding `registry.json` and `metaregistry.json`.
pub const ENV_DATA_DIR: &str = "BIOREGISTRY_DATA_DIR";
/// Log level override (`trace|debug|info|warn|error`).
pub const ENV_LOG_LEVEL: &str = "BIOREGISTRY_LOG_LEVEL";

pub const REGISTRY_FILE_NAME: &str = "registry.json";
pub const METAREGISTRY_FILE_NAME: &str = "metaregistry.json";

/// Record sources. A `None` path means the bundled sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub registry_path: Option<PathBuf>,
    pub metaregistry_path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn bundled() -> Self {
        Self::default()
    }

    /// Points both sources at the standard file names inside `dir`.
    pub fn from_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            registry_path: Some(dir.join(REGISTRY_FILE_NAME)),
            metaregistry_path: Some(dir.join(METAREGISTRY_FILE_NAME)),
        }
    }

    pub fn is_bundled(&self) -> bool {
        self.registry_path.is_none() && self.metaregistry_path.is_none()
    }
}

/// Full lint run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub store: StoreConfig,
    pub policy: ValidationPolicy,
    pub log_level: Option<String>,
    /// Absolute directory for rotating log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl LintConfig {
    /// Reads a JSON config file.
    ///
    /// # Errors
    /// - Returns [`ConfigError::Io`] when the file cannot be read.
    /// - Returns [`ConfigError::Parse`] when the content is not a valid config.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlays process environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlays variables from an arbitrary lookup (testable form of
    /// [`LintConfig::apply_env`]). Blank values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(dir) = present(ENV_DATA_DIR) {
            self.store = StoreConfig::from_data_dir(dir.trim());
        }
        if let Some(level) = present(ENV_LOG_LEVEL) {
            self.log_level = Some(level.trim().to_string());
        }
    }
}

/// Failure to read a config file.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LintConfig, StoreConfig, ENV_DATA_DIR, ENV_LOG_LEVEL};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn empty_object_is_default_config() {
        let config: LintConfig = serde_json::from_str("{}").expect("empty config parses");
        assert_eq!(config, LintConfig::default());
        assert!(config.store.is_bundled());
        assert_eq!(config.policy.self_metaprefix, "bioregistry");
    }

    #[test]
    fn reads_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"store": {{"registry_path": "/data/registry.json"}}, "policy": {{"placeholder_contact": "TBD"}}}}"#
        )
        .expect("write config");

        let config = LintConfig::from_json_file(file.path()).expect("config should load");
        assert_eq!(
            config.store.registry_path,
            Some(PathBuf::from("/data/registry.json"))
        );
        assert_eq!(config.store.metaregistry_path, None);
        assert_eq!(config.policy.placeholder_contact, "TBD");
        assert_eq!(config.policy.support_marker, "support");
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let missing = LintConfig::from_json_file("/definitely/not/here.json")
            .expect_err("missing file must fail");
        assert!(matches!(missing, ConfigError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{not json").expect("write config");
        let malformed = LintConfig::from_json_file(file.path()).expect_err("bad json must fail");
        assert!(matches!(malformed, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overlay_sets_data_dir_and_level() {
        let mut config = LintConfig::default();
        config.apply_env_from(|name| match name {
            ENV_DATA_DIR => Some("/srv/bioregistry".to_string()),
            ENV_LOG_LEVEL => Some(" debug ".to_string()),
            _ => None,
        });
        assert_eq!(config.store, StoreConfig::from_data_dir("/srv/bioregistry"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = LintConfig::default();
        config.log_level = Some("warn".to_string());
        config.apply_env_from(|_| Some("   ".to_string()));
        assert!(config.store.is_bundled());
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }
}
