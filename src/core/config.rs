//! Console configuration
//!
//! Layers, lowest priority first: built-in defaults, the user config file
//! (`<config dir>/ems/config.yaml`), `EMS_*` environment variables, then
//! command-line flags applied by the caller.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_URL: &str = "EMS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "EMS_TIMEOUT_SECS";
/// Overrides the config file location entirely
pub const ENV_CONFIG: &str = "EMS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("unknown config key '{0}' (expected api_url, timeout_secs or confirm_delete)")]
    UnknownKey(String),
}

/// Effective console settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST backend
    pub api_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Ask before deleting unless `--yes` is given
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            confirm_delete: true,
        }
    }
}

/// Partial settings read from a file; absent keys keep the lower layer
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    confirm_delete: Option<bool>,
}

impl Config {
    /// Default location of the user config file
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        ProjectDirs::from("", "", "ems").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Load defaults, then the user file, then environment overrides
    pub fn load() -> Result<Config, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_file(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Defaults merged with a single file; a missing file is not an error
    pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        if !path.exists() {
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(config);
        }

        let layer: ConfigLayer =
            serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.merge(layer);
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(url) = layer.api_url {
            self.api_url = url;
        }
        if let Some(secs) = layer.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(confirm) = layer.confirm_delete {
            self.confirm_delete = confirm;
        }
    }

    fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply `EMS_*` overrides from any variable source
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(raw) = var(ENV_TIMEOUT_SECS) {
            match raw.trim().parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, api_url: Option<&str>, timeout_secs: Option<u64>) -> Config {
        if let Some(url) = api_url {
            self.api_url = url.to_string();
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read one key as text
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "api_url" => Ok(self.api_url.clone()),
            "timeout_secs" => Ok(self.timeout_secs.to_string()),
            "confirm_delete" => Ok(self.confirm_delete.to_string()),
            other => Err(ConfigError::UnknownKey(other.to_string())),
        }
    }

    /// Set one key from text
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "api_url" => {
                let url = value.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(invalid());
                }
                self.api_url = url.to_string();
            }
            "timeout_secs" => self.timeout_secs = value.trim().parse().map_err(|_| invalid())?,
            "confirm_delete" => self.confirm_delete = value.trim().parse().map_err(|_| invalid())?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Write the settings as YAML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |reason: String| ConfigError::Write {
            path: path.to_path_buf(),
            reason,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;
        }
        let contents = serde_yml::to_string(self).map_err(|e| write_err(e.to_string()))?;
        fs::write(path, contents).map_err(|e| write_err(e.to_string()))
    }
}
