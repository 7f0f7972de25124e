//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing. Errors name the offending key.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// User configuration.
///
/// # Example
///
/// ```toml
/// state_path = "/home/alice/.git-all/state.json"
/// max_processes = 8
/// api_base = "https://api.bitbucket.org/2.0"
/// remote_prefix = "git@bitbucket.org:"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Where the persisted state lives
    pub state_path: Option<PathBuf>,

    /// Default parallelism budget for `pardo`
    pub max_processes: Option<usize>,

    /// Remote directory API base URL
    pub api_base: Option<String>,

    /// Prefix of canonical remote URLs
    pub remote_prefix: Option<String>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_processes == Some(0) {
            return Err(ConfigError::InvalidValue(
                "max_processes must be at least 1".into(),
            ));
        }

        if let Some(api_base) = &self.api_base {
            if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must be an http(s) URL",
                    api_base
                )));
            }
        }

        if let Some(prefix) = &self.remote_prefix {
            if prefix.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "remote_prefix cannot be empty".into(),
                ));
            }
        }

        if let Some(path) = &self.state_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue("state_path cannot be empty".into()));
            }
        }

        Ok(())
    }
}
