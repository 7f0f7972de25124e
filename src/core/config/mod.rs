//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment (`GIT_ALL_STATE` for the state path)
//! 4. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$GIT_ALL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/git-all/config.toml`
//! 3. `~/.git-all/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use git_all::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("max processes: {}", config.max_processes());
//! println!("api: {}", config.api_base());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths::AppPaths;
use crate::directory::bitbucket::DEFAULT_API_BASE;

/// Default parallelism budget for `pardo`.
pub const DEFAULT_MAX_PROCESSES: usize = 4;

/// Default prefix of canonical remote URLs.
pub const DEFAULT_REMOTE_PREFIX: &str = "git@bitbucket.org:";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GIT_ALL_CONFIG";

/// Environment variable overriding the state file location.
pub const STATE_ENV: &str = "GIT_ALL_STATE";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values from the config file
    pub file: FileConfig,
    /// Path the file was loaded from, if any
    loaded_from: Option<PathBuf>,
    /// State path from the environment, if set
    state_env: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// holds invalid values. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::locate();
        let mut config = Self::load_from(path.as_deref())?;
        config.state_env = std::env::var_os(STATE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Ok(config)
    }

    /// Load configuration from an explicit file, ignoring the environment.
    ///
    /// `None` or a path that doesn't exist yields defaults.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Ok(Self::default());
        };

        let file = Self::read_config(path)?;
        file.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");

        Ok(Self {
            file,
            loaded_from: Some(path.to_path_buf()),
            state_env: None,
        })
    }

    /// Find the first config file candidate that exists.
    fn locate() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Some(xdg_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("git-all/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        AppPaths::from_home()
            .ok()
            .map(|paths| paths.config_path())
            .filter(|p| p.exists())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Path of the persisted state file.
    ///
    /// Environment beats the config file, which beats `~/.git-all/state.json`.
    pub fn state_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.state_env {
            return Ok(path.clone());
        }
        if let Some(path) = &self.file.state_path {
            return Ok(path.clone());
        }
        Ok(AppPaths::from_home()?.state_path())
    }

    /// Default parallelism budget.
    pub fn max_processes(&self) -> usize {
        self.file.max_processes.unwrap_or(DEFAULT_MAX_PROCESSES)
    }

    /// Remote directory API base URL.
    pub fn api_base(&self) -> &str {
        self.file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Prefix of canonical remote URLs.
    pub fn remote_prefix(&self) -> &str {
        self.file
            .remote_prefix
            .as_deref()
            .unwrap_or(DEFAULT_REMOTE_PREFIX)
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
