//! core::paths
//!
//! Centralized path routing for git-all storage locations.
//!
//! # Storage Layout
//!
//! Everything lives under `~/.git-all/` unless overridden:
//! - `config.toml` - User configuration
//! - `state.json` - Users, groups and repository locations
//!
//! # Example
//!
//! ```
//! use git_all::core::paths::AppPaths;
//! use std::path::PathBuf;
//!
//! let paths = AppPaths::new(PathBuf::from("/home/alice/.git-all"));
//! assert_eq!(paths.state_path(), PathBuf::from("/home/alice/.git-all/state.json"));
//! ```

use std::path::{Path, PathBuf};

use crate::core::config::ConfigError;

/// Name of the storage directory under the home directory.
const APP_DIR: &str = ".git-all";

/// Centralized path routing for git-all storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Create paths rooted at an explicit directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create paths rooted at `~/.git-all`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if the home directory is unknown.
    pub fn from_home() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::new(home.join(APP_DIR)))
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the user configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path of the persisted state file.
    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }
}
