//! store::traits
//!
//! Persistence trait definition.
//!
//! # Design
//!
//! The `Store` trait is the key-value interface over everything git-all
//! remembers between invocations:
//!
//! - users → credentials, plus the default-user marker
//! - groups → sets of repositories
//! - repository → parent path (the binding)
//! - location → repositories known to live under it (the inverse index)
//!
//! # Invariants
//!
//! - At most one default user, and it always names a stored user.
//! - A repository is in some location's set iff it has a binding to that
//!   location. Use [`Store::record_binding`] to keep both sides in step.
//!
//! # Security
//!
//! Implementations MUST never log, print, or include credentials in error
//! messages.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::RepoId;

/// Errors from persistence operations.
///
/// Note: Error messages intentionally do not include credential values.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the store.
    #[error("failed to read state: {0}")]
    ReadError(String),

    /// Failed to write the store.
    #[error("failed to write state: {0}")]
    WriteError(String),
}

/// Persisted users, groups and repository locations.
pub trait Store: Send + Sync {
    /// Get the stored credential for a user.
    ///
    /// # Security
    ///
    /// The returned value is the raw secret. Do not log or print it.
    fn credentials(&self, user: &str) -> Option<String>;

    /// Store a credential for a user, overwriting any existing value.
    fn set_credentials(&mut self, user: &str, secret: &str);

    /// Remove a user's credential.
    ///
    /// Idempotent. Removing the default user clears the default marker.
    fn remove_credentials(&mut self, user: &str);

    /// All stored users, sorted.
    fn users(&self) -> Vec<String>;

    /// The default user, if one is marked.
    fn default_user(&self) -> Option<String>;

    /// Mark a user as default, or clear the marker with `None`.
    ///
    /// Naming a user with no stored credentials also clears the marker.
    fn set_default_user(&mut self, user: Option<&str>);

    /// All group names, sorted.
    fn groups(&self) -> Vec<String>;

    /// Members of a group. An unknown group is empty.
    fn group(&self, name: &str) -> BTreeSet<RepoId>;

    /// Union `repos` into a group, creating it if needed.
    fn add_to_group(&mut self, name: &str, repos: &[RepoId]);

    /// Remove a group. Idempotent.
    fn remove_group(&mut self, name: &str);

    /// Bind a repository to its parent path. Last write wins.
    fn bind_repo_path(&mut self, repo: &RepoId, path: &Path);

    /// The parent path a repository is bound to.
    fn repo_path(&self, repo: &RepoId) -> Option<PathBuf>;

    /// Record that `repo` lives under `path`.
    fn add_location_repo(&mut self, path: &Path, repo: &RepoId);

    /// All known locations, sorted.
    fn locations(&self) -> Vec<PathBuf>;

    /// Repositories known to live under a location.
    fn repos_at(&self, path: &Path) -> BTreeSet<RepoId>;

    /// Bind a repository and update the location index together.
    fn record_binding(&mut self, repo: &RepoId, path: &Path) {
        self.bind_repo_path(repo, path);
        self.add_location_repo(path, repo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StoreError::ReadError("disk on fire".into());
        assert!(err.to_string().contains("read"));
        assert!(err.to_string().contains("disk on fire"));

        let err = StoreError::WriteError("permission denied".into());
        assert!(err.to_string().contains("write"));
    }
}
