//! store::state
//!
//! In-memory [`Store`] implementation and the on-disk document shape.
//!
//! `State` is what `FileStore` loads and flushes, and is used directly by
//! tests that don't need a file.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::traits::Store;
use crate::core::types::RepoId;

/// The persisted state document.
///
/// # Example
///
/// ```json
/// {
///   "users": { "alice": "YWxpY2U6aHVudGVyMg==" },
///   "default_user": "alice",
///   "groups": { "default": ["acme/api", "acme/web"] },
///   "repos": { "acme/api": "/home/alice/src" },
///   "locations": { "/home/alice/src": ["acme/api"] }
/// }
/// ```
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct State {
    users: BTreeMap<String, String>,
    default_user: Option<String>,
    groups: BTreeMap<String, BTreeSet<RepoId>>,
    repos: BTreeMap<RepoId, PathBuf>,
    locations: BTreeMap<PathBuf, BTreeSet<RepoId>>,
}

impl State {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the binding/location inverse-index invariant.
    ///
    /// Returns true if every binding appears in exactly its location's set
    /// and every location entry has a matching binding.
    pub fn is_consistent(&self) -> bool {
        let bindings_indexed = self.repos.iter().all(|(repo, path)| {
            self.locations
                .get(path)
                .is_some_and(|repos| repos.contains(repo))
        });
        let locations_bound = self.locations.iter().all(|(path, repos)| {
            repos
                .iter()
                .all(|repo| self.repos.get(repo).is_some_and(|bound| bound == path))
        });
        bindings_indexed && locations_bound
    }

    fn unindex(&mut self, repo: &RepoId, path: &Path) {
        if let Some(repos) = self.locations.get_mut(path) {
            repos.remove(repo);
            if repos.is_empty() {
                self.locations.remove(path);
            }
        }
    }
}

// Credentials must never reach logs through a derived Debug.
impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .field("default_user", &self.default_user)
            .field("groups", &self.groups)
            .field("repos", &self.repos)
            .field("locations", &self.locations)
            .finish()
    }
}

impl Store for State {
    fn credentials(&self, user: &str) -> Option<String> {
        self.users.get(user).cloned()
    }

    fn set_credentials(&mut self, user: &str, secret: &str) {
        self.users.insert(user.to_string(), secret.to_string());
    }

    fn remove_credentials(&mut self, user: &str) {
        self.users.remove(user);
        if self.default_user.as_deref() == Some(user) {
            self.default_user = None;
        }
    }

    fn users(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }

    fn default_user(&self) -> Option<String> {
        self.default_user.clone()
    }

    fn set_default_user(&mut self, user: Option<&str>) {
        self.default_user = user
            .filter(|u| self.users.contains_key(*u))
            .map(String::from);
    }

    fn groups(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    fn group(&self, name: &str) -> BTreeSet<RepoId> {
        self.groups.get(name).cloned().unwrap_or_default()
    }

    fn add_to_group(&mut self, name: &str, repos: &[RepoId]) {
        self.groups
            .entry(name.to_string())
            .or_default()
            .extend(repos.iter().cloned());
    }

    fn remove_group(&mut self, name: &str) {
        self.groups.remove(name);
    }

    fn bind_repo_path(&mut self, repo: &RepoId, path: &Path) {
        if let Some(previous) = self.repos.insert(repo.clone(), path.to_path_buf()) {
            if previous != path {
                self.unindex(repo, &previous);
            }
        }
    }

    fn repo_path(&self, repo: &RepoId) -> Option<PathBuf> {
        self.repos.get(repo).cloned()
    }

    fn add_location_repo(&mut self, path: &Path, repo: &RepoId) {
        self.locations
            .entry(path.to_path_buf())
            .or_default()
            .insert(repo.clone());
    }

    fn locations(&self) -> Vec<PathBuf> {
        self.locations.keys().cloned().collect()
    }

    fn repos_at(&self, path: &Path) -> BTreeSet<RepoId> {
        self.locations.get(path).cloned().unwrap_or_default()
    }
}
