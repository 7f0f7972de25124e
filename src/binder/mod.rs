//! binder
//!
//! Maps repository identifiers to local working copies.
//!
//! A repository bound to parent `P` lives at `P/<short-name>`. Lookups are
//! plain store reads. Registration and installation go through the
//! [`VersionControl`] port so the working copy is checked before anything is
//! recorded.
//!
//! # Invariants
//!
//! - Nothing is bound unless a working copy whose `origin` names the
//!   canonical remote exists at the target path.
//! - A failed clone records nothing.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::types::RepoId;
use crate::git::{canonical_remote, remote_matches, VcsError, VersionControl};
use crate::store::Store;

/// Errors from register and install.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("{repo}: working copy at {path} has origin '{found}', expected '{expected}'")]
    ProbeMismatch {
        repo: RepoId,
        path: PathBuf,
        found: String,
        expected: String,
    },

    #[error("no repository found: {repo}")]
    NotFound { repo: RepoId, path: PathBuf },

    #[error("{repo}: {source}")]
    Clone {
        repo: RepoId,
        #[source]
        source: VcsError,
    },

    #[error("cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a probe of the target path found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// No working copy (or no `origin`) at the path.
    Missing,
    /// A working copy of the expected repository.
    Matches,
    /// A working copy of something else; holds the `origin` URL found.
    Mismatch(String),
}

/// How `install` ended up binding a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installed {
    /// A matching working copy was already present.
    Registered,
    /// A fresh working copy was cloned.
    Cloned,
}

/// The working copy path of a bound repository, if any.
pub fn bind(store: &dyn Store, repo: &RepoId) -> Option<PathBuf> {
    store
        .repo_path(repo)
        .map(|parent| parent.join(repo.short_name()))
}

/// Register and install repositories through a version control port.
pub struct Binder<'a> {
    vcs: &'a dyn VersionControl,
    remote_prefix: &'a str,
}

impl<'a> Binder<'a> {
    pub fn new(vcs: &'a dyn VersionControl, remote_prefix: &'a str) -> Self {
        Self { vcs, remote_prefix }
    }

    /// The canonical remote URL of `repo`.
    pub fn remote_of(&self, repo: &RepoId) -> String {
        canonical_remote(self.remote_prefix, repo)
    }

    /// Probe `parent/<short-name>` for a working copy of `repo`.
    pub fn probe(&self, repo: &RepoId, parent: &Path) -> Probe {
        let target = parent.join(repo.short_name());
        match self.vcs.probe_remote(&target) {
            None => Probe::Missing,
            Some(url) if remote_matches(&url, self.remote_prefix, repo) => Probe::Matches,
            Some(url) => Probe::Mismatch(url),
        }
    }

    /// Bind `repo` under `parent` if a matching working copy is already there.
    ///
    /// Returns the working copy path.
    pub fn register(
        &self,
        store: &mut dyn Store,
        repo: &RepoId,
        parent: &Path,
    ) -> Result<PathBuf, BindError> {
        match self.probe(repo, parent) {
            Probe::Matches => Ok(self.record(store, repo, parent)),
            Probe::Missing => Err(BindError::NotFound {
                repo: repo.clone(),
                path: parent.join(repo.short_name()),
            }),
            Probe::Mismatch(found) => Err(self.mismatch(repo, parent, found)),
        }
    }

    /// Register `repo` if present, otherwise clone it into `parent` and bind.
    ///
    /// The target is probed once. `announce` is called with the chosen
    /// outcome before anything is recorded or cloned; it is not called for
    /// a mismatching working copy.
    pub fn install(
        &self,
        store: &mut dyn Store,
        repo: &RepoId,
        parent: &Path,
        announce: impl FnOnce(Installed),
    ) -> Result<Installed, BindError> {
        let outcome = match self.probe(repo, parent) {
            Probe::Matches => Installed::Registered,
            Probe::Missing => Installed::Cloned,
            Probe::Mismatch(found) => return Err(self.mismatch(repo, parent, found)),
        };

        announce(outcome);
        match outcome {
            Installed::Registered => {
                self.record(store, repo, parent);
            }
            Installed::Cloned => {
                self.fetch(store, repo, parent)?;
            }
        }
        Ok(outcome)
    }

    /// Clone the canonical remote of `repo` into `parent`, then bind it.
    ///
    /// `parent` is created if needed. Nothing is bound if the clone fails.
    pub fn fetch(
        &self,
        store: &mut dyn Store,
        repo: &RepoId,
        parent: &Path,
    ) -> Result<PathBuf, BindError> {
        std::fs::create_dir_all(parent).map_err(|source| BindError::Io {
            path: parent.to_path_buf(),
            source,
        })?;

        self.vcs
            .clone_repo(&self.remote_of(repo), parent)
            .map_err(|source| BindError::Clone {
                repo: repo.clone(),
                source,
            })?;

        Ok(self.record(store, repo, parent))
    }

    fn record(&self, store: &mut dyn Store, repo: &RepoId, parent: &Path) -> PathBuf {
        debug!(repo = %repo, parent = %parent.display(), "binding");
        store.record_binding(repo, parent);
        parent.join(repo.short_name())
    }

    fn mismatch(&self, repo: &RepoId, parent: &Path, found: String) -> BindError {
        BindError::ProbeMismatch {
            repo: repo.clone(),
            path: parent.join(repo.short_name()),
            found,
            expected: self.remote_of(repo),
        }
    }
}
