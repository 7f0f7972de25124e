//! git::interface
//!
//! Version control port and its git implementation.
//!
//! Two capabilities are needed:
//!
//! - probe: which URL does the working copy at a path fetch from?
//! - clone: fetch a fresh working copy of a remote under a parent directory
//!
//! Probing goes through `git2` (no subprocess, no stdout parsing). Cloning
//! shells out to the `git` binary so the user's SSH agent, credential
//! helpers and config apply exactly as they would on the command line.
//!
//! # Example
//!
//! ```ignore
//! use git_all::git::{SystemGit, VersionControl};
//! use std::path::Path;
//!
//! let git = SystemGit::new();
//! if git.probe_remote(Path::new("/src/api")).is_none() {
//!     git.clone_repo("git@bitbucket.org:acme/api.git", Path::new("/src"))?;
//! }
//! ```

use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::core::types::RepoId;

/// Name of the remote that must point at the canonical upstream.
pub const ORIGIN: &str = "origin";

/// Errors from version control operations.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The git binary could not be started.
    #[error("cannot run git: {0}")]
    Unavailable(String),

    /// `git clone` ran and failed.
    #[error("clone of {url} failed: {message}")]
    CloneFailed {
        /// The remote being cloned
        url: String,
        /// What git printed on stderr
        message: String,
    },
}

/// Narrow version control capability used by the location binder.
pub trait VersionControl: Send + Sync {
    /// URL of the `origin` remote of the working copy at `path`.
    ///
    /// `None` if there is no repository at exactly `path` or it has no
    /// `origin`.
    fn probe_remote(&self, path: &Path) -> Option<String>;

    /// Clone `remote_url` into a new directory under `parent`.
    ///
    /// The directory name is chosen by the version control tool from the
    /// URL (for `.../name.git` that is `name`).
    fn clone_repo(&self, remote_url: &str, parent: &Path) -> Result<(), VcsError>;
}

/// [`VersionControl`] backed by libgit2 and the `git` binary.
#[derive(Debug, Clone, Default)]
pub struct SystemGit;

impl SystemGit {
    /// Create the system git port.
    pub fn new() -> Self {
        Self
    }
}

impl VersionControl for SystemGit {
    fn probe_remote(&self, path: &Path) -> Option<String> {
        // open, not discover: a parent repository must not satisfy the probe.
        let repo = git2::Repository::open(path).ok()?;
        let remote = repo.find_remote(ORIGIN).ok()?;
        remote.url().map(String::from)
    }

    fn clone_repo(&self, remote_url: &str, parent: &Path) -> Result<(), VcsError> {
        tracing::debug!(url = remote_url, parent = %parent.display(), "git clone");
        let output = Command::new("git")
            .args(["clone", remote_url])
            .current_dir(parent)
            .output()
            .map_err(|e| VcsError::Unavailable(e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(VcsError::CloneFailed {
                url: remote_url.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Canonical remote URL of a repository: `<prefix><owner/name>.git`.
///
/// # Example
///
/// ```
/// use git_all::core::types::RepoId;
/// use git_all::git::canonical_remote;
///
/// let repo = RepoId::new("acme/api").unwrap();
/// assert_eq!(
///     canonical_remote("git@bitbucket.org:", &repo),
///     "git@bitbucket.org:acme/api.git"
/// );
/// ```
pub fn canonical_remote(prefix: &str, repo: &RepoId) -> String {
    format!("{}{}.git", prefix, repo)
}

/// Check whether a probed remote URL names the expected upstream.
///
/// The `.git` suffix and trailing slashes are ignored; everything else must
/// match exactly.
pub fn remote_matches(found: &str, prefix: &str, repo: &RepoId) -> bool {
    let found = found.trim().trim_end_matches('/');
    let found = found.strip_suffix(".git").unwrap_or(found);
    found.strip_prefix(prefix) == Some(repo.as_str())
}
