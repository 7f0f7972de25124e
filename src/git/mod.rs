//! git
//!
//! Single interface for the version control operations git-all needs.
//!
//! # Architecture
//!
//! This module is the **only doorway** to git. No other module imports
//! `git2` or runs the `git` binary. The binder depends on the
//! [`VersionControl`] trait so tests can swap in [`mock::MockVcs`].
//!
//! # Responsibilities
//!
//! - Probing a working copy's `origin` URL
//! - Cloning a canonical remote
//! - Building and matching canonical remote URLs

mod interface;
pub mod mock;

pub use interface::{canonical_remote, remote_matches, SystemGit, VcsError, VersionControl, ORIGIN};
