//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RepoId`] - Validated `owner/name` repository identifier
//!
//! # Validation
//!
//! Identifiers are validated at construction time so the rest of the
//! crate can rely on `short_name()` and path joins being well formed.
//!
//! # Examples
//!
//! ```
//! use git_all::core::types::RepoId;
//!
//! let repo = RepoId::new("acme/widgets").unwrap();
//! assert_eq!(repo.owner(), "acme");
//! assert_eq!(repo.short_name(), "widgets");
//!
//! assert!(RepoId::new("").is_err());
//! assert!(RepoId::new("acme//widgets").is_err());
//! assert!(RepoId::new("acme/..").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid repository identifier '{value}': {reason}")]
    InvalidRepoId { value: String, reason: &'static str },
}

/// A repository identifier of the form `owner/name`.
///
/// This is the sole stable key used everywhere a repository is referenced:
/// groups, bindings, locations and dispatch results.
///
/// Rules:
/// - Exactly two segments separated by a single `/`
/// - Neither segment empty, `.` or `..`
/// - No whitespace
///
/// The name segment is used as a directory name, so these rules keep a
/// working copy inside its bound parent path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoId(String);

impl RepoId {
    /// Create a new validated repository identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepoId` if the value violates the rules above.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    fn validate(value: &str) -> Result<(), TypeError> {
        let reason = if value.is_empty() {
            Some("cannot be empty")
        } else if value.chars().any(char::is_whitespace) {
            Some("cannot contain whitespace")
        } else {
            match value.split_once('/') {
                None => Some("expected owner/name"),
                Some((_, name)) if name.contains('/') => Some("expected owner/name"),
                Some((owner, name)) if owner.is_empty() || name.is_empty() => {
                    Some("owner and name cannot be empty")
                }
                Some((owner, name)) if is_dot_segment(owner) || is_dot_segment(name) => {
                    Some("owner and name cannot be '.' or '..'")
                }
                Some(_) => None,
            }
        };

        match reason {
            Some(reason) => Err(TypeError::InvalidRepoId {
                value: value.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The repository name without its owner.
    ///
    /// This is the directory name of the working copy under its bound
    /// parent path.
    pub fn short_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(&self.0, |(_, name)| name)
    }

    /// The owning user or team.
    pub fn owner(&self) -> &str {
        self.0.split_once('/').map_or(&self.0, |(owner, _)| owner)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepoId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RepoId> for String {
    fn from(repo: RepoId) -> Self {
        repo.0
    }
}
