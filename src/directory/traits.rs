//! directory::traits
//!
//! Directory trait definition for discovering teams, projects and
//! repositories on a remote hosting service.
//!
//! # Design
//!
//! The `Directory` trait is async because lookups involve network I/O.
//! Every lookup distinguishes three outcomes:
//!
//! - `Ok(Some(items))`: the lookup completed
//! - `Ok(None)`: the service answered with something unparseable; callers
//!   treat this as "nothing found"
//! - `Err(DirectoryError)`: transport or HTTP failure
//!
//! Listing lookups are paginated by the implementation; callers always see
//! the full result.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::RepoId;

/// Errors from directory lookups.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Authentication failed (bad credentials, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Remote lookup of teams, projects and repositories.
///
/// `credential` is the stored, already-encoded credential of the user the
/// lookup runs as.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Get the directory name (e.g., "bitbucket").
    fn name(&self) -> &'static str;

    /// Teams the user is a member of. Order is unspecified.
    async fn list_teams(&self, credential: &str) -> Result<Option<Vec<String>>, DirectoryError>;

    /// Project keys within a team. Order is unspecified.
    async fn list_projects(
        &self,
        team: &str,
        credential: &str,
    ) -> Result<Option<Vec<String>>, DirectoryError>;

    /// Repositories within one project of a team.
    async fn list_repositories(
        &self,
        team: &str,
        project: &str,
        credential: &str,
    ) -> Result<Option<Vec<RepoId>>, DirectoryError>;
}
