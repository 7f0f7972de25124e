//! directory::bitbucket
//!
//! Bitbucket Cloud directory implementation using the 2.0 REST API.
//!
//! # Pagination
//!
//! Bitbucket list endpoints return pages shaped like
//! `{"size": <total>, "values": [...]}`. Pages are requested from 1 until
//! the cumulative number of items reaches `size`. An empty page also ends
//! the walk so an inconsistent `size` cannot loop forever.
//!
//! A page that fails to parse ends the whole lookup with `Ok(None)`.
//!
//! # Authentication
//!
//! The stored credential is the base64 of `user:password` and is sent as an
//! HTTP Basic `Authorization` header.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::traits::{Directory, DirectoryError};
use crate::core::types::RepoId;

/// Default Bitbucket API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.bitbucket.org/2.0";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "git-all";

/// Encode a username and password as a stored credential.
///
/// ```
/// use git_all::directory::bitbucket::encode_credential;
///
/// assert_eq!(encode_credential("alice", "pw"), "YWxpY2U6cHc=");
/// ```
pub fn encode_credential(user: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", user, password))
}

/// Bitbucket directory.
#[derive(Debug, Clone)]
pub struct BitbucketDirectory {
    client: Client,
    api_base: String,
}

impl BitbucketDirectory {
    /// Create a directory against the public Bitbucket API.
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Create a directory against a custom API base URL.
    ///
    /// Trailing slashes are ignored.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn headers(credential: &str) -> Result<HeaderMap, DirectoryError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Basic {}", credential))
            .map_err(|_| DirectoryError::AuthFailed("stored credential is malformed".into()))?;
        headers.insert(AUTHORIZATION, value);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Walk every page of a list endpoint.
    ///
    /// `query` is sent with every page; the page number is appended here.
    /// Items for which `extract` returns `None` are dropped but still count
    /// toward the reported total.
    async fn page_all<T, F, U>(
        &self,
        url: &str,
        credential: &str,
        query: &[(&str, String)],
        extract: F,
    ) -> Result<Option<Vec<U>>, DirectoryError>
    where
        T: DeserializeOwned,
        F: Fn(T) -> Option<U>,
    {
        let headers = Self::headers(credential)?;
        let mut results = Vec::new();
        let mut total = 1;
        let mut page: u32 = 1;
        let mut seen = 0;

        while seen < total {
            let request = self
                .client
                .get(url)
                .headers(headers.clone())
                .query(query)
                .query(&[("page", page)]);

            let Some(body) = Self::fetch_page::<T>(request).await? else {
                tracing::debug!(url, page, "unparseable page, giving up");
                return Ok(None);
            };

            total = body.size;
            if body.values.is_empty() {
                break;
            }
            seen += body.values.len();
            results.extend(body.values.into_iter().filter_map(&extract));
            page += 1;
        }

        tracing::debug!(url, pages = page - 1, items = results.len(), "listed");
        Ok(Some(results))
    }

    async fn fetch_page<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<Option<Page<T>>, DirectoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| DirectoryError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DirectoryError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(error_for_status(status, &text));
        }

        Ok(serde_json::from_str(&text).ok())
    }
}

impl Default for BitbucketDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Directory for BitbucketDirectory {
    fn name(&self) -> &'static str {
        "bitbucket"
    }

    async fn list_teams(&self, credential: &str) -> Result<Option<Vec<String>>, DirectoryError> {
        let url = format!("{}/teams", self.api_base);
        self.page_all(
            &url,
            credential,
            &[("role", "member".to_string())],
            |team: TeamItem| Some(team.username),
        )
        .await
    }

    async fn list_projects(
        &self,
        team: &str,
        credential: &str,
    ) -> Result<Option<Vec<String>>, DirectoryError> {
        let url = format!("{}/teams/{}/projects/", self.api_base, team);
        self.page_all(&url, credential, &[], |project: ProjectItem| {
            Some(project.key)
        })
        .await
    }

    async fn list_repositories(
        &self,
        team: &str,
        project: &str,
        credential: &str,
    ) -> Result<Option<Vec<RepoId>>, DirectoryError> {
        let url = format!("{}/repositories/{}", self.api_base, team);
        let query = [("q", format!("project.key=\"{}\"", project))];
        self.page_all(&url, credential, &query, |repo: RepoItem| {
            match RepoId::new(repo.full_name) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!("ignoring repository from {}: {}", team, e);
                    None
                }
            }
        })
        .await
    }
}

/// Map an HTTP error status to a directory error.
fn error_for_status(status: StatusCode, body: &str) -> DirectoryError {
    let message = serde_json::from_str::<BitbucketErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| "Unknown error".to_string());

    match status {
        StatusCode::UNAUTHORIZED => DirectoryError::AuthFailed("Invalid credentials".into()),
        StatusCode::FORBIDDEN => DirectoryError::AuthFailed(format!("Permission denied: {}", message)),
        StatusCode::NOT_FOUND => DirectoryError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => DirectoryError::RateLimited,
        _ if status.is_server_error() => DirectoryError::ApiError {
            status: status.as_u16(),
            message: format!("Bitbucket server error: {}", message),
        },
        _ => DirectoryError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

// =============================================================================
// API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct Page<T> {
    size: usize,
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TeamItem {
    username: String,
}

#[derive(Debug, Deserialize)]
struct ProjectItem {
    key: String,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct BitbucketErrorResponse {
    error: BitbucketErrorBody,
}

#[derive(Debug, Deserialize)]
struct BitbucketErrorBody {
    message: String,
}
