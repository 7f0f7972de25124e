//! directory::mock
//!
//! Mock directory implementation for deterministic testing.
//!
//! # Design
//!
//! The mock directory holds teams, projects and repositories in memory,
//! records every lookup it serves, and can be told to fail or to answer
//! with an unparseable response for a given lookup.
//!
//! # Example
//!
//! ```
//! use git_all::directory::mock::MockDirectory;
//! use git_all::directory::Directory;
//!
//! # tokio_test_block_on(async {
//! let dir = MockDirectory::new().with_repos("acme", "API", &["acme/api"]);
//!
//! let teams = dir.list_teams("cred").await.unwrap();
//! assert_eq!(teams, Some(vec!["acme".to_string()]));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{Directory, DirectoryError};
use crate::core::types::RepoId;

/// Mock directory for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    inner: Arc<Mutex<MockDirectoryInner>>,
}

#[derive(Debug, Default)]
struct MockDirectoryInner {
    /// Team → project → repositories. `list_teams` and `list_projects`
    /// answer in reverse name order.
    teams: BTreeMap<String, BTreeMap<String, Vec<RepoId>>>,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Configuration for which lookup should misbehave.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail `list_teams` with the given error.
    ListTeams(DirectoryError),
    /// Fail `list_projects` for a team with the given error.
    ListProjects(String, DirectoryError),
    /// Fail `list_repositories` for a team/project with the given error.
    ListRepositories(String, String, DirectoryError),
    /// Answer `list_projects` for a team as if the response were unparseable.
    MalformedProjects(String),
}

/// Recorded lookup for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListTeams {
        credential: String,
    },
    ListProjects {
        team: String,
        credential: String,
    },
    ListRepositories {
        team: String,
        project: String,
        credential: String,
    },
}

impl MockDirectory {
    /// Create an empty mock directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a team with no projects.
    pub fn with_team(self, team: &str) -> Self {
        self.lock().teams.entry(team.to_string()).or_default();
        self
    }

    /// Add an empty project to a team.
    pub fn with_project(self, team: &str, project: &str) -> Self {
        self.lock()
            .teams
            .entry(team.to_string())
            .or_default()
            .entry(project.to_string())
            .or_default();
        self
    }

    /// Add repositories to a team's project, creating both as needed.
    ///
    /// # Panics
    ///
    /// Panics if a repository identifier is invalid.
    pub fn with_repos(self, team: &str, project: &str, repos: &[&str]) -> Self {
        {
            let mut inner = self.lock();
            let list = inner
                .teams
                .entry(team.to_string())
                .or_default()
                .entry(project.to_string())
                .or_default();
            for repo in repos {
                list.push(RepoId::new(*repo).expect("valid repo id in mock"));
            }
        }
        self
    }

    /// Configure a lookup to misbehave.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Lookups served so far, in order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockDirectoryInner> {
        // A poisoned mock only happens after a test already panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Directory for MockDirectory {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_teams(&self, credential: &str) -> Result<Option<Vec<String>>, DirectoryError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::ListTeams {
            credential: credential.to_string(),
        });

        if let Some(FailOn::ListTeams(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(Some(inner.teams.keys().rev().cloned().collect()))
    }

    async fn list_projects(
        &self,
        team: &str,
        credential: &str,
    ) -> Result<Option<Vec<String>>, DirectoryError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::ListProjects {
            team: team.to_string(),
            credential: credential.to_string(),
        });

        match &inner.fail_on {
            Some(FailOn::ListProjects(t, err)) if t == team => return Err(err.clone()),
            Some(FailOn::MalformedProjects(t)) if t == team => return Ok(None),
            _ => {}
        }

        match inner.teams.get(team) {
            Some(projects) => Ok(Some(projects.keys().rev().cloned().collect())),
            None => Err(DirectoryError::NotFound(format!("team {}", team))),
        }
    }

    async fn list_repositories(
        &self,
        team: &str,
        project: &str,
        credential: &str,
    ) -> Result<Option<Vec<RepoId>>, DirectoryError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::ListRepositories {
            team: team.to_string(),
            project: project.to_string(),
            credential: credential.to_string(),
        });

        if let Some(FailOn::ListRepositories(t, p, err)) = &inner.fail_on {
            if t == team && p == project {
                return Err(err.clone());
            }
        }

        match inner.teams.get(team).and_then(|projects| projects.get(project)) {
            Some(repos) => Ok(Some(repos.clone())),
            None => Err(DirectoryError::NotFound(format!("project {}/{}", team, project))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_configured_data() {
        let dir = MockDirectory::new()
            .with_repos("acme", "API", &["acme/api", "acme/api-docs"])
            .with_project("acme", "WEB")
            .with_team("empty");

        let mut teams = dir.list_teams("c").await.unwrap().unwrap();
        teams.sort();
        assert_eq!(teams, vec!["acme", "empty"]);

        let mut projects = dir.list_projects("acme", "c").await.unwrap().unwrap();
        projects.sort();
        assert_eq!(projects, vec!["API", "WEB"]);

        let repos = dir.list_repositories("acme", "API", "c").await.unwrap().unwrap();
        assert_eq!(repos.len(), 2);
    }

    #[tokio::test]
    async fn unknown_team_not_found() {
        let dir = MockDirectory::new();
        let err = dir.list_projects("ghost", "c").await.unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn records_operations() {
        let dir = MockDirectory::new().with_repos("acme", "API", &["acme/api"]);
        dir.list_teams("cred-a").await.unwrap();
        dir.list_repositories("acme", "API", "cred-a").await.unwrap();

        assert_eq!(
            dir.operations(),
            vec![
                MockOperation::ListTeams {
                    credential: "cred-a".into()
                },
                MockOperation::ListRepositories {
                    team: "acme".into(),
                    project: "API".into(),
                    credential: "cred-a".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn fail_on_and_malformed() {
        let dir = MockDirectory::new()
            .with_project("acme", "API")
            .fail_on(FailOn::MalformedProjects("acme".into()));
        assert_eq!(dir.list_projects("acme", "c").await.unwrap(), None);

        let dir = MockDirectory::new().fail_on(FailOn::ListTeams(DirectoryError::RateLimited));
        assert!(matches!(
            dir.list_teams("c").await,
            Err(DirectoryError::RateLimited)
        ));
    }
}
