//! resolve
//!
//! Turns a repository-reference expression into an ordered, deduplicated
//! list of repository identifiers.
//!
//! # Policy
//!
//! Resolution never fails as a whole. A clause that cannot be expanded is
//! skipped and its [`ResolutionError`] is returned alongside the repositories
//! that did resolve, so the caller can print a diagnostic and carry on.
//!
//! # Ordering
//!
//! Repositories appear in clause order, first occurrence wins. Remote
//! fan-out walks teams, then projects within a team, in lexicographic order
//! regardless of the order the directory reports them in.
//!
//! # Example
//!
//! ```
//! use git_all::directory::mock::MockDirectory;
//! use git_all::resolve::Resolver;
//! use git_all::store::{State, Store};
//! use git_all::core::types::RepoId;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut state = State::new();
//! state.add_to_group("default", &[RepoId::new("acme/api").unwrap()]);
//! let directory = MockDirectory::new();
//!
//! let resolution = Resolver::new(&state, &directory)
//!     .resolve("--,acme/web,acme/api", None)
//!     .await;
//! let names: Vec<_> = resolution.repos.iter().map(|r| r.as_str()).collect();
//! assert_eq!(names, vec!["acme/api", "acme/web"]);
//! # });
//! ```

pub mod clause;

pub use clause::Clause;

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::types::RepoId;
use crate::directory::{Directory, DirectoryError};
use crate::store::Store;

/// A clause that could not be expanded.
///
/// Every variant names the offending clause.
#[derive(Debug, Clone, Error)]
pub enum ResolutionError {
    #[error("invalid clause '{clause}': {reason}")]
    InvalidClause { clause: String, reason: &'static str },

    #[error("invalid repository in clause '{clause}': {message}")]
    InvalidRepo { clause: String, message: String },

    #[error("no user given in clause '{clause}' and no default user configured")]
    UnresolvedUser { clause: String },

    #[error("no credentials stored for user '{user}' (clause '{clause}')")]
    UnknownUser { clause: String, user: String },

    #[error("lookup of {what} failed for clause '{clause}': {source}")]
    Directory {
        clause: String,
        what: String,
        #[source]
        source: DirectoryError,
    },

    #[error("nothing found for {what} (clause '{clause}')")]
    NothingFound { clause: String, what: String },
}

impl ResolutionError {
    /// The clause this error belongs to.
    pub fn clause(&self) -> &str {
        match self {
            Self::InvalidClause { clause, .. }
            | Self::InvalidRepo { clause, .. }
            | Self::UnresolvedUser { clause }
            | Self::UnknownUser { clause, .. }
            | Self::Directory { clause, .. }
            | Self::NothingFound { clause, .. } => clause,
        }
    }
}

/// The outcome of resolving one expression.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Resolved repositories, deduplicated, in first-occurrence order.
    pub repos: Vec<RepoId>,
    /// Clauses (or parts of a fan-out) that were skipped.
    pub skipped: Vec<ResolutionError>,
}

impl Resolution {
    /// True if nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

/// Collects repositories while removing duplicates.
#[derive(Default)]
struct Collector {
    seen: HashSet<RepoId>,
    out: Resolution,
}

impl Collector {
    fn extend(&mut self, repos: impl IntoIterator<Item = RepoId>) {
        for repo in repos {
            if self.seen.insert(repo.clone()) {
                self.out.repos.push(repo);
            }
        }
    }

    fn skip(&mut self, err: ResolutionError) {
        debug!(clause = err.clause(), "skipping: {}", err);
        self.out.skipped.push(err);
    }
}

/// Resolves expressions against a store and a remote directory.
pub struct Resolver<'a> {
    store: &'a dyn Store,
    directory: &'a dyn Directory,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn Store, directory: &'a dyn Directory) -> Self {
        Self { store, directory }
    }

    /// Resolve a comma-separated expression.
    ///
    /// `acting_user` is used by `@` clauses that name no user; when it is
    /// `None` the store's default user is used instead.
    pub async fn resolve(&self, expression: &str, acting_user: Option<&str>) -> Resolution {
        let mut collector = Collector::default();

        for text in clause::split(expression) {
            match Clause::parse(text) {
                Ok(Clause::Repo(repo)) => collector.extend([repo]),
                Ok(Clause::Group(name)) => collector.extend(self.store.group(&name)),
                Ok(Clause::Remote {
                    user,
                    team,
                    project,
                }) => {
                    let user = user
                        .or_else(|| acting_user.map(String::from))
                        .or_else(|| self.store.default_user());
                    let Some(user) = user else {
                        collector.skip(ResolutionError::UnresolvedUser {
                            clause: text.to_string(),
                        });
                        continue;
                    };
                    self.expand_remote(
                        text,
                        &user,
                        team.as_deref(),
                        project.as_deref(),
                        &mut collector,
                    )
                    .await;
                }
                Err(e) => collector.skip(e),
            }
        }

        collector.out
    }

    async fn expand_remote(
        &self,
        text: &str,
        user: &str,
        team: Option<&str>,
        project: Option<&str>,
        collector: &mut Collector,
    ) {
        let Some(credential) = self.store.credentials(user) else {
            collector.skip(ResolutionError::UnknownUser {
                clause: text.to_string(),
                user: user.to_string(),
            });
            return;
        };

        let teams = match team {
            Some(team) => vec![team.to_string()],
            None => {
                let what = format!("teams of {}", user);
                match self.directory.list_teams(&credential).await {
                    Ok(found) => match sorted(text, &what, found) {
                        Ok(teams) => teams,
                        Err(e) => return collector.skip(e),
                    },
                    Err(source) => return collector.skip(lookup_failed(text, what, source)),
                }
            }
        };

        for team in &teams {
            let projects = match project {
                Some(project) => vec![project.to_string()],
                None => {
                    let what = format!("projects of {}", team);
                    match self.directory.list_projects(team, &credential).await {
                        Ok(found) => match sorted(text, &what, found) {
                            Ok(projects) => projects,
                            Err(e) => {
                                collector.skip(e);
                                continue;
                            }
                        },
                        Err(source) => {
                            collector.skip(lookup_failed(text, what, source));
                            continue;
                        }
                    }
                }
            };

            for project in &projects {
                info!("Getting repos for project: {}:{}", team, project);
                let what = format!("repositories of {}:{}", team, project);
                match self
                    .directory
                    .list_repositories(team, project, &credential)
                    .await
                {
                    Ok(Some(repos)) => collector.extend(repos),
                    Ok(None) => collector.skip(ResolutionError::NothingFound {
                        clause: text.to_string(),
                        what,
                    }),
                    Err(source) => collector.skip(lookup_failed(text, what, source)),
                }
            }
        }
    }
}

fn sorted(
    text: &str,
    what: &str,
    found: Option<Vec<String>>,
) -> Result<Vec<String>, ResolutionError> {
    let mut items = found.ok_or_else(|| ResolutionError::NothingFound {
        clause: text.to_string(),
        what: what.to_string(),
    })?;
    items.sort();
    items.dedup();
    Ok(items)
}

fn lookup_failed(text: &str, what: String, source: DirectoryError) -> ResolutionError {
    ResolutionError::Directory {
        clause: text.to_string(),
        what,
        source,
    }
}
