//! resolve::clause
//!
//! Parsing of single clauses of a repository-reference expression.
//!
//! # Grammar
//!
//! ```text
//! expression := clause ("," clause)*
//! clause     := "--"                      the `default` group
//!             | "/" name                  a named group
//!             | "@" [user ["/" team ["/" project]]]
//!             | repo                      a literal `owner/name`
//! ```

use super::ResolutionError;
use crate::core::types::RepoId;
use crate::store::DEFAULT_GROUP;

/// One parsed clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// A literal repository identifier.
    Repo(RepoId),
    /// Members of a saved group.
    Group(String),
    /// Repositories discovered through the remote directory.
    ///
    /// `user: None` means the acting (or default) user. A missing `team`
    /// fans out over every team; a missing `project` over every project.
    Remote {
        user: Option<String>,
        team: Option<String>,
        project: Option<String>,
    },
}

impl Clause {
    /// Parse a single, already-trimmed clause.
    pub fn parse(text: &str) -> Result<Self, ResolutionError> {
        if text == "--" {
            return Ok(Clause::Group(DEFAULT_GROUP.to_string()));
        }

        if let Some(name) = text.strip_prefix('/') {
            if name.is_empty() {
                return Err(invalid(text, "group name cannot be empty"));
            }
            return Ok(Clause::Group(name.to_string()));
        }

        if let Some(rest) = text.strip_prefix('@') {
            return parse_remote(text, rest);
        }

        RepoId::new(text)
            .map(Clause::Repo)
            .map_err(|e| ResolutionError::InvalidRepo {
                clause: text.to_string(),
                message: e.to_string(),
            })
    }
}

fn parse_remote(text: &str, rest: &str) -> Result<Clause, ResolutionError> {
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.len() > 3 {
        return Err(invalid(text, "expected at most user/team/project"));
    }
    if segments.iter().skip(1).any(|s| s.is_empty()) {
        return Err(invalid(text, "team and project cannot be empty"));
    }

    let segment = |i: usize| {
        segments
            .get(i)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    };

    Ok(Clause::Remote {
        user: segment(0),
        team: segment(1),
        project: segment(2),
    })
}

fn invalid(text: &str, reason: &'static str) -> ResolutionError {
    ResolutionError::InvalidClause {
        clause: text.to_string(),
        reason,
    }
}

/// Split an expression into its trimmed, non-empty clauses.
pub fn split(expression: &str) -> impl Iterator<Item = &str> {
    expression
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
}
