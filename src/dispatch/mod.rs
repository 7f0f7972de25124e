//! dispatch
//!
//! Runs an external command in the working copy of each bound repository.
//!
//! # Modes
//!
//! - [`sequential::run_sequential`] runs one blocking process at a time, in
//!   resolution order.
//! - [`parallel::run_parallel`] keeps at most `max_processes` children in
//!   flight. Completion order, and therefore output order, is unspecified.
//!
//! # Failure semantics
//!
//! A command's non-zero exit is reported in its [`ExecOutput`], never as an
//! error. Unbound repositories are skipped. A bound repository whose working
//! copy has disappeared is skipped and returned as a [`MissingCopy`] so the
//! caller can report it. The only batch-level
//! failure is [`DispatchError::Launch`]: the process could not be started.

pub mod output;
pub mod parallel;
pub mod sequential;

pub use output::{render, OutputMode};
pub use parallel::{run_parallel, ParallelReport};
pub use sequential::{run_sequential, SequentialReport};

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::binder;
use crate::core::types::RepoId;
use crate::store::Store;

/// Batch-level dispatch failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no command given")]
    EmptyCommand,

    #[error("parallelism budget must be at least 1")]
    InvalidBudget,

    #[error("cannot start '{program}' in {}: {source}", .path.display())]
    Launch {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Captured result of one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub repo: RepoId,
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
}

impl ExecOutput {
    pub(crate) fn from_output(repo: RepoId, output: std::process::Output) -> Self {
        Self {
            repo,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        }
    }

    /// The text shown for this run: stderr if non-empty, else stdout.
    pub fn text(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }

    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// A bound repository whose working copy is no longer on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCopy {
    pub repo: RepoId,
    pub path: PathBuf,
}

/// A repository together with the working directory to run in.
#[derive(Debug, Clone)]
pub(crate) struct Target {
    pub repo: RepoId,
    pub path: PathBuf,
}

/// Split a command line into program and arguments.
pub(crate) fn split_command(command: &[String]) -> Result<(&str, &[String]), DispatchError> {
    match command.split_first() {
        Some((program, args)) => Ok((program.as_str(), args)),
        None => Err(DispatchError::EmptyCommand),
    }
}

/// Bind the next repository that has a usable working copy.
///
/// Bound repositories whose working copy is gone are pushed onto `missing`.
pub(crate) fn next_target<'r>(
    store: &dyn Store,
    repos: &mut impl Iterator<Item = &'r RepoId>,
    missing: &mut Vec<MissingCopy>,
) -> Option<Target> {
    for repo in repos {
        let Some(path) = binder::bind(store, repo) else {
            debug!(repo = %repo, "not bound, skipping");
            continue;
        };
        if !path.is_dir() {
            debug!(repo = %repo, path = %path.display(), "working copy missing, skipping");
            missing.push(MissingCopy {
                repo: repo.clone(),
                path,
            });
            continue;
        }
        return Some(Target {
            repo: repo.clone(),
            path,
        });
    }
    None
}
