//! dispatch::parallel
//!
//! Bounded-parallel dispatch.
//!
//! # Scheduling
//!
//! A counting semaphore holds `max_processes` permits. A child is started
//! only once a permit is held, and the permit is released when the child
//! exits. Repositories are bound lazily, just before a permit is requested,
//! so unbound ones never take a slot.
//!
//! The loop waits on three things at once: the shutdown signal, the next
//! finished child, and a free permit (only while work remains). It returns
//! once nothing is pending and nothing is in flight.
//!
//! # Cancellation
//!
//! When `shutdown` resolves the loop stops at once. Children already
//! running are not killed or waited for.

use std::future::Future;
use std::io::Write;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::{
    next_target, render, split_command, DispatchError, ExecOutput, MissingCopy, OutputMode,
};
use crate::core::types::RepoId;
use crate::store::Store;

/// Summary of a parallel batch.
#[derive(Debug, Default)]
pub struct ParallelReport {
    /// Finished runs, in completion order.
    pub completed: Vec<ExecOutput>,
    /// Bound repositories skipped because their working copy is gone.
    pub missing: Vec<MissingCopy>,
    /// True if the batch was cut short by `shutdown`.
    pub interrupted: bool,
}

type Finished = (RepoId, std::io::Result<std::process::Output>);

/// Run `command` in each bound repository with at most `max_processes`
/// children alive at any time.
///
/// Each run's output is written to `out` as soon as it is reaped.
///
/// # Errors
///
/// - `DispatchError::InvalidBudget` if `max_processes` is 0
/// - `DispatchError::Launch` if a child cannot be started; no new work is
///   started after that, but children already running are drained first
pub async fn run_parallel<W, F>(
    store: &dyn Store,
    repos: &[RepoId],
    command: &[String],
    max_processes: usize,
    mode: OutputMode,
    out: &mut W,
    shutdown: F,
) -> Result<ParallelReport, DispatchError>
where
    W: Write,
    F: Future<Output = ()>,
{
    if max_processes == 0 {
        return Err(DispatchError::InvalidBudget);
    }
    let (program, args) = split_command(command)?;

    let permits = Arc::new(Semaphore::new(max_processes));
    let mut active: JoinSet<Finished> = JoinSet::new();
    let mut report = ParallelReport::default();
    let mut launch_error = None;

    let mut pending = repos.iter();
    let mut next = next_target(store, &mut pending, &mut report.missing);

    tokio::pin!(shutdown);

    while next.is_some() || !active.is_empty() {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                warn!("interrupted, leaving {} running command(s)", active.len());
                report.interrupted = true;
                break;
            }

            Some(joined) = active.join_next(), if !active.is_empty() => {
                match joined {
                    Ok((repo, Ok(output))) => {
                        let result = ExecOutput::from_output(repo, output);
                        render(out, mode, &result)?;
                        report.completed.push(result);
                    }
                    Ok((repo, Err(e))) => warn!("{}: failed to collect output: {}", repo, e),
                    Err(e) => warn!("command task failed: {}", e),
                }
            }

            permit = permits.clone().acquire_owned(), if next.is_some() => {
                let Ok(permit) = permit else { break };
                let Some(target) = next.take() else { continue };

                debug!(repo = %target.repo, path = %target.path.display(), "starting {}", program);
                let spawned = Command::new(program)
                    .args(args)
                    .current_dir(&target.path)
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .spawn();

                match spawned {
                    Ok(child) => {
                        let repo = target.repo;
                        active.spawn(async move {
                            let output = child.wait_with_output().await;
                            drop(permit);
                            (repo, output)
                        });
                        next = next_target(store, &mut pending, &mut report.missing);
                    }
                    Err(source) => {
                        launch_error = Some(DispatchError::Launch {
                            program: program.to_string(),
                            path: target.path,
                            source,
                        });
                    }
                }
            }
        }
    }

    out.flush()?;

    match launch_error {
        Some(err) => Err(err),
        None => Ok(report),
    }
}
