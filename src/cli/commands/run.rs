//! do and pardo commands
//!
//! # Example
//!
//! ```bash
//! git-all do /work -- git status -s
//! git-all pardo @/acme -p 8 -c -- git pull --ff-only
//! ```

use std::io;

use anyhow::Result;

use super::{open_store, resolve, runtime};
use crate::cli::Context;
use crate::dispatch::{run_parallel, run_sequential, MissingCopy, OutputMode};
use crate::ui::output;

/// Run `command` in each repository, one at a time.
pub fn run_do(ctx: &Context, repos: &str, mode: OutputMode, command: &[String]) -> Result<()> {
    let rt = runtime()?;
    let store = open_store(ctx);
    let repos = resolve(ctx, &rt, &store, repos);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run_sequential(&store, &repos, command, mode, &mut out)?;
    report_missing(ctx, &report.missing);
    Ok(())
}

/// Run `command` in each repository with a bounded number of processes.
///
/// `max_processes` overrides the configured budget.
pub fn pardo(
    ctx: &Context,
    repos: &str,
    mode: OutputMode,
    max_processes: Option<usize>,
    command: &[String],
) -> Result<()> {
    let budget = max_processes.unwrap_or_else(|| ctx.config.max_processes());
    let rt = runtime()?;
    let store = open_store(ctx);
    let repos = resolve(ctx, &rt, &store, repos);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = rt.block_on(run_parallel(
        &store,
        &repos,
        command,
        budget,
        mode,
        &mut out,
        interrupted(),
    ))?;

    report_missing(ctx, &report.missing);
    if report.interrupted {
        output::warn(
            "interrupted; commands already started keep running",
            ctx.verbosity,
        );
    }
    Ok(())
}

fn report_missing(ctx: &Context, missing: &[MissingCopy]) {
    for copy in missing {
        output::warn(
            format!(
                "{}: working copy {} no longer exists, skipping",
                copy.repo,
                copy.path.display()
            ),
            ctx.verbosity,
        );
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await
    }
}
