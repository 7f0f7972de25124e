//! repos, register and install commands
//!
//! # Example
//!
//! ```bash
//! # Bind working copies already checked out under ~/src
//! git-all register @/acme -l ~/src
//!
//! # Clone whatever is missing
//! git-all install /work -l ~/src
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{open_store, resolve, runtime, save};
use crate::binder::{BindError, Binder, Installed};
use crate::cli::Context;
use crate::git::SystemGit;
use crate::store::Store;
use crate::ui::output;

/// Print each location followed by the repositories under it.
pub fn repos(ctx: &Context) -> Result<()> {
    let store = open_store(ctx);

    for location in store.locations() {
        let members: Vec<_> = store.repos_at(&location).into_iter().collect();
        println!(
            "{}",
            output::format_section(location.display(), &members)
        );
    }
    Ok(())
}

/// Bind working copies that already exist under `location`.
pub fn register(ctx: &Context, repos: &str, location: Option<&Path>) -> Result<()> {
    let parent = absolute(location)?;
    let rt = runtime()?;
    let mut store = open_store(ctx);

    let mut repos = resolve(ctx, &rt, &store, repos);
    repos.sort();

    let git = SystemGit::new();
    let binder = Binder::new(&git, ctx.config.remote_prefix());

    for repo in &repos {
        match binder.register(&mut store, repo, &parent) {
            Ok(_) => output::print(format!("Registering {}", repo), ctx.verbosity),
            Err(BindError::NotFound { .. }) => {
                output::notice(format!("No repository found: {}", repo), ctx.verbosity)
            }
            Err(e) => output::warn(e, ctx.verbosity),
        }
    }
    save(&mut store)
}

/// Bind working copies under `location`, cloning the missing ones.
pub fn install(ctx: &Context, repos: &str, location: Option<&Path>) -> Result<()> {
    let parent = absolute(location)?;
    let rt = runtime()?;
    let mut store = open_store(ctx);

    let mut repos = resolve(ctx, &rt, &store, repos);
    repos.sort();

    let git = SystemGit::new();
    let binder = Binder::new(&git, ctx.config.remote_prefix());

    for repo in &repos {
        let announce = |outcome: Installed| {
            let message = match outcome {
                Installed::Registered => {
                    format!("Repository already found: {}, registering...", repo)
                }
                Installed::Cloned => format!("Cloning {}", repo),
            };
            output::print(message, ctx.verbosity);
        };

        if let Err(e) = binder.install(&mut store, repo, &parent, announce) {
            output::warn(e, ctx.verbosity);
        }
    }
    save(&mut store)
}

/// `location` made absolute, defaulting to the current directory.
fn absolute(location: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    Ok(match location {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd,
    })
}
