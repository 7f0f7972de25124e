//! cli
//!
//! Command-line interface layer for git-all.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and build the [`Context`]
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Resolution, binding and dispatch live in the
//! library modules; handlers wire them to the state file, the Bitbucket
//! directory and the system `git`, and print the results.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::Verbosity;
use crate::ui::prompts;

/// Everything a command handler needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,
    /// State file to open
    pub state_path: PathBuf,
    /// Acting user for `@` references
    pub user: Option<String>,
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Whether prompts may be shown
    pub interactive: bool,
}

/// Run the CLI application with already-parsed arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    // --state beats $GIT_ALL_STATE, which beats the config file.
    let state_path = match cli.state {
        Some(path) => path,
        None => config.state_path()?,
    };

    let ctx = Context {
        config,
        state_path,
        user: cli.user,
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        interactive: prompts::is_interactive(),
    };

    commands::dispatch(cli.command, &ctx)
}
