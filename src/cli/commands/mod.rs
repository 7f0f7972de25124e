//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the state file once
//! 2. Calls into the library (resolver, binder, dispatcher)
//! 3. Formats and displays output
//! 4. Flushes the state file once, if it changed
//!
//! # Async Commands
//!
//! Resolution may query the remote directory and `pardo` supervises child
//! processes, both async. Handlers build a current-thread tokio runtime and
//! `block_on` the async part so the rest of the CLI stays synchronous.

mod completion;
mod groups;
mod repos;
mod run;
mod users;

pub use completion::completion;
pub use groups::{add_repo, drop_group, groups, list_group};
pub use repos::{install, register, repos};
pub use run::{pardo, run_do};
pub use users::{add_user, drop_user, users};

use anyhow::{Context as _, Result};
use tokio::runtime::Runtime;

use super::args::Command;
use super::Context;
use crate::core::types::RepoId;
use crate::directory::BitbucketDirectory;
use crate::dispatch::OutputMode;
use crate::resolve::Resolver;
use crate::store::{FileStore, Store};
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Users => users::users(ctx),
        Command::Groups => groups::groups(ctx),
        Command::Repos => repos::repos(ctx),

        Command::AddUser {
            user,
            password_stdin,
        } => users::add_user(ctx, user.as_deref(), password_stdin),
        Command::DropUser { users } => users::drop_user(ctx, users.as_deref()),

        Command::AddRepo { repos, groups } => groups::add_repo(ctx, &repos, &groups),
        Command::ListGroup { groups } => groups::list_group(ctx, &groups),
        Command::DropGroup { groups } => groups::drop_group(ctx, &groups),

        Command::Register { repos, location } => {
            repos::register(ctx, &repos, location.as_deref())
        }
        Command::Install { repos, location } => repos::install(ctx, &repos, location.as_deref()),

        Command::Do {
            repos,
            output,
            command,
        } => run::run_do(
            ctx,
            &repos,
            OutputMode::from_flags(output.silent, output.clean),
            &command,
        ),
        Command::Pardo {
            repos,
            output,
            max_processes,
            command,
        } => run::pardo(
            ctx,
            &repos,
            OutputMode::from_flags(output.silent, output.clean),
            max_processes.map(|n| n as usize),
            &command,
        ),

        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Open the state file named by the context.
fn open_store(ctx: &Context) -> FileStore {
    FileStore::open(ctx.state_path.clone())
}

/// Flush the state file if anything changed.
fn save(store: &mut FileStore) -> Result<()> {
    let path = store.path().display().to_string();
    store
        .flush()
        .with_context(|| format!("failed to save state to {}", path))
}

/// Build the runtime used for remote lookups and parallel dispatch.
fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

/// Resolve an expression, printing a warning for every skipped clause.
fn resolve(ctx: &Context, rt: &Runtime, store: &dyn Store, expression: &str) -> Vec<RepoId> {
    let directory = BitbucketDirectory::with_api_base(ctx.config.api_base());
    let resolution = rt.block_on(
        Resolver::new(store, &directory).resolve(expression, ctx.user.as_deref()),
    );

    for skipped in &resolution.skipped {
        output::warn(format!("skipped: {}", skipped), ctx.verbosity);
    }
    resolution.repos
}

/// Expand a comma-separated group list; `_` means every existing group.
fn group_names(spec: &str, store: &dyn Store) -> Vec<String> {
    list_or_all(spec, || store.groups())
}

/// Split a comma list, or call `all` for `_`.
fn list_or_all(spec: &str, all: impl FnOnce() -> Vec<String>) -> Vec<String> {
    if spec.trim() == "_" {
        return all();
    }
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::State;

    #[test]
    fn group_list_expansion() {
        let mut state = State::new();
        state.add_to_group("web", &[RepoId::new("acme/site").unwrap()]);
        state.add_to_group("api", &[RepoId::new("acme/api").unwrap()]);

        assert_eq!(group_names("_", &state), vec!["api", "web"]);
        assert_eq!(group_names("web, ,other", &state), vec!["web", "other"]);
        assert_eq!(group_names("default", &state), vec!["default"]);
    }
}
