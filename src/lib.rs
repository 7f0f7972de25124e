//! git-all - Run commands across many repositories
//!
//! git-all resolves symbolic repository references (single repositories,
//! saved groups, or Bitbucket team/project queries) into local working
//! copies, then runs an external command in each of them, one at a time or
//! with a bounded number of processes.
//!
//! # Architecture
//!
//! The codebase is layered, leaves first:
//!
//! - [`core`] - Domain types, configuration and storage paths
//! - [`store`] - Persisted users, groups and repository locations
//! - [`directory`] - Remote team/project/repository discovery (Bitbucket)
//! - [`git`] - Single interface for version control operations
//! - [`resolve`] - Repository-reference expressions to repository lists
//! - [`binder`] - Repository identifiers to local working copies
//! - [`dispatch`] - Sequential and bounded-parallel command execution
//! - [`ui`] - User interaction utilities
//! - [`cli`] - Command-line interface layer
//!
//! # Correctness Invariants
//!
//! 1. At most one default user, always naming a stored user
//! 2. A repository appears under a location iff it is bound to it
//! 3. State is loaded once and flushed at most once per invocation
//! 4. A managed command's exit status never fails the invocation

pub mod binder;
pub mod cli;
pub mod core;
pub mod directory;
pub mod dispatch;
pub mod git;
pub mod resolve;
pub mod store;
pub mod ui;
