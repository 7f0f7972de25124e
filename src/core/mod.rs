//! core
//!
//! Core domain types, configuration and storage paths.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RepoId
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for git-all storage

pub mod config;
pub mod paths;
pub mod types;
