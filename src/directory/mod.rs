//! directory
//!
//! Abstraction for the remote service that knows which teams, projects and
//! repositories a user can see.
//!
//! # Architecture
//!
//! The `Directory` trait defines the lookup interface. The resolver only
//! talks to `&dyn Directory`; the CLI picks the implementation.
//!
//! - Directory failures never abort a resolution: the clause that needed
//!   them resolves to nothing and a diagnostic is printed
//! - Lookups are read-only
//!
//! # Modules
//!
//! - `traits`: Core `Directory` trait and error type
//! - [`bitbucket`]: Bitbucket Cloud implementation over REST
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use git_all::directory::{BitbucketDirectory, Directory};
//!
//! let dir = BitbucketDirectory::new();
//! let teams = dir.list_teams(&credential).await?.unwrap_or_default();
//! ```

pub mod bitbucket;
pub mod mock;
mod traits;

pub use bitbucket::BitbucketDirectory;
pub use traits::*;
