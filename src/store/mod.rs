//! store
//!
//! Persisted users, groups and repository locations.
//!
//! # Architecture
//!
//! State is accessed through the [`Store`] trait, which has two
//! implementations:
//!
//! - [`State`]: plain in-memory state, also the on-disk document shape
//! - [`FileStore`]: loads a JSON file once and flushes it once
//!
//! # Lifecycle
//!
//! The CLI opens one `FileStore` per invocation, hands `&dyn Store` /
//! `&mut dyn Store` to the library, and calls [`FileStore::flush`] explicitly
//! before exiting. Dispatch never touches the store concurrently.
//!
//! # Example
//!
//! ```no_run
//! use git_all::core::types::RepoId;
//! use git_all::store::{FileStore, Store};
//!
//! let mut store = FileStore::open("/tmp/git-all-state.json");
//! store.add_to_group("default", &[RepoId::new("acme/api").unwrap()]);
//! store.flush().unwrap();
//! ```

mod file_store;
mod state;
mod traits;

pub use file_store::FileStore;
pub use state::State;
pub use traits::{Store, StoreError};

/// Group expanded by `--` and used when a group argument is omitted.
pub const DEFAULT_GROUP: &str = "default";
