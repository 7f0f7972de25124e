//! store::file_store
//!
//! JSON-file backed [`Store`].
//!
//! # Lifecycle
//!
//! - [`FileStore::open`] loads the file once. A missing file is an empty
//!   store; an unreadable or unparseable file is also an empty store, with a
//!   warning, and the original file is moved aside on the next flush.
//! - All reads and writes between open and flush hit memory only.
//! - [`FileStore::flush`] writes the file once, and only if something
//!   changed. Nothing is written on drop.
//!
//! # Security
//!
//! - The file holds credentials; on Unix it is written with 0600 permissions
//! - All writes are atomic (write to temp file, then rename)
//! - Credentials are NEVER logged, printed, or included in error messages

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::state::State;
use super::traits::{Store, StoreError};
use crate::core::types::RepoId;

/// File-backed state store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: State,
    dirty: bool,
    /// The file existed but could not be loaded.
    unreadable: bool,
}

impl FileStore {
    /// Load the store at `path`.
    ///
    /// Never fails: read problems degrade to an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (state, unreadable) = match Self::read_state(&path) {
            Ok(state) => (state, false),
            Err(e) => {
                tracing::warn!("{}; starting from an empty state", e);
                (State::new(), true)
            }
        };
        tracing::debug!(path = %path.display(), "loaded state");

        Self {
            path,
            state,
            dirty: false,
            unreadable,
        }
    }

    /// Get the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are mutations not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The in-memory state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Write pending mutations to disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteError` if the file cannot be written.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        if self.unreadable && self.path.exists() {
            let aside = self.path.with_extension("json.bak");
            tracing::warn!("moving unreadable state file to {}", aside.display());
            fs::rename(&self.path, &aside).map_err(|e| {
                StoreError::WriteError(format!("cannot move unreadable state aside: {}", e))
            })?;
            self.unreadable = false;
        }

        self.write_state()?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "flushed state");
        Ok(())
    }

    fn read_state(path: &Path) -> Result<State, StoreError> {
        if !path.exists() {
            return Ok(State::new());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::ReadError(format!("cannot read state file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| StoreError::ReadError(format!("cannot parse state file: {}", e)))
    }

    fn write_state(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&self.state)
            .map_err(|e| StoreError::WriteError(format!("cannot serialize state: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| StoreError::WriteError(format!("cannot create temp file: {}", e)))?;

            // Restrict permissions before any credential hits the disk.
            #[cfg(unix)]
            {
                let permissions = fs::Permissions::from_mode(0o600);
                file.set_permissions(permissions).map_err(|e| {
                    StoreError::WriteError(format!("cannot set permissions: {}", e))
                })?;
            }

            file.write_all(content.as_bytes())
                .map_err(|e| StoreError::WriteError(format!("cannot write state: {}", e)))?;

            file.sync_all()
                .map_err(|e| StoreError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::WriteError(format!("cannot rename temp file: {}", e)))?;

        Ok(())
    }

    fn touch(&mut self) -> &mut State {
        self.dirty = true;
        &mut self.state
    }
}

impl Store for FileStore {
    fn credentials(&self, user: &str) -> Option<String> {
        self.state.credentials(user)
    }

    fn set_credentials(&mut self, user: &str, secret: &str) {
        self.touch().set_credentials(user, secret);
    }

    fn remove_credentials(&mut self, user: &str) {
        self.touch().remove_credentials(user);
    }

    fn users(&self) -> Vec<String> {
        self.state.users()
    }

    fn default_user(&self) -> Option<String> {
        self.state.default_user()
    }

    fn set_default_user(&mut self, user: Option<&str>) {
        self.touch().set_default_user(user);
    }

    fn groups(&self) -> Vec<String> {
        self.state.groups()
    }

    fn group(&self, name: &str) -> BTreeSet<RepoId> {
        self.state.group(name)
    }

    fn add_to_group(&mut self, name: &str, repos: &[RepoId]) {
        self.touch().add_to_group(name, repos);
    }

    fn remove_group(&mut self, name: &str) {
        self.touch().remove_group(name);
    }

    fn bind_repo_path(&mut self, repo: &RepoId, path: &Path) {
        self.touch().bind_repo_path(repo, path);
    }

    fn repo_path(&self, repo: &RepoId) -> Option<PathBuf> {
        self.state.repo_path(repo)
    }

    fn add_location_repo(&mut self, path: &Path, repo: &RepoId) {
        self.touch().add_location_repo(path, repo);
    }

    fn locations(&self) -> Vec<PathBuf> {
        self.state.locations()
    }

    fn repos_at(&self, path: &Path) -> BTreeSet<RepoId> {
        self.state.repos_at(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileStore) {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::open(temp.path().join("state.json"));
        (temp, store)
    }

    fn repo(s: &str) -> RepoId {
        RepoId::new(s).unwrap()
    }

    #[test]
    fn missing_file_is_empty() {
        let (_temp, store) = create_test_store();
        assert!(store.users().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn flush_without_changes_writes_nothing() {
        let (_temp, mut store) = create_test_store();
        store.flush().expect("flush");
        assert!(!store.path().exists());
    }

    #[test]
    fn mutations_mark_dirty() {
        let (_temp, mut store) = create_test_store();
        store.add_to_group("default", &[repo("acme/api")]);
        assert!(store.is_dirty());

        store.flush().expect("flush");
        assert!(!store.is_dirty());
        assert!(store.path().exists());
    }

    #[test]
    fn persistence_across_instances() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("state.json");

        {
            let mut store = FileStore::open(&path);
            store.set_credentials("alice", "c2VjcmV0");
            store.set_default_user(Some("alice"));
            store.record_binding(&repo("acme/api"), Path::new("/src"));
            store.flush().expect("flush");
        }

        {
            let store = FileStore::open(&path);
            assert_eq!(store.credentials("alice").as_deref(), Some("c2VjcmV0"));
            assert_eq!(store.default_user().as_deref(), Some("alice"));
            assert_eq!(store.repo_path(&repo("acme/api")), Some(PathBuf::from("/src")));
            assert!(store.state().is_consistent());
        }
    }

    #[test]
    fn nothing_written_on_drop() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("state.json");

        {
            let mut store = FileStore::open(&path);
            store.set_credentials("alice", "x");
        }

        assert!(!path.exists());
    }

    #[test]
    fn creates_directory_if_missing() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("nested").join("state.json");
        let mut store = FileStore::open(&path);

        store.add_to_group("g", &[repo("acme/a")]);
        store.flush().expect("flush");

        assert!(path.exists());
    }

    #[test]
    fn unparseable_file_is_empty_and_moved_aside() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("state.json");
        fs::write(&path, "{ not json").expect("write garbage");

        let mut store = FileStore::open(&path);
        assert!(store.users().is_empty());

        store.set_credentials("alice", "x");
        store.flush().expect("flush");

        let aside = temp.path().join("state.json.bak");
        assert_eq!(fs::read_to_string(aside).expect("read backup"), "{ not json");
        assert_eq!(
            FileStore::open(&path).credentials("alice").as_deref(),
            Some("x")
        );
    }

    #[cfg(unix)]
    #[test]
    fn permissions_0600_on_unix() {
        let (_temp, mut store) = create_test_store();
        store.set_credentials("alice", "x");
        store.flush().expect("flush");

        let metadata = fs::metadata(store.path()).expect("metadata");
        let mode = metadata.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "permissions should be 0600");
    }

    #[test]
    fn written_file_has_no_plaintext_debug_leak() {
        let (_temp, mut store) = create_test_store();
        store.set_credentials("alice", "c2VjcmV0");
        let debug = format!("{:?}", store);
        assert!(!debug.contains("c2VjcmV0"));
    }
}
