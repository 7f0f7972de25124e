//! git::mock
//!
//! In-memory [`VersionControl`] for tests.
//!
//! Working copies are a map from path to origin URL. A successful clone
//! registers `<parent>/<name>` with the cloned URL, where `name` is the last
//! URL segment without `.git`; it does not touch the filesystem unless
//! [`MockVcs::creating_dirs`] is set.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::interface::{VcsError, VersionControl};

/// Mock version control port.
#[derive(Debug, Clone, Default)]
pub struct MockVcs {
    inner: Arc<Mutex<MockVcsInner>>,
}

#[derive(Debug, Default)]
struct MockVcsInner {
    remotes: HashMap<PathBuf, String>,
    fail_clone: Option<String>,
    create_dirs: bool,
    clones: Vec<(String, PathBuf)>,
    probes: usize,
}

impl MockVcs {
    /// Create a mock with no working copies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a working copy with `origin` = `url` exists at `path`.
    pub fn with_working_copy(self, path: impl Into<PathBuf>, url: &str) -> Self {
        self.lock().remotes.insert(path.into(), url.to_string());
        self
    }

    /// Make every clone fail with `message`.
    pub fn failing_clones(self, message: &str) -> Self {
        self.lock().fail_clone = Some(message.to_string());
        self
    }

    /// Create the cloned directory on disk.
    pub fn creating_dirs(self) -> Self {
        self.lock().create_dirs = true;
        self
    }

    /// Clones performed so far as `(url, parent)`.
    pub fn clones(&self) -> Vec<(String, PathBuf)> {
        self.lock().clones.clone()
    }

    /// Number of remote probes so far.
    pub fn probes(&self) -> usize {
        self.lock().probes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockVcsInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl VersionControl for MockVcs {
    fn probe_remote(&self, path: &Path) -> Option<String> {
        let mut inner = self.lock();
        inner.probes += 1;
        inner.remotes.get(path).cloned()
    }

    fn clone_repo(&self, remote_url: &str, parent: &Path) -> Result<(), VcsError> {
        let mut inner = self.lock();
        inner
            .clones
            .push((remote_url.to_string(), parent.to_path_buf()));

        if let Some(message) = &inner.fail_clone {
            return Err(VcsError::CloneFailed {
                url: remote_url.to_string(),
                message: message.clone(),
            });
        }

        let name = remote_url
            .trim_end_matches(".git")
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(remote_url);
        let target = parent.join(name);
        if inner.create_dirs {
            std::fs::create_dir_all(&target).map_err(|e| VcsError::CloneFailed {
                url: remote_url.to_string(),
                message: e.to_string(),
            })?;
        }
        inner.remotes.insert(target, remote_url.to_string());
        Ok(())
    }
}
