//! Per-run scratch directories.

use crate::BuildError;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

const SCRATCH_PREFIX: &str = ".verify-source-map";

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A freshly created directory owned by a single run.
///
/// Names are `<root>/.verify-source-map<N>` with `N` taken from a
/// process-wide counter, so concurrent runs never share a directory. The
/// directory is removed by [`ScratchDir::remove`], or on drop if the run
/// ended before reaching it.
#[derive(Debug)]
pub struct ScratchDir {
    path: Utf8PathBuf,
    keep: bool,
    removed: bool,
}

impl ScratchDir {
    /// Creates the next scratch directory under `root`.
    ///
    /// A leftover directory with the same name from an earlier, interrupted
    /// process is cleared first.
    pub async fn create(root: &Utf8Path) -> Result<Self, BuildError> {
        let index = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = root.join(format!("{SCRATCH_PREFIX}{index}"));

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(%path, "clearing stale scratch directory");
            tokio::fs::remove_dir_all(&path)
                .await
                .map_err(|e| BuildError::io(&path, e))?;
        }

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| BuildError::io(&path, e))?;
        debug!(%path, "created scratch directory");

        Ok(Self {
            path,
            keep: false,
            removed: false,
        })
    }

    /// Leaves the directory on disk after the run.
    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    #[inline]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Recursively removes the directory, unless it is kept.
    pub async fn remove(mut self) -> Result<(), BuildError> {
        if self.keep {
            info!(path = %self.path, "keeping scratch directory");
            self.removed = true;
            return Ok(());
        }

        tokio::fs::remove_dir_all(&self.path)
            .await
            .map_err(|e| BuildError::io(&self.path, e))?;
        self.removed = true;
        debug!(path = %self.path, "removed scratch directory");
        Ok(())
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.removed && !self.keep {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[tokio::test]
    async fn test_names_never_collide() {
        let (_guard, root) = temp_root();
        let first = ScratchDir::create(&root).await.unwrap();
        let second = ScratchDir::create(&root).await.unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first.path().is_dir());
        assert!(second.path().is_dir());
        assert!(first
            .path()
            .file_name()
            .unwrap()
            .starts_with(SCRATCH_PREFIX));
    }

    #[tokio::test]
    async fn test_remove_deletes_contents() {
        let (_guard, root) = temp_root();
        let scratch = ScratchDir::create(&root).await.unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::create_dir_all(path.join("nested")).unwrap();
        std::fs::write(path.join("nested/a.js"), "x").unwrap();

        scratch.remove().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let (_guard, root) = temp_root();
        let scratch = ScratchDir::create(&root).await.unwrap();
        let path = scratch.path().to_path_buf();
        drop(scratch);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_kept_directory_survives() {
        let (_guard, root) = temp_root();
        let scratch = ScratchDir::create(&root).await.unwrap().keep(true);
        let path = scratch.path().to_path_buf();

        scratch.remove().await.unwrap();
        assert!(path.is_dir());
    }
}
