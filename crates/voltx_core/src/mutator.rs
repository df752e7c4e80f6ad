//! All-or-nothing publication of new file content.

use crate::error::CoreResult;
use crate::types::TransactionId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use voltx_volume::FileStore;

/// Publishes new content to a file without ever exposing a partial write.
///
/// The mutator writes the new content to a staging path collocated with the
/// target, then atomically renames it over the target. Readers observe
/// either the old content or the new content in full — never a mixture.
///
/// On any failure the staging artifact is removed (best effort) and the
/// live file is left unmodified. There is no separate reaper: failure-path
/// cleanup is the mutator's own responsibility.
#[derive(Clone)]
pub struct AtomicMutator {
    store: Arc<dyn FileStore>,
}

impl AtomicMutator {
    /// Creates a mutator over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Atomically replaces the content of `path` with `content`.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if staging or the final rename fails; the live
    /// file keeps its previous content and no staging artifact remains.
    pub fn publish(&self, path: &Path, txn: TransactionId, content: &[u8]) -> CoreResult<()> {
        let staging = staging_path(path, txn);
        debug!(path = %path.display(), staging = %staging.display(), "publishing");

        if let Err(e) = self.store.write(&staging, content) {
            let _ = self.store.remove(&staging);
            return Err(e.into());
        }
        if let Err(e) = self.store.rename(&staging, path) {
            let _ = self.store.remove(&staging);
            return Err(e.into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for AtomicMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicMutator").finish_non_exhaustive()
    }
}

/// Returns the staging path for a transaction's write to `path`.
///
/// Collocated with the target so the final rename stays within one
/// directory (and, for on-disk volumes, one filesystem).
fn staging_path(path: &Path, txn: TransactionId) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".tx{}.tmp", txn.as_u64()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltx_volume::{MemoryVolume, VolumeError, VolumeResult};

    /// Store whose renames always fail, for exercising the failure path.
    struct RenameFailStore(MemoryVolume);

    impl FileStore for RenameFailStore {
        fn read(&self, path: &Path) -> VolumeResult<Vec<u8>> {
            self.0.read(path)
        }
        fn write(&self, path: &Path, content: &[u8]) -> VolumeResult<()> {
            self.0.write(path, content)
        }
        fn exists(&self, path: &Path) -> VolumeResult<bool> {
            self.0.exists(path)
        }
        fn rename(&self, from: &Path, _to: &Path) -> VolumeResult<()> {
            Err(VolumeError::write_failed(
                from,
                std::io::Error::new(std::io::ErrorKind::Other, "injected rename failure"),
            ))
        }
        fn remove(&self, path: &Path) -> VolumeResult<()> {
            self.0.remove(path)
        }
        fn list(&self, dir: &Path) -> VolumeResult<Vec<PathBuf>> {
            self.0.list(dir)
        }
    }

    #[test]
    fn publish_replaces_content() {
        let store = Arc::new(MemoryVolume::new());
        store.write(Path::new("f.txt"), b"old").unwrap();

        let mutator = AtomicMutator::new(store.clone());
        mutator
            .publish(Path::new("f.txt"), TransactionId::new(1), b"new")
            .unwrap();

        assert_eq!(store.read(Path::new("f.txt")).unwrap(), b"new");
    }

    #[test]
    fn publish_leaves_no_staging_artifact() {
        let store = Arc::new(MemoryVolume::new());
        store.write(Path::new("dir/f.txt"), b"old").unwrap();

        let mutator = AtomicMutator::new(store.clone());
        mutator
            .publish(Path::new("dir/f.txt"), TransactionId::new(3), b"new")
            .unwrap();

        assert_eq!(store.file_count(), 1);
    }

    #[test]
    fn failed_publish_leaves_live_file_unmodified() {
        let inner = MemoryVolume::new();
        inner.write(Path::new("f.txt"), b"old").unwrap();
        let store = Arc::new(RenameFailStore(inner));

        let mutator = AtomicMutator::new(store.clone());
        let result = mutator.publish(Path::new("f.txt"), TransactionId::new(1), b"new");

        assert!(result.is_err());
        assert_eq!(store.read(Path::new("f.txt")).unwrap(), b"old");
        // The staging artifact was cleaned up.
        assert_eq!(store.0.file_count(), 1);
    }

    #[test]
    fn staging_path_is_collocated() {
        let staging = staging_path(Path::new("notes/idea.txt"), TransactionId::new(12));
        assert_eq!(staging, PathBuf::from("notes/idea.txt.tx12.tmp"));
    }
}
