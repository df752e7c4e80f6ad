//! In-memory volume for testing.

use crate::error::{VolumeError, VolumeResult};
use crate::snapshot::{now_ms, SnapshotId, SnapshotInfo, SnapshotProvider};
use crate::store::FileStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// An in-memory volume.
///
/// Stores all files and the full snapshot history in memory. Suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral volumes that don't need persistence
///
/// # Thread Safety
///
/// This volume is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use voltx_volume::{FileStore, MemoryVolume};
/// use std::path::Path;
///
/// let volume = MemoryVolume::new();
/// volume.write(Path::new("f.txt"), b"data").unwrap();
/// assert_eq!(volume.read(Path::new("f.txt")).unwrap(), b"data");
/// ```
#[derive(Debug)]
pub struct MemoryVolume {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    history: RwLock<Vec<(SnapshotInfo, BTreeMap<PathBuf, Vec<u8>>)>>,
    next_snapshot: AtomicU64,
}

impl Default for MemoryVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVolume {
    /// Creates a new empty in-memory volume.
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            history: RwLock::new(Vec::new()),
            next_snapshot: AtomicU64::new(1),
        }
    }

    /// Creates a volume pre-populated with the given files.
    ///
    /// Useful for setting up test scenarios.
    #[must_use]
    pub fn with_files(files: impl IntoIterator<Item = (PathBuf, Vec<u8>)>) -> Self {
        let volume = Self::new();
        *volume.files.write() = files.into_iter().collect();
        volume
    }

    /// Returns the number of files currently on the volume.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    /// Returns the number of recorded snapshots.
    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.history.read().len()
    }
}

impl FileStore for MemoryVolume {
    fn read(&self, path: &Path) -> VolumeResult<Vec<u8>> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| VolumeError::not_found(path))
    }

    fn write(&self, path: &Path, content: &[u8]) -> VolumeResult<()> {
        self.files.write().insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> VolumeResult<bool> {
        Ok(self.files.read().contains_key(path))
    }

    fn rename(&self, from: &Path, to: &Path) -> VolumeResult<()> {
        let mut files = self.files.write();
        match files.remove(from) {
            Some(content) => {
                files.insert(to.to_path_buf(), content);
                Ok(())
            }
            None => Err(VolumeError::write_failed(
                from,
                io::Error::new(io::ErrorKind::NotFound, "rename source missing"),
            )),
        }
    }

    fn remove(&self, path: &Path) -> VolumeResult<()> {
        self.files
            .write()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| VolumeError::not_found(path))
    }

    fn list(&self, dir: &Path) -> VolumeResult<Vec<PathBuf>> {
        let files = self.files.read();
        Ok(files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }
}

impl SnapshotProvider for MemoryVolume {
    fn create_snapshot(&self, name: &str) -> VolumeResult<SnapshotId> {
        let mut history = self.history.write();
        let id = SnapshotId::new(self.next_snapshot.fetch_add(1, Ordering::SeqCst));
        let info = SnapshotInfo {
            id,
            name: name.to_string(),
            created_at_ms: now_ms(),
        };
        let contents = self.files.read().clone();
        history.push((info, contents));
        Ok(id)
    }

    fn latest_snapshot(&self) -> VolumeResult<Option<SnapshotId>> {
        Ok(self.history.read().last().map(|(info, _)| info.id))
    }

    fn snapshots(&self) -> VolumeResult<Vec<SnapshotInfo>> {
        Ok(self
            .history
            .read()
            .iter()
            .map(|(info, _)| info.clone())
            .collect())
    }

    fn rollback(&self, id: SnapshotId) -> VolumeResult<()> {
        let history = self.history.read();
        let (_, contents) = history
            .iter()
            .find(|(info, _)| info.id == id)
            .ok_or_else(|| VolumeError::rollback_failed(id, "unknown snapshot"))?;
        *self.files.write() = contents.clone();
        Ok(())
    }
}
