//! Directory-backed volume for persistent storage.

use crate::error::{VolumeError, VolumeResult};
use crate::snapshot::{now_ms, SnapshotId, SnapshotInfo, SnapshotProvider};
use crate::store::FileStore;
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// A directory-backed volume.
///
/// Live files are stored under `<root>/live/`; snapshots are recorded as
/// full copies of the live tree under `<root>/snapshots/<id>/data/`, with a
/// small `meta` file carrying the snapshot's name and creation time. Data
/// survives process restarts, and the snapshot id sequence resumes from the
/// highest id found on disk.
///
/// Snapshot creation and rollback are serialized by an internal lock;
/// individual file operations are not — interference between concurrent
/// writers is what the protocol layer above detects.
///
/// # Example
///
/// ```no_run
/// use voltx_volume::{FileStore, SnapshotProvider, LocalVolume};
/// use std::path::Path;
///
/// let volume = LocalVolume::open(Path::new("/var/lib/voltx/pool")).unwrap();
/// volume.write(Path::new("notes/idea.txt"), b"draft").unwrap();
/// let snap = volume.create_snapshot("after-draft").unwrap();
/// ```
#[derive(Debug)]
pub struct LocalVolume {
    root: PathBuf,
    live: PathBuf,
    snapshots: PathBuf,
    next_snapshot: AtomicU64,
    snapshot_lock: Mutex<()>,
}

impl LocalVolume {
    /// Opens or creates a volume rooted at `root`.
    ///
    /// Creates the `live/` and `snapshots/` directories if they are missing
    /// and resumes the snapshot id sequence from any snapshots already on
    /// disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created or the existing
    /// snapshot history cannot be read.
    pub fn open(root: &Path) -> VolumeResult<Self> {
        let live = root.join("live");
        let snapshots = root.join("snapshots");
        fs::create_dir_all(&live).map_err(|e| VolumeError::write_failed(&live, e))?;
        fs::create_dir_all(&snapshots).map_err(|e| VolumeError::write_failed(&snapshots, e))?;

        let max_id = Self::scan_max_id(&snapshots)
            .map_err(|e| VolumeError::unreadable(&snapshots, e))?;

        Ok(Self {
            root: root.to_path_buf(),
            live,
            snapshots,
            next_snapshot: AtomicU64::new(max_id + 1),
            snapshot_lock: Mutex::new(()),
        })
    }

    /// Returns the volume's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan_max_id(snapshots: &Path) -> io::Result<u64> {
        let mut max = 0u64;
        for entry in fs::read_dir(snapshots)? {
            let entry = entry?;
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|s| s.parse::<u64>().ok())
            {
                max = max.max(id);
            }
        }
        Ok(max)
    }

    /// Resolves a volume-relative path against the live tree.
    ///
    /// Rejects absolute paths and `..` components so no operation can reach
    /// outside the volume.
    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        let mut resolved = self.live.clone();
        for component in path.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("path escapes volume: {}", path.display()),
                    ));
                }
            }
        }
        Ok(resolved)
    }

    fn snapshot_dir(&self, id: SnapshotId) -> PathBuf {
        self.snapshots.join(format!("{:08}", id.as_u64()))
    }

    fn read_info(&self, id: u64, dir: &Path) -> io::Result<SnapshotInfo> {
        let meta = fs::read_to_string(dir.join("meta"))?;
        let mut lines = meta.lines();
        let name = lines.next().unwrap_or_default().to_string();
        let created_at_ms = lines
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "malformed snapshot meta"))?;
        Ok(SnapshotInfo {
            id: SnapshotId::new(id),
            name,
            created_at_ms,
        })
    }

    fn record_snapshot(&self, dir: &Path, name: &str) -> io::Result<()> {
        fs::create_dir(dir)?;
        copy_tree(&self.live, &dir.join("data"))?;
        // Names are a single meta line; the id carries identity.
        let name = name.replace('\n', " ");
        fs::write(dir.join("meta"), format!("{name}\n{}\n", now_ms()))
    }

    fn restore_snapshot(&self, dir: &Path) -> io::Result<()> {
        fs::remove_dir_all(&self.live)?;
        fs::create_dir_all(&self.live)?;
        copy_tree(&dir.join("data"), &self.live)
    }
}

impl FileStore for LocalVolume {
    fn read(&self, path: &Path) -> VolumeResult<Vec<u8>> {
        let resolved = self
            .resolve(path)
            .map_err(|e| VolumeError::unreadable(path, e))?;
        fs::read(&resolved).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => VolumeError::not_found(path),
            _ => VolumeError::unreadable(path, e),
        })
    }

    fn write(&self, path: &Path, content: &[u8]) -> VolumeResult<()> {
        let resolved = self
            .resolve(path)
            .map_err(|e| VolumeError::write_failed(path, e))?;
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent).map_err(|e| VolumeError::write_failed(path, e))?;
        }
        fs::write(&resolved, content).map_err(|e| VolumeError::write_failed(path, e))
    }

    fn exists(&self, path: &Path) -> VolumeResult<bool> {
        let resolved = self
            .resolve(path)
            .map_err(|e| VolumeError::unreadable(path, e))?;
        Ok(resolved.is_file())
    }

    fn rename(&self, from: &Path, to: &Path) -> VolumeResult<()> {
        let resolved_from = self
            .resolve(from)
            .map_err(|e| VolumeError::write_failed(from, e))?;
        let resolved_to = self
            .resolve(to)
            .map_err(|e| VolumeError::write_failed(to, e))?;
        fs::rename(&resolved_from, &resolved_to)
            .map_err(|e| VolumeError::write_failed(from, e))
    }

    fn remove(&self, path: &Path) -> VolumeResult<()> {
        let resolved = self
            .resolve(path)
            .map_err(|e| VolumeError::write_failed(path, e))?;
        fs::remove_file(&resolved).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => VolumeError::not_found(path),
            _ => VolumeError::write_failed(path, e),
        })
    }

    fn list(&self, dir: &Path) -> VolumeResult<Vec<PathBuf>> {
        let resolved = self
            .resolve(dir)
            .map_err(|e| VolumeError::unreadable(dir, e))?;
        if !resolved.is_dir() {
            return Ok(Vec::new());
        }
        let mut listed = Vec::new();
        let entries =
            fs::read_dir(&resolved).map_err(|e| VolumeError::unreadable(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| VolumeError::unreadable(dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| VolumeError::unreadable(dir, e))?;
            if file_type.is_file() {
                listed.push(dir.join(entry.file_name()));
            }
        }
        listed.sort();
        Ok(listed)
    }
}

impl SnapshotProvider for LocalVolume {
    fn create_snapshot(&self, name: &str) -> VolumeResult<SnapshotId> {
        let _guard = self.snapshot_lock.lock();
        let id = SnapshotId::new(self.next_snapshot.fetch_add(1, Ordering::SeqCst));
        let dir = self.snapshot_dir(id);

        if let Err(e) = self.record_snapshot(&dir, name) {
            // Leave no partial snapshot behind.
            let _ = fs::remove_dir_all(&dir);
            return Err(VolumeError::snapshot_failed(name, e.to_string()));
        }
        Ok(id)
    }

    fn latest_snapshot(&self) -> VolumeResult<Option<SnapshotId>> {
        Ok(self.snapshots()?.last().map(|info| info.id))
    }

    fn snapshots(&self) -> VolumeResult<Vec<SnapshotInfo>> {
        let entries = fs::read_dir(&self.snapshots)
            .map_err(|e| VolumeError::unreadable(&self.snapshots, e))?;
        let mut infos = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| VolumeError::unreadable(&self.snapshots, e))?;
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|s| s.parse::<u64>().ok())
            else {
                continue;
            };
            let info = self
                .read_info(id, &entry.path())
                .map_err(|e| VolumeError::unreadable(entry.path(), e))?;
            infos.push(info);
        }
        infos.sort_by_key(|info| info.id);
        Ok(infos)
    }

    fn rollback(&self, id: SnapshotId) -> VolumeResult<()> {
        let _guard = self.snapshot_lock.lock();
        let dir = self.snapshot_dir(id);
        if !dir.is_dir() {
            return Err(VolumeError::rollback_failed(id, "unknown snapshot"));
        }
        self.restore_snapshot(&dir)
            .map_err(|e| VolumeError::rollback_failed(id, e.to_string()))
    }
}

/// Recursively copies the tree at `src` into `dst`.
fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn local_open_creates_layout() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();
        assert!(dir.path().join("live").is_dir());
        assert!(dir.path().join("snapshots").is_dir());
        assert_eq!(volume.root(), dir.path());
    }

    #[test]
    fn local_write_and_read() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        volume.write(Path::new("notes/a.txt"), b"hello").unwrap();
        assert_eq!(volume.read(Path::new("notes/a.txt")).unwrap(), b"hello");
    }

    #[test]
    fn local_read_missing_fails() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        let result = volume.read(Path::new("missing.txt"));
        assert!(matches!(result, Err(VolumeError::NotFound { .. })));
    }

    #[test]
    fn local_path_escape_rejected() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        assert!(volume.read(Path::new("../outside.txt")).is_err());
        assert!(volume.write(Path::new("../outside.txt"), b"x").is_err());
    }

    #[test]
    fn local_rename_replaces_target() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        volume.write(Path::new("a.tmp"), b"new").unwrap();
        volume.write(Path::new("a.txt"), b"old").unwrap();

        volume.rename(Path::new("a.tmp"), Path::new("a.txt")).unwrap();

        assert_eq!(volume.read(Path::new("a.txt")).unwrap(), b"new");
        assert!(!volume.exists(Path::new("a.tmp")).unwrap());
    }

    #[test]
    fn local_remove() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        volume.write(Path::new("a.txt"), b"x").unwrap();
        volume.remove(Path::new("a.txt")).unwrap();
        assert!(!volume.exists(Path::new("a.txt")).unwrap());

        let result = volume.remove(Path::new("a.txt"));
        assert!(matches!(result, Err(VolumeError::NotFound { .. })));
    }

    #[test]
    fn local_list_is_sorted_and_files_only() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        volume.write(Path::new("ideas/b.txt"), b"2").unwrap();
        volume.write(Path::new("ideas/a.txt"), b"1").unwrap();
        volume.write(Path::new("ideas/sub/c.txt"), b"3").unwrap();

        let listed = volume.list(Path::new("ideas")).unwrap();
        assert_eq!(
            listed,
            vec![PathBuf::from("ideas/a.txt"), PathBuf::from("ideas/b.txt")]
        );
    }

    #[test]
    fn local_list_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();
        assert!(volume.list(Path::new("nothing")).unwrap().is_empty());
    }

    #[test]
    fn local_snapshot_and_rollback() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        volume.write(Path::new("f.txt"), b"v1").unwrap();
        let snap = volume.create_snapshot("first").unwrap();

        volume.write(Path::new("f.txt"), b"v2").unwrap();
        volume.write(Path::new("nested/g.txt"), b"extra").unwrap();

        volume.rollback(snap).unwrap();

        assert_eq!(volume.read(Path::new("f.txt")).unwrap(), b"v1");
        assert!(!volume.exists(Path::new("nested/g.txt")).unwrap());
    }

    #[test]
    fn local_latest_snapshot_ordering() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();
        assert!(volume.latest_snapshot().unwrap().is_none());

        let s1 = volume.create_snapshot("one").unwrap();
        let s2 = volume.create_snapshot("two").unwrap();

        assert!(s2 > s1);
        assert_eq!(volume.latest_snapshot().unwrap(), Some(s2));
    }

    #[test]
    fn local_snapshots_enumeration() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        volume.create_snapshot("one").unwrap();
        volume.create_snapshot("two").unwrap();

        let snaps = volume.snapshots().unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].name, "one");
        assert_eq!(snaps[1].name, "two");
        assert!(snaps[0].created_at_ms <= snaps[1].created_at_ms);
    }

    #[test]
    fn local_rollback_unknown_id_fails() {
        let dir = tempdir().unwrap();
        let volume = LocalVolume::open(dir.path()).unwrap();

        let result = volume.rollback(SnapshotId::new(99));
        assert!(matches!(result, Err(VolumeError::RollbackFailed { .. })));
    }

    #[test]
    fn local_id_sequence_survives_reopen() {
        let dir = tempdir().unwrap();

        let first = {
            let volume = LocalVolume::open(dir.path()).unwrap();
            volume.write(Path::new("f.txt"), b"v1").unwrap();
            volume.create_snapshot("one").unwrap()
        };

        let volume = LocalVolume::open(dir.path()).unwrap();
        let second = volume.create_snapshot("two").unwrap();

        assert!(second > first);
        assert_eq!(volume.latest_snapshot().unwrap(), Some(second));
    }

    #[test]
    fn local_persistence_across_reopen() {
        let dir = tempdir().unwrap();

        {
            let volume = LocalVolume::open(dir.path()).unwrap();
            volume.write(Path::new("f.txt"), b"persistent").unwrap();
        }

        let volume = LocalVolume::open(dir.path()).unwrap();
        assert_eq!(volume.read(Path::new("f.txt")).unwrap(), b"persistent");
    }
}
