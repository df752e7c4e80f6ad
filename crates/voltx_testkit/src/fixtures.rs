//! Volume fixtures with automatic cleanup.
//!
//! Provides convenience wrappers that pair a volume with a coordinator and,
//! for on-disk volumes, keep the temporary directory alive for the fixture's
//! lifetime.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use voltx_core::TransactionCoordinator;
use voltx_volume::{FileStore, LocalVolume, MemoryVolume, SnapshotProvider};

/// A test volume paired with a coordinator.
pub struct TestVolume<V> {
    /// The volume instance.
    pub volume: Arc<V>,
    /// A coordinator driving the protocol against `volume`.
    pub coordinator: Arc<TransactionCoordinator>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestVolume<MemoryVolume> {
    /// Creates a new in-memory test volume.
    pub fn memory() -> Self {
        let volume = Arc::new(MemoryVolume::new());
        let coordinator = Arc::new(TransactionCoordinator::with_volume(
            "testpool",
            volume.clone(),
        ));
        Self {
            volume,
            coordinator,
            _temp_dir: None,
        }
    }
}

impl TestVolume<LocalVolume> {
    /// Creates a new directory-backed test volume under a temp directory.
    pub fn local() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let volume = Arc::new(
            LocalVolume::open(temp_dir.path()).expect("Failed to open local volume"),
        );
        let coordinator = Arc::new(TransactionCoordinator::with_volume(
            "testpool",
            volume.clone(),
        ));
        Self {
            volume,
            coordinator,
            _temp_dir: Some(temp_dir),
        }
    }
}

impl<V> TestVolume<V>
where
    V: FileStore + SnapshotProvider,
{
    /// Writes a file directly on the volume and records a seed snapshot.
    ///
    /// Gives conflict scenarios a recovery point to roll back to.
    pub fn seed(&self, path: &Path, content: &[u8]) {
        self.volume
            .write(path, content)
            .expect("Failed to seed file");
        self.volume
            .create_snapshot("seed")
            .expect("Failed to seed snapshot");
    }
}

/// Runs a test with a fresh in-memory volume.
pub fn with_memory_volume<F, R>(f: F) -> R
where
    F: FnOnce(&TestVolume<MemoryVolume>) -> R,
{
    let fixture = TestVolume::memory();
    f(&fixture)
}

/// Runs a test with a fresh directory-backed volume.
pub fn with_local_volume<F, R>(f: F) -> R
where
    F: FnOnce(&TestVolume<LocalVolume>) -> R,
{
    let fixture = TestVolume::local();
    f(&fixture)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use std::path::PathBuf;

    /// Creates an in-memory volume pre-populated with `file_count` files and
    /// one seed snapshot covering all of them.
    pub fn seeded_volume(file_count: usize) -> TestVolume<MemoryVolume> {
        let fixture = TestVolume::memory();
        for i in 0..file_count {
            let path = PathBuf::from(format!("file-{i}.txt"));
            fixture
                .volume
                .write(&path, format!("initial content {i}").as_bytes())
                .expect("Failed to seed file");
        }
        fixture
            .volume
            .create_snapshot("seed")
            .expect("Failed to seed snapshot");
        fixture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_fixture_starts_empty() {
        let fixture = TestVolume::memory();
        assert_eq!(fixture.volume.file_count(), 0);
    }

    #[test]
    fn local_fixture_is_usable() {
        with_local_volume(|fixture| {
            fixture.seed(Path::new("f.txt"), b"seeded");
            assert_eq!(fixture.volume.read(Path::new("f.txt")).unwrap(), b"seeded");
            assert!(fixture.volume.latest_snapshot().unwrap().is_some());
        });
    }

    #[test]
    fn seeded_scenario() {
        let fixture = scenarios::seeded_volume(3);
        assert_eq!(fixture.volume.file_count(), 3);
        assert_eq!(fixture.volume.snapshot_count(), 1);
    }
}
