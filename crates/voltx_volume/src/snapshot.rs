//! Snapshot provider trait definition.

use crate::error::VolumeResult;
use std::fmt;

/// Returns the current Unix timestamp in milliseconds.
pub(crate) fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Identifier for a snapshot.
///
/// Snapshot ids are assigned by the provider, strictly monotonically
/// increasing, and never reused. Their order agrees with creation time, so
/// "latest snapshot" is the maximum id still present on the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(pub u64);

impl SnapshotId {
    /// Creates a new snapshot ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snap:{}", self.0)
    }
}

/// Metadata about a recorded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// The snapshot's identifier.
    pub id: SnapshotId,
    /// The name the snapshot was created under.
    pub name: String,
    /// When the snapshot was created (Unix timestamp in milliseconds).
    pub created_at_ms: u64,
}

/// Point-in-time snapshots of a volume.
///
/// Snapshots are immutable, durable records of the whole volume's state.
/// They form a strictly ordered sequence by creation; rollback replaces the
/// live volume content with a recorded snapshot's content.
///
/// # Invariants
///
/// - `create_snapshot` and `rollback` are atomic at the volume level; the
///   provider serializes them internally
/// - A snapshot, once created, is never mutated (deletion is an external
///   retention concern)
/// - Implementations must be `Send + Sync` for concurrent access
///
/// Failures are reported to the caller, never internally retried.
pub trait SnapshotProvider: Send + Sync {
    /// Creates a durable snapshot of the volume's current state.
    ///
    /// Returns the provider-assigned id. The name is recorded for humans;
    /// ordering and identity are carried by the id.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotFailed` if the snapshot cannot be recorded; the live
    /// volume is left unmodified.
    fn create_snapshot(&self, name: &str) -> VolumeResult<SnapshotId>;

    /// Returns the most recently created snapshot, if any exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot history cannot be enumerated.
    fn latest_snapshot(&self) -> VolumeResult<Option<SnapshotId>>;

    /// Returns all recorded snapshots, ordered by creation time ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot history cannot be enumerated.
    fn snapshots(&self) -> VolumeResult<Vec<SnapshotInfo>>;

    /// Rolls the live volume back to the state recorded in `id`.
    ///
    /// All live content is replaced by the snapshot's content. Snapshots
    /// created after `id` remain recorded.
    ///
    /// # Errors
    ///
    /// Returns `RollbackFailed` if `id` is unknown or the restore fails.
    fn rollback(&self, id: SnapshotId) -> VolumeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_id_ordering() {
        let s1 = SnapshotId::new(1);
        let s2 = SnapshotId::new(2);
        assert!(s1 < s2);
    }

    #[test]
    fn snapshot_id_display() {
        let s = SnapshotId::new(42);
        assert_eq!(format!("{s}"), "snap:42");
    }
}
