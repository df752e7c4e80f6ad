//! Error types for volume operations.

use crate::snapshot::SnapshotId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for volume operations.
pub type VolumeResult<T> = Result<T, VolumeError>;

/// Errors that can occur during volume operations.
#[derive(Debug, Error)]
pub enum VolumeError {
    /// The path does not exist on the volume.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The path exists but its content could not be read.
    #[error("unreadable: {path}: {source}")]
    IoUnreadable {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The content could not be written, renamed, or removed.
    #[error("write failed: {path}: {source}")]
    WriteFailed {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The path already exists and the operation requires it not to.
    #[error("already exists: {path}")]
    AlreadyExists {
        /// The path that already exists.
        path: PathBuf,
    },

    /// The provider could not create a snapshot.
    #[error("snapshot failed: {name}: {message}")]
    SnapshotFailed {
        /// The name the snapshot would have had.
        name: String,
        /// Description of the failure.
        message: String,
    },

    /// The provider could not roll the volume back.
    #[error("rollback failed: {id}: {message}")]
    RollbackFailed {
        /// The snapshot that was the rollback target.
        id: SnapshotId,
        /// Description of the failure.
        message: String,
    },
}

impl VolumeError {
    /// Creates a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an unreadable error.
    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Creates a write-failed error.
    pub fn write_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Creates an already-exists error.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Creates a snapshot-failed error.
    pub fn snapshot_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SnapshotFailed {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a rollback-failed error.
    pub fn rollback_failed(id: SnapshotId, message: impl Into<String>) -> Self {
        Self::RollbackFailed {
            id,
            message: message.into(),
        }
    }
}
