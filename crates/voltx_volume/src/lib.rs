//! # Voltx Volume
//!
//! Volume abstractions for Voltx.
//!
//! This crate provides the lowest-level storage abstraction for Voltx.
//! A volume is two things:
//!
//! - a [`FileStore`]: plain read/write/rename/delete of opaque byte content
//!   at volume-relative paths, with no concurrency semantics of its own;
//! - a [`SnapshotProvider`]: named, durable, point-in-time snapshots of the
//!   whole volume, strictly ordered by creation, with rollback to any
//!   recorded snapshot.
//!
//! Volumes do not interpret file content and know nothing about check-in,
//! fingerprints, or conflicts — that protocol lives in `voltx_core`.
//!
//! ## Available Volumes
//!
//! - [`MemoryVolume`] - For testing and ephemeral storage
//! - [`LocalVolume`] - Directory-backed storage with full-copy snapshots
//!
//! ## Example
//!
//! ```rust
//! use voltx_volume::{FileStore, SnapshotProvider, MemoryVolume};
//! use std::path::Path;
//!
//! let volume = MemoryVolume::new();
//! volume.write(Path::new("notes/a.txt"), b"hello").unwrap();
//! let snap = volume.create_snapshot("after-a").unwrap();
//! volume.write(Path::new("notes/a.txt"), b"changed").unwrap();
//! volume.rollback(snap).unwrap();
//! assert_eq!(volume.read(Path::new("notes/a.txt")).unwrap(), b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod local;
mod memory;
mod snapshot;
mod store;

pub use error::{VolumeError, VolumeResult};
pub use local::LocalVolume;
pub use memory::MemoryVolume;
pub use snapshot::{SnapshotId, SnapshotInfo, SnapshotProvider};
pub use store::FileStore;
