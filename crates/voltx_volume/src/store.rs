//! File store trait definition.

use crate::error::VolumeResult;
use std::path::{Path, PathBuf};

/// Plain file storage on a volume.
///
/// File stores are **opaque byte stores**. Paths are volume-relative; content
/// is an uninterpreted byte payload. The store provides no concurrency
/// semantics of its own — interference between concurrent writers is detected
/// (not prevented) one level up, by the check-in/check-out protocol.
///
/// # Invariants
///
/// - `read` returns exactly the bytes most recently written to that path
/// - `rename` replaces the target atomically: no reader ever observes a
///   partially moved file
/// - Implementations must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::MemoryVolume`] - For testing
/// - [`super::LocalVolume`] - For persistent storage
pub trait FileStore: Send + Sync {
    /// Reads the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist (`NotFound`)
    /// - The content cannot be read (`IoUnreadable`)
    fn read(&self, path: &Path) -> VolumeResult<Vec<u8>>;

    /// Writes `content` to `path`, creating the file if needed and replacing
    /// any previous content.
    ///
    /// This is a plain overwrite with no staging. Callers that need
    /// all-or-nothing publication write to a sibling path and [`rename`]
    /// over the target.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the content cannot be written.
    ///
    /// [`rename`]: FileStore::rename
    fn write(&self, path: &Path, content: &[u8]) -> VolumeResult<()>;

    /// Returns whether a file exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self, path: &Path) -> VolumeResult<bool>;

    /// Atomically renames `from` to `to`, replacing `to` if it exists.
    ///
    /// After this returns, readers of `to` see either its previous content
    /// or the full content of `from` — never a mixture.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the rename fails; `to` is left unmodified.
    fn rename(&self, from: &Path, to: &Path) -> VolumeResult<()>;

    /// Removes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path does not exist, `WriteFailed` if the
    /// removal fails.
    fn remove(&self, path: &Path) -> VolumeResult<()>;

    /// Lists the files directly under `dir`, sorted by path.
    ///
    /// Returned paths are volume-relative.
    ///
    /// # Errors
    ///
    /// Returns `IoUnreadable` if the directory cannot be enumerated.
    fn list(&self, dir: &Path) -> VolumeResult<Vec<PathBuf>>;
}
