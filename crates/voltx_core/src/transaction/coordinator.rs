//! Transaction coordinator.

use crate::error::{CoreError, CoreResult};
use crate::fingerprint::Fingerprint;
use crate::mutator::AtomicMutator;
use crate::transaction::state::Transaction;
use crate::types::TransactionId;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use voltx_volume::{FileStore, SnapshotId, SnapshotProvider};

/// Outcome of a checked-out transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The staged content was published and recorded as this snapshot.
    Committed(SnapshotId),
    /// Interference was detected; the volume was restored to this snapshot
    /// and the staged content discarded.
    RolledBack(SnapshotId),
}

impl Decision {
    /// Returns whether the transaction committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// Returns the snapshot this decision resolved to.
    #[must_use]
    pub fn snapshot(&self) -> SnapshotId {
        match self {
            Self::Committed(id) | Self::RolledBack(id) => *id,
        }
    }
}

/// Drives the check-in / mutate / check-out protocol.
///
/// The coordinator owns no file content and no snapshot history — both live
/// on the volume. It records what each transaction observed, publishes
/// staged content through the [`AtomicMutator`], and decides commit versus
/// rollback by a single authoritative fingerprint comparison at check-out.
///
/// ## Concurrency
///
/// The coordinator is `Send + Sync`; share it via `Arc` and drive one
/// [`Transaction`] per caller. No lock is held across the gap between
/// `check_in` and `check_out` — interference there is expected and is what
/// the protocol detects. Within one coordinator, the decide+publish+snapshot
/// sequence of `check_out` is serialized internally so at most one staged
/// write is published per observed state; transactions that lose that race
/// observe the winner's commit as interference and roll back.
pub struct TransactionCoordinator {
    store: Arc<dyn FileStore>,
    provider: Arc<dyn SnapshotProvider>,
    mutator: AtomicMutator,
    volume_name: String,
    next_txid: AtomicU64,
    commit_lock: Mutex<()>,
}

impl TransactionCoordinator {
    /// Creates a coordinator over a store and a snapshot provider.
    ///
    /// `volume_name` is used to derive snapshot names
    /// (`<volume>@tx-<txid>`).
    #[must_use]
    pub fn new(
        volume_name: impl Into<String>,
        store: Arc<dyn FileStore>,
        provider: Arc<dyn SnapshotProvider>,
    ) -> Self {
        Self {
            mutator: AtomicMutator::new(store.clone()),
            store,
            provider,
            volume_name: volume_name.into(),
            next_txid: AtomicU64::new(1),
            commit_lock: Mutex::new(()),
        }
    }

    /// Creates a coordinator over a single volume implementing both the
    /// store and the provider side.
    #[must_use]
    pub fn with_volume<V>(volume_name: impl Into<String>, volume: Arc<V>) -> Self
    where
        V: FileStore + SnapshotProvider + 'static,
    {
        Self::new(volume_name, volume.clone(), volume)
    }

    /// Observes the current content of `path` and opens a transaction.
    ///
    /// The returned transaction carries the observed fingerprint; the caller
    /// mutates the content out-of-band, at its own pace, and comes back with
    /// [`propose_mutation`] and [`check_out`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path does not exist, `IoUnreadable` if the
    /// content cannot be read.
    ///
    /// [`propose_mutation`]: TransactionCoordinator::propose_mutation
    /// [`check_out`]: TransactionCoordinator::check_out
    pub fn check_in(&self, path: &Path) -> CoreResult<Transaction> {
        let content = self.store.read(path)?;
        let observed = Fingerprint::of(&content);
        let id = TransactionId::new(self.next_txid.fetch_add(1, Ordering::SeqCst));

        debug!(%id, path = %path.display(), fingerprint = %observed, "checked in");
        Ok(Transaction::new(id, path.to_path_buf(), observed))
    }

    /// Stages `new_content` as the transaction's proposed replacement.
    ///
    /// Pure staging: nothing durable is touched. The content is published
    /// only if the check-out comparison finds no interference.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolViolation` unless the transaction is in the
    /// checked-in state.
    pub fn propose_mutation(
        &self,
        txn: &mut Transaction,
        new_content: Vec<u8>,
    ) -> CoreResult<()> {
        txn.stage(new_content)?;
        debug!(id = %txn.id(), path = %txn.path().display(), "mutation staged");
        Ok(())
    }

    /// Resolves the transaction: commit or roll back.
    ///
    /// Re-reads the live content and compares its fingerprint to the one
    /// observed at check-in:
    ///
    /// - equal: the staged content is published atomically, then recorded as
    ///   a new snapshot — the durable record of this transaction's effect;
    /// - different: some other actor wrote the file since check-in. The
    ///   staged content is discarded and the volume is rolled back to its
    ///   latest snapshot. The caller's write is lost by design; this is the
    ///   conflict-resolution policy, not a merge.
    ///
    /// # Errors
    ///
    /// - `ProtocolViolation` if the transaction is not in the mutated state
    ///   (including a second check-out of a terminal transaction, which
    ///   performs no additional snapshot or rollback).
    /// - `NoRecoveryPoint` if a conflict was detected but no snapshot exists
    ///   to roll back to; the live (conflicting) content is left untouched.
    /// - `WriteFailed` if publication fails; no snapshot is created.
    /// - `SnapshotFailed` / `RollbackFailed` surfaced from the provider,
    ///   never retried.
    ///
    /// Any error moves the transaction to the aborted state; it cannot be
    /// driven again.
    pub fn check_out(&self, txn: &mut Transaction) -> CoreResult<Decision> {
        txn.ensure_mutated()?;

        let _guard = self.commit_lock.lock();

        let live = match self.store.read(txn.path()) {
            Ok(content) => content,
            Err(e) => {
                txn.mark_aborted();
                return Err(e.into());
            }
        };
        let current = Fingerprint::of(&live);

        if current == txn.observed_fingerprint() {
            self.commit(txn)
        } else {
            debug!(
                id = %txn.id(),
                observed = %txn.observed_fingerprint(),
                current = %current,
                "interference detected"
            );
            self.roll_back(txn)
        }
    }

    /// Reads the content of `path` outside any transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `IoUnreadable` from the store.
    pub fn read(&self, path: &Path) -> CoreResult<Vec<u8>> {
        Ok(self.store.read(path)?)
    }

    /// Creates a new file and records a snapshot of the volume.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the path is already present — overwriting
    /// an existing file must go through the check-in/check-out protocol.
    pub fn create(&self, path: &Path, content: &[u8]) -> CoreResult<SnapshotId> {
        let _guard = self.commit_lock.lock();

        if self.store.exists(path)? {
            return Err(voltx_volume::VolumeError::already_exists(path).into());
        }
        self.store.write(path, content)?;

        let id = TransactionId::new(self.next_txid.fetch_add(1, Ordering::SeqCst));
        let snapshot = self.provider.create_snapshot(&self.snapshot_name(id))?;
        info!(path = %path.display(), %snapshot, "file created");
        Ok(snapshot)
    }

    /// Removes a file from the volume. No snapshot is recorded.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path does not exist.
    pub fn remove(&self, path: &Path) -> CoreResult<()> {
        Ok(self.store.remove(path)?)
    }

    fn snapshot_name(&self, id: TransactionId) -> String {
        format!("{}@tx-{}", self.volume_name, id.as_u64())
    }

    fn commit(&self, txn: &mut Transaction) -> CoreResult<Decision> {
        let staged = txn.take_staged().ok_or_else(|| {
            CoreError::protocol_violation(format!("no staged content for {}", txn.id()))
        })?;

        if let Err(e) = self.mutator.publish(txn.path(), txn.id(), &staged) {
            // Publish failed: abort without creating a snapshot. Partial
            // state (content published, no snapshot) cannot occur because
            // snapshot creation only proceeds after publish succeeds.
            txn.mark_aborted();
            return Err(e);
        }

        match self.provider.create_snapshot(&self.snapshot_name(txn.id())) {
            Ok(snapshot) => {
                txn.mark_committed();
                info!(id = %txn.id(), %snapshot, "committed");
                Ok(Decision::Committed(snapshot))
            }
            Err(e) => {
                txn.mark_aborted();
                Err(e.into())
            }
        }
    }

    fn roll_back(&self, txn: &mut Transaction) -> CoreResult<Decision> {
        // The staged content is discarded either way.
        let _ = txn.take_staged();

        let latest = match self.provider.latest_snapshot() {
            Ok(latest) => latest,
            Err(e) => {
                txn.mark_aborted();
                return Err(e.into());
            }
        };
        let Some(snapshot) = latest else {
            txn.mark_aborted();
            return Err(CoreError::no_recovery_point(txn.path()));
        };

        match self.provider.rollback(snapshot) {
            Ok(()) => {
                txn.mark_rolled_back();
                info!(id = %txn.id(), %snapshot, "rolled back");
                Ok(Decision::RolledBack(snapshot))
            }
            Err(e) => {
                // The live (conflicting) content must not be touched further.
                txn.mark_aborted();
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for TransactionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionCoordinator")
            .field("volume_name", &self.volume_name)
            .finish_non_exhaustive()
    }
}
