//! Transaction state.

use crate::error::{CoreError, CoreResult};
use crate::fingerprint::Fingerprint;
use crate::types::TransactionId;
use std::path::{Path, PathBuf};

/// State of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// The file has been observed; no mutation staged yet.
    CheckedIn,
    /// A replacement content is staged, awaiting check-out.
    Mutated,
    /// The staged content was published and recorded as a snapshot.
    Committed,
    /// Interference was detected; the volume was restored to its latest
    /// snapshot and the staged content discarded.
    RolledBack,
    /// The transaction failed before reaching a decision; nothing durable
    /// was left behind by it.
    Aborted,
}

impl TransactionState {
    /// Returns whether this is a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Committed | Self::RolledBack | Self::Aborted
        )
    }
}

/// A per-path, per-caller protocol session.
///
/// Owned exclusively by the caller that opened it and never shared; the
/// caller hands it back to the coordinator to stage a mutation and to check
/// out. Dropping a transaction before check-out leaves no durable trace —
/// nothing was published, nothing was snapshotted.
#[derive(Debug)]
pub struct Transaction {
    /// Transaction ID.
    id: TransactionId,
    /// The contended path, volume-relative.
    path: PathBuf,
    /// Fingerprint observed at check-in.
    observed: Fingerprint,
    /// Current state.
    state: TransactionState,
    /// Staged replacement content, present exactly in `Mutated`.
    staged: Option<Vec<u8>>,
}

impl Transaction {
    /// Creates a new checked-in transaction.
    pub(crate) fn new(id: TransactionId, path: PathBuf, observed: Fingerprint) -> Self {
        Self {
            id,
            path,
            observed,
            state: TransactionState::CheckedIn,
            staged: None,
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the path this transaction contends for.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the fingerprint observed at check-in.
    #[must_use]
    pub fn observed_fingerprint(&self) -> Fingerprint {
        self.observed
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Returns whether the transaction can still make progress.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Stages a replacement content. `CheckedIn → Mutated`.
    pub(crate) fn stage(&mut self, content: Vec<u8>) -> CoreResult<()> {
        match self.state {
            TransactionState::CheckedIn => {
                self.staged = Some(content);
                self.state = TransactionState::Mutated;
                Ok(())
            }
            other => Err(CoreError::protocol_violation(format!(
                "cannot stage a mutation for {} in state {other:?}",
                self.id
            ))),
        }
    }

    /// Ensures the transaction is ready for check-out.
    pub(crate) fn ensure_mutated(&self) -> CoreResult<()> {
        match self.state {
            TransactionState::Mutated => Ok(()),
            other => Err(CoreError::protocol_violation(format!(
                "cannot check out {} in state {other:?}",
                self.id
            ))),
        }
    }

    /// Takes the staged content out of the transaction.
    pub(crate) fn take_staged(&mut self) -> Option<Vec<u8>> {
        self.staged.take()
    }

    /// Marks the transaction as committed.
    pub(crate) fn mark_committed(&mut self) {
        self.state = TransactionState::Committed;
    }

    /// Marks the transaction as rolled back.
    pub(crate) fn mark_rolled_back(&mut self) {
        self.state = TransactionState::RolledBack;
    }

    /// Marks the transaction as aborted.
    pub(crate) fn mark_aborted(&mut self) {
        self.state = TransactionState::Aborted;
        self.staged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_txn() -> Transaction {
        Transaction::new(
            TransactionId::new(1),
            PathBuf::from("f.txt"),
            Fingerprint::of(b"content"),
        )
    }

    #[test]
    fn new_transaction_is_checked_in() {
        let txn = create_txn();
        assert_eq!(txn.state(), TransactionState::CheckedIn);
        assert!(txn.is_open());
    }

    #[test]
    fn stage_transitions_to_mutated() {
        let mut txn = create_txn();
        txn.stage(b"new".to_vec()).unwrap();
        assert_eq!(txn.state(), TransactionState::Mutated);
        assert!(txn.ensure_mutated().is_ok());
    }

    #[test]
    fn cannot_stage_twice() {
        let mut txn = create_txn();
        txn.stage(b"one".to_vec()).unwrap();

        let result = txn.stage(b"two".to_vec());
        assert!(matches!(result, Err(CoreError::ProtocolViolation { .. })));
    }

    #[test]
    fn cannot_stage_after_terminal() {
        let mut txn = create_txn();
        txn.stage(b"new".to_vec()).unwrap();
        txn.mark_committed();

        let result = txn.stage(b"again".to_vec());
        assert!(matches!(result, Err(CoreError::ProtocolViolation { .. })));
    }

    #[test]
    fn ensure_mutated_rejects_checked_in() {
        let txn = create_txn();
        assert!(matches!(
            txn.ensure_mutated(),
            Err(CoreError::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn ensure_mutated_rejects_terminal() {
        let mut txn = create_txn();
        txn.stage(b"new".to_vec()).unwrap();
        txn.mark_rolled_back();

        assert!(matches!(
            txn.ensure_mutated(),
            Err(CoreError::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn take_staged_empties_the_stage() {
        let mut txn = create_txn();
        txn.stage(b"new".to_vec()).unwrap();

        assert_eq!(txn.take_staged(), Some(b"new".to_vec()));
        assert_eq!(txn.take_staged(), None);
    }

    #[test]
    fn abort_discards_staged_content() {
        let mut txn = create_txn();
        txn.stage(b"new".to_vec()).unwrap();
        txn.mark_aborted();

        assert_eq!(txn.state(), TransactionState::Aborted);
        assert_eq!(txn.take_staged(), None);
    }

    #[test]
    fn terminal_states() {
        assert!(TransactionState::Committed.is_terminal());
        assert!(TransactionState::RolledBack.is_terminal());
        assert!(TransactionState::Aborted.is_terminal());
        assert!(!TransactionState::CheckedIn.is_terminal());
        assert!(!TransactionState::Mutated.is_terminal());
    }

    #[test]
    fn observed_fingerprint_is_stable() {
        let txn = create_txn();
        assert_eq!(txn.observed_fingerprint(), Fingerprint::of(b"content"));
        assert_eq!(txn.path(), Path::new("f.txt"));
    }
}
