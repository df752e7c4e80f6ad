//! Per-run workload aggregation.

use crate::transaction::Decision;

/// Aggregated outcome of a batch of operations against one volume.
///
/// A report is plain data, explicitly passed and explicitly merged — there
/// are no process-wide counters. Each worker in a batch records into its own
/// report and the caller merges them at the end.
///
/// Invariant: `committed + rolled_back + failed == transactions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Transactions driven to a terminal state.
    pub transactions: u64,
    /// Transactions that committed.
    pub committed: u64,
    /// Transactions that detected interference and rolled back.
    pub rolled_back: u64,
    /// Transactions that surfaced an error instead of a decision.
    pub failed: u64,
    /// Snapshots recorded (commits and file creations).
    pub snapshots_created: u64,
    /// Plain reads performed.
    pub reads: u64,
    /// Files created.
    pub creates: u64,
    /// Files removed.
    pub removes: u64,
}

impl RunReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a checked-out transaction's decision.
    pub fn record_decision(&mut self, decision: &Decision) {
        self.transactions += 1;
        match decision {
            Decision::Committed(_) => {
                self.committed += 1;
                self.snapshots_created += 1;
            }
            Decision::RolledBack(_) => {
                self.rolled_back += 1;
            }
        }
    }

    /// Records a transaction that surfaced an error instead of a decision.
    pub fn record_failure(&mut self) {
        self.transactions += 1;
        self.failed += 1;
    }

    /// Records a plain read.
    pub fn record_read(&mut self) {
        self.reads += 1;
    }

    /// Records a file creation (which also records a snapshot).
    pub fn record_create(&mut self) {
        self.creates += 1;
        self.snapshots_created += 1;
    }

    /// Records a file removal.
    pub fn record_remove(&mut self) {
        self.removes += 1;
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: &RunReport) {
        self.transactions += other.transactions;
        self.committed += other.committed;
        self.rolled_back += other.rolled_back;
        self.failed += other.failed;
        self.snapshots_created += other.snapshots_created;
        self.reads += other.reads;
        self.creates += other.creates;
        self.removes += other.removes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltx_volume::SnapshotId;

    #[test]
    fn default_report_is_zero() {
        let report = RunReport::new();
        assert_eq!(report.transactions, 0);
        assert_eq!(report.snapshots_created, 0);
    }

    #[test]
    fn record_decisions() {
        let mut report = RunReport::new();
        report.record_decision(&Decision::Committed(SnapshotId::new(1)));
        report.record_decision(&Decision::RolledBack(SnapshotId::new(1)));
        report.record_failure();

        assert_eq!(report.transactions, 3);
        assert_eq!(report.committed, 1);
        assert_eq!(report.rolled_back, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.snapshots_created, 1);
        assert_eq!(
            report.committed + report.rolled_back + report.failed,
            report.transactions
        );
    }

    #[test]
    fn record_plain_operations() {
        let mut report = RunReport::new();
        report.record_read();
        report.record_read();
        report.record_create();
        report.record_remove();

        assert_eq!(report.reads, 2);
        assert_eq!(report.creates, 1);
        assert_eq!(report.removes, 1);
        assert_eq!(report.snapshots_created, 1);
        assert_eq!(report.transactions, 0);
    }

    #[test]
    fn merge_adds_fields() {
        let mut a = RunReport::new();
        a.record_decision(&Decision::Committed(SnapshotId::new(1)));
        a.record_read();

        let mut b = RunReport::new();
        b.record_decision(&Decision::RolledBack(SnapshotId::new(1)));
        b.record_create();

        a.merge(&b);

        assert_eq!(a.transactions, 2);
        assert_eq!(a.committed, 1);
        assert_eq!(a.rolled_back, 1);
        assert_eq!(a.snapshots_created, 2);
        assert_eq!(a.reads, 1);
        assert_eq!(a.creates, 1);
    }
}
