//! Cross-crate protocol integration suite.
//!
//! Exercises the full check-in / mutate / check-out protocol against any
//! volume implementation. Every exercise panics on a violated expectation,
//! so test functions can call them directly on fresh volumes.

use std::path::Path;
use std::sync::Arc;
use voltx_core::{CoreError, TransactionCoordinator, TransactionState};
use voltx_volume::{FileStore, SnapshotProvider};

fn coordinator_for<V>(volume: &Arc<V>) -> TransactionCoordinator
where
    V: FileStore + SnapshotProvider + 'static,
{
    TransactionCoordinator::with_volume("integration", volume.clone())
}

/// A quiet volume: check-in, propose, check-out must commit and publish.
pub fn exercise_commit<V>(volume: Arc<V>)
where
    V: FileStore + SnapshotProvider + 'static,
{
    let path = Path::new("doc.txt");
    volume.write(path, b"A").expect("seed write");
    volume.create_snapshot("seed").expect("seed snapshot");
    let coordinator = coordinator_for(&volume);

    let mut txn = coordinator.check_in(path).expect("check in");
    coordinator
        .propose_mutation(&mut txn, b"B".to_vec())
        .expect("propose");
    let decision = coordinator.check_out(&mut txn).expect("check out");

    assert!(decision.is_committed());
    assert_eq!(volume.read(path).expect("read back"), b"B");
    assert_eq!(
        volume.latest_snapshot().expect("latest"),
        Some(decision.snapshot())
    );
}

/// An interfered volume: the transaction must roll back to the seed
/// snapshot, and neither the staged nor the interfering content survives.
pub fn exercise_conflict<V>(volume: Arc<V>)
where
    V: FileStore + SnapshotProvider + 'static,
{
    let path = Path::new("doc.txt");
    volume.write(path, b"A").expect("seed write");
    let seed = volume.create_snapshot("seed").expect("seed snapshot");
    let coordinator = coordinator_for(&volume);

    let mut txn = coordinator.check_in(path).expect("check in");
    volume.write(path, b"X").expect("interfering write");
    coordinator
        .propose_mutation(&mut txn, b"B".to_vec())
        .expect("propose");
    let decision = coordinator.check_out(&mut txn).expect("check out");

    assert!(!decision.is_committed());
    assert_eq!(decision.snapshot(), seed);
    assert_eq!(volume.read(path).expect("read back"), b"A");
}

/// A conflict with no snapshot history must fail with `NoRecoveryPoint` and
/// leave the interfering content in place.
pub fn exercise_no_recovery_point<V>(volume: Arc<V>)
where
    V: FileStore + SnapshotProvider + 'static,
{
    let path = Path::new("doc.txt");
    volume.write(path, b"A").expect("seed write");
    let coordinator = coordinator_for(&volume);

    let mut txn = coordinator.check_in(path).expect("check in");
    volume.write(path, b"X").expect("interfering write");
    coordinator
        .propose_mutation(&mut txn, b"B".to_vec())
        .expect("propose");
    let result = coordinator.check_out(&mut txn);

    assert!(matches!(result, Err(CoreError::NoRecoveryPoint { .. })));
    assert_eq!(txn.state(), TransactionState::Aborted);
    assert_eq!(volume.read(path).expect("read back"), b"X");
}

/// A second check-out of a terminal transaction must be rejected without
/// touching the snapshot history.
pub fn exercise_terminal_check_out<V>(volume: Arc<V>)
where
    V: FileStore + SnapshotProvider + 'static,
{
    let path = Path::new("doc.txt");
    volume.write(path, b"A").expect("seed write");
    volume.create_snapshot("seed").expect("seed snapshot");
    let coordinator = coordinator_for(&volume);

    let mut txn = coordinator.check_in(path).expect("check in");
    coordinator
        .propose_mutation(&mut txn, b"B".to_vec())
        .expect("propose");
    coordinator.check_out(&mut txn).expect("first check out");
    let snapshots = volume.snapshots().expect("snapshots").len();

    let result = coordinator.check_out(&mut txn);

    assert!(matches!(result, Err(CoreError::ProtocolViolation { .. })));
    assert_eq!(volume.snapshots().expect("snapshots").len(), snapshots);
}

/// Runs the whole suite against one volume-producing factory.
pub fn exercise_all<V, F>(make_volume: F)
where
    V: FileStore + SnapshotProvider + 'static,
    F: Fn() -> Arc<V>,
{
    exercise_commit(make_volume());
    exercise_conflict(make_volume());
    exercise_no_recovery_point(make_volume());
    exercise_terminal_check_out(make_volume());
}
