//! Concurrent mixed-workload stress harness.
//!
//! Drives many workers against one volume with a read / overwrite / create
//! mix and returns a merged [`RunReport`]. Each worker records into its own
//! report; nothing is counted in shared state.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use voltx_core::{RunReport, TransactionCoordinator};
use voltx_volume::{FileStore, SnapshotProvider};

/// Configuration for the mixed workload.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Number of operations each worker performs.
    pub operations_per_worker: usize,
    /// Number of shared, contended files.
    pub files: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            operations_per_worker: 50,
            files: 3,
        }
    }
}

/// Result of a workload run.
#[derive(Debug, Clone)]
pub struct WorkloadResult {
    /// Merged per-worker reports.
    pub report: RunReport,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl WorkloadResult {
    /// Creates a new result.
    #[must_use]
    pub fn new(report: RunReport, duration: Duration, total_ops: usize) -> Self {
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total_ops as f64 / duration.as_secs_f64()
        } else {
            0.0
        };
        Self {
            report,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the run.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Transactions: {}", self.report.transactions);
        println!("Committed: {}", self.report.committed);
        println!("Rolled back: {}", self.report.rolled_back);
        println!("Failed: {}", self.report.failed);
        println!("Snapshots created: {}", self.report.snapshots_created);
        println!("Reads: {}", self.report.reads);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Runs a concurrent read / overwrite / create mix against `volume`.
///
/// Seeds `config.files` contended files plus one snapshot (so rollbacks have
/// a recovery point), then spawns `config.workers` threads each performing
/// `config.operations_per_worker` operations: roughly 40% plain reads, 55%
/// check-in/check-out overwrites of a contended file, 5% creations of fresh
/// files. The mix is deterministic per operation index, so runs are
/// reproducible.
pub fn run_mixed_workload<V>(volume: Arc<V>, config: &StressConfig) -> WorkloadResult
where
    V: FileStore + SnapshotProvider + 'static,
{
    let files: Vec<PathBuf> = (0..config.files)
        .map(|i| PathBuf::from(format!("contended-{i}.txt")))
        .collect();
    for (i, path) in files.iter().enumerate() {
        volume
            .write(path, format!("initial {i}").as_bytes())
            .expect("Failed to seed contended file");
    }
    volume
        .create_snapshot("workload-seed")
        .expect("Failed to seed snapshot");

    let coordinator = Arc::new(TransactionCoordinator::with_volume(
        "stress",
        volume.clone(),
    ));

    let start = Instant::now();
    let mut handles = Vec::with_capacity(config.workers);
    for worker in 0..config.workers {
        let coordinator = Arc::clone(&coordinator);
        let files = files.clone();
        let ops = config.operations_per_worker;

        handles.push(thread::spawn(move || {
            let mut report = RunReport::new();
            for op in 0..ops {
                let target = &files[op % files.len()];
                match op % 20 {
                    // 40%: plain read
                    0..=7 => {
                        if coordinator.read(target).is_ok() {
                            report.record_read();
                        }
                    }
                    // 55%: overwrite through the protocol
                    8..=18 => {
                        let outcome = coordinator.check_in(target).and_then(|mut txn| {
                            let content =
                                format!("edited by worker {worker} op {op}").into_bytes();
                            coordinator.propose_mutation(&mut txn, content)?;
                            coordinator.check_out(&mut txn)
                        });
                        match outcome {
                            Ok(decision) => report.record_decision(&decision),
                            Err(_) => report.record_failure(),
                        }
                    }
                    // 5%: create a fresh file
                    _ => {
                        let path = PathBuf::from(format!("new-w{worker}-op{op}.txt"));
                        let content = format!("created by worker {worker}").into_bytes();
                        if coordinator.create(&path, &content).is_ok() {
                            report.record_create();
                        }
                    }
                }
            }
            report
        }));
    }

    let mut merged = RunReport::new();
    for handle in handles {
        let report = handle.join().expect("Worker panicked");
        merged.merge(&report);
    }

    let total_ops = config.workers * config.operations_per_worker;
    WorkloadResult::new(merged, start.elapsed(), total_ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltx_volume::MemoryVolume;

    #[test]
    fn mixed_workload_report_is_consistent() {
        let volume = Arc::new(MemoryVolume::new());
        let config = StressConfig::default();

        let result = run_mixed_workload(volume, &config);
        let report = &result.report;

        assert_eq!(
            report.committed + report.rolled_back + report.failed,
            report.transactions
        );
        // Every op with index 8..=18 (mod 20) went through the protocol.
        let txns_per_worker = (0..config.operations_per_worker)
            .filter(|op| matches!(op % 20, 8..=18))
            .count();
        assert_eq!(
            report.transactions,
            (config.workers * txns_per_worker) as u64
        );
        assert_eq!(report.snapshots_created, report.committed + report.creates);
    }

    #[test]
    fn single_worker_workload_never_conflicts() {
        let volume = Arc::new(MemoryVolume::new());
        let config = StressConfig {
            workers: 1,
            operations_per_worker: 40,
            files: 2,
        };

        let result = run_mixed_workload(volume, &config);
        let report = &result.report;

        // With one worker there is no interference to detect.
        assert_eq!(report.rolled_back, 0);
        assert_eq!(report.failed, 0);
        assert!(report.committed > 0);
    }
}
