//! # Voltx Core
//!
//! Optimistic concurrency control for shared mutable files backed by a
//! point-in-time snapshotting volume.
//!
//! This crate provides:
//! - Content fingerprinting for conflict detection ([`Fingerprint`])
//! - All-or-nothing publication of new file content ([`AtomicMutator`])
//! - The check-in / mutate / check-out protocol
//!   ([`TransactionCoordinator`])
//! - Per-run workload aggregation ([`RunReport`])
//!
//! ## Protocol
//!
//! A [`Transaction`] observes a file's fingerprint at check-in, stages a
//! proposed new content, and decides at check-out: if the live fingerprint
//! still matches the observed one, the staged content is published
//! atomically and recorded as a new snapshot; otherwise the staged content
//! is discarded and the volume is rolled back to its latest snapshot. The
//! gap between check-in and check-out is deliberately lock-free — external
//! interference there is detected, not prevented.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod fingerprint;
mod mutator;
mod report;
mod transaction;
mod types;

pub use error::{CoreError, CoreResult};
pub use fingerprint::Fingerprint;
pub use mutator::AtomicMutator;
pub use report::RunReport;
pub use transaction::{Decision, Transaction, TransactionCoordinator, TransactionState};
pub use types::TransactionId;
