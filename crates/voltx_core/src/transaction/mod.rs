//! The check-in / mutate / check-out protocol.
//!
//! A transaction observes a file's content fingerprint at check-in, stages a
//! proposed replacement in memory, and resolves at check-out:
//! - no interference observed: the staged content is published atomically
//!   and recorded as a new snapshot (**commit**);
//! - interference observed: the staged content is discarded and the volume
//!   is rolled back to its latest snapshot (**rollback**).
//!
//! The fingerprint comparison is a cheap stand-in for a lock — it detects,
//! after the fact, whether the optimistic assumption held.

mod coordinator;
mod state;

pub use coordinator::{Decision, TransactionCoordinator};
pub use state::{Transaction, TransactionState};
