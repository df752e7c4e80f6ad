//! Error types for the protocol core.

use std::path::PathBuf;
use thiserror::Error;
use voltx_volume::VolumeError;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while driving the check-in/check-out protocol.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Volume-level error (storage or snapshot provider fault).
    ///
    /// Surfaced to the caller unmodified; the coordinator never retries.
    #[error(transparent)]
    Volume(#[from] VolumeError),

    /// A conflict was detected but no snapshot exists to roll back to.
    ///
    /// The live (conflicting) content is left untouched and the caller's
    /// staged mutation is discarded.
    #[error("no recovery point for {path}: conflict detected with empty snapshot history")]
    NoRecoveryPoint {
        /// The contended path.
        path: PathBuf,
    },

    /// An operation was invoked out of state-machine order.
    #[error("protocol violation: {message}")]
    ProtocolViolation {
        /// Description of the violation.
        message: String,
    },
}

impl CoreError {
    /// Creates a no-recovery-point error.
    pub fn no_recovery_point(path: impl Into<PathBuf>) -> Self {
        Self::NoRecoveryPoint { path: path.into() }
    }

    /// Creates a protocol-violation error.
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }
}
