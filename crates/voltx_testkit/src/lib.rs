//! # Voltx Testkit
//!
//! Test utilities for Voltx.
//!
//! This crate provides:
//! - Volume fixtures with automatic cleanup
//! - Property-based test generators using proptest
//! - A concurrent mixed-workload stress harness
//! - A protocol integration suite generic over volume implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use voltx_testkit::prelude::*;
//!
//! #[test]
//! fn commits_on_quiet_volume() {
//!     with_memory_volume(|fixture| {
//!         let mut txn = fixture.coordinator.check_in(Path::new("f.txt")).unwrap();
//!         // ... drive the protocol
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
