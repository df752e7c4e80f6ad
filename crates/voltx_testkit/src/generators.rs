//! Property-based test generators using proptest.
//!
//! Provides strategies for generating file content and volume-relative
//! paths that maintain required invariants.

use proptest::prelude::*;
use std::path::PathBuf;

/// Strategy for generating file content (arbitrary bytes).
pub fn content_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..1024)
}

/// Strategy for generating two distinct contents.
///
/// Useful for interference scenarios, where "someone else wrote something
/// different" is the precondition.
pub fn distinct_content_pair() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    (content_strategy(), content_strategy())
        .prop_filter("contents must differ", |(a, b)| a != b)
}

/// Strategy for generating valid volume-relative file paths.
pub fn file_path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,12}(/[a-z][a-z0-9_]{0,12}){0,2}\\.txt")
        .expect("Invalid regex")
        .prop_map(PathBuf::from)
}
