//! Content fingerprints for conflict detection.

use sha2::{Digest, Sha256};
use std::fmt;

/// A collision-resistant digest of a file's full byte content.
///
/// Two fingerprints are equal iff the hashed inputs were byte-identical
/// (SHA-256; collision probability treated as negligible). Fingerprints are
/// immutable once computed and are never taken over partial content — the
/// protocol only ever compares whole-file observations.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Computes the fingerprint of `content`.
    ///
    /// Deterministic and side-effect free.
    #[must_use]
    pub fn of(content: &[u8]) -> Self {
        let digest = Sha256::digest(content);
        Self(digest.into())
    }

    /// Creates a fingerprint from raw digest bytes.
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the digest as a lowercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        use fmt::Write;
        let mut hex = String::with_capacity(64);
        for byte in &self.0 {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = Fingerprint::of(b"some content");
        let b = Fingerprint::of(b"some content");
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_differs_for_different_content() {
        let a = Fingerprint::of(b"some content");
        let b = Fingerprint::of(b"some content!");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_of_empty_content() {
        // SHA-256 of the empty string.
        assert_eq!(
            Fingerprint::of(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_known_vector() {
        assert_eq!(
            Fingerprint::of(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn fingerprint_hex_roundtrip_shape() {
        let fp = Fingerprint::of(b"x");
        assert_eq!(fp.to_hex().len(), 64);
        assert_eq!(format!("{fp}"), fp.to_hex());
    }

    proptest! {
        #[test]
        fn determinism(content in proptest::collection::vec(any::<u8>(), 0..1024)) {
            prop_assert_eq!(Fingerprint::of(&content), Fingerprint::of(&content));
        }

        #[test]
        fn no_collisions_in_corpus(
            a in proptest::collection::vec(any::<u8>(), 0..256),
            b in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(Fingerprint::of(&a), Fingerprint::of(&b));
        }
    }
}
