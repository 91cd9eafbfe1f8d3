//! One-way content fingerprinting.
//!
//! Flagged-content records are deduplicated and cross-referenced by hash so
//! the raw flagged text never needs to be stored or re-exposed.

use sha2::{Digest, Sha256};

/// SHA-256 fingerprint of `text`, as 64 lowercase hex characters.
///
/// Deterministic: the same input always yields the same output. The empty
/// string is a valid input with a well-defined hash.
pub fn hash_content(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
