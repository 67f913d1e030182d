//! Content hashing for clipboard deduplication
//!
//! History entries are keyed by the SHA-256 of their plaintext, so the same
//! clipboard content captured twice lands on the same row. Hashing uses
//! hardware acceleration where `sha2` provides it.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 of clipboard content.
///
/// This is the dedup key stored in the `content_hash` column and the value
/// compared against the monitor's last-seen and expected hashes.
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
