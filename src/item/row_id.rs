use sha2::{Digest, Sha256};

use super::ItemOptions;

/// Number of digest bytes kept in a row ID (32 hex characters).
const ROW_ID_BYTES: usize = 16;

/// Derive the row ID for a product ID and its options.
///
/// Options are hashed in key order, so two option maps with the same entries
/// always produce the same row ID. Separators keep `("ab", "c")` and
/// `("a", "bc")` from colliding.
pub fn row_id(id: &str, options: &ItemOptions) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update([0x1d]);
    for (key, value) in options {
        hasher.update(key.as_bytes());
        hasher.update([0x1f]);
        hasher.update(value.as_bytes());
        hasher.update([0x1e]);
    }
    let digest = hasher.finalize();
    hex::encode(&digest[..ROW_ID_BYTES])
}
