//! Content hashing

use sha2::{Digest, Sha256};

/// Number of hex characters in an artifact id
pub const ARTIFACT_ID_LEN: usize = 16;

/// SHA-256 of the bytes as lower-case hex
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Stable identifier of an uploaded document: the first 16 hex chars of its hash
pub fn artifact_id(bytes: &[u8]) -> String {
    let mut hash = content_hash(bytes);
    hash.truncate(ARTIFACT_ID_LEN);
    hash
}
