//! Payload hashing

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the payload bytes
pub fn payload_hash_hex(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}
