//! Storage layer integration tests
//!
//! Tests for the SQLite entry store:
//! - Durability across reopen
//! - Concurrent appends and anchor attachment
//! - Hash-only storage verification

pub mod concurrency_test;
pub mod persistence_test;

use ledger_server::signing::{MockSigningAuthority, VerifiedSignature};
use ledger_server::ledger::payload_hash_hex;
use ledger_server::traits::{NewEntry, SigningAuthority};

/// Sign with the mock authority and verify, as the append path does
pub async fn new_entry(subject: &str, payload: &[u8]) -> NewEntry {
    let authority = MockSigningAuthority::new();
    let signed = authority.sign(payload).await.expect("mock signs");

    NewEntry {
        subject: subject.to_string(),
        payload_hash: payload_hash_hex(payload),
        signature: VerifiedSignature::verify(payload, signed).expect("signature verifies"),
        metadata: serde_json::Map::new(),
    }
}
