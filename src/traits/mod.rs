//! Trait definitions for the ledger's collaborators
//!
//! The coordinator never talks to Vault, Rekor or SQLite directly; it is
//! handed implementations of these capabilities at construction time.

pub mod anchor;
pub mod signer;
pub mod storage;

pub use anchor::{AnchorRequest, LogProof, TransparencyLog};
pub use signer::{SignedPayload, SigningAuthority};
pub use storage::{AnchorProof, AttachOutcome, EntryId, EntryStore, LedgerEntry, NewEntry};
