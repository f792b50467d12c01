//! Async entry store trait definition

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::signing::VerifiedSignature;
use crate::traits::anchor::LogProof;

/// Store-assigned, strictly increasing entry identifier
pub type EntryId = i64;

/// A ledger entry as persisted
///
/// Contains the payload hash only - the payload bytes are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Unique identifier, assigned at insert
    pub id: EntryId,

    /// Caller-supplied label
    pub subject: String,

    /// Lowercase hex SHA-256 of the payload
    pub payload_hash: String,

    /// Base64 Ed25519 signature over the payload
    pub signature: String,

    /// Base64 public key that verified the signature
    pub public_key: String,

    /// Caller-supplied metadata, stored verbatim
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Transparency log inclusion proof, once attached
    pub anchor: Option<AnchorProof>,

    /// When the entry was committed
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Whether an anchor proof has been attached
    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Anchor proof as stored on an entry
///
/// The three fields only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorProof {
    pub log_id: String,
    pub log_index: i64,
    pub anchored_at: DateTime<Utc>,
}

/// Parameters for inserting an entry
///
/// Requires a [`VerifiedSignature`], so an unverified authority reply can
/// never reach the store.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub subject: String,
    pub payload_hash: String,
    pub signature: VerifiedSignature,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Result of attaching an anchor proof
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Proof written now
    Attached,
    /// The identical proof was already present
    AlreadyAttached,
}

/// Durable, append-only entry storage
///
/// Every mutating call is a single atomic transaction: it either fully
/// commits or leaves no trace.
#[async_trait]
pub trait EntryStore: Send + Sync + 'static {
    /// Insert a new entry with no anchor proof
    ///
    /// Returns the entry as committed, including its assigned id.
    async fn create_entry(&self, entry: NewEntry) -> Result<LedgerEntry, StorageError>;

    /// Attach a transparency log proof to an existing entry
    ///
    /// Re-attaching the identical proof is a no-op. Attaching a different
    /// proof fails with `StorageError::AnchorConflict`; a missing entry
    /// fails with `StorageError::NotFound`.
    async fn attach_anchor_proof(
        &self,
        id: EntryId,
        proof: &LogProof,
    ) -> Result<AttachOutcome, StorageError>;

    /// Most recent entries, newest first
    async fn list_recent(&self, limit: usize) -> Result<Vec<LedgerEntry>, StorageError>;

    /// Look up one entry
    async fn get_entry(&self, id: EntryId) -> Result<Option<LedgerEntry>, StorageError>;

    /// Entries still lacking an anchor proof that were created before the
    /// cutoff, oldest first, starting after `after_id`
    ///
    /// Pass `0` for `after_id` to start from the beginning.
    async fn list_unanchored(
        &self,
        created_before: DateTime<Utc>,
        after_id: EntryId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StorageError>;

    /// Cheap reachability check
    async fn ping(&self) -> Result<(), StorageError>;
}
