//! Transparency log trait definition

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::anchoring::error::AnchorError;

/// What gets recorded in the transparency log for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRequest {
    /// Lowercase hex SHA-256 of the payload
    pub payload_hash: String,

    /// Base64 Ed25519 signature over the payload
    pub signature: String,

    /// Base64 public key that produced the signature
    pub public_key: String,
}

/// Inclusion claim returned by the transparency log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogProof {
    /// Log entry identifier (Rekor entry UUID)
    pub log_id: String,

    /// Position in the log
    pub log_index: i64,
}

/// An append-only public log that records signed hashes
#[async_trait]
pub trait TransparencyLog: Send + Sync {
    /// Record the signed hash and return where it landed
    async fn submit(&self, request: &AnchorRequest) -> Result<LogProof, AnchorError>;

    /// Liveness probe
    async fn is_healthy(&self) -> bool;

    /// Base URL for logs
    fn log_url(&self) -> &str;
}
