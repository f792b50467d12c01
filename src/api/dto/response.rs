//! Response DTOs

use serde::Serialize;

use crate::api::handlers::helpers::format_timestamp;
use crate::ledger::{AnchorStatus, HealthReport};
use crate::traits::LedgerEntry;

/// A ledger entry as returned by the API
///
/// The raw payload is never part of a response.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub id: i64,
    pub subject: String,
    pub payload_hash: String,
    pub signature: String,
    pub public_key: String,
    pub meta: serde_json::Map<String, serde_json::Value>,

    /// Transparency log entry UUID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rekor_log_id: Option<String>,

    /// Position in the transparency log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rekor_index: Option<i64>,

    /// RFC 3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchored_at: Option<String>,

    /// RFC 3339
    pub created_at: String,

    pub anchor_status: AnchorStatus,
}

impl EntryResponse {
    pub fn from_entry(entry: LedgerEntry, anchoring_enabled: bool) -> Self {
        let anchor_status = AnchorStatus::of(&entry, anchoring_enabled);
        let (rekor_log_id, rekor_index, anchored_at) = match entry.anchor {
            Some(proof) => (
                Some(proof.log_id),
                Some(proof.log_index),
                Some(format_timestamp(&proof.anchored_at)),
            ),
            None => (None, None, None),
        };

        Self {
            id: entry.id,
            subject: entry.subject,
            payload_hash: entry.payload_hash,
            signature: entry.signature,
            public_key: entry.public_key,
            meta: entry.metadata,
            rekor_log_id,
            rekor_index,
            anchored_at,
            created_at: format_timestamp(&entry.created_at),
            anchor_status,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy", from the database alone
    pub status: String,

    /// "ok" or "unavailable"
    pub database: String,

    /// Transparency log liveness
    pub transparency_log: bool,

    pub anchoring_enabled: bool,
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            status: if report.is_healthy() { "healthy" } else { "unhealthy" }.to_string(),
            database: if report.database_ok { "ok" } else { "unavailable" }.to_string(),
            transparency_log: report.transparency_log_healthy,
            anchoring_enabled: report.anchoring_enabled,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Machine-readable error code
    pub code: String,

    /// Error taxonomy name, e.g. "UpstreamError"
    pub kind: String,

    /// Whether the client can retry
    pub recoverable: bool,
}
