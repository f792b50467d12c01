//! Rekor wire types

use serde::Serialize;

use crate::anchoring::error::AnchorError;
use crate::traits::anchor::{AnchorRequest, LogProof};

/// `hashedrekord` v0.0.1 proposed entry
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HashedRekordEntry {
    pub api_version: String,
    pub kind: String,
    pub spec: HashedRekordSpec,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HashedRekordSpec {
    pub data: HashedRekordData,
    pub signature: HashedRekordSignature,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HashedRekordData {
    pub hash: HashedRekordHash,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HashedRekordHash {
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HashedRekordSignature {
    pub content: String,
    pub public_key: HashedRekordPublicKey,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HashedRekordPublicKey {
    pub content: String,
}

impl HashedRekordEntry {
    /// Build the proposed entry for a signed payload hash
    pub fn new(request: &AnchorRequest) -> Self {
        Self {
            api_version: "0.0.1".to_string(),
            kind: "hashedrekord".to_string(),
            spec: HashedRekordSpec {
                data: HashedRekordData {
                    hash: HashedRekordHash {
                        algorithm: "sha256".to_string(),
                        value: request.payload_hash.clone(),
                    },
                },
                signature: HashedRekordSignature {
                    content: request.signature.clone(),
                    public_key: HashedRekordPublicKey {
                        content: request.public_key.clone(),
                    },
                },
            },
        }
    }
}

/// Extract the inclusion claim from a log entry response
///
/// Rekor answers with a JSON object holding exactly one member: the entry
/// UUID mapped to the entry, whose `logIndex` is a non-negative integer.
/// Any other shape is rejected rather than guessed at.
pub fn parse_log_entry_response(body: &[u8]) -> Result<LogProof, AnchorError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AnchorError::InvalidResponse(format!("body is not JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| AnchorError::InvalidResponse("expected a JSON object".into()))?;

    if object.len() != 1 {
        return Err(AnchorError::InvalidResponse(format!(
            "expected exactly one log entry, got {}",
            object.len()
        )));
    }

    let Some((log_id, entry)) = object.iter().next() else {
        return Err(AnchorError::InvalidResponse("empty response".into()));
    };

    if log_id.trim().is_empty() {
        return Err(AnchorError::InvalidResponse("empty entry identifier".into()));
    }

    let log_index = entry
        .get("logIndex")
        .and_then(serde_json::Value::as_i64)
        .filter(|i| *i >= 0)
        .ok_or_else(|| {
            AnchorError::InvalidResponse(format!(
                "entry {} has no valid logIndex",
                log_id
            ))
        })?;

    Ok(LogProof {
        log_id: log_id.clone(),
        log_index,
    })
}
