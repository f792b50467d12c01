//! Signing-specific error types

use thiserror::Error;

use crate::error::ErrorKind;

/// Signing authority and local verification errors
#[derive(Debug, Clone, Error)]
pub enum SigningError {
    /// Required signing settings are missing
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Network communication error
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout
    #[error("timeout after {0} seconds")]
    Timeout(u64),

    /// Authority returned a non-success status
    #[error("service error: {0}")]
    ServiceError(String),

    /// Reply body was not the expected JSON
    #[error("malformed response: {0}")]
    MalformedBody(String),

    /// Wrapped signature string violates `vault:v<N>:<base64>`
    #[error("bad signature envelope: {0}")]
    Envelope(String),

    /// Public key or signature bytes are unusable
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Signature does not verify against the payload
    #[error("local verification failed: {0}")]
    VerificationFailed(String),
}

impl SigningError {
    /// Map a reqwest transport failure
    pub fn from_transport(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            SigningError::Timeout(timeout_secs)
        } else {
            SigningError::Network(e.to_string())
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SigningError::NotConfigured(_) => ErrorKind::Configuration,
            SigningError::Network(_)
            | SigningError::Timeout(_)
            | SigningError::ServiceError(_)
            | SigningError::MalformedBody(_) => ErrorKind::Upstream,
            SigningError::Envelope(_) | SigningError::InvalidKeyMaterial(_) => {
                ErrorKind::Protocol
            }
            SigningError::VerificationFailed(_) => ErrorKind::Integrity,
        }
    }
}
