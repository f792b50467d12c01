//! Anchoring-specific error types

use thiserror::Error;

use crate::error::ErrorKind;

/// Transparency log operation errors
#[derive(Debug, Clone, Error)]
pub enum AnchorError {
    /// Transparency log URL not configured
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Network communication error
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout
    #[error("timeout after {0} seconds")]
    Timeout(u64),

    /// Service returned an error status
    #[error("service error: {0}")]
    ServiceError(String),

    /// Response did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AnchorError {
    /// Map a reqwest transport failure
    pub fn from_transport(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            AnchorError::Timeout(timeout_secs)
        } else {
            AnchorError::Network(e.to_string())
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnchorError::NotConfigured(_) => ErrorKind::Configuration,
            AnchorError::Network(_) | AnchorError::Timeout(_) | AnchorError::ServiceError(_) => {
                ErrorKind::Upstream
            }
            AnchorError::InvalidResponse(_) => ErrorKind::Protocol,
        }
    }
}
