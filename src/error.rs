//! Server error types

use axum::http::StatusCode;
use thiserror::Error;

pub use crate::anchoring::error::AnchorError;
pub use crate::signing::error::SigningError;

/// Error classification shared by every failure in the append-sign-anchor pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input, never retried
    Validation,
    /// Missing external-service configuration
    Configuration,
    /// Transient network or service failure
    Upstream,
    /// Malformed reply from a trusted external service
    Protocol,
    /// Signature verification failure
    Integrity,
    /// Database fault
    Storage,
    /// Requested entry does not exist
    NotFound,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Upstream => "UpstreamError",
            ErrorKind::Protocol => "ProtocolError",
            ErrorKind::Integrity => "IntegrityError",
            ErrorKind::Storage => "StorageError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Internal => "InternalError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main server error type
#[derive(Debug, Error)]
pub enum ServerError {
    // ========== Validation Errors ==========
    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // ========== Entry Errors ==========
    /// Entry not found
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    // ========== Collaborator Errors ==========
    /// Signing authority call or local verification failed
    #[error("signing error: {0}")]
    Signing(SigningError),

    /// Transparency log call failed
    #[error("anchoring error: {0}")]
    Anchoring(AnchorError),

    /// Storage operation failed (NOT NotFound - that becomes EntryNotFound)
    #[error("storage error: {0}")]
    Storage(StorageError),

    // ========== Server Errors ==========
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Transaction failed
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Schema migration failed
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Data corruption detected
    #[error("data corruption: {0}")]
    Corruption(String),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A different anchor proof is already attached to the entry
    #[error("entry {id} already anchored as {existing_log_id}@{existing_index}")]
    AnchorConflict {
        id: i64,
        existing_log_id: String,
        existing_index: i64,
    },

    /// Store operation exceeded its deadline
    #[error("timeout after {0} seconds")]
    Timeout(u64),

    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StorageError {
    /// Check if the failure is transient
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::ConnectionFailed(_) | StorageError::Timeout(_) => true,
            StorageError::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Server result type alias
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::InvalidArgument(_) => ErrorKind::Validation,
            ServerError::EntryNotFound(_) => ErrorKind::NotFound,
            ServerError::Signing(e) => e.kind(),
            ServerError::Anchoring(e) => e.kind(),
            ServerError::Storage(_) => ErrorKind::Storage,
            ServerError::Config(_) => ErrorKind::Configuration,
            ServerError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            // 400 Bad Request
            ErrorKind::Validation => StatusCode::BAD_REQUEST,

            // 404 Not Found
            ErrorKind::NotFound => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            ErrorKind::Configuration
            | ErrorKind::Upstream
            | ErrorKind::Protocol
            | ErrorKind::Integrity
            | ErrorKind::Storage
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API response
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServerError::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            ServerError::Signing(_) => "SIGNING_ERROR",
            ServerError::Anchoring(_) => "ANCHORING_ERROR",
            ServerError::Storage(_) => "STORAGE_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if error is recoverable (client can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            ServerError::Storage(e) => e.is_transient(),
            other => other.kind() == ErrorKind::Upstream,
        }
    }
}

// Conversions from external errors

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        ServerError::InvalidArgument(e.to_string())
    }
}

impl From<base64::DecodeError> for ServerError {
    fn from(e: base64::DecodeError) -> Self {
        ServerError::InvalidArgument(format!("base64 decode: {}", e))
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::Storage(StorageError::Sqlite(e))
    }
}

impl From<StorageError> for ServerError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(msg) => ServerError::EntryNotFound(msg),
            other => ServerError::Storage(other),
        }
    }
}

impl From<SigningError> for ServerError {
    fn from(e: SigningError) -> Self {
        ServerError::Signing(e)
    }
}

impl From<AnchorError> for ServerError {
    fn from(e: AnchorError) -> Self {
        ServerError::Anchoring(e)
    }
}
