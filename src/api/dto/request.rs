//! Request DTOs

use base64::Engine;
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};
use crate::ledger::AppendRequest;

/// Request body for POST /append
///
/// Missing fields deserialize to empty values so that the validation step,
/// not the JSON parser, reports what is absent.
#[derive(Debug, Default, Deserialize)]
pub struct AppendJsonRequest {
    /// Caller-supplied label
    #[serde(default)]
    pub subject: String,

    /// Standard base64 of the payload bytes
    #[serde(default)]
    pub payload: String,

    /// Free-form metadata, stored verbatim
    #[serde(default, alias = "metadata")]
    pub meta: Option<serde_json::Map<String, serde_json::Value>>,
}

impl AppendJsonRequest {
    /// Decode the payload and build the pipeline request
    pub fn into_append_request(self) -> ServerResult<AppendRequest> {
        let payload = base64::engine::general_purpose::STANDARD
            .decode(self.payload.as_bytes())
            .map_err(|e| ServerError::InvalidArgument(format!("payload is not valid base64: {}", e)))?;

        Ok(AppendRequest {
            subject: self.subject,
            payload,
            metadata: self.meta.unwrap_or_default(),
        })
    }
}

/// Query string for GET /entries
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}
