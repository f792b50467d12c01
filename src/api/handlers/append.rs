//! Append endpoint handler

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use crate::api::dto::{AppendJsonRequest, EntryResponse};
use crate::api::state::AppState;
use crate::error::ServerError;

/// POST /append - Sign and record a payload
///
/// Responds once the entry is committed; anchoring continues in the
/// background.
pub async fn append_entry(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<EntryResponse>), ServerError> {
    let req: AppendJsonRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::InvalidArgument(format!("invalid JSON: {}", e)))?;

    let request = req.into_append_request()?;

    let appended = match state.ledger.append(request).await {
        Ok(appended) => appended,
        Err(e @ ServerError::InvalidArgument(_)) => return Err(e),
        Err(e) => {
            tracing::warn!(error = %e, kind = %e.kind(), "Append failed");
            return Err(e);
        }
    };

    let response = EntryResponse::from_entry(appended.entry, state.ledger.anchoring_enabled());
    Ok((StatusCode::CREATED, Json(response)))
}
