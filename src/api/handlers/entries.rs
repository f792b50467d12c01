//! Entry read handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::dto::{EntryResponse, ListQuery};
use crate::api::state::AppState;
use crate::error::ServerError;
use crate::traits::EntryId;

/// GET /entries - Most recent entries, newest first
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<EntryResponse>>, ServerError> {
    let Query(query) = query?;
    let anchoring_enabled = state.ledger.anchoring_enabled();
    let entries = state.ledger.list_recent(query.limit).await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|e| EntryResponse::from_entry(e, anchoring_enabled))
            .collect(),
    ))
}

/// GET /entries/:id - One entry
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    id: Result<Path<EntryId>, PathRejection>,
) -> Result<Json<EntryResponse>, ServerError> {
    let Path(id) = id?;
    let entry = state.ledger.get_entry(id).await?;
    Ok(Json(EntryResponse::from_entry(
        entry,
        state.ledger.anchoring_enabled(),
    )))
}
