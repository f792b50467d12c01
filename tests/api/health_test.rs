//! Health endpoint tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::*;
use ledger_server::anchoring::MockTransparencyLog;
use ledger_server::api::{create_router, AppState};
use ledger_server::error::StorageError;
use ledger_server::signing::{MockSigningAuthority, MockSigningMode, SigningClient};
use ledger_server::traits::{AttachOutcome, EntryId, EntryStore, LedgerEntry, LogProof, NewEntry};
use ledger_server::LedgerService;

/// A store whose database is gone
struct UnreachableStore;

fn down() -> StorageError {
    StorageError::ConnectionFailed("database is unreachable".into())
}

#[async_trait]
impl EntryStore for UnreachableStore {
    async fn create_entry(&self, _entry: NewEntry) -> Result<LedgerEntry, StorageError> {
        Err(down())
    }

    async fn attach_anchor_proof(
        &self,
        _id: EntryId,
        _proof: &LogProof,
    ) -> Result<AttachOutcome, StorageError> {
        Err(down())
    }

    async fn list_recent(&self, _limit: usize) -> Result<Vec<LedgerEntry>, StorageError> {
        Err(down())
    }

    async fn get_entry(&self, _id: EntryId) -> Result<Option<LedgerEntry>, StorageError> {
        Err(down())
    }

    async fn list_unanchored(
        &self,
        _created_before: DateTime<Utc>,
        _after_id: EntryId,
        _limit: usize,
    ) -> Result<Vec<LedgerEntry>, StorageError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Err(down())
    }
}

fn unreachable_app() -> axum::Router {
    let ledger = LedgerService::new(
        SigningClient::new(Arc::new(MockSigningAuthority::new()), 5),
        Arc::new(UnreachableStore),
        None,
        1,
    );
    create_router(Arc::new(AppState::new(Arc::new(ledger))))
}

#[tokio::test]
async fn test_health_all_up() {
    let app = test_app();

    let (status, json) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
    assert_eq!(json["transparency_log"], true);
    assert_eq!(json["anchoring_enabled"], true);
}

#[tokio::test]
async fn test_health_log_down_is_still_200() {
    let app = test_app_with(MockSigningMode::Honest, Some(MockTransparencyLog::unavailable()));

    let (status, json) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["transparency_log"], false);
}

#[tokio::test]
async fn test_health_log_recovers() {
    let app = test_app_with(MockSigningMode::Honest, Some(MockTransparencyLog::unavailable()));
    app.log.as_ref().unwrap().set_available(true);

    let (_, json) = send(&app.router, get("/health")).await;

    assert_eq!(json["transparency_log"], true);
}

#[tokio::test]
async fn test_health_anchoring_disabled() {
    let app = test_app_with(MockSigningMode::Honest, None);

    let (status, json) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["transparency_log"], false);
    assert_eq!(json["anchoring_enabled"], false);
}

#[tokio::test]
async fn test_health_database_down_is_503() {
    let router = unreachable_app();

    let (status, json) = send(&router, get("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["database"], "unavailable");
}

#[tokio::test]
async fn test_append_with_database_down_is_storage_error() {
    let router = unreachable_app();

    let (status, json) = send(
        &router,
        post_json("/append", &append_body("doc", b"hello", serde_json::json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["kind"], "StorageError");
    assert_eq!(json["recoverable"], true);
}
