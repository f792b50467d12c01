//! Test fixtures and app setup utilities

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use tower::ServiceExt;

use ledger_server::anchoring::MockTransparencyLog;
use ledger_server::api::{create_router, AppState};
use ledger_server::background::{AnchorWorker, AnchorWorkerConfig};
use ledger_server::signing::{MockSigningAuthority, MockSigningMode, SigningClient};
use ledger_server::traits::{EntryStore, SigningAuthority, TransparencyLog};
use ledger_server::{LedgerService, SqliteStore};

/// A router plus handles on everything behind it
pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub signer: Arc<MockSigningAuthority>,
    pub log: Option<Arc<MockTransparencyLog>>,
}

/// In-memory store with schema applied
pub fn memory_store() -> Arc<SqliteStore> {
    let store = SqliteStore::in_memory().expect("Failed to create in-memory storage");
    store.initialize().expect("Failed to initialize storage");
    Arc::new(store)
}

/// Build an app around the given collaborators
pub fn build_app(
    store: Arc<SqliteStore>,
    authority: Arc<dyn SigningAuthority>,
    log: Option<Arc<dyn TransparencyLog>>,
) -> Router {
    let entry_store: Arc<dyn EntryStore> = store;
    let worker = log.map(|log| {
        AnchorWorker::new(
            Arc::clone(&entry_store),
            log,
            AnchorWorkerConfig {
                timeout_secs: 5,
                max_in_flight: 4,
            },
        )
    });

    let ledger = LedgerService::new(SigningClient::new(authority, 5), entry_store, worker, 2);
    create_router(Arc::new(AppState::new(Arc::new(ledger))))
}

/// Honest signer, healthy transparency log
pub fn test_app() -> TestApp {
    test_app_with(MockSigningMode::Honest, Some(MockTransparencyLog::new()))
}

/// App with a chosen signer behaviour and optional transparency log
pub fn test_app_with(mode: MockSigningMode, log: Option<MockTransparencyLog>) -> TestApp {
    let store = memory_store();
    let signer = Arc::new(MockSigningAuthority::with_mode(mode));
    let log = log.map(Arc::new);

    let router = build_app(
        Arc::clone(&store),
        signer.clone(),
        log.clone().map(|l| l as Arc<dyn TransparencyLog>),
    );

    TestApp {
        router,
        store,
        signer,
        log,
    }
}

/// JSON body for POST /append
pub fn append_body(subject: &str, payload: &[u8], meta: Value) -> Value {
    serde_json::json!({
        "subject": subject,
        "payload": STANDARD.encode(payload),
        "meta": meta,
    })
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

/// Send one request and decode the JSON reply
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// Poll GET /entries/:id until the entry is anchored
pub async fn wait_for_anchor(router: &Router, id: i64) -> Value {
    for _ in 0..100 {
        let (status, json) = send(router, get(&format!("/entries/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        if json.get("anchored_at").is_some() {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("entry {} was not anchored in time", id);
}
