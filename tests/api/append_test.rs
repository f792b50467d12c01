//! Append endpoint tests

use crate::common::*;
use ledger_server::anchoring::MockTransparencyLog;
use ledger_server::signing::MockSigningMode;
use ledger_server::traits::EntryStore;
use serde_json::json;

#[tokio::test]
async fn test_append_returns_created_entry() {
    let app = test_app();

    let (status, json) = send(
        &app.router,
        post_json("/append", &append_body("doc-1", b"hello", json!({"source": "scanner"}))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(json["id"].as_i64().unwrap() > 0);
    assert_eq!(json["subject"], "doc-1");
    assert_eq!(
        json["payload_hash"],
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert!(!json["signature"].as_str().unwrap().is_empty());
    assert_eq!(json["public_key"], app.signer.public_key_base64());
    assert_eq!(json["meta"]["source"], "scanner");
    assert!(json["created_at"].is_string());
    assert!(json.get("payload").is_none());
    assert!(json.get("rekor_log_id").is_none());
    assert!(json.get("anchored_at").is_none());
}

#[tokio::test]
async fn test_append_is_anchored_on_later_read() {
    let app = test_app();

    let (status, json) = send(
        &app.router,
        post_json("/append", &append_body("doc-1", b"hello", json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = json["id"].as_i64().unwrap();
    let anchored = wait_for_anchor(&app.router, id).await;

    assert!(anchored["rekor_log_id"].as_str().unwrap().starts_with("mock-"));
    assert!(anchored["rekor_index"].is_number());
    assert_eq!(anchored["anchor_status"], "anchored");
    assert_eq!(app.log.as_ref().unwrap().submit_calls(), 1);
}

#[tokio::test]
async fn test_append_without_meta() {
    let app = test_app();
    let body = json!({"subject": "doc-2", "payload": "aGVsbG8="});

    let (status, json) = send(&app.router, post_json("/append", &body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["meta"], json!({}));
}

#[tokio::test]
async fn test_append_empty_subject_is_400() {
    let app = test_app();

    let (status, json) = send(
        &app.router,
        post_json("/append", &append_body("", b"hello", json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "ValidationError");
    assert_eq!(json["recoverable"], false);
    assert_eq!(app.signer.sign_calls(), 0);
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_append_empty_payload_is_400() {
    let app = test_app();

    let (status, json) = send(
        &app.router,
        post_json("/append", &json!({"subject": "doc", "payload": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("payload is required"));
    assert_eq!(app.signer.sign_calls(), 0);
}

#[tokio::test]
async fn test_append_invalid_base64_is_400() {
    let app = test_app();

    let (status, json) = send(
        &app.router,
        post_json("/append", &json!({"subject": "doc", "payload": "%%%"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "ValidationError");
    assert_eq!(app.signer.sign_calls(), 0);
}

#[tokio::test]
async fn test_append_malformed_json_is_400() {
    let app = test_app();

    let request = Request::post("/append")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_forged_signature_is_500_and_not_persisted() {
    let app = test_app_with(MockSigningMode::Forged, Some(MockTransparencyLog::new()));

    let (status, json) = send(
        &app.router,
        post_json("/append", &append_body("doc", b"hello", json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["kind"], "IntegrityError");
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
    assert_eq!(app.log.as_ref().unwrap().submit_calls(), 0);
}

#[tokio::test]
async fn test_wrong_key_is_500_and_not_persisted() {
    let app = test_app_with(MockSigningMode::WrongKey, None);

    let (status, json) = send(
        &app.router,
        post_json("/append", &append_body("doc", b"hello", json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["kind"], "IntegrityError");
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_signer_unavailable_is_recoverable_500() {
    let app = test_app_with(MockSigningMode::Unavailable, Some(MockTransparencyLog::new()));

    let (status, json) = send(
        &app.router,
        post_json("/append", &append_body("doc", b"hello", json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["kind"], "UpstreamError");
    assert_eq!(json["recoverable"], true);
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_log_down_append_still_succeeds() {
    let app = test_app_with(MockSigningMode::Honest, Some(MockTransparencyLog::unavailable()));

    let (status, json) = send(
        &app.router,
        post_json("/append", &append_body("doc", b"hello", json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["id"].as_i64().unwrap();

    // Give the background attempt time to fail
    let log = app.log.as_ref().unwrap();
    for _ in 0..100 {
        if log.submit_calls() > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let (status, json) = send(&app.router, get(&format!("/entries/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.get("anchored_at").is_none());
    assert_eq!(json["anchor_status"], "pending");
}

#[tokio::test]
async fn test_anchoring_disabled() {
    let app = test_app_with(MockSigningMode::Honest, None);

    let (status, json) = send(
        &app.router,
        post_json("/append", &append_body("doc", b"hello", json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["anchor_status"], "disabled");
}

#[tokio::test]
async fn test_identical_payloads_get_distinct_ids() {
    let app = test_app();
    let body = append_body("doc", b"same bytes", json!({}));

    let (_, first) = send(&app.router, post_json("/append", &body)).await;
    let (_, second) = send(&app.router, post_json("/append", &body)).await;

    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["payload_hash"], second["payload_hash"]);
}
