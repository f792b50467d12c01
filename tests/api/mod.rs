//! API integration tests
//!
//! Tests for HTTP endpoints:
//! - POST /append
//! - GET /entries and GET /entries/{id}
//! - GET /health
//! - End-to-end against mock Vault and Rekor servers

pub mod append_test;
pub mod health_test;
