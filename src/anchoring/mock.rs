//! Mock transparency log for testing
//!
//! Provides a configurable in-process log for unit and integration tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::anchoring::error::AnchorError;
use crate::traits::anchor::{AnchorRequest, LogProof, TransparencyLog};

/// Mock transparency log
pub struct MockTransparencyLog {
    /// Whether submit should fail
    pub submit_should_fail: AtomicBool,

    /// Whether the liveness probe succeeds
    pub healthy: AtomicBool,

    /// Artificial submit latency in milliseconds
    pub submit_delay_ms: AtomicU64,

    /// Count of submit calls
    pub submit_call_count: AtomicUsize,

    next_index: AtomicI64,
    url: String,
}

impl Default for MockTransparencyLog {
    fn default() -> Self {
        Self {
            submit_should_fail: AtomicBool::new(false),
            healthy: AtomicBool::new(true),
            submit_delay_ms: AtomicU64::new(0),
            submit_call_count: AtomicUsize::new(0),
            next_index: AtomicI64::new(0),
            url: "https://mock.rekor".to_string(),
        }
    }
}

impl MockTransparencyLog {
    /// Create a healthy mock log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that is down: submits fail and health is false
    pub fn unavailable() -> Self {
        Self {
            submit_should_fail: AtomicBool::new(true),
            healthy: AtomicBool::new(false),
            ..Self::default()
        }
    }

    /// Create a mock whose submits take the given time
    pub fn slow(delay: Duration) -> Self {
        Self {
            submit_delay_ms: AtomicU64::new(delay.as_millis() as u64),
            ..Self::default()
        }
    }

    /// Bring the log up or down
    pub fn set_available(&self, available: bool) {
        self.submit_should_fail.store(!available, Ordering::SeqCst);
        self.healthy.store(available, Ordering::SeqCst);
    }

    /// Number of submit calls so far
    pub fn submit_calls(&self) -> usize {
        self.submit_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransparencyLog for MockTransparencyLog {
    async fn submit(&self, request: &AnchorRequest) -> Result<LogProof, AnchorError> {
        self.submit_call_count.fetch_add(1, Ordering::SeqCst);

        let delay = self.submit_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.submit_should_fail.load(Ordering::SeqCst) {
            return Err(AnchorError::ServiceError(
                "transparency log returned status 503 Service Unavailable".into(),
            ));
        }

        let prefix: String = request.payload_hash.chars().take(16).collect();
        Ok(LogProof {
            log_id: format!("mock-{}", prefix),
            log_index: self.next_index.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    fn log_url(&self) -> &str {
        &self.url
    }
}
