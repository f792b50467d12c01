//! Async Rekor client

use async_trait::async_trait;
use reqwest::header::{ACCEPT, LOCATION};
use reqwest::StatusCode;
use std::time::Duration;

use super::types::{parse_log_entry_response, HashedRekordEntry};
use crate::anchoring::error::AnchorError;
use crate::traits::anchor::{AnchorRequest, LogProof, TransparencyLog};

/// Liveness probe timeout
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Rekor transparency log client
pub struct RekorClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl RekorClient {
    /// Create a new Rekor client
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AnchorError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AnchorError::NotConfigured("REKOR_SERVER_URL".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AnchorError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            timeout_secs,
        })
    }

    /// Fetch an entry the log already holds
    ///
    /// Rekor answers a duplicate submission with 409 and a `Location` header
    /// pointing at the existing entry.
    async fn fetch_existing(&self, location: &str) -> Result<LogProof, AnchorError> {
        let url = if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            format!("{}/{}", self.base_url, location.trim_start_matches('/'))
        };

        tracing::debug!(url = %url, "Entry already in transparency log, fetching it");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AnchorError::from_transport(e, self.timeout_secs))?;

        if response.status() != StatusCode::OK {
            return Err(AnchorError::ServiceError(format!(
                "transparency log returned status {} for existing entry",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AnchorError::from_transport(e, self.timeout_secs))?;

        parse_log_entry_response(&body)
    }
}

#[async_trait]
impl TransparencyLog for RekorClient {
    async fn submit(&self, request: &AnchorRequest) -> Result<LogProof, AnchorError> {
        let url = format!("{}/api/v1/log/entries", self.base_url);
        let entry = HashedRekordEntry::new(request);

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&entry)
            .send()
            .await
            .map_err(|e| AnchorError::from_transport(e, self.timeout_secs))?;

        match response.status() {
            StatusCode::CREATED => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| AnchorError::from_transport(e, self.timeout_secs))?;
                parse_log_entry_response(&body)
            }
            StatusCode::CONFLICT => {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AnchorError::ServiceError(
                            "transparency log returned status 409 Conflict without Location"
                                .into(),
                        )
                    })?;
                self.fetch_existing(&location).await
            }
            status => Err(AnchorError::ServiceError(format!(
                "transparency log returned status {}",
                status
            ))),
        }
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/api/v1/log", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Transparency log health probe failed");
                false
            }
        }
    }

    fn log_url(&self) -> &str {
        &self.base_url
    }
}
