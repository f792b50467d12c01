//! Ledger service: the append-sign-anchor pipeline and read paths

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::digest::payload_hash_hex;
use super::lifecycle::{Submission, SubmissionState};
use crate::background::AnchorWorker;
use crate::error::{ServerError, ServerResult};
use crate::signing::SigningClient;
use crate::traits::{EntryId, EntryStore, LedgerEntry, NewEntry};

/// Upper bound (and default) for listing
pub const MAX_LIST_LIMIT: usize = 100;

/// A validated-on-use append request
#[derive(Debug, Clone, Default)]
pub struct AppendRequest {
    pub subject: String,
    pub payload: Vec<u8>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// A committed entry plus its detached anchoring task
#[derive(Debug)]
pub struct Appended {
    pub entry: LedgerEntry,

    /// Background anchoring attempt
    ///
    /// `None` when anchoring is disabled or the worker is saturated.
    /// Dropping the handle does not cancel the attempt.
    pub anchoring: Option<JoinHandle<()>>,
}

/// Result of the health probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub database_ok: bool,
    pub transparency_log_healthy: bool,
    pub anchoring_enabled: bool,
}

impl HealthReport {
    /// The transparency log never fails the check on its own
    pub fn is_healthy(&self) -> bool {
        self.database_ok
    }
}

/// Coordinates signing, storage and anchoring
///
/// All collaborators are passed in at construction.
pub struct LedgerService {
    signer: SigningClient,
    store: Arc<dyn EntryStore>,
    anchoring: Option<AnchorWorker>,
    health_timeout: Duration,
}

impl LedgerService {
    pub fn new(
        signer: SigningClient,
        store: Arc<dyn EntryStore>,
        anchoring: Option<AnchorWorker>,
        health_timeout_secs: u64,
    ) -> Self {
        Self {
            signer,
            store,
            anchoring,
            health_timeout: Duration::from_secs(health_timeout_secs),
        }
    }

    /// Whether committed entries are sent to a transparency log
    pub fn anchoring_enabled(&self) -> bool {
        self.anchoring.is_some()
    }

    /// Sign, verify and durably record a payload
    ///
    /// On error nothing has been written. On success the entry is committed
    /// and anchoring, if enabled, is already running in the background.
    pub async fn append(&self, request: AppendRequest) -> ServerResult<Appended> {
        let mut submission = Submission::new();

        validate(&request)?;
        submission.advance(SubmissionState::Validated)?;

        let signature = self.signer.sign(&request.payload).await?;
        submission.advance(SubmissionState::Signed)?;

        let payload_hash = payload_hash_hex(&request.payload);
        let entry = self
            .store
            .create_entry(NewEntry {
                subject: request.subject,
                payload_hash,
                signature,
                metadata: request.metadata,
            })
            .await?;
        submission.advance(SubmissionState::Stored)?;

        tracing::info!(
            entry_id = entry.id,
            subject = %entry.subject,
            payload_hash = %entry.payload_hash,
            "Entry appended"
        );

        let anchoring = self
            .anchoring
            .as_ref()
            .and_then(|worker| worker.dispatch(entry.clone()));

        Ok(Appended { entry, anchoring })
    }

    /// Most recent entries, newest first
    ///
    /// `limit` is clamped to `1..=MAX_LIST_LIMIT`; `None` means the maximum.
    pub async fn list_recent(&self, limit: Option<usize>) -> ServerResult<Vec<LedgerEntry>> {
        let limit = limit.unwrap_or(MAX_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        Ok(self.store.list_recent(limit).await?)
    }

    /// One entry by id
    pub async fn get_entry(&self, id: EntryId) -> ServerResult<LedgerEntry> {
        self.store
            .get_entry(id)
            .await?
            .ok_or_else(|| ServerError::EntryNotFound(format!("entry {}", id)))
    }

    /// Probe the store and the transparency log independently
    pub async fn health(&self) -> HealthReport {
        let database = async {
            match tokio::time::timeout(self.health_timeout, self.store.ping()).await {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Database health probe failed");
                    false
                }
                Err(_) => {
                    tracing::warn!("Database health probe timed out");
                    false
                }
            }
        };

        let transparency_log = async {
            match &self.anchoring {
                Some(worker) => {
                    tokio::time::timeout(self.health_timeout, worker.log().is_healthy())
                        .await
                        .unwrap_or(false)
                }
                None => false,
            }
        };

        let (database_ok, transparency_log_healthy) = tokio::join!(database, transparency_log);

        HealthReport {
            database_ok,
            transparency_log_healthy,
            anchoring_enabled: self.anchoring_enabled(),
        }
    }
}

fn validate(request: &AppendRequest) -> ServerResult<()> {
    if request.subject.is_empty() {
        return Err(ServerError::InvalidArgument("subject is required".into()));
    }
    if request.payload.is_empty() {
        return Err(ServerError::InvalidArgument("payload is required".into()));
    }
    Ok(())
}
