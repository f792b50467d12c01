// File: src/background/anchor_worker.rs

//! Anchoring worker
//!
//! Turns a committed, unanchored entry into an anchored one. Each attempt
//! is detached from the request that created the entry, bounded by its own
//! deadline, and limited in concurrency by a semaphore.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::anchoring::error::AnchorError;
use crate::config::TransparencyLogConfig;
use crate::error::{ServerError, ServerResult, StorageError};
use crate::ledger::lifecycle::{Submission, SubmissionState};
use crate::traits::{
    AnchorRequest, AttachOutcome, EntryId, EntryStore, LedgerEntry, LogProof, TransparencyLog,
};

/// Anchoring worker configuration
#[derive(Debug, Clone)]
pub struct AnchorWorkerConfig {
    /// Deadline for one transparency log submission
    pub timeout_secs: u64,

    /// Maximum concurrent submissions
    pub max_in_flight: usize,
}

impl Default for AnchorWorkerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_in_flight: 32,
        }
    }
}

impl From<&TransparencyLogConfig> for AnchorWorkerConfig {
    fn from(config: &TransparencyLogConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            max_in_flight: config.max_in_flight.max(1),
        }
    }
}

/// Result of one anchoring attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// Proof obtained and attached now
    Anchored(LogProof),
    /// Entry already carried a proof
    AlreadyAnchored,
    /// Another attempt for this entry is running
    InFlight,
}

/// Submits entries to the transparency log and records the proof
#[derive(Clone)]
pub struct AnchorWorker {
    store: Arc<dyn EntryStore>,
    log: Arc<dyn TransparencyLog>,
    config: AnchorWorkerConfig,
    permits: Arc<Semaphore>,
    in_flight: Arc<Mutex<HashSet<EntryId>>>,
}

impl AnchorWorker {
    pub fn new(
        store: Arc<dyn EntryStore>,
        log: Arc<dyn TransparencyLog>,
        config: AnchorWorkerConfig,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
        Self {
            store,
            log,
            config,
            permits,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// The transparency log this worker submits to
    pub fn log(&self) -> &Arc<dyn TransparencyLog> {
        &self.log
    }

    /// Anchor an entry in the background
    ///
    /// Returns immediately. Failures are logged and leave the entry
    /// unanchored for reconciliation. When `max_in_flight` attempts are
    /// already running nothing is spawned and `None` is returned; the entry
    /// is durable and the reconciliation sweep picks it up later.
    pub fn dispatch(&self, entry: LedgerEntry) -> Option<JoinHandle<()>> {
        let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
            tracing::debug!(
                entry_id = entry.id,
                max_in_flight = self.config.max_in_flight,
                "Anchoring saturated, leaving entry for reconciliation"
            );
            return None;
        };

        let worker = self.clone();
        Some(tokio::spawn(async move {
            let _permit = permit;
            // Outcome already logged by anchor_entry
            let _ = worker.anchor_entry(&entry).await;
        }))
    }

    /// Anchor one entry and wait for the result
    pub async fn anchor_entry(&self, entry: &LedgerEntry) -> ServerResult<AnchorOutcome> {
        if entry.is_anchored() {
            return Ok(AnchorOutcome::AlreadyAnchored);
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, entry.id) else {
            tracing::debug!(entry_id = entry.id, "Anchoring already in flight, skipping");
            return Ok(AnchorOutcome::InFlight);
        };

        let mut submission = Submission::resume(SubmissionState::Stored);
        submission.advance(SubmissionState::AnchorPending)?;

        match self.submit_and_attach(entry).await {
            Ok(outcome) => {
                submission.advance(SubmissionState::Anchored)?;
                if let AnchorOutcome::Anchored(proof) = &outcome {
                    tracing::info!(
                        entry_id = entry.id,
                        log_id = %proof.log_id,
                        log_index = proof.log_index,
                        "Entry anchored in transparency log"
                    );
                }
                Ok(outcome)
            }
            Err(e) => {
                submission.advance(SubmissionState::AnchorFailed)?;
                match &e {
                    ServerError::Storage(StorageError::AnchorConflict { .. }) => {
                        tracing::error!(
                            entry_id = entry.id,
                            error = %e,
                            "Transparency log returned a different proof than the one recorded"
                        );
                    }
                    _ => {
                        tracing::warn!(
                            entry_id = entry.id,
                            kind = %e.kind(),
                            error = %e,
                            "Anchoring failed, entry stays unanchored"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn submit_and_attach(&self, entry: &LedgerEntry) -> ServerResult<AnchorOutcome> {
        let request = AnchorRequest {
            payload_hash: entry.payload_hash.clone(),
            signature: entry.signature.clone(),
            public_key: entry.public_key.clone(),
        };

        let deadline = Duration::from_secs(self.config.timeout_secs);
        let proof = tokio::time::timeout(deadline, self.log.submit(&request))
            .await
            .map_err(|_| AnchorError::Timeout(self.config.timeout_secs))??;

        match self.store.attach_anchor_proof(entry.id, &proof).await? {
            AttachOutcome::Attached => Ok(AnchorOutcome::Anchored(proof)),
            AttachOutcome::AlreadyAttached => Ok(AnchorOutcome::AlreadyAnchored),
        }
    }
}

/// Marks an entry as being anchored until dropped
struct InFlightGuard {
    set: Arc<Mutex<HashSet<EntryId>>>,
    id: EntryId,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<HashSet<EntryId>>>, id: EntryId) -> Option<Self> {
        let mut ids = set.lock().unwrap_or_else(|e| e.into_inner());
        if !ids.insert(id) {
            return None;
        }
        Some(Self {
            set: Arc::clone(set),
            id,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut ids = self.set.lock().unwrap_or_else(|e| e.into_inner());
        ids.remove(&self.id);
    }
}
