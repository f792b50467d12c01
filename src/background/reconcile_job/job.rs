// File: src/background/reconcile_job/job.rs

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use super::config::ReconcileJobConfig;
use crate::background::anchor_worker::{AnchorOutcome, AnchorWorker};
use crate::error::ServerResult;
use crate::traits::{EntryId, EntryStore};

/// Summary of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Unanchored entries found
    pub found: usize,
    /// Entries anchored by this sweep
    pub anchored: usize,
    /// Entries whose attempt failed again
    pub failed: usize,
}

/// Reconciliation background job
///
/// Processes entries that are:
/// - Still without an anchor proof
/// - Older than `min_age_secs` (so the original worker has given up)
///
/// Oldest entries go first; each gets its own submission. Each sweep resumes
/// after the last entry the previous one saw and wraps around once it
/// reaches the end, so entries that keep failing cannot starve newer ones.
pub struct ReconcileJob {
    store: Arc<dyn EntryStore>,
    worker: AnchorWorker,
    config: ReconcileJobConfig,
    /// Highest id visited by the last full batch, 0 to start over
    cursor: AtomicI64,
}

impl ReconcileJob {
    pub fn new(store: Arc<dyn EntryStore>, worker: AnchorWorker, config: ReconcileJobConfig) -> Self {
        Self {
            store,
            worker,
            config,
            cursor: AtomicI64::new(0),
        }
    }

    /// Run reconciliation as a background task
    ///
    /// Runs until shutdown signal is received via broadcast channel.
    pub async fn run(&self, mut shutdown: tokio::sync::broadcast::Receiver<()>) {
        let mut ticker = interval(Duration::from_secs(self.config.interval_secs.max(1)));
        // The first tick fires immediately; skip it so startup stays quiet
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep().await {
                        tracing::error!(error = %e, "Reconciliation sweep failed");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Reconciliation job shutting down");
                    break;
                }
            }
        }
    }

    /// Re-drive one batch of unanchored entries
    pub async fn sweep(&self) -> ServerResult<SweepReport> {
        let cutoff = chrono::Utc::now() - chrono::Duration::seconds(self.config.min_age_secs as i64);
        let after_id: EntryId = self.cursor.load(Ordering::SeqCst);
        let pending = self
            .store
            .list_unanchored(cutoff, after_id, self.config.batch_size)
            .await?;

        // A short batch means the end was reached; wrap for the next sweep
        let next = match pending.last() {
            Some(last) if pending.len() >= self.config.batch_size => last.id,
            _ => 0,
        };
        self.cursor.store(next, Ordering::SeqCst);

        let mut report = SweepReport {
            found: pending.len(),
            ..Default::default()
        };

        if pending.is_empty() {
            return Ok(report);
        }

        tracing::info!(
            count = pending.len(),
            after_id,
            "Re-driving unanchored entries"
        );

        for entry in pending {
            match self.worker.anchor_entry(&entry).await {
                Ok(AnchorOutcome::Anchored(_)) => report.anchored += 1,
                Ok(AnchorOutcome::AlreadyAnchored) | Ok(AnchorOutcome::InFlight) => {}
                // Logged by the worker
                Err(_) => report.failed += 1,
            }
        }

        tracing::info!(
            found = report.found,
            anchored = report.anchored,
            failed = report.failed,
            "Reconciliation sweep complete"
        );

        Ok(report)
    }
}
