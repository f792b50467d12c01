// File: src/background/mod.rs

//! Background anchoring
//!
//! - The anchor worker anchors each committed entry right after its append
//! - The reconciliation job periodically re-drives entries left unanchored
//!
//! Neither ever blocks the HTTP request path.

pub mod anchor_worker;
pub mod config;
pub mod reconcile_job;

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::traits::EntryStore;

pub use anchor_worker::{AnchorOutcome, AnchorWorker, AnchorWorkerConfig};
pub use config::BackgroundConfig;
pub use reconcile_job::{ReconcileJob, ReconcileJobConfig};

/// Background job runner
///
/// Owns the periodic jobs and their shutdown signal.
pub struct BackgroundJobRunner {
    store: Arc<dyn EntryStore>,
    worker: Option<AnchorWorker>,
    config: BackgroundConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl BackgroundJobRunner {
    pub fn new(
        store: Arc<dyn EntryStore>,
        worker: Option<AnchorWorker>,
        config: BackgroundConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            store,
            worker,
            config,
            shutdown_tx,
        }
    }

    /// Start all background jobs
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        if self.config.disabled {
            tracing::info!("Background jobs disabled via LEDGER_BACKGROUND_DISABLED=true");
            return vec![];
        }

        let mut handles = Vec::new();

        match &self.worker {
            Some(worker) if self.config.reconcile_job.is_enabled() => {
                let job = ReconcileJob::new(
                    Arc::clone(&self.store),
                    worker.clone(),
                    self.config.reconcile_job.clone(),
                );
                let shutdown_rx = self.shutdown_tx.subscribe();
                handles.push(tokio::spawn(async move {
                    job.run(shutdown_rx).await;
                }));
                tracing::info!(
                    interval_secs = self.config.reconcile_job.interval_secs,
                    min_age_secs = self.config.reconcile_job.min_age_secs,
                    batch_size = self.config.reconcile_job.batch_size,
                    "Reconciliation job started"
                );
            }
            Some(_) => {
                tracing::warn!("Reconciliation job disabled: LEDGER_RECONCILE_INTERVAL_SECS=0");
            }
            None => {
                tracing::info!("Reconciliation job not started: anchoring is disabled");
            }
        }

        handles
    }

    /// Signal all jobs to shutdown gracefully
    pub fn shutdown(&self) {
        tracing::info!("Signaling background jobs to shutdown");
        let _ = self.shutdown_tx.send(());
    }
}
