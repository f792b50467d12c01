// File: src/background/reconcile_job/mod.rs

//! Reconciliation job
//!
//! Re-drives entries whose anchoring never completed: the log was down,
//! the process restarted mid-flight, or the proof could not be recorded.

pub mod config;
pub mod job;

pub use config::ReconcileJobConfig;
pub use job::ReconcileJob;
