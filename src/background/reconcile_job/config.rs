// File: src/background/reconcile_job/config.rs

/// Reconciliation job configuration
#[derive(Debug, Clone)]
pub struct ReconcileJobConfig {
    /// How often to sweep for unanchored entries (seconds, 0 disables)
    pub interval_secs: u64,

    /// Leave entries younger than this to their original worker (seconds)
    pub min_age_secs: u64,

    /// Max entries to re-drive per sweep
    pub batch_size: usize,
}

impl Default for ReconcileJobConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300, // Every 5 minutes
            min_age_secs: 120,  // Well past the anchoring deadline
            batch_size: 50,
        }
    }
}

impl ReconcileJobConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            interval_secs: std::env::var("LEDGER_RECONCILE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            min_age_secs: std::env::var("LEDGER_RECONCILE_MIN_AGE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
            batch_size: std::env::var("LEDGER_RECONCILE_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
        }
    }

    /// Check if the job should run at all
    pub fn is_enabled(&self) -> bool {
        self.interval_secs > 0 && self.batch_size > 0
    }
}
