// File: src/background/config.rs

use super::reconcile_job::ReconcileJobConfig;

/// Global background jobs configuration
#[derive(Debug, Clone, Default)]
pub struct BackgroundConfig {
    /// Disable all background jobs (for testing)
    pub disabled: bool,

    pub reconcile_job: ReconcileJobConfig,
}

impl BackgroundConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            disabled: std::env::var("LEDGER_BACKGROUND_DISABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            reconcile_job: ReconcileJobConfig::from_env(),
        }
    }
}
