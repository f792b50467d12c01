//! Application state shared across HTTP handlers

use std::sync::Arc;

use crate::ledger::LedgerService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Append pipeline and read paths
    pub ledger: Arc<LedgerService>,
}

impl AppState {
    pub fn new(ledger: Arc<LedgerService>) -> Self {
        Self { ledger }
    }
}
