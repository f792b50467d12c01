//! ledger-server library exports (for testing)

pub mod anchoring;
pub mod api;
pub mod background;
pub mod config;
pub mod error;
pub mod ledger;
pub mod signing;
pub mod storage;
pub mod traits;

// Re-exports
pub use error::{ErrorKind, ServerError, ServerResult};
pub use ledger::LedgerService;
pub use storage::SqliteStore;
pub use traits::{EntryStore, LedgerEntry, SigningAuthority, TransparencyLog};
