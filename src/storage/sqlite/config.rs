// File: src/storage/sqlite/config.rs

/// SQLite storage backend configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to database file (or ":memory:" for in-memory)
    pub path: String,

    /// Enable WAL mode for better concurrency
    pub wal_mode: bool,

    /// Busy timeout in milliseconds
    pub busy_timeout_ms: u32,

    /// Deadline for a whole store operation, lock wait included
    pub operation_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "ledger.db".to_string(),
            wal_mode: true,
            busy_timeout_ms: 5000,
            operation_timeout_secs: 15,
        }
    }
}
