// File: src/storage/sqlite/store.rs

use super::config::SqliteConfig;
use super::{entries, schema};
use crate::error::StorageError;
use crate::traits::{AttachOutcome, EntryId, EntryStore, LedgerEntry, LogProof, NewEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// VM instructions between deadline checks
const PROGRESS_CHECK_OPS: i32 = 1000;

/// SQLite implementation of the EntryStore trait
///
/// Stores the payload hash only - NO payload data.
pub struct SqliteStore {
    /// Database connection (protected by mutex for thread safety)
    conn: Arc<Mutex<Connection>>,

    config: SqliteConfig,
}

impl SqliteStore {
    /// Create a new SqliteStore with default configuration
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let config = SqliteConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Create with custom configuration
    pub fn with_config(config: SqliteConfig) -> Result<Self, StorageError> {
        let conn = Connection::open(&config.path)
            .map_err(|e| StorageError::ConnectionFailed(format!("failed to open db: {}", e)))?;

        Self::configure_connection(&conn, &config)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self, StorageError> {
        let config = SqliteConfig {
            path: ":memory:".to_string(),
            wal_mode: false,
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Configure SQLite connection pragmas
    fn configure_connection(conn: &Connection, config: &SqliteConfig) -> Result<(), StorageError> {
        if config.wal_mode {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })?;
        }
        conn.pragma_update(None, "busy_timeout", config.busy_timeout_ms)?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    }

    /// Create the schema and record its version
    ///
    /// Must be called once before serving traffic. Idempotent.
    pub fn initialize(&self) -> Result<(), StorageError> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        schema::migrate(&conn)?;
        tracing::debug!(path = %self.config.path, version = schema::SCHEMA_VERSION, "Schema ready");
        Ok(())
    }

    /// Check if the database is initialized
    pub fn is_initialized(&self) -> bool {
        self.schema_version().map(|v| v.is_some()).unwrap_or(false)
    }

    /// Stored schema version
    pub fn schema_version(&self) -> Result<Option<u32>, StorageError> {
        let conn = self.get_conn()?;
        schema::schema_version(&conn)
    }

    /// Get locked connection for internal operations
    pub(crate) fn get_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::ConnectionFailed("lock poisoned".into()))
    }

    /// Run a closure on the connection off the async runtime, under the
    /// configured deadline
    ///
    /// The deadline covers the wait for the connection lock. Past it, the
    /// running statement is interrupted and its transaction rolls back, so a
    /// timeout never leaves a half-applied write behind.
    async fn run_blocking<T, F>(&self, operation: &'static str, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let timeout_secs = self.config.operation_timeout_secs;
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);

        let result = tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StorageError::ConnectionFailed("lock poisoned".into()))?;

            if Instant::now() >= deadline {
                return Err(StorageError::Timeout(timeout_secs));
            }

            guard.progress_handler(PROGRESS_CHECK_OPS, Some(move || Instant::now() >= deadline));
            let result = f(&mut *guard);
            guard.progress_handler(0, None::<fn() -> bool>);

            result.map_err(|e| match e {
                StorageError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == rusqlite::ErrorCode::OperationInterrupted =>
                {
                    StorageError::Timeout(timeout_secs)
                }
                other => other,
            })
        })
        .await
        .map_err(|e| StorageError::TransactionFailed(format!("{} task failed: {}", operation, e)))?;

        if let Err(StorageError::Timeout(secs)) = &result {
            tracing::warn!(operation, timeout_secs = *secs, "Store operation exceeded deadline");
        }
        result
    }
}

#[async_trait]
impl EntryStore for SqliteStore {
    async fn create_entry(&self, entry: NewEntry) -> Result<LedgerEntry, StorageError> {
        self.run_blocking("create_entry", move |conn| {
            entries::insert_entry(conn, &entry)
        })
        .await
    }

    async fn attach_anchor_proof(
        &self,
        id: EntryId,
        proof: &LogProof,
    ) -> Result<AttachOutcome, StorageError> {
        let proof = proof.clone();
        self.run_blocking("attach_anchor_proof", move |conn| {
            entries::attach_proof(conn, id, &proof)
        })
        .await
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<LedgerEntry>, StorageError> {
        self.run_blocking("list_recent", move |conn| entries::select_recent(conn, limit))
            .await
    }

    async fn get_entry(&self, id: EntryId) -> Result<Option<LedgerEntry>, StorageError> {
        self.run_blocking("get_entry", move |conn| entries::select_entry(conn, id))
            .await
    }

    async fn list_unanchored(
        &self,
        created_before: DateTime<Utc>,
        after_id: EntryId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StorageError> {
        self.run_blocking("list_unanchored", move |conn| {
            entries::select_unanchored(conn, created_before, after_id, limit)
        })
        .await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.run_blocking("ping", |conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
