// File: src/storage/sqlite/schema.rs

use crate::error::StorageError;
use rusqlite::{Connection, OptionalExtension};

/// Current schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Create all tables (idempotent)
pub fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Record the schema version, refusing databases written by a newer build
pub fn migrate(conn: &Connection) -> Result<(), StorageError> {
    let current = schema_version(conn)?;

    if let Some(version) = current {
        if version > SCHEMA_VERSION {
            return Err(StorageError::MigrationFailed(format!(
                "database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }
    }

    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
    conn.execute(
        "INSERT OR REPLACE INTO ledger_config (key, value, updated_at) VALUES ('schema_version', ?1, ?2)",
        rusqlite::params![SCHEMA_VERSION.to_string(), now],
    )?;

    Ok(())
}

/// Stored schema version, if the database has been initialized
pub fn schema_version(conn: &Connection) -> Result<Option<u32>, StorageError> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM ledger_config WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|v| {
            v.parse().map_err(|_| {
                StorageError::Corruption(format!("invalid schema_version '{}'", v))
            })
        })
        .transpose()
}

const SCHEMA_SQL: &str = r#"
-- Core configuration
CREATE TABLE IF NOT EXISTS ledger_config (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Ledger entries - stores the payload hash, NEVER the payload
CREATE TABLE IF NOT EXISTS ledger_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,   -- Never reused
    subject TEXT NOT NULL CHECK (length(subject) > 0),
    payload_hash TEXT NOT NULL CHECK (length(payload_hash) = 64),
    signature TEXT NOT NULL,                -- Base64 Ed25519 signature
    public_key TEXT NOT NULL,               -- Base64 Ed25519 public key
    metadata TEXT NOT NULL DEFAULT '{}',    -- JSON object
    anchor_log_id TEXT,                     -- Transparency log entry id
    anchor_index INTEGER,                   -- Transparency log index
    created_at INTEGER NOT NULL,            -- Unix nanoseconds
    anchored_at INTEGER,                    -- Unix nanoseconds
    CHECK (
        (anchor_log_id IS NULL AND anchor_index IS NULL AND anchored_at IS NULL)
        OR (anchor_log_id IS NOT NULL AND anchor_index IS NOT NULL AND anchored_at IS NOT NULL)
    )
);

CREATE INDEX IF NOT EXISTS idx_ledger_entries_subject ON ledger_entries(subject);
CREATE INDEX IF NOT EXISTS idx_ledger_entries_created ON ledger_entries(created_at);
CREATE INDEX IF NOT EXISTS idx_ledger_entries_anchor_log_id
    ON ledger_entries(anchor_log_id) WHERE anchor_log_id IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_ledger_entries_unanchored
    ON ledger_entries(id) WHERE anchored_at IS NULL;

-- Append-only: rows are never deleted
CREATE TRIGGER IF NOT EXISTS ledger_entries_no_delete
BEFORE DELETE ON ledger_entries
BEGIN
    SELECT RAISE(ABORT, 'ledger entries are append-only');
END;

-- Only the anchor proof may be written, and only once
CREATE TRIGGER IF NOT EXISTS ledger_entries_immutable
BEFORE UPDATE ON ledger_entries
WHEN OLD.anchored_at IS NOT NULL
    OR NEW.id IS NOT OLD.id
    OR NEW.subject IS NOT OLD.subject
    OR NEW.payload_hash IS NOT OLD.payload_hash
    OR NEW.signature IS NOT OLD.signature
    OR NEW.public_key IS NOT OLD.public_key
    OR NEW.metadata IS NOT OLD.metadata
    OR NEW.created_at IS NOT OLD.created_at
BEGIN
    SELECT RAISE(ABORT, 'ledger entry is immutable');
END;
"#;
