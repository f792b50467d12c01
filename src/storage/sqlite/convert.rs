// File: src/storage/sqlite/convert.rs

use crate::traits::{AnchorProof, LedgerEntry};
use chrono::DateTime;
use rusqlite::types::Type;
use rusqlite::Row;

/// Column list matching [`row_to_entry`]
pub const ENTRY_COLUMNS: &str = "id, subject, payload_hash, signature, public_key, metadata, \
     anchor_log_id, anchor_index, created_at, anchored_at";

/// Convert a database row to LedgerEntry
pub fn row_to_entry(row: &Row) -> rusqlite::Result<LedgerEntry> {
    let metadata_json: String = row.get(5)?;
    let metadata = serde_json::from_str(&metadata_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    let anchor_log_id: Option<String> = row.get(6)?;
    let anchor_index: Option<i64> = row.get(7)?;
    let created_at: i64 = row.get(8)?;
    let anchored_at: Option<i64> = row.get(9)?;

    let anchor = match (anchor_log_id, anchor_index, anchored_at) {
        (Some(log_id), Some(log_index), Some(at)) => Some(AnchorProof {
            log_id,
            log_index,
            anchored_at: DateTime::from_timestamp_nanos(at),
        }),
        (None, None, None) => None,
        _ => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                6,
                Type::Text,
                "partial anchor proof".into(),
            ))
        }
    };

    Ok(LedgerEntry {
        id: row.get(0)?,
        subject: row.get(1)?,
        payload_hash: row.get(2)?,
        signature: row.get(3)?,
        public_key: row.get(4)?,
        metadata,
        anchor,
        created_at: DateTime::from_timestamp_nanos(created_at),
    })
}
