//! Storage module
//!
//! SQLite-backed, append-only entry store.

pub mod sqlite;

pub use crate::traits::EntryStore;
pub use sqlite::{SqliteConfig, SqliteStore};
