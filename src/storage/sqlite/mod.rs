// File: src/storage/sqlite/mod.rs

mod config;
mod convert;
mod entries;
mod schema;
mod store;

// Public exports
pub use config::SqliteConfig;
pub use schema::SCHEMA_VERSION;
pub use store::SqliteStore;
