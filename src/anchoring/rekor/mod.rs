//! Rekor transparency log client

pub mod client;
pub mod types;

pub use client::RekorClient;
pub use types::{parse_log_entry_response, HashedRekordEntry};
