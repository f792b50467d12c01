//! HTTP request handlers

mod append;
mod entries;
mod health;
pub(crate) mod helpers;

pub use append::append_entry;
pub use entries::{get_entry, list_entries};
pub use health::health_check;
