//! Data Transfer Objects (DTOs)

mod request;
mod response;

pub use request::{AppendJsonRequest, ListQuery};
pub use response::{EntryResponse, ErrorResponse, HealthResponse};
