//! Append coordinator
//!
//! Validate, sign remotely, verify locally, commit, then hand the entry to
//! the anchor worker. The caller gets its answer at commit.

pub mod digest;
pub mod lifecycle;
pub mod service;

pub use digest::payload_hash_hex;
pub use lifecycle::{AnchorStatus, Submission, SubmissionState};
pub use service::{AppendRequest, Appended, HealthReport, LedgerService, MAX_LIST_LIMIT};
