//! Transparency log anchoring
//!
//! Submits signed payload hashes to a Rekor instance as `hashedrekord`
//! entries. Anchoring never blocks an append: failures are logged and the
//! entry stays unanchored until reconciliation retries it.

pub mod error;
pub mod mock;
pub mod rekor;

pub use error::AnchorError;
pub use mock::MockTransparencyLog;
pub use rekor::RekorClient;
