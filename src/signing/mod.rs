//! Remote signing with local verification
//!
//! [`TransitClient`] talks to a Vault transit engine. [`SigningClient`]
//! wraps any [`crate::traits::SigningAuthority`] and refuses to hand back a
//! signature that does not verify locally against the payload.

pub mod client;
pub mod envelope;
pub mod error;
pub mod mock;
pub mod transit;
pub mod verify;

pub use client::SigningClient;
pub use envelope::SignatureEnvelope;
pub use error::SigningError;
pub use mock::{MockSigningAuthority, MockSigningMode};
pub use transit::TransitClient;
pub use verify::{decode_public_key, VerifiedSignature};
