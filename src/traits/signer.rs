//! Signing authority trait definition

use async_trait::async_trait;

use crate::signing::error::SigningError;

/// Raw output of a signing authority
///
/// This is a claim, not a fact: nothing here has been checked against the
/// payload yet. Only [`crate::signing::VerifiedSignature`] is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Raw Ed25519 signature bytes, unwrapped from any transport envelope
    pub signature: Vec<u8>,

    /// Base64 public key the authority claims signed the payload
    pub public_key: String,

    /// Key version reported by the authority, if any
    pub key_version: Option<u32>,
}

/// A remote or local service that produces Ed25519 signatures
#[async_trait]
pub trait SigningAuthority: Send + Sync {
    /// Sign the exact payload bytes
    async fn sign(&self, payload: &[u8]) -> Result<SignedPayload, SigningError>;

    /// Identifier for logs (URL or key name)
    fn authority_id(&self) -> &str;
}
