//! Mock signing authority for testing
//!
//! Signs with a local Ed25519 key and can be told to misbehave.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signer, SigningKey};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::signing::error::SigningError;
use crate::traits::signer::{SignedPayload, SigningAuthority};

/// How the mock authority answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSigningMode {
    /// Sign the payload with the advertised key
    Honest,
    /// Sign different bytes than requested
    Forged,
    /// Sign correctly but advertise another key
    WrongKey,
    /// Fail as an unreachable service would
    Unavailable,
}

/// Mock signing authority
pub struct MockSigningAuthority {
    key: SigningKey,
    mode: MockSigningMode,

    /// Count of sign calls
    pub sign_call_count: AtomicUsize,
}

impl MockSigningAuthority {
    /// Honest authority with a fixed key
    pub fn new() -> Self {
        Self::with_mode(MockSigningMode::Honest)
    }

    pub fn with_mode(mode: MockSigningMode) -> Self {
        Self {
            key: SigningKey::from_bytes(&[7u8; 32]),
            mode,
            sign_call_count: AtomicUsize::new(0),
        }
    }

    /// Base64 public key the authority advertises when honest
    pub fn public_key_base64(&self) -> String {
        STANDARD.encode(self.key.verifying_key().to_bytes())
    }

    /// Number of sign calls so far
    pub fn sign_calls(&self) -> usize {
        self.sign_call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockSigningAuthority {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SigningAuthority for MockSigningAuthority {
    async fn sign(&self, payload: &[u8]) -> Result<SignedPayload, SigningError> {
        self.sign_call_count.fetch_add(1, Ordering::SeqCst);

        let (message, public_key): (&[u8], String) = match self.mode {
            MockSigningMode::Unavailable => {
                return Err(SigningError::ServiceError(
                    "signing authority returned status 503 Service Unavailable".into(),
                ))
            }
            MockSigningMode::Honest => (payload, self.public_key_base64()),
            MockSigningMode::Forged => (b"not the payload", self.public_key_base64()),
            MockSigningMode::WrongKey => {
                let other = SigningKey::from_bytes(&[9u8; 32]);
                (payload, STANDARD.encode(other.verifying_key().to_bytes()))
            }
        };

        Ok(SignedPayload {
            signature: self.key.sign(message).to_bytes().to_vec(),
            public_key,
            key_version: Some(1),
        })
    }

    fn authority_id(&self) -> &str {
        "mock-signer"
    }
}
