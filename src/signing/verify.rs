//! Local Ed25519 verification of authority output

use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

use crate::signing::error::SigningError;
use crate::traits::signer::SignedPayload;

/// Decode a base64 Ed25519 public key
pub fn decode_public_key(encoded: &str) -> Result<VerifyingKey, SigningError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SigningError::InvalidKeyMaterial(format!("public key is not base64: {}", e)))?;

    let key: [u8; PUBLIC_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
        SigningError::InvalidKeyMaterial(format!(
            "public key must be {} bytes, got {}",
            PUBLIC_KEY_LENGTH,
            bytes.len()
        ))
    })?;

    VerifyingKey::from_bytes(&key)
        .map_err(|e| SigningError::InvalidKeyMaterial(format!("public key rejected: {}", e)))
}

/// A signature that has been checked against its payload
///
/// The only constructor is [`VerifiedSignature::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSignature {
    signature: Vec<u8>,
    public_key: String,
}

impl VerifiedSignature {
    /// Verify an authority reply against the exact payload bytes
    pub fn verify(payload: &[u8], signed: SignedPayload) -> Result<Self, SigningError> {
        let key = decode_public_key(&signed.public_key)?;

        let sig_bytes: [u8; SIGNATURE_LENGTH] =
            signed.signature.as_slice().try_into().map_err(|_| {
                SigningError::InvalidKeyMaterial(format!(
                    "signature must be {} bytes, got {}",
                    SIGNATURE_LENGTH,
                    signed.signature.len()
                ))
            })?;

        key.verify_strict(payload, &Signature::from_bytes(&sig_bytes))
            .map_err(|e| SigningError::VerificationFailed(e.to_string()))?;

        Ok(Self {
            signature: signed.signature,
            public_key: signed.public_key.trim().to_string(),
        })
    }

    /// Raw signature bytes
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Standard base64 signature
    pub fn signature_base64(&self) -> String {
        STANDARD.encode(&self.signature)
    }

    /// Base64 public key
    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}
