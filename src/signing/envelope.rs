//! Vault transit signature envelope: `vault:v<N>:<base64>`

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::signing::error::SigningError;

/// Envelope scheme prefix
pub const ENVELOPE_SCHEME: &str = "vault";

/// Parsed transit signature envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEnvelope {
    /// Transit key version that produced the signature
    pub key_version: u32,

    /// Raw signature bytes
    pub signature: Vec<u8>,
}

impl SignatureEnvelope {
    /// Parse a wrapped signature string
    ///
    /// Exactly three `:`-separated segments are accepted: the `vault` scheme,
    /// a `v`-prefixed positive key version, and standard base64. Anything
    /// else is a protocol violation.
    pub fn parse(wrapped: &str) -> Result<Self, SigningError> {
        let segments: Vec<&str> = wrapped.split(':').collect();
        if segments.len() != 3 {
            return Err(SigningError::Envelope(format!(
                "expected 3 segments, got {}",
                segments.len()
            )));
        }

        if segments[0] != ENVELOPE_SCHEME {
            return Err(SigningError::Envelope(format!(
                "unknown scheme '{}'",
                segments[0]
            )));
        }

        let key_version = segments[1]
            .strip_prefix('v')
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| {
                SigningError::Envelope(format!("bad key version '{}'", segments[1]))
            })?;

        let signature = STANDARD
            .decode(segments[2])
            .map_err(|e| SigningError::Envelope(format!("signature is not base64: {}", e)))?;

        if signature.is_empty() {
            return Err(SigningError::Envelope("empty signature".into()));
        }

        Ok(Self {
            key_version,
            signature,
        })
    }

    /// Render back to the wire form
    pub fn to_wire(&self) -> String {
        format!(
            "{}:v{}:{}",
            ENVELOPE_SCHEME,
            self.key_version,
            STANDARD.encode(&self.signature)
        )
    }
}
