//! Signing client: remote signature plus mandatory local verification

use std::sync::Arc;
use std::time::Duration;

use crate::signing::error::SigningError;
use crate::signing::verify::VerifiedSignature;
use crate::traits::signer::SigningAuthority;

/// Wraps a signing authority and verifies everything it returns
pub struct SigningClient {
    authority: Arc<dyn SigningAuthority>,
    timeout_secs: u64,
}

impl SigningClient {
    /// Create a signing client with a per-call deadline
    pub fn new(authority: Arc<dyn SigningAuthority>, timeout_secs: u64) -> Self {
        Self {
            authority,
            timeout_secs,
        }
    }

    /// Identifier of the wrapped authority
    pub fn authority_id(&self) -> &str {
        self.authority.authority_id()
    }

    /// Sign the payload and verify the result locally
    ///
    /// A signature that fails verification is discarded and never returned.
    pub async fn sign(&self, payload: &[u8]) -> Result<VerifiedSignature, SigningError> {
        let deadline = Duration::from_secs(self.timeout_secs);

        let signed = tokio::time::timeout(deadline, self.authority.sign(payload))
            .await
            .map_err(|_| SigningError::Timeout(self.timeout_secs))??;

        let key_version = signed.key_version;
        match VerifiedSignature::verify(payload, signed) {
            Ok(verified) => {
                tracing::debug!(
                    authority = %self.authority.authority_id(),
                    key_version = ?key_version,
                    "Signature verified locally"
                );
                Ok(verified)
            }
            Err(e) => {
                tracing::error!(
                    authority = %self.authority.authority_id(),
                    error = %e,
                    "Signing authority output failed local verification"
                );
                Err(e)
            }
        }
    }
}
