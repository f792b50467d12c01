//! Vault transit signing client

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SigningConfig;
use crate::signing::envelope::SignatureEnvelope;
use crate::signing::error::SigningError;
use crate::traits::signer::{SignedPayload, SigningAuthority};

#[derive(Debug, Serialize)]
struct TransitSignRequest<'a> {
    input: String,
    prehashed: bool,
    signature_algorithm: &'a str,
}

#[derive(Debug, Deserialize)]
struct TransitSignResponse {
    data: TransitSignData,
}

#[derive(Debug, Deserialize)]
struct TransitSignData {
    signature: String,
    #[serde(default)]
    public_key: Option<String>,
}

/// Signs payloads with a Vault transit Ed25519 key
///
/// Settings are checked per call so the server can start without Vault
/// configured and report the gap on the first append.
pub struct TransitClient {
    config: SigningConfig,
    client: reqwest::Client,
    authority_id: String,
}

impl TransitClient {
    /// Create a new transit client
    pub fn new(config: SigningConfig) -> Result<Self, SigningError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SigningError::Network(e.to_string()))?;

        let authority_id = match (&config.addr, &config.key_name) {
            (Some(addr), Some(key)) => format!("{}/transit/{}", addr.trim_end_matches('/'), key),
            _ => "vault-transit (unconfigured)".to_string(),
        };

        Ok(Self {
            config,
            client,
            authority_id,
        })
    }

    fn sign_url(addr: &str, key_name: &str) -> String {
        format!(
            "{}/v1/transit/sign/{}",
            addr.trim_end_matches('/'),
            key_name
        )
    }
}

#[async_trait]
impl SigningAuthority for TransitClient {
    async fn sign(&self, payload: &[u8]) -> Result<SignedPayload, SigningError> {
        let (addr, token, key_name) = match (
            &self.config.addr,
            &self.config.token,
            &self.config.key_name,
        ) {
            (Some(addr), Some(token), Some(key)) => (addr, token, key),
            _ => {
                return Err(SigningError::NotConfigured(
                    self.config.missing().join(", "),
                ))
            }
        };

        let url = Self::sign_url(addr, key_name);
        let body = TransitSignRequest {
            input: STANDARD.encode(payload),
            prehashed: false,
            signature_algorithm: "ed25519",
        };

        tracing::debug!(url = %url, payload_len = payload.len(), "Requesting transit signature");

        let response = self
            .client
            .post(&url)
            .header("X-Vault-Token", token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SigningError::from_transport(e, self.config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SigningError::ServiceError(format!(
                "signing authority returned status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SigningError::from_transport(e, self.config.timeout_secs))?;

        let parsed: TransitSignResponse = serde_json::from_slice(&bytes)
            .map_err(|e| SigningError::MalformedBody(e.to_string()))?;

        let envelope = SignatureEnvelope::parse(&parsed.data.signature)?;

        let public_key = parsed
            .data
            .public_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                SigningError::InvalidKeyMaterial("reply carries no public key".into())
            })?;

        Ok(SignedPayload {
            signature: envelope.signature,
            public_key,
            key_version: Some(envelope.key_version),
        })
    }

    fn authority_id(&self) -> &str {
        &self.authority_id
    }
}
