//! Server configuration

use std::fmt;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub log_level: String,
    /// Deadline for each store transaction, in seconds
    pub store_timeout_secs: u64,
    /// Deadline for each health probe, in seconds
    pub health_timeout_secs: u64,
    /// Remote signing authority (Vault transit)
    pub signing: SigningConfig,
    /// Transparency log (Rekor); anchoring is off when no URL is set
    pub transparency_log: TransparencyLogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8088,
            database_path: "./ledger.db".to_string(),
            log_level: "info".to_string(),
            store_timeout_secs: 15,
            health_timeout_secs: 5,
            signing: SigningConfig::default(),
            transparency_log: TransparencyLogConfig::default(),
        }
    }
}

/// Vault transit signing configuration
///
/// All three of address, token and key name are needed to sign. Missing
/// values are reported on the first signing attempt, not at startup.
#[derive(Clone)]
pub struct SigningConfig {
    /// Vault base URL (VAULT_ADDR)
    pub addr: Option<String>,
    /// Vault token (VAULT_TOKEN)
    pub token: Option<String>,
    /// Transit key name (VAULT_TRANSIT_KEY)
    pub key_name: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            addr: None,
            token: None,
            key_name: None,
            timeout_secs: 10,
        }
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("addr", &self.addr)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("key_name", &self.key_name)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SigningConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("LEDGER_SIGNING_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Self {
            addr: non_empty_var("VAULT_ADDR"),
            token: non_empty_var("VAULT_TOKEN"),
            key_name: non_empty_var("VAULT_TRANSIT_KEY"),
            timeout_secs,
        }
    }

    /// Names of the settings that are still missing
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.addr.is_none() {
            missing.push("VAULT_ADDR");
        }
        if self.token.is_none() {
            missing.push("VAULT_TOKEN");
        }
        if self.key_name.is_none() {
            missing.push("VAULT_TRANSIT_KEY");
        }
        missing
    }

    /// Check if signing can be attempted
    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Transparency log (Rekor) configuration
#[derive(Debug, Clone)]
pub struct TransparencyLogConfig {
    /// Rekor base URL (REKOR_SERVER_URL)
    pub url: Option<String>,
    /// Submission timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent anchoring submissions
    pub max_in_flight: usize,
}

impl Default for TransparencyLogConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 30,
            max_in_flight: 32,
        }
    }
}

impl TransparencyLogConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("LEDGER_ANCHOR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let max_in_flight = std::env::var("LEDGER_ANCHOR_MAX_IN_FLIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(32);

        Self {
            url: non_empty_var("REKOR_SERVER_URL"),
            timeout_secs,
            max_in_flight,
        }
    }

    /// Check if anchoring is enabled
    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
