//! Gateway configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the recovery gateway client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the vault server (e.g., "https://vault.example.com").
    pub base_url: String,

    /// Request timeout in seconds. Cancellation mid-pipeline is not
    /// supported; timeouts are the transport's job.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://vault.keyhaven.io".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
