//! Delivery transport protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Performs one outbound delivery attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET to `url`. `Ok` means the notification was delivered.
    async fn get(&self, url: &str) -> Result<(), TransportError>;
}

/// Outbound HTTP settings, read from the `[transport]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Treat non-2xx responses as failed deliveries.
    #[serde(default)]
    pub fail_on_error_status: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("cronhook/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            fail_on_error_status: false,
        }
    }
}
