//! # cronhook Transport
//!
//! Outbound delivery over HTTP.
//!
//! By default any completed HTTP exchange counts as delivered and only
//! transport-level failures (connect errors, timeouts) trigger a retry.
//! Set [`TransportConfig::fail_on_error_status`] to also retry on
//! non-2xx responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use cronhook_protocols::{Transport, TransportConfig, TransportError};

/// GET-based delivery transport.
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Create a transport from its configuration.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::RequestFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<(), TransportError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.config.timeout_seconds)
            } else {
                TransportError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if self.config.fail_on_error_status && !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        debug!(url = %url, status = status.as_u16(), "Delivery request completed");
        Ok(())
    }
}
