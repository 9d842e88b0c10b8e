//! HTTP transport for device control microservices
//!
//! Device commands and status queries are plain unauthenticated GETs. A
//! non-2xx response counts as a failure; the body is returned as-is for the
//! caller to interpret.

use std::time::Duration;

use async_trait::async_trait;
use av_core::{DeviceTransport, TransportError};
use reqwest::Client;
use tracing::{debug, trace};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// `DeviceTransport` backed by a shared reqwest client
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeviceTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        trace!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "Device responded with failure");
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
