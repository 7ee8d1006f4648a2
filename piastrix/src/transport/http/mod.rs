//! HTTP transport using reqwest.

use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{debug, instrument};

use crate::{
    config::ClientConfig,
    error::Result,
    transport::{JSON_CONTENT_TYPE, Transport, TransportResponse, sealed},
};

/// HTTP transport with a per-request timeout.
///
/// The underlying client pools connections, so one transport should be
/// reused for the lifetime of a [`PiastrixClient`](crate::PiastrixClient).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use piastrix::transport::{HttpTransport, Transport};
///
/// let transport = HttpTransport::new(Duration::from_secs(10)).unwrap();
/// assert_eq!(transport.protocol_name(), "http");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`](crate::PiastrixError::Http) if the
    /// HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// Creates a transport using the timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`](crate::PiastrixError::Http) if the
    /// HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.timeout())
    }

    /// Returns the configured request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    async fn post_json<'a>(&'a self, url: &'a str, body: Vec<u8>) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(status, response_len = body.len(), "gateway responded");

        Ok(TransportResponse { status, body })
    }

    fn protocol_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PiastrixError, config::SecretKey};

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(5));
        assert_eq!(transport.protocol_name(), "http");
    }

    #[test]
    fn test_http_transport_from_config() {
        let config = ClientConfig::new(1, SecretKey::new("k")).with_timeout_secs(42);
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(42));
    }

    #[tokio::test]
    async fn test_http_transport_invalid_url() {
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();

        let result = transport.post_json("not-a-url", b"{}".to_vec()).await;
        assert!(matches!(result, Err(PiastrixError::Http(_))));
    }
}
