//! `reqwest`-backed transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::debug;

use super::{next_session_id, HttpSession, RawResponse, Transport};
use crate::config::NseConfig;
use crate::errors::NseError;
use crate::transport::headers::nse_headers;

/// Opens sessions as `reqwest` clients with a cookie jar.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    headers: HeaderMap,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// [`NseError::Config`] if a configured header value is not valid HTTP.
    pub fn new(config: &NseConfig) -> Result<Self, NseError> {
        Ok(Self {
            headers: nse_headers(config)?,
            request_timeout: config.request_timeout,
            connect_timeout: config.connect_timeout,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn open_session(&self) -> Result<Arc<dyn HttpSession>, NseError> {
        let client = Client::builder()
            .cookie_store(true)
            .default_headers(self.headers.clone())
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| NseError::Transport {
                url: String::new(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let id = next_session_id();
        debug!("Opened HTTP session {}", id);
        Ok(Arc::new(ReqwestSession { id, client }))
    }
}

struct ReqwestSession {
    id: u64,
    client: Client,
}

#[async_trait]
impl HttpSession for ReqwestSession {
    fn id(&self) -> u64 {
        self.id
    }

    async fn get(&self, url: &str) -> Result<RawResponse, NseError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NseError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| NseError::from_reqwest(url, e))?;

        Ok(RawResponse::new(url, status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_copies_timeouts() {
        let config = NseConfig {
            request_timeout: Duration::from_secs(3),
            connect_timeout: Duration::from_secs(1),
            ..Default::default()
        };
        let transport = ReqwestTransport::new(&config).unwrap();
        assert_eq!(transport.request_timeout, Duration::from_secs(3));
        assert_eq!(transport.connect_timeout, Duration::from_secs(1));
        assert_eq!(transport.headers.len(), 4);
    }

    #[tokio::test]
    async fn test_sessions_get_distinct_ids() {
        let transport = ReqwestTransport::new(&NseConfig::default()).unwrap();
        let a = transport.open_session().await.unwrap();
        let b = transport.open_session().await.unwrap();
        assert_ne!(a.id(), b.id());
    }
}
