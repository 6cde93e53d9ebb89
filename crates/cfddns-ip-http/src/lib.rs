// # HTTP IP Source
//
// Resolves the host's public IP by asking an external service that echoes
// the caller's address as plain text (`https://api.ipify.org` by default).
//
// One GET per call. No failover between services, no caching, no retry.
// The trimmed body is returned as-is; it is not parsed as an IP literal.

use async_trait::async_trait;
use cfddns_core::config::Settings;
use cfddns_core::traits::IpSource;
use cfddns_core::{Error, Result};
use std::time::Duration;

/// User-Agent sent with every request
const USER_AGENT: &str = concat!("cfddns/", env!("CARGO_PKG_VERSION"));

/// HTTP-based public-IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client, carrying the request timeout
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the IP from (e.g., "https://api.ipify.org")
    /// - `timeout`: Upper bound for the whole request
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create from run settings (`ip_check_url`, `request_timeout`)
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.ip_check_url.clone(), settings.request_timeout)
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        tracing::debug!("Fetching public IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| transport_error(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(status.as_u16(), &self.url, body.trim()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&self.url, e))?;

        let ip = body.trim();
        if ip.is_empty() {
            return Err(Error::invalid_response(format!(
                "empty response body from {}",
                self.url
            )));
        }

        tracing::debug!("Public IP reported by {}: {}", self.url, ip);
        Ok(ip.to_string())
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// Map a reqwest failure to a timeout or network error
fn transport_error(url: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("GET {}: {}", url, e))
    } else {
        Error::network(format!("GET {}: {}", url, e))
    }
}
