// # Cloudflare DNS Provider
//
// Record locator and updater for the Cloudflare API v4.
//
// - One HTTP request per trait call
// - Full error propagation to the engine (no retries, no record creation)
// - HTTP timeout taken from `Settings::request_timeout`
// - Status mapping: 401/403 → Authentication, 429 → RateLimited, other → Status
// - Response bodies are validated against the Cloudflare envelope
//
// ## Security Requirements
//
// - API token NEVER appears in logs or error messages
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A&name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use cfddns_core::config::{Config, Settings};
use cfddns_core::traits::{DnsProvider, RecordId, RecordUpdate};
use cfddns_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// User-Agent sent with every request
const USER_AGENT: &str = concat!("cfddns/", env!("CARGO_PKG_VERSION"));

/// Longest raw body excerpt carried into an error message
const MAX_BODY_EXCERPT: usize = 200;

/// Cloudflare response envelope
///
/// ```json
/// {"success": true, "errors": [], "messages": [], "result": ...}
/// ```
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

fn default_success() -> bool {
    true
}

/// One entry of `errors[]`
#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// The only field of a listed record we rely on
#[derive(Debug, Deserialize)]
struct ListedRecord {
    id: String,
}

/// Cloudflare DNS provider
///
/// Stateless: the credential and zone come from the [`Config`] passed to each
/// call, so the provider itself holds no secret.
#[derive(Debug)]
pub struct CloudflareProvider {
    /// API base URL, without trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_base`: API base URL (normally `https://api.cloudflare.com/client/v4`)
    /// - `timeout`: Upper bound for each request
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        let api_base = api_base.into().trim_end_matches('/').to_string();

        Ok(Self { api_base, client })
    }

    /// Create from run settings (`api_base`, `request_timeout`)
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.api_base.clone(), settings.request_timeout)
    }

    /// `{api_base}/zones/{zone_id}/dns_records`
    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.api_base, zone_id)
    }

    /// `{api_base}/zones/{zone_id}/dns_records/{record_id}`
    fn record_url(&self, zone_id: &str, record_id: &RecordId) -> String {
        format!("{}/{}", self.records_url(zone_id), record_id)
    }

    /// Send `request` and read the body of a 2xx response
    ///
    /// Non-2xx responses become a typed error carrying the API's own error
    /// messages when the body has them.
    async fn send(&self, method: &str, url: &str, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(method, url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(status.as_u16(), url, describe_failure(&body)));
        }

        response
            .text()
            .await
            .map_err(|e| transport_error(method, url, e))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Look up the A record named `config.record_name`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=home.example.com
    /// Authorization: Bearer <token>
    /// ```
    ///
    /// The first entry of `result` wins; no ordering is requested.
    async fn find_record(&self, config: &Config) -> Result<RecordId> {
        tracing::debug!(
            "Looking up record ID: {} (type: A) in zone {}",
            config.record_name,
            config.zone_id
        );

        let url = self.records_url(&config.zone_id);
        let request = self
            .client
            .get(&url)
            .query(&[("type", "A"), ("name", config.record_name.as_str())])
            .bearer_auth(&config.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        let body = self.send("GET", &url, request).await?;
        let envelope: Envelope<Vec<ListedRecord>> = parse_envelope(&body)?;

        let record = envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::not_found(format!("DNS record not found: {} (type: A)", config.record_name))
            })?;

        tracing::debug!("Found record ID: {}", record.id);
        Ok(RecordId::new(record.id))
    }

    /// Overwrite the record with `update`
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    ///
    /// {"type": "A", "name": "home.example.com", "content": "203.0.113.5", "ttl": 120, "proxied": false}
    /// ```
    async fn update_record(
        &self,
        config: &Config,
        record_id: &RecordId,
        update: &RecordUpdate,
    ) -> Result<()> {
        tracing::info!(
            "Updating Cloudflare DNS record: {} -> {} ({})",
            update.name,
            update.content,
            update.record_type
        );

        let url = self.record_url(&config.zone_id, record_id);
        let request = self
            .client
            .put(&url)
            .bearer_auth(&config.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(update);

        let body = self.send("PUT", &url, request).await?;
        parse_envelope::<serde_json::Value>(&body)?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Parse a 2xx body and reject `success: false`
fn parse_envelope<T: serde::de::DeserializeOwned>(body: &str) -> Result<Envelope<T>> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        Error::invalid_response(format!("Failed to parse Cloudflare response: {}", e))
    })?;

    if !envelope.success {
        return Err(Error::api(join_messages(&envelope.errors)));
    }

    Ok(envelope)
}

/// Summarise a non-2xx body: the envelope's `errors[]`, else the raw text
fn describe_failure(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(body)
        && !envelope.errors.is_empty()
    {
        return join_messages(&envelope.errors);
    }

    let body = body.trim();
    if body.is_empty() {
        return "empty response body".to_string();
    }
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn join_messages(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "request was not successful".to_string();
    }
    errors
        .iter()
        .map(|error| format!("{}: {}", error.code, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a reqwest failure to a timeout or network error
fn transport_error(method: &str, url: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("{} {}: {}", method, url, e))
    } else {
        Error::network(format!("{} {}: {}", method, url, e))
    }
}
