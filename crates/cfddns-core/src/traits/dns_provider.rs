// # DNS Provider Trait
//
// Defines the interface for locating and updating a DNS record via a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;

/// Opaque provider identifier of a DNS record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a provider record identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as sent back to the provider
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

/// Desired state of an A record, serialized as the update request body
///
/// ```json
/// {"type": "A", "name": "home.example.com", "content": "203.0.113.5", "ttl": 120, "proxied": false}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    /// Record type, always `"A"`
    #[serde(rename = "type")]
    pub record_type: &'static str,
    /// Record name
    pub name: String,
    /// New record content (the public IP)
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Whether traffic goes through the provider's edge network
    pub proxied: bool,
}

impl RecordUpdate {
    /// Build an A record update
    pub fn a_record(
        name: impl Into<String>,
        content: impl Into<String>,
        ttl: u32,
        proxied: bool,
    ) -> Self {
        Self {
            record_type: "A",
            name: name.into(),
            content: content.into(),
            ttl,
            proxied,
        }
    }
}

/// Trait for DNS provider implementations
///
/// Each method performs one authenticated API call using the credential and
/// zone from the supplied [`Config`]. Providers do not retry and never
/// create a missing record.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Find the A record named `config.record_name` in `config.zone_id`
    ///
    /// # Returns
    ///
    /// - `Ok(RecordId)`: The first matching record in provider order
    /// - `Err(Error::NotFound)`: The provider returned no matching record
    /// - `Err(Error)`: Transport, status or response-shape failure
    async fn find_record(&self, config: &Config) -> Result<RecordId, crate::Error>;

    /// Overwrite record `record_id` with `update`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the update
    /// - `Err(Error)`: The update was not applied
    async fn update_record(
        &self,
        config: &Config,
        record_id: &RecordId,
        update: &RecordUpdate,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
