//! Configuration types for cfddns
//!
//! [`Config`] is the user-supplied JSON file. [`Settings`] holds the fixed
//! endpoints, paths and record parameters of a run; it is built once at
//! startup and handed to each component.

use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default run log, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "ddns.log";

/// Default public-IP discovery endpoint (plain-text body)
pub const DEFAULT_IP_CHECK_URL: &str = "https://api.ipify.org";

/// Cloudflare API v4 base URL
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Contents of `config.json`
///
/// All three keys are required and must be non-empty. Unknown keys are
/// ignored.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Cloudflare API token (bearer credential)
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Cloudflare zone identifier
    pub zone_id: String,

    /// Fully-qualified name of the A record to keep in sync
    pub record_name: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .finish()
    }
}

impl Config {
    /// Create a configuration from its three fields
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record_name: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            record_name: record_name.into(),
        }
    }

    /// Load and validate the configuration file at `path`
    ///
    /// # Returns
    ///
    /// - `Err(Error::ConfigNotFound)`: the file does not exist
    /// - `Err(Error::Json)`: the file is not a JSON object with the required keys
    /// - `Err(Error::Config)`: a required value is empty
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(Error::Io(e)),
        };

        Self::parse(&raw)
    }

    /// Parse and validate configuration JSON
    pub fn parse(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("api_token", &self.api_token),
            ("zone_id", &self.zone_id),
            ("record_name", &self.record_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{key} cannot be empty")));
            }
        }

        Ok(())
    }
}

/// Fixed parameters of a run
///
/// `Settings::default()` is what the binary uses; tests point the paths at a
/// temporary directory and the URLs at a stub server.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the JSON configuration file
    pub config_path: PathBuf,

    /// Path to the append-only run log
    pub log_path: PathBuf,

    /// URL returning the caller's public IP as plain text
    pub ip_check_url: String,

    /// Base URL of the Cloudflare API, without trailing slash
    pub api_base: String,

    /// Per-request timeout for every outbound call
    pub request_timeout: Duration,

    /// TTL written to the record on update (seconds)
    pub record_ttl: u32,

    /// Proxied flag written to the record on update
    pub proxied: bool,
}

impl Settings {
    /// File name of the configuration path, as shown in the run log
    pub fn config_file_name(&self) -> String {
        self.config_path
            .file_name()
            .unwrap_or_else(|| OsStr::new(DEFAULT_CONFIG_FILE))
            .to_string_lossy()
            .into_owned()
    }

    /// Use a different configuration file
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Use a different run log
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Use a different public-IP endpoint
    pub fn with_ip_check_url(mut self, url: impl Into<String>) -> Self {
        self.ip_check_url = url.into();
        self
    }

    /// Use a different API base URL
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Use a different request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            ip_check_url: DEFAULT_IP_CHECK_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: default_request_timeout(),
            record_ttl: default_record_ttl(),
            proxied: false,
        }
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_record_ttl() -> u32 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const VALID: &str = r#"{
        "zone_id": "zone-123",
        "record_name": "home.example.com",
        "api_token": "secret_token_12345"
    }"#;

    #[tokio::test]
    async fn test_load_valid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, VALID).unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.zone_id, "zone-123");
        assert_eq!(config.record_name, "home.example.com");
        assert_eq!(config.api_token, "secret_token_12345");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        match Config::load(&path).await {
            Err(Error::ConfigNotFound { path: missing }) => assert_eq!(missing, path),
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(Config::parse("{not json"), Err(Error::Json(_))));
        assert!(matches!(Config::parse("[1, 2, 3]"), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_missing_key() {
        let raw = r#"{"zone_id": "zone-123", "record_name": "home.example.com"}"#;
        let error = Config::parse(raw).unwrap_err();
        assert!(error.to_string().contains("api_token"), "{error}");
    }

    #[test]
    fn test_parse_empty_value() {
        let raw = r#"{"zone_id": "", "record_name": "home.example.com", "api_token": "t"}"#;
        match Config::parse(raw) {
            Err(Error::Config(msg)) => assert_eq!(msg, "zone_id cannot be empty"),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let raw = r#"{
            "zone_id": "z", "record_name": "r.example.com", "api_token": "t",
            "comment": "managed by hand"
        }"#;
        assert!(Config::parse(raw).is_ok());
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let config = Config::parse(VALID).unwrap();
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("home.example.com"));
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.config_path, PathBuf::from("config.json"));
        assert_eq!(settings.log_path, PathBuf::from("ddns.log"));
        assert_eq!(settings.ip_check_url, "https://api.ipify.org");
        assert_eq!(settings.api_base, "https://api.cloudflare.com/client/v4");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.record_ttl, 120);
        assert!(!settings.proxied);
        assert_eq!(settings.config_file_name(), "config.json");
    }

    #[test]
    fn test_config_file_name_strips_directories() {
        let settings = Settings::default().with_config_path("/etc/cfddns/config.json");
        assert_eq!(settings.config_file_name(), "config.json");
    }
}
