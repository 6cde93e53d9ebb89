//! Test doubles and common utilities for run flow contract tests
//!
//! The doubles count calls and record what they were given. They reach no
//! network.

#![allow(dead_code)]

use cfddns_core::config::{Config, Settings};
use cfddns_core::error::{Error, Result};
use cfddns_core::traits::{DnsProvider, IpSource, RecordId, RecordUpdate};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Builds the error a double should fail with (errors are not `Clone`)
pub type ErrorFactory = Arc<dyn Fn() -> Error + Send + Sync>;

/// An IpSource that returns a fixed answer
pub struct FixedIpSource {
    /// Address to return, or the error to fail with
    answer: std::result::Result<String, ErrorFactory>,
    /// Call counter for current()
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    /// Always resolve to `ip`
    pub fn ok(ip: &str) -> Self {
        Self {
            answer: Ok(ip.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always fail with the error built by `error`
    pub fn failing(error: impl Fn() -> Error + Send + Sync + 'static) -> Self {
        Self {
            answer: Err(Arc::new(error)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new FixedIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            answer: other.answer.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Ok(ip) => Ok(ip.clone()),
            Err(error) => Err(error()),
        }
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// A mock DnsProvider that tracks calls
pub struct MockDnsProvider {
    /// Record ID to return from find_record(), or the error to fail with
    lookup: std::result::Result<RecordId, ErrorFactory>,
    /// Error to fail update_record() with, if any
    update_error: Option<ErrorFactory>,
    /// Call counter for find_record()
    find_call_count: Arc<AtomicUsize>,
    /// Call counter for update_record()
    update_call_count: Arc<AtomicUsize>,
    /// Recorded (record ID, update) pairs from update calls
    updates: Arc<Mutex<Vec<(RecordId, RecordUpdate)>>>,
    /// Recorded configurations handed to find_record()
    seen_configs: Arc<Mutex<Vec<Config>>>,
}

impl MockDnsProvider {
    /// Find `record_id` and accept every update
    pub fn new(record_id: &str) -> Self {
        Self {
            lookup: Ok(RecordId::new(record_id)),
            update_error: None,
            find_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
            seen_configs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail find_record() with the error built by `error`
    pub fn with_lookup_error(mut self, error: impl Fn() -> Error + Send + Sync + 'static) -> Self {
        self.lookup = Err(Arc::new(error));
        self
    }

    /// Fail update_record() with the error built by `error`
    pub fn with_update_error(mut self, error: impl Fn() -> Error + Send + Sync + 'static) -> Self {
        self.update_error = Some(Arc::new(error));
        self
    }

    /// Get the number of times find_record() was called
    pub fn find_call_count(&self) -> usize {
        self.find_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Get the list of updates that were requested
    pub fn updates(&self) -> Vec<(RecordId, RecordUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    /// Get the configurations find_record() was called with
    pub fn seen_configs(&self) -> Vec<Config> {
        self.seen_configs.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            lookup: other.lookup.clone(),
            update_error: other.update_error.clone(),
            find_call_count: Arc::clone(&other.find_call_count),
            update_call_count: Arc::clone(&other.update_call_count),
            updates: Arc::clone(&other.updates),
            seen_configs: Arc::clone(&other.seen_configs),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn find_record(&self, config: &Config) -> Result<RecordId> {
        self.find_call_count.fetch_add(1, Ordering::SeqCst);
        self.seen_configs.lock().unwrap().push(config.clone());
        match &self.lookup {
            Ok(record_id) => Ok(record_id.clone()),
            Err(error) => Err(error()),
        }
    }

    async fn update_record(
        &self,
        _config: &Config,
        record_id: &RecordId,
        update: &RecordUpdate,
    ) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.updates
            .lock()
            .unwrap()
            .push((record_id.clone(), update.clone()));
        match &self.update_error {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Working directory of one simulated run
pub struct RunDir {
    dir: TempDir,
}

impl RunDir {
    /// Empty directory: no config file, no log yet
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir is created"),
        }
    }

    /// Directory holding a valid `config.json`
    pub fn with_config() -> Self {
        let run = Self::empty();
        run.write_config(
            r#"{
                "zone_id": "zone-123",
                "record_name": "home.example.com",
                "api_token": "test-token"
            }"#,
        );
        run
    }

    /// Write `raw` as `config.json`
    pub fn write_config(&self, raw: &str) {
        std::fs::write(self.config_path(), raw).expect("config is written");
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("ddns.log")
    }

    /// Settings pointing at this directory
    pub fn settings(&self) -> Settings {
        Settings::default()
            .with_config_path(self.config_path())
            .with_log_path(self.log_path())
    }

    /// Lines of the run log, empty if it was never written
    pub fn log_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .map(|contents| contents.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
