//! One-shot sync engine
//!
//! `SyncEngine` runs the whole update flow once:
//!
//! ```text
//! LoadConfig ──► ResolveIp ──► LocateRecord ──► UpdateRecord ──► Done
//!     │              │              │                │
//!     └──────────────┴──────────────┴────────────────┴──► Aborted (logged)
//! ```
//!
//! Each stage either hands its value to the next one or ends the run after
//! writing exactly one line to the run log. There are no retries and no
//! backward transitions. The update is unconditional: nothing is compared
//! against a previous address.
//!
//! The only error `run()` itself returns is a failure to write the run log.

use crate::config::{Config, Settings};
use crate::error::{Error, Result};
use crate::log::RunLog;
use crate::traits::{DnsProvider, IpSource, RecordId, RecordUpdate};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Step of the run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading `config.json`
    LoadConfig,
    /// Asking the IP source for the public address
    ResolveIp,
    /// Looking up the record identifier
    LocateRecord,
    /// Writing the new address to the record
    UpdateRecord,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadConfig => "load-config",
            Stage::ResolveIp => "resolve-ip",
            Stage::LocateRecord => "locate-record",
            Stage::UpdateRecord => "update-record",
        };
        f.write_str(name)
    }
}

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// The record now points at `ip`
    Updated {
        /// Address written to the record
        ip: String,
        /// Record that was updated
        record_id: RecordId,
    },

    /// The run stopped at `stage`; the failure has been logged
    Aborted {
        /// Stage that failed
        stage: Stage,
        /// Why it failed
        error: Error,
    },
}

impl RunOutcome {
    fn aborted(stage: Stage, error: Error) -> Self {
        Self::Aborted { stage, error }
    }

    /// Whether the record was updated
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    /// Stage the run stopped at, if it did not complete
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Updated { .. } => None,
            Self::Aborted { stage, .. } => Some(*stage),
        }
    }
}

/// One-shot DNS sync engine
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Call [`SyncEngine::run()`] once per invocation
///
/// The engine owns no state between runs. Calling `run()` twice issues two
/// updates even when the address did not change.
pub struct SyncEngine {
    /// Public-IP resolver
    ip_source: Box<dyn IpSource>,

    /// Record locator and updater
    provider: Box<dyn DnsProvider>,

    /// Paths and record parameters
    settings: Settings,

    /// Append-only run log
    log: RunLog,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `settings`: Run settings (config path, log path, TTL, proxied flag)
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        settings: Settings,
    ) -> Self {
        let log = RunLog::new(settings.log_path.clone());
        Self {
            ip_source,
            provider,
            settings,
            log,
        }
    }

    /// Run the full flow once
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: The run completed or stopped at a logged stage
    /// - `Err(Error::Log)`: The run log could not be written (fatal)
    pub async fn run(&self) -> Result<RunOutcome> {
        match load_config(&self.settings, &self.log).await? {
            Ok(config) => self.sync(config).await,
            Err(outcome) => Ok(outcome),
        }
    }

    /// Run the stages after config loading
    ///
    /// For callers that ran [`load_config`] themselves before building the
    /// engine's components.
    pub async fn sync(&self, config: Config) -> Result<RunOutcome> {
        debug!(
            "Resolving public IP via {}",
            self.ip_source.source_name()
        );
        let ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("Public IP lookup failed: {}", e);
                self.log
                    .append(&format!("Error fetching public IP: {e}"))
                    .await?;
                return Ok(RunOutcome::aborted(Stage::ResolveIp, e));
            }
        };
        info!("Current public IP: {}", ip);

        let record_id = match self.provider.find_record(&config).await {
            Ok(record_id) => record_id,
            Err(e) if e.is_not_found() => {
                warn!("No A record named {} in zone {}", config.record_name, config.zone_id);
                self.log.append("DNS record not found").await?;
                return Ok(RunOutcome::aborted(Stage::LocateRecord, e));
            }
            Err(e) => {
                warn!("Record lookup failed: {}", e);
                self.log
                    .append(&format!("Error fetching record ID: {e}"))
                    .await?;
                return Ok(RunOutcome::aborted(Stage::LocateRecord, e));
            }
        };
        debug!("Found record ID: {}", record_id);

        let update = RecordUpdate::a_record(
            config.record_name.clone(),
            ip.clone(),
            self.settings.record_ttl,
            self.settings.proxied,
        );

        info!(
            "Updating {} DNS record: {} -> {}",
            self.provider.provider_name(),
            config.record_name,
            ip
        );
        match self.provider.update_record(&config, &record_id, &update).await {
            Ok(()) => {
                info!("DNS record updated successfully: {} -> {}", config.record_name, ip);
                self.log
                    .append(&format!("Successfully updated DNS to {ip}"))
                    .await?;
                Ok(RunOutcome::Updated { ip, record_id })
            }
            Err(e) => {
                error!("Failed to update record {}: {}", config.record_name, e);
                self.log
                    .append(&format!("Failed to update DNS: {e}"))
                    .await?;
                Ok(RunOutcome::aborted(Stage::UpdateRecord, e))
            }
        }
    }
}

/// Load the configuration, logging the failure if there is one
///
/// The outer `Result` carries log write failures only. This is the first
/// stage of [`SyncEngine::run`] and needs none of the engine's components.
pub async fn load_config(
    settings: &Settings,
    log: &RunLog,
) -> Result<std::result::Result<Config, RunOutcome>> {
    match Config::load(&settings.config_path).await {
        Ok(config) => {
            debug!("Configuration loaded: {:?}", config);
            Ok(Ok(config))
        }
        Err(e) => {
            let message = match &e {
                Error::ConfigNotFound { .. } => {
                    format!("Missing {}", settings.config_file_name())
                }
                _ => format!("Invalid {}: {e}", settings.config_file_name()),
            };
            error!("{}", message);
            log.append(&message).await?;
            Ok(Err(RunOutcome::aborted(Stage::LoadConfig, e)))
        }
    }
}
