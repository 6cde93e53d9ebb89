// # cfddns-core
//
// Core library for the one-shot Cloudflare DDNS updater.
//
// ## Architecture Overview
//
// A run is a strict sequence:
//
//     load config → resolve public IP → locate record → update record
//
// - **IpSource**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for locating and updating a DNS record
// - **SyncEngine**: Runs the sequence once and writes the run log
// - **RunLog**: Append-only, timestamped text log
// - **Config / Settings**: User configuration file and fixed run parameters
//
// Components return typed errors; the engine turns each failure into one
// run log line and stops. Only a failure to write the run log escapes.

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod log;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, RecordId, RecordUpdate};
pub use engine::{SyncEngine, RunOutcome, Stage};
pub use config::{Config, Settings};
pub use error::{Error, Result};
pub use log::RunLog;
