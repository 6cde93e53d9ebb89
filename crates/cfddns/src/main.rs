// # cfddns - one-shot Cloudflare DDNS updater
//
// Run once per invocation (cron, systemd timer, Task Scheduler):
//
// 1. Read `config.json` from the working directory
// 2. Fetch the public IP from `https://api.ipify.org`
// 3. Look up the A record in the configured Cloudflare zone
// 4. Overwrite its content with the public IP
//
// Every outcome is appended to `ddns.log` in the working directory.
// Diagnostics go to stderr via `tracing`.
//
// ## Configuration
//
// ```json
// {
//   "zone_id": "023e105f4ecef8ad9ca31a8372d0c353",
//   "record_name": "home.example.com",
//   "api_token": "your_token"
// }
// ```
//
// The token needs `Zone:DNS:Edit` on the zone. There are no command-line
// flags and no environment variables.

use anyhow::Context;
use cfddns_core::engine::load_config;
use cfddns_core::{RunLog, Settings, Stage, SyncEngine};
use cfddns_ip_http::HttpIpSource;
use cfddns_provider_cloudflare::CloudflareProvider;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: The run reached IP resolution (the outcome is in the run log)
/// - 1: Configuration file missing or invalid
/// - 2: Runtime error (run log unwritable, runtime or client setup failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Run finished; failures past config loading are only logged
    Completed = 0,
    /// Configuration error
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::RuntimeError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run(Settings::default()).await {
            Ok(code) => code,
            Err(e) => {
                error!("Run failed: {:#}", e);
                DdnsExitCode::RuntimeError
            }
        }
    });

    code.into()
}

/// Load the config, then build the components and run the engine once
async fn run(settings: Settings) -> anyhow::Result<DdnsExitCode> {
    let log = RunLog::new(settings.log_path.clone());
    let config = match load_config(&settings, &log)
        .await
        .context("Run log is not writable")?
    {
        Ok(config) => config,
        Err(outcome) => return Ok(exit_code_for(outcome.failed_stage())),
    };

    let ip_source = HttpIpSource::from_settings(&settings)
        .context("Could not construct IP source")?;
    let provider = CloudflareProvider::from_settings(&settings)
        .context("Could not construct Cloudflare provider")?;

    let engine = SyncEngine::new(Box::new(ip_source), Box::new(provider), settings);
    let outcome = engine.sync(config).await.context("Run log is not writable")?;

    Ok(exit_code_for(outcome.failed_stage()))
}

/// Failures after config loading are logged, not reflected in the exit code
fn exit_code_for(failed_stage: Option<Stage>) -> DdnsExitCode {
    match failed_stage {
        Some(Stage::LoadConfig) => DdnsExitCode::ConfigError,
        Some(stage) => {
            info!("Run stopped at {}; see the run log", stage);
            DdnsExitCode::Completed
        }
        None => DdnsExitCode::Completed,
    }
}
