//! Command handlers and the shared config/client plumbing they use.

pub mod config_cmd;
pub mod health;
pub mod snapshot;
pub mod watch;

use ctewatch_api::TelemetryClient;
use ctewatch_config::{self as config, Config};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a network command to its handler.
pub async fn dispatch(cmd: Command, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Snapshot(args) => snapshot::handle(&args, config, global).await,
        Command::Watch(args) => watch::handle(&args, config, global).await,
        Command::Health => health::handle(config, global).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Load the config file (explicit `--config` or the default location),
/// layer the global flags on top and validate the result.
pub fn resolve_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load(global)?;

    if let Some(ref url) = global.url {
        cfg.source.url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.source.timeout_secs = timeout;
    }
    if global.insecure {
        cfg.source.insecure = true;
        cfg.source.ca_cert = None;
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Load without flag overrides. A missing file yields the defaults.
pub(crate) fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let cfg = match global.config {
        Some(ref path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    Ok(cfg)
}

/// Build a client for the resolved source.
pub(crate) fn client(config: &Config) -> Result<TelemetryClient, CliError> {
    let transport = config.to_transport_config()?;
    TelemetryClient::new(&config.source.url, &transport)
        .map_err(|e| CliError::from_api(e, &config.source.url, config.source.timeout_secs))
}
