//! Shared configuration for the ctewatch CLI and TUI.
//!
//! One TOML file, overridable from the environment, translated into the
//! runtime configs of `ctewatch-api` and `ctewatch-core`. Both binaries
//! layer their command-line flags on top of the loaded [`Config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use ctewatch_api::{TlsMode, TransportConfig};
use ctewatch_core::{OverlapPolicy, PollerConfig};

/// Environment variables with this prefix override file values.
/// Nested keys use `__`, e.g. `CTEWATCH_POLL__INTERVAL_MS=500`.
pub const ENV_PREFIX: &str = "CTEWATCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the telemetry comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Base URL the `/api/*` endpoints live under.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// PEM file with a custom CA for TLS-fronted sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Skip certificate verification.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            ca_cert: None,
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// `allow` starts a cycle on every tick; `skip` drops ticks while a
    /// cycle is still running.
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            overlap: OverlapPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiConfig {
    /// Quiet period before the sparkline is re-laid out after a resize.
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: default_resize_debounce_ms(),
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_interval_ms() -> u64 {
    2000
}
fn default_resize_debounce_ms() -> u64 {
    100
}

// ── Validation & translation ────────────────────────────────────────

impl Config {
    /// Check every field that can be wrong independently of the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source_url()?;
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::invalid("source.timeout_secs", "must be at least 1"));
        }
        if self.poll.interval_ms == 0 {
            return Err(ConfigError::invalid("poll.interval_ms", "must be at least 1"));
        }
        if self.source.insecure && self.source.ca_cert.is_some() {
            return Err(ConfigError::invalid(
                "source.ca_cert",
                "cannot be combined with source.insecure",
            ));
        }
        Ok(())
    }

    /// The source URL, parsed. Only `http` and `https` are accepted.
    pub fn source_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.source.url)
            .map_err(|e| ConfigError::invalid("source.url", format!("{e}: {}", self.source.url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::invalid(
                "source.url",
                format!("unsupported scheme '{other}'"),
            )),
        }
    }

    pub fn to_transport_config(&self) -> Result<TransportConfig, ConfigError> {
        self.validate()?;
        let tls = match (&self.source.ca_cert, self.source.insecure) {
            (_, true) => TlsMode::DangerAcceptInvalid,
            (Some(path), false) => TlsMode::CustomCa(path.clone()),
            (None, false) => TlsMode::System,
        };
        Ok(TransportConfig {
            tls,
            timeout: Duration::from_secs(self.source.timeout_secs),
        })
    }

    pub fn to_poller_config(&self) -> Result<PollerConfig, ConfigError> {
        self.validate()?;
        Ok(PollerConfig {
            interval: Duration::from_millis(self.poll.interval_ms),
            overlap: self.poll.overlap,
        })
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.ui.resize_debounce_ms)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "ctewatch", "ctewatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ctewatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing file is fine) + environment. Not validated;
/// call [`Config::validate`] or one of the translators.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning the defaults if anything goes wrong.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
