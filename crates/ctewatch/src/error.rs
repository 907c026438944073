//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing errors with actionable help text
//! and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ctewatch_api::{Endpoint, Error as ApiError};
use ctewatch_config::ConfigError;
use ctewatch_core::CycleError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the proxy at {url}")]
    #[diagnostic(
        code(ctewatch::connection_failed),
        help(
            "Check that the Chaos Traffic Engine is running and its API is reachable.\n\
             URL: {url}\n\
             Override with --url or CTEWATCH_URL."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(ctewatch::tls),
        help("Use --insecure (-k) for self-signed certificates, or set source.ca_cert.")
    )]
    Tls { reason: String },

    #[error("Request to {endpoint} timed out after {seconds}s")]
    #[diagnostic(
        code(ctewatch::timeout),
        help("Increase the timeout with --timeout or source.timeout_secs.")
    )]
    Timeout { endpoint: Endpoint, seconds: u64 },

    // ── Source ───────────────────────────────────────────────────────

    #[error("{endpoint} failed: {message}")]
    #[diagnostic(code(ctewatch::source))]
    Source { endpoint: Endpoint, message: String },

    #[error("{endpoint} returned an unexpected body: {message}")]
    #[diagnostic(
        code(ctewatch::bad_response),
        help("Is --url pointing at a Chaos Traffic Engine API?")
    )]
    BadResponse { endpoint: Endpoint, message: String },

    #[error("Proxy reports it is not running (status: {status})")]
    #[diagnostic(code(ctewatch::unhealthy))]
    Unhealthy { status: String },

    // ── Usage & configuration ────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ctewatch::validation))]
    Validation { field: String, reason: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(ctewatch::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(ctewatch::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(ctewatch::render))]
    Render(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ConfigExists { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Classify a direct API call failure against the proxy at `url`.
    pub fn from_api(err: ApiError, url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                endpoint: err.endpoint().unwrap_or(Endpoint::Health),
                seconds: timeout_secs,
            };
        }
        match err {
            ApiError::Transport { source, .. } => Self::ConnectionFailed {
                url: url.into(),
                reason: source.to_string(),
            },
            ApiError::Tls(reason) => Self::Tls { reason },
            ApiError::Status {
                endpoint, message, ..
            } => Self::Source { endpoint, message },
            ApiError::Deserialization {
                endpoint, message, ..
            } => Self::BadResponse { endpoint, message },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
        }
    }

    /// Classify a failed poll cycle. Any transport failure, including an
    /// error status, counts as the proxy being unreachable.
    pub fn from_cycle(err: CycleError, url: &str) -> Self {
        match err {
            CycleError::Transport { message, .. } => Self::ConnectionFailed {
                url: url.into(),
                reason: message,
            },
            CycleError::Parse { endpoint, message } => Self::BadResponse { endpoint, message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
