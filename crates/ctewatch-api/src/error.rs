use thiserror::Error;

use crate::client::Endpoint;

/// Top-level error type for the `ctewatch-api` crate.
///
/// Every request-level variant names the endpoint it came from so callers
/// can report which of the concurrent reads broke a poll cycle.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("{endpoint}: HTTP transport error: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{endpoint}: HTTP {status}: {message}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        message: String,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not the expected JSON object, with the raw body for debugging.
    #[error("{endpoint}: deserialization error: {message}")]
    Deserialization {
        endpoint: Endpoint,
        message: String,
        body: String,
    },
}

impl Error {
    /// The endpoint a request-level error originated from.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Deserialization { endpoint, .. } => Some(*endpoint),
            Self::InvalidUrl(_) | Self::Tls(_) => None,
        }
    }

    /// Returns `true` if the response arrived but could not be interpreted.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }

    /// Returns `true` if this is a transient network error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}
