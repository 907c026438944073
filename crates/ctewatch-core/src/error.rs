use ctewatch_api::Endpoint;
use thiserror::Error;

/// Why a poll cycle failed. Either variant flips the dashboard offline.
///
/// `message` is the API error text, which already names the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// The request never produced a usable response (connect, timeout,
    /// non-success status).
    #[error("{message}")]
    Transport { endpoint: Endpoint, message: String },

    /// A response arrived but its body was not the expected shape.
    #[error("{message}")]
    Parse { endpoint: Endpoint, message: String },
}

impl CycleError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Transport { endpoint, .. } | Self::Parse { endpoint, .. } => *endpoint,
        }
    }

    /// Classify an API error raised while reading `endpoint`.
    pub fn from_api(endpoint: Endpoint, err: &ctewatch_api::Error) -> Self {
        let endpoint = err.endpoint().unwrap_or(endpoint);
        let message = err.to_string();
        if err.is_parse() {
            Self::Parse { endpoint, message }
        } else {
            Self::Transport { endpoint, message }
        }
    }
}
