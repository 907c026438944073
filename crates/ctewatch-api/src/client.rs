// Async HTTP client for the telemetry endpoints.
//
// Base path: whatever the dashboard is served from (usually `/`).
// Auth: none. All endpoints are unauthenticated GETs returning JSON objects.

use std::fmt;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::models::{CacheResponse, ChaosResponse, HealthResponse, StatsResponse};
use crate::transport::TransportConfig;

// ── Endpoints ────────────────────────────────────────────────────────

/// The read-only resources the telemetry source exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Stats,
    Chaos,
    Dns,
    Health,
}

impl Endpoint {
    /// Path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Stats => "api/stats",
            Self::Chaos => "api/chaos",
            Self::Dns => "api/dns",
            Self::Health => "api/health",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the telemetry source.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TelemetryClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so endpoint paths join beneath it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, Error> {
        Ok(self.base_url.join(endpoint.path())?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/stats`: uptime, connections, traffic, routing, protocols.
    pub async fn stats(&self) -> Result<StatsResponse, Error> {
        self.get(Endpoint::Stats).await
    }

    /// `GET /api/chaos`: chaos-engine statistics.
    pub async fn chaos(&self) -> Result<ChaosResponse, Error> {
        self.get(Endpoint::Chaos).await
    }

    /// `GET /api/dns`: resolver cache statistics.
    pub async fn cache(&self) -> Result<CacheResponse, Error> {
        self.get(Endpoint::Dns).await
    }

    /// `GET /api/health`: liveness probe.
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        self.get(Endpoint::Health).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, Error> {
        let url = self.endpoint_url(endpoint)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Transport { endpoint, source })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|source| Error::Transport { endpoint, source })?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                preview(&body).to_owned()
            };
            return Err(Error::Status {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        decode(endpoint, body)
    }
}

/// Decode a success body. Anything other than a JSON object is rejected,
/// even if serde could coerce it into the model.
fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: String) -> Result<T, Error> {
    let malformed = |message: String, body: String| Error::Deserialization {
        endpoint,
        message,
        body,
    };

    let value: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            let message = format!("{e} (body preview: {:?})", preview(&body));
            return Err(malformed(message, body));
        }
    };
    if !value.is_object() {
        let message = format!("expected a JSON object (body preview: {:?})", preview(&body));
        return Err(malformed(message, body));
    }

    serde_json::from_value(value).map_err(|e| malformed(e.to_string(), body))
}

/// First 200 bytes of `body`, cut back to a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_base_path() {
        let http = reqwest::Client::new();
        let client = TelemetryClient::with_client("http://127.0.0.1:8080/dash?x=1", http)
            .expect("valid base url");
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8080/dash/");
        assert_eq!(
            client.endpoint_url(Endpoint::Chaos).expect("join").as_str(),
            "http://127.0.0.1:8080/dash/api/chaos"
        );
    }

    #[test]
    fn root_base_url_keeps_single_slash() {
        let client = TelemetryClient::with_client("http://localhost:8080/", reqwest::Client::new())
            .expect("valid base url");
        assert_eq!(
            client.endpoint_url(Endpoint::Stats).expect("join").as_str(),
            "http://localhost:8080/api/stats"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = TelemetryClient::with_client("not a url", reqwest::Client::new())
            .expect_err("should fail");
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= 200);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn decode_rejects_arrays() {
        let err = decode::<StatsResponse>(Endpoint::Stats, "[]".into()).expect_err("array");
        assert!(err.is_parse());
        assert_eq!(err.endpoint(), Some(Endpoint::Stats));
    }

    #[test]
    fn endpoint_display_is_absolute_path() {
        assert_eq!(Endpoint::Dns.to_string(), "/api/dns");
    }
}
