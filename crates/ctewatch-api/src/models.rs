// Wire models for the telemetry endpoints.
//
// These mirror the JSON the proxy serves. Every field is optional and
// decoded leniently; turning absence into concrete values is the job of
// the domain conversion in `ctewatch-core`. Unknown keys are ignored.

use serde::Deserialize;

use crate::lenient;

// ── /api/stats ──────────────────────────────────────────────────────

/// Response body of `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatsResponse {
    /// Seconds since the proxy started.
    #[serde(default, deserialize_with = "lenient::number")]
    pub uptime: Option<f64>,
    #[serde(default)]
    pub connections: Option<ConnectionsResponse>,
    #[serde(default)]
    pub traffic: Option<TrafficResponse>,
    #[serde(default)]
    pub routing: Option<RoutingResponse>,
    #[serde(default)]
    pub protocols: Option<ProtocolsResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default, deserialize_with = "lenient::count")]
    pub active: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub success: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub failed: Option<u64>,
}

/// Byte counters. `total` is optional even on current servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrafficResponse {
    #[serde(default, deserialize_with = "lenient::count")]
    pub sent: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub received: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoutingResponse {
    #[serde(default, deserialize_with = "lenient::count")]
    pub bypassed: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub tunneled: Option<u64>,
}

/// Per-protocol connection counts. Keys are the proxy's protocol labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProtocolsResponse {
    #[serde(rename = "HTTP", default, deserialize_with = "lenient::count")]
    pub http: Option<u64>,
    #[serde(rename = "SOCKS5", default, deserialize_with = "lenient::count")]
    pub socks5: Option<u64>,
    #[serde(rename = "Shadowsocks", default, deserialize_with = "lenient::count")]
    pub shadowsocks: Option<u64>,
}

// ── /api/chaos ──────────────────────────────────────────────────────

/// Response body of `GET /api/chaos`. The three statistics are numbers or
/// numeric strings depending on the engine version.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChaosResponse {
    #[serde(default, deserialize_with = "lenient::number")]
    pub lyapunov_exponent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub shannon_entropy: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub correlation_dimension: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub samples_collected: Option<u64>,
}

// ── /api/dns ────────────────────────────────────────────────────────

/// Response body of `GET /api/dns` (resolver cache statistics).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CacheResponse {
    #[serde(default, deserialize_with = "lenient::count")]
    pub cache_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub cache_hits: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub cache_misses: Option<u64>,
    /// Precomputed hit rate such as `"75.0%"`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub hit_rate: Option<String>,
}

// ── /api/health ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub running: Option<bool>,
}
