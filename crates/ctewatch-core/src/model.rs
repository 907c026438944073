// ── Domain model ──
//
// Fully-defaulted telemetry for one successful poll cycle. Nothing here is
// optional except the server's precomputed hit-rate text; absence on the
// wire has already been resolved by `convert`.

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionCounts {
    pub active: u64,
    pub total: u64,
    pub success: u64,
    pub failed: u64,
}

/// Byte counters. `total` is the server's value or `sent + received`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrafficCounts {
    pub sent: u64,
    pub received: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoutingCounts {
    pub bypassed: u64,
    pub tunneled: u64,
}

impl RoutingCounts {
    pub fn total(&self) -> u64 {
        self.bypassed.saturating_add(self.tunneled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolCounts {
    pub http: u64,
    pub socks5: u64,
    pub shadowsocks: u64,
}

impl ProtocolCounts {
    pub fn total(&self) -> u64 {
        self.http
            .saturating_add(self.socks5)
            .saturating_add(self.shadowsocks)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Seconds since the proxy started. 0 when absent; a negative value
    /// is passed through and renders as unknown.
    pub uptime: f64,
    pub connections: ConnectionCounts,
    pub traffic: TrafficCounts,
    pub routing: RoutingCounts,
    pub protocols: ProtocolCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChaosSnapshot {
    pub lyapunov_exponent: f64,
    pub shannon_entropy: f64,
    pub correlation_dimension: f64,
    pub samples_collected: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot {
    pub cache_size: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Server-computed hit rate (e.g. `"75.0%"`), preferred when present.
    pub hit_rate: Option<String>,
}

/// Everything one successful cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telemetry {
    pub stats: StatsSnapshot,
    pub chaos: ChaosSnapshot,
    pub cache: CacheSnapshot,
    /// Local time the cycle completed.
    pub fetched_at: DateTime<Local>,
}
