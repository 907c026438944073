// ── Wire → domain conversion ──
//
// Every `Option` from the wire models is resolved here with an explicit
// default. Missing counters become 0 and missing statistics become 0.0.
// Uptime keeps its sign; a missing one becomes 0 and both read as unknown.

use ctewatch_api::{
    CacheResponse, ChaosResponse, ConnectionsResponse, ProtocolsResponse, RoutingResponse,
    StatsResponse, TrafficResponse,
};

use crate::model::{
    CacheSnapshot, ChaosSnapshot, ConnectionCounts, ProtocolCounts, RoutingCounts, StatsSnapshot,
    TrafficCounts,
};

impl From<ConnectionsResponse> for ConnectionCounts {
    fn from(c: ConnectionsResponse) -> Self {
        Self {
            active: c.active.unwrap_or(0),
            total: c.total.unwrap_or(0),
            success: c.success.unwrap_or(0),
            failed: c.failed.unwrap_or(0),
        }
    }
}

impl From<TrafficResponse> for TrafficCounts {
    fn from(t: TrafficResponse) -> Self {
        let sent = t.sent.unwrap_or(0);
        let received = t.received.unwrap_or(0);
        Self {
            sent,
            received,
            total: t.total.unwrap_or_else(|| sent.saturating_add(received)),
        }
    }
}

impl From<RoutingResponse> for RoutingCounts {
    fn from(r: RoutingResponse) -> Self {
        Self {
            bypassed: r.bypassed.unwrap_or(0),
            tunneled: r.tunneled.unwrap_or(0),
        }
    }
}

impl From<ProtocolsResponse> for ProtocolCounts {
    fn from(p: ProtocolsResponse) -> Self {
        Self {
            http: p.http.unwrap_or(0),
            socks5: p.socks5.unwrap_or(0),
            shadowsocks: p.shadowsocks.unwrap_or(0),
        }
    }
}

impl From<StatsResponse> for StatsSnapshot {
    fn from(s: StatsResponse) -> Self {
        Self {
            uptime: s.uptime.unwrap_or(0.0),
            connections: s.connections.unwrap_or_default().into(),
            traffic: s.traffic.unwrap_or_default().into(),
            routing: s.routing.unwrap_or_default().into(),
            protocols: s.protocols.unwrap_or_default().into(),
        }
    }
}

impl From<ChaosResponse> for ChaosSnapshot {
    fn from(c: ChaosResponse) -> Self {
        Self {
            lyapunov_exponent: c.lyapunov_exponent.unwrap_or(0.0),
            shannon_entropy: c.shannon_entropy.unwrap_or(0.0),
            correlation_dimension: c.correlation_dimension.unwrap_or(0.0),
            samples_collected: c.samples_collected.unwrap_or(0),
        }
    }
}

impl From<CacheResponse> for CacheSnapshot {
    fn from(c: CacheResponse) -> Self {
        Self {
            cache_size: c.cache_size.unwrap_or(0),
            cache_hits: c.cache_hits.unwrap_or(0),
            cache_misses: c.cache_misses.unwrap_or(0),
            hit_rate: c.hit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_total_defaults_to_sum() {
        let t: TrafficCounts = TrafficResponse {
            sent: Some(1536),
            received: Some(512),
            total: None,
        }
        .into();
        assert_eq!(t.total, 2048);
    }

    #[test]
    fn explicit_zero_total_is_kept() {
        let t: TrafficCounts = TrafficResponse {
            sent: Some(10),
            received: Some(20),
            total: Some(0),
        }
        .into();
        assert_eq!(t.total, 0);
    }

    #[test]
    fn empty_stats_default_to_zero() {
        let s: StatsSnapshot = StatsResponse::default().into();
        assert_eq!(s, StatsSnapshot::default());
    }

    #[test]
    fn negative_uptime_is_kept() {
        let s: StatsSnapshot = StatsResponse {
            uptime: Some(-5.0),
            ..StatsResponse::default()
        }
        .into();
        assert!((s.uptime + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cache_keeps_precomputed_rate() {
        let c: CacheSnapshot = CacheResponse {
            cache_hits: Some(3),
            hit_rate: Some("80%".into()),
            ..CacheResponse::default()
        }
        .into();
        assert_eq!(c.cache_hits, 3);
        assert_eq!(c.cache_misses, 0);
        assert_eq!(c.hit_rate.as_deref(), Some("80%"));
    }
}
