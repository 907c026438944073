//! Visual encoders: percentages → bar fills and circular-gauge geometry.
//!
//! Gauges are modelled after dashed strokes on a circle of fixed
//! circumference: the visible arc is `dash` long, starting `offset` along
//! the path, and `dash + remaining == circumference` always holds.

use std::fmt;

use crate::format::{self, PLACEHOLDER};
use ctewatch_api::lenient::parse_leading_float;

/// Uptime day-progress ring.
pub const UPTIME_RING_CIRCUMFERENCE: f64 = 283.0;
/// Lyapunov / entropy / correlation rings.
pub const CHAOS_RING_CIRCUMFERENCE: f64 = 220.0;
/// Resolver cache hit-rate ring.
pub const HIT_RATE_RING_CIRCUMFERENCE: f64 = 327.0;
/// Bypassed / tunneled routing donut.
pub const DONUT_CIRCUMFERENCE: f64 = 377.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Clamp a percentage to `[0, 100]`; `NaN` becomes 0.
pub fn clamp_pct(pct: f64) -> f64 {
    if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) }
}

/// Fill of a linear bar, in percent of its track.
pub fn bar_fill(pct: f64) -> f64 {
    clamp_pct(pct)
}

// ── Arc geometry ────────────────────────────────────────────────────

/// One arc on a circular track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    /// Visible arc length, in `[0, circumference]`.
    pub dash: f64,
    pub circumference: f64,
    /// Where the arc starts along the track. Negative values shift it
    /// clockwise past a preceding segment.
    pub offset: f64,
}

impl ArcGeometry {
    /// Zero-length arc.
    pub fn empty(circumference: f64) -> Self {
        Self {
            dash: 0.0,
            circumference,
            offset: 0.0,
        }
    }

    /// Ring gauge showing `pct` percent of the circle.
    pub fn ring(pct: f64, circumference: f64) -> Self {
        Self {
            dash: clamp_pct(pct) / 100.0 * circumference,
            circumference,
            offset: 0.0,
        }
    }

    /// Length of the gap after the dash.
    pub fn remaining(&self) -> f64 {
        self.circumference - self.dash
    }

    /// Fraction of the track covered, `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.circumference > 0.0 {
            (self.dash / self.circumference).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// SVG-style `stroke-dasharray` value: `"{dash} {circumference}"`.
    pub fn dasharray(&self) -> String {
        format!("{} {}", self.dash, self.circumference)
    }
}

impl fmt::Display for ArcGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.dasharray(), self.offset)
    }
}

/// Two-segment donut: segment A starts at the top, B follows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Donut {
    pub a: ArcGeometry,
    pub b: ArcGeometry,
}

impl Donut {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn split(a: u64, b: u64, circumference: f64) -> Self {
        let total = a.saturating_add(b);
        if total == 0 {
            return Self {
                a: ArcGeometry::empty(circumference),
                b: ArcGeometry::empty(circumference),
            };
        }
        let a_dash = a as f64 / total as f64 * circumference;
        let b_dash = circumference - a_dash;
        Self {
            a: ArcGeometry {
                dash: a_dash,
                circumference,
                offset: 0.0,
            },
            b: ArcGeometry {
                dash: b_dash,
                circumference,
                offset: -a_dash,
            },
        }
    }
}

// ── Derived percentages ─────────────────────────────────────────────

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn ratio_pct(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Successful connections as a percentage of all connections.
pub fn success_rate(success: u64, total: u64) -> f64 {
    ratio_pct(success, total)
}

/// One protocol's share of all protocol connections.
pub fn protocol_share(count: u64, sum: u64) -> f64 {
    ratio_pct(count, sum)
}

/// Read a percentage string such as `"75.0%"`. Unparsable text reads as 0.
pub fn parse_percent(text: &str) -> f64 {
    parse_leading_float(&text.replace('%', "")).unwrap_or(0.0)
}

/// Cache hit rate. A non-empty precomputed value wins over the counters.
pub fn cache_hit_rate(hits: u64, misses: u64, precomputed: Option<&str>) -> f64 {
    match precomputed {
        Some(text) if !text.is_empty() => parse_percent(text),
        _ => ratio_pct(hits, hits.saturating_add(misses)),
    }
}

/// How far into the current day the uptime counter is, in percent.
pub fn uptime_day_fill(uptime: f64) -> f64 {
    if !uptime.is_finite() || uptime < 0.0 {
        return 0.0;
    }
    ((uptime % SECONDS_PER_DAY) / 864.0).min(100.0)
}

// ── Chaos normalisation ─────────────────────────────────────────────

pub fn lyapunov_fill(v: f64) -> f64 {
    (v.abs() * 100.0).min(100.0)
}

/// Entropy is scaled against 8 bits.
pub fn entropy_fill(v: f64) -> f64 {
    (v / 8.0 * 100.0).min(100.0)
}

pub fn correlation_fill(v: f64) -> f64 {
    (v.abs() / 3.0 * 100.0).min(100.0)
}

/// Fixed-precision readout of a chaos statistic, or the placeholder when
/// the value is not finite.
pub fn fmt_stat(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format::to_fixed(v, decimals)
    } else {
        PLACEHOLDER.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn clamp_pct_bounds() {
        assert!(close(clamp_pct(-5.0), 0.0));
        assert!(close(clamp_pct(42.5), 42.5));
        assert!(close(clamp_pct(250.0), 100.0));
        assert!(close(clamp_pct(f64::NAN), 0.0));
        assert!(close(clamp_pct(f64::INFINITY), 100.0));
        assert!(close(clamp_pct(f64::NEG_INFINITY), 0.0));
    }

    #[test]
    fn ring_dash_stays_on_track() {
        for pct in [-10.0, 0.0, 33.3, 100.0, 180.0, f64::NAN] {
            let ring = ArcGeometry::ring(pct, HIT_RATE_RING_CIRCUMFERENCE);
            assert!((0.0..=HIT_RATE_RING_CIRCUMFERENCE).contains(&ring.dash));
            assert!(close(ring.dash + ring.remaining(), HIT_RATE_RING_CIRCUMFERENCE));
        }
    }

    #[test]
    fn ring_dasharray_matches_svg_form() {
        assert_eq!(ArcGeometry::ring(50.0, 220.0).dasharray(), "110 220");
        assert_eq!(ArcGeometry::ring(0.0, 283.0).dasharray(), "0 283");
    }

    #[test]
    fn donut_with_no_traffic_is_empty() {
        let donut = Donut::split(0, 0, DONUT_CIRCUMFERENCE);
        assert_eq!(donut.a.dasharray(), "0 377");
        assert_eq!(donut.b.dasharray(), "0 377");
    }

    #[test]
    fn donut_segments_cover_circle() {
        for (a, b) in [(1, 0), (0, 9), (40, 60), (7, 13), (u64::MAX, 1)] {
            let donut = Donut::split(a, b, DONUT_CIRCUMFERENCE);
            assert!(close(donut.a.dash + donut.b.dash, DONUT_CIRCUMFERENCE));
            assert!(close(donut.b.offset, -donut.a.dash));
            assert!(close(donut.a.offset, 0.0));
        }
    }

    #[test]
    fn donut_split_proportions() {
        let donut = Donut::split(40, 60, 377.0);
        assert!(close(donut.a.dash, 150.8));
        assert!(close(donut.b.dash, 226.2));
    }

    #[test]
    fn rates_guard_zero_denominators() {
        assert!(close(success_rate(95, 100), 95.0));
        assert!(close(success_rate(5, 0), 0.0));
        assert!(close(protocol_share(0, 0), 0.0));
        assert!(close(protocol_share(1, 4), 25.0));
    }

    #[test]
    fn hit_rate_prefers_precomputed() {
        assert!(close(cache_hit_rate(3, 1, None), 75.0));
        assert!(close(cache_hit_rate(3, 1, Some("")), 75.0));
        assert!(close(cache_hit_rate(3, 1, Some("12.5%")), 12.5));
        assert!(close(cache_hit_rate(3, 1, Some("n/a")), 0.0));
        assert!(close(cache_hit_rate(0, 0, None), 0.0));
    }

    #[test]
    fn uptime_fill_wraps_daily() {
        assert!(close(uptime_day_fill(0.0), 0.0));
        assert!(close(uptime_day_fill(43_200.0), 50.0));
        assert!(close(uptime_day_fill(86_400.0 + 864.0), 1.0));
        assert!(close(uptime_day_fill(f64::NAN), 0.0));
    }

    #[test]
    fn chaos_fills_saturate() {
        assert!(close(lyapunov_fill(-0.42), 42.0));
        assert!(close(lyapunov_fill(3.0), 100.0));
        assert!(close(entropy_fill(4.0), 50.0));
        assert!(close(entropy_fill(12.0), 100.0));
        assert!(close(correlation_fill(-1.5), 50.0));
    }

    #[test]
    fn stat_readouts() {
        assert_eq!(fmt_stat(0.421_34, 3), "0.421");
        assert_eq!(fmt_stat(7.0, 2), "7.00");
        assert_eq!(fmt_stat(f64::NAN, 2), PLACEHOLDER);
    }
}
