//! Output sinks and the [`Presenter`] seam.
//!
//! The dashboard never touches a UI directly. It writes formatted strings,
//! bar fills, arc geometry and sparkline frames to typed sinks; each
//! frontend binds the sinks it actually displays and ignores the rest.

use std::collections::HashMap;

use strum::{Display, EnumIter};

use crate::connectivity::{ConnectivityState, Transition};
use crate::encode::{
    ArcGeometry, CHAOS_RING_CIRCUMFERENCE, DONUT_CIRCUMFERENCE, HIT_RATE_RING_CIRCUMFERENCE,
    UPTIME_RING_CIRCUMFERENCE,
};
use crate::sparkline::SparklineFrame;

/// Text readouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum TextSink {
    // ── Header ──
    #[strum(serialize = "Status")]
    Status,
    #[strum(serialize = "Last update")]
    LastUpdate,
    #[strum(serialize = "Uptime (clock)")]
    HeaderUptime,
    #[strum(serialize = "Active connections")]
    HeaderActive,
    #[strum(serialize = "Total traffic")]
    HeaderTraffic,
    #[strum(serialize = "Success rate")]
    HeaderSuccessRate,

    // ── Server ──
    #[strum(serialize = "Server")]
    ServerStatus,
    #[strum(serialize = "Uptime")]
    Uptime,

    // ── Connections ──
    #[strum(serialize = "Active badge")]
    ActiveBadge,
    #[strum(serialize = "Total connections")]
    TotalConnections,
    #[strum(serialize = "Successful")]
    SuccessfulConnections,
    #[strum(serialize = "Failed")]
    FailedConnections,
    #[strum(serialize = "Success bar label")]
    ConnectionRateLabel,

    // ── Traffic ──
    #[strum(serialize = "Sent")]
    Sent,
    #[strum(serialize = "Received")]
    Received,

    // ── Routing ──
    #[strum(serialize = "Routed")]
    RoutingTotal,
    #[strum(serialize = "Bypassed")]
    Bypassed,
    #[strum(serialize = "Tunneled")]
    Tunneled,

    // ── Protocols ──
    #[strum(serialize = "HTTP")]
    Http,
    #[strum(serialize = "SOCKS5")]
    Socks5,
    #[strum(serialize = "Shadowsocks")]
    Shadowsocks,

    // ── Chaos ──
    #[strum(serialize = "Samples")]
    SamplesBadge,
    #[strum(serialize = "Lyapunov exponent")]
    Lyapunov,
    #[strum(serialize = "Shannon entropy")]
    Entropy,
    #[strum(serialize = "Correlation dimension")]
    Correlation,

    // ── DNS cache ──
    #[strum(serialize = "Cache size")]
    CacheSizeBadge,
    #[strum(serialize = "Hit rate")]
    HitRate,
    #[strum(serialize = "Cache hits")]
    CacheHits,
    #[strum(serialize = "Cache misses")]
    CacheMisses,
}

impl TextSink {
    /// Connectivity labels always carry a word, never the placeholder.
    pub fn is_status_label(self) -> bool {
        matches!(self, Self::Status | Self::ServerStatus)
    }
}

/// Linear progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum BarSink {
    #[strum(serialize = "Connection success")]
    ConnectionSuccess,
    #[strum(serialize = "HTTP share")]
    Http,
    #[strum(serialize = "SOCKS5 share")]
    Socks5,
    #[strum(serialize = "Shadowsocks share")]
    Shadowsocks,
}

/// Circular gauges and donut segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum ArcSink {
    #[strum(serialize = "Uptime ring")]
    Uptime,
    #[strum(serialize = "Lyapunov ring")]
    Lyapunov,
    #[strum(serialize = "Entropy ring")]
    Entropy,
    #[strum(serialize = "Correlation ring")]
    Correlation,
    #[strum(serialize = "Hit-rate ring")]
    HitRate,
    #[strum(serialize = "Bypassed arc")]
    Bypassed,
    #[strum(serialize = "Tunneled arc")]
    Tunneled,
}

impl ArcSink {
    /// Track length of this gauge.
    pub fn circumference(self) -> f64 {
        match self {
            Self::Uptime => UPTIME_RING_CIRCUMFERENCE,
            Self::Lyapunov | Self::Entropy | Self::Correlation => CHAOS_RING_CIRCUMFERENCE,
            Self::HitRate => HIT_RATE_RING_CIRCUMFERENCE,
            Self::Bypassed | Self::Tunneled => DONUT_CIRCUMFERENCE,
        }
    }
}

/// Write-only output surface for the dashboard.
pub trait Presenter {
    fn set_text(&mut self, sink: TextSink, text: String);

    /// `pct` is already clamped to `[0, 100]`.
    fn set_bar_fill(&mut self, sink: BarSink, pct: f64);

    fn set_arc_geometry(&mut self, sink: ArcSink, arc: ArcGeometry);

    fn draw_series(&mut self, frame: &SparklineFrame);

    /// Called after every cycle outcome. `BecameOnline` is the cue for a
    /// one-off "connected" pulse.
    fn set_connectivity(&mut self, _state: ConnectivityState, _transition: Transition) {}
}

// ── In-memory presenter ─────────────────────────────────────────────

/// Keeps the latest value written to every sink.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    texts: HashMap<TextSink, String>,
    bars: HashMap<BarSink, f64>,
    arcs: HashMap<ArcSink, ArcGeometry>,
    frame: Option<SparklineFrame>,
    connectivity: Option<(ConnectivityState, Transition)>,
    pulses: usize,
    frames_drawn: usize,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, sink: TextSink) -> Option<&str> {
        self.texts.get(&sink).map(String::as_str)
    }

    pub fn bar(&self, sink: BarSink) -> Option<f64> {
        self.bars.get(&sink).copied()
    }

    pub fn arc(&self, sink: ArcSink) -> Option<ArcGeometry> {
        self.arcs.get(&sink).copied()
    }

    pub fn frame(&self) -> Option<&SparklineFrame> {
        self.frame.as_ref()
    }

    pub fn connectivity(&self) -> Option<(ConnectivityState, Transition)> {
        self.connectivity
    }

    /// How many times the "connected" pulse fired.
    pub fn pulses(&self) -> usize {
        self.pulses
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames_drawn
    }

    /// Text readouts in sink order.
    pub fn texts(&self) -> Vec<(TextSink, &str)> {
        let mut out: Vec<_> = self
            .texts
            .iter()
            .map(|(sink, text)| (*sink, text.as_str()))
            .collect();
        out.sort_by_key(|(sink, _)| *sink);
        out
    }
}

impl Presenter for RecordingPresenter {
    fn set_text(&mut self, sink: TextSink, text: String) {
        self.texts.insert(sink, text);
    }

    fn set_bar_fill(&mut self, sink: BarSink, pct: f64) {
        self.bars.insert(sink, pct);
    }

    fn set_arc_geometry(&mut self, sink: ArcSink, arc: ArcGeometry) {
        self.arcs.insert(sink, arc);
    }

    fn draw_series(&mut self, frame: &SparklineFrame) {
        self.frame = Some(frame.clone());
        self.frames_drawn += 1;
    }

    fn set_connectivity(&mut self, state: ConnectivityState, transition: Transition) {
        if transition == Transition::BecameOnline {
            self.pulses += 1;
        }
        self.connectivity = Some((state, transition));
    }
}
