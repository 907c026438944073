//! [`Presenter`] implementation backing the terminal dashboard.
//!
//! The core writes into typed sinks; this view keeps the latest value for
//! each one plus the timestamps the renderer needs for short highlight
//! pulses (a readout that just changed, the source just coming online).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ctewatch_core::format::PLACEHOLDER;
use ctewatch_core::{
    ArcGeometry, ArcSink, BarSink, ConnectivityState, Presenter, SparklineFrame, TextSink,
    Transition,
};

/// How long a changed readout or the connected badge stays highlighted.
pub const PULSE: Duration = Duration::from_millis(600);

#[derive(Debug, Clone)]
struct Readout {
    text: String,
    changed_at: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct DashboardView {
    texts: HashMap<TextSink, Readout>,
    bars: HashMap<BarSink, f64>,
    arcs: HashMap<ArcSink, ArcGeometry>,
    series: Option<SparklineFrame>,
    state: ConnectivityState,
    connected_at: Option<Instant>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_text(&mut self, sink: TextSink, text: String, now: Instant) {
        let changed = self.texts.get(&sink).is_none_or(|r| r.text != text);
        let pulse = changed && text != PLACEHOLDER;
        let entry = self.texts.entry(sink).or_insert_with(|| Readout {
            text: String::new(),
            changed_at: None,
        });
        entry.text = text;
        if pulse {
            entry.changed_at = Some(now);
        }
    }

    // ── Reads for the renderer ───────────────────────────────────────

    /// Unwritten sinks read as the placeholder.
    pub fn text(&self, sink: TextSink) -> &str {
        self.texts.get(&sink).map_or(PLACEHOLDER, |r| r.text.as_str())
    }

    pub fn is_placeholder(&self, sink: TextSink) -> bool {
        self.text(sink) == PLACEHOLDER
    }

    /// The readout changed less than [`PULSE`] before `now`.
    pub fn is_fresh(&self, sink: TextSink, now: Instant) -> bool {
        self.texts
            .get(&sink)
            .and_then(|r| r.changed_at)
            .is_some_and(|at| now.saturating_duration_since(at) < PULSE)
    }

    pub fn bar(&self, sink: BarSink) -> f64 {
        self.bars.get(&sink).copied().unwrap_or(0.0)
    }

    pub fn arc(&self, sink: ArcSink) -> ArcGeometry {
        self.arcs
            .get(&sink)
            .copied()
            .unwrap_or_else(|| ArcGeometry::empty(sink.circumference()))
    }

    pub fn series(&self) -> Option<&SparklineFrame> {
        self.series.as_ref()
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    /// Inside the highlight window that follows an offline→online flip.
    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.connected_at
            .is_some_and(|at| now.saturating_duration_since(at) < PULSE)
    }
}

impl Presenter for DashboardView {
    fn set_text(&mut self, sink: TextSink, text: String) {
        self.write_text(sink, text, Instant::now());
    }

    fn set_bar_fill(&mut self, sink: BarSink, pct: f64) {
        self.bars.insert(sink, pct);
    }

    fn set_arc_geometry(&mut self, sink: ArcSink, arc: ArcGeometry) {
        self.arcs.insert(sink, arc);
    }

    fn draw_series(&mut self, frame: &SparklineFrame) {
        self.series = Some(frame.clone());
    }

    fn set_connectivity(&mut self, state: ConnectivityState, transition: Transition) {
        self.state = state;
        match transition {
            Transition::BecameOnline => self.connected_at = Some(Instant::now()),
            Transition::WentOffline => self.connected_at = None,
            Transition::StillOnline | Transition::StillOffline => {}
        }
    }
}
