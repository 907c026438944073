// ── Dashboard state object ──
//
// Single owner of connectivity and sparkline state. Cycle outcomes are
// applied here, one at a time, and rendered through a `Presenter`. Nothing
// in this module is shared across tasks.

use chrono::{DateTime, Local};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::connectivity::{Connectivity, ConnectivityState, Transition};
use crate::encode::{self, ArcGeometry, Donut};
use crate::error::CycleError;
use crate::format::{self, PLACEHOLDER};
use crate::history::TrafficHistory;
use crate::model::{CacheSnapshot, ChaosSnapshot, StatsSnapshot, Telemetry};
use crate::poller::CycleReport;
use crate::presenter::{ArcSink, BarSink, Presenter, TextSink};
use crate::sparkline::{Sparkline, Surface};

pub const SERVER_RUNNING: &str = "RUNNING";
pub const SERVER_OFFLINE: &str = "OFFLINE";

pub struct Dashboard<P> {
    presenter: P,
    connectivity: Connectivity,
    sparkline: Sparkline,
    last_error: Option<CycleError>,
    last_update: Option<DateTime<Local>>,
}

impl<P: Presenter> Dashboard<P> {
    pub fn new(presenter: P) -> Self {
        Self::with_surface(presenter, Surface::default())
    }

    pub fn with_surface(presenter: P, surface: Surface) -> Self {
        Self {
            presenter,
            connectivity: Connectivity::new(),
            sparkline: Sparkline::new(surface),
            last_error: None,
            last_update: None,
        }
    }

    /// Paint the initial offline state before the first cycle lands.
    pub fn init(&mut self) {
        self.show_offline();
        self.presenter
            .set_connectivity(self.connectivity.state(), Transition::StillOffline);
    }

    // ── Cycle outcomes ───────────────────────────────────────────────

    /// Apply one poll cycle's outcome.
    pub fn apply(&mut self, report: &CycleReport) -> Transition {
        match &report.result {
            Ok(telemetry) => self.on_success(telemetry),
            Err(err) => self.on_failure(err.clone()),
        }
    }

    pub fn on_success(&mut self, telemetry: &Telemetry) -> Transition {
        let transition = self.connectivity.on_success();
        if transition == Transition::BecameOnline {
            info!("telemetry source online");
            self.presenter
                .set_text(TextSink::Status, self.connectivity.status_label().into());
        }
        self.last_error = None;
        self.last_update = Some(telemetry.fetched_at);

        self.presenter.set_text(
            TextSink::LastUpdate,
            format::fmt_clock_time(&telemetry.fetched_at),
        );
        self.update_stats(&telemetry.stats);
        self.update_chaos(&telemetry.chaos);
        self.update_cache(&telemetry.cache);

        self.presenter
            .set_connectivity(self.connectivity.state(), transition);
        transition
    }

    pub fn on_failure(&mut self, err: CycleError) -> Transition {
        let transition = self.connectivity.on_failure();
        if transition == Transition::WentOffline {
            info!(error = %err, "telemetry source offline");
        } else {
            debug!(error = %err, "telemetry source still offline");
        }
        self.last_error = Some(err);
        self.show_offline();
        self.presenter
            .set_connectivity(self.connectivity.state(), transition);
        transition
    }

    // ── Section updaters ─────────────────────────────────────────────

    fn update_stats(&mut self, stats: &StatsSnapshot) {
        let p = &mut self.presenter;

        // Server and uptime
        p.set_text(TextSink::ServerStatus, SERVER_RUNNING.into());
        p.set_text(TextSink::HeaderUptime, format::fmt_uptime_clock(stats.uptime));
        p.set_text(TextSink::Uptime, format::fmt_uptime(stats.uptime));
        p.set_arc_geometry(
            ArcSink::Uptime,
            ArcGeometry::ring(
                encode::uptime_day_fill(stats.uptime),
                ArcSink::Uptime.circumference(),
            ),
        );

        // Connections
        let conns = stats.connections;
        let rate = encode::success_rate(conns.success, conns.total);
        p.set_text(TextSink::HeaderActive, format::fmt_count(conns.active));
        p.set_text(TextSink::HeaderSuccessRate, format::fmt_percent(rate, 1));
        p.set_text(TextSink::ActiveBadge, format!("{} active", conns.active));
        p.set_text(TextSink::TotalConnections, format::fmt_count(conns.total));
        p.set_text(
            TextSink::SuccessfulConnections,
            format::fmt_count(conns.success),
        );
        p.set_text(TextSink::FailedConnections, format::fmt_count(conns.failed));
        p.set_bar_fill(BarSink::ConnectionSuccess, encode::bar_fill(rate));
        p.set_text(TextSink::ConnectionRateLabel, format::fmt_percent(rate, 0));

        // Traffic
        let traffic = stats.traffic;
        p.set_text(TextSink::HeaderTraffic, format::fmt_bytes(traffic.total));
        p.set_text(TextSink::Sent, format::fmt_bytes(traffic.sent));
        p.set_text(TextSink::Received, format::fmt_bytes(traffic.received));
        let frame = self.sparkline.push(traffic.total);
        p.draw_series(frame);

        // Routing
        let routing = stats.routing;
        p.set_text(TextSink::RoutingTotal, format::fmt_count(routing.total()));
        p.set_text(TextSink::Bypassed, format::fmt_count(routing.bypassed));
        p.set_text(TextSink::Tunneled, format::fmt_count(routing.tunneled));
        let donut = Donut::split(
            routing.bypassed,
            routing.tunneled,
            ArcSink::Bypassed.circumference(),
        );
        p.set_arc_geometry(ArcSink::Bypassed, donut.a);
        p.set_arc_geometry(ArcSink::Tunneled, donut.b);

        // Protocols
        let protocols = stats.protocols;
        let sum = protocols.total();
        for (text, bar, count) in [
            (TextSink::Http, BarSink::Http, protocols.http),
            (TextSink::Socks5, BarSink::Socks5, protocols.socks5),
            (TextSink::Shadowsocks, BarSink::Shadowsocks, protocols.shadowsocks),
        ] {
            p.set_text(text, format::fmt_count(count));
            p.set_bar_fill(bar, encode::bar_fill(encode::protocol_share(count, sum)));
        }
    }

    fn update_chaos(&mut self, chaos: &ChaosSnapshot) {
        let p = &mut self.presenter;
        p.set_text(
            TextSink::SamplesBadge,
            format!("{} samples", format::fmt_count(chaos.samples_collected)),
        );
        for (text, arc, value, decimals, fill) in [
            (
                TextSink::Lyapunov,
                ArcSink::Lyapunov,
                chaos.lyapunov_exponent,
                3,
                encode::lyapunov_fill(chaos.lyapunov_exponent),
            ),
            (
                TextSink::Entropy,
                ArcSink::Entropy,
                chaos.shannon_entropy,
                2,
                encode::entropy_fill(chaos.shannon_entropy),
            ),
            (
                TextSink::Correlation,
                ArcSink::Correlation,
                chaos.correlation_dimension,
                3,
                encode::correlation_fill(chaos.correlation_dimension),
            ),
        ] {
            p.set_text(text, encode::fmt_stat(value, decimals));
            p.set_arc_geometry(arc, ArcGeometry::ring(fill, arc.circumference()));
        }
    }

    fn update_cache(&mut self, cache: &CacheSnapshot) {
        let p = &mut self.presenter;
        let hit_rate =
            encode::cache_hit_rate(cache.cache_hits, cache.cache_misses, cache.hit_rate.as_deref());
        p.set_text(
            TextSink::CacheSizeBadge,
            format!("{} entries", format::fmt_count(cache.cache_size)),
        );
        p.set_text(TextSink::HitRate, format::fmt_percent(hit_rate, 1));
        p.set_text(TextSink::CacheHits, format::fmt_count(cache.cache_hits));
        p.set_text(TextSink::CacheMisses, format::fmt_count(cache.cache_misses));
        p.set_arc_geometry(
            ArcSink::HitRate,
            ArcGeometry::ring(hit_rate, ArcSink::HitRate.circumference()),
        );
    }

    // ── Degraded path ────────────────────────────────────────────────

    /// Blank every readout, zero every gauge and clear the sparkline.
    fn show_offline(&mut self) {
        let p = &mut self.presenter;
        for sink in TextSink::iter().filter(|s| !s.is_status_label()) {
            p.set_text(sink, PLACEHOLDER.into());
        }
        p.set_text(
            TextSink::Status,
            self.connectivity.status_label().into(),
        );
        p.set_text(TextSink::ServerStatus, SERVER_OFFLINE.into());
        for sink in BarSink::iter() {
            p.set_bar_fill(sink, 0.0);
        }
        for sink in ArcSink::iter() {
            p.set_arc_geometry(sink, ArcGeometry::empty(sink.circumference()));
        }
        let frame = self.sparkline.clear();
        p.draw_series(frame);
    }

    /// Re-render the sparkline on a new surface.
    pub fn resize(&mut self, surface: Surface) {
        let frame = self.sparkline.resize(surface);
        self.presenter.draw_series(frame);
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> ConnectivityState {
        self.connectivity.state()
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    pub fn history(&self) -> &TrafficHistory {
        self.sparkline.history()
    }

    pub fn sparkline(&self) -> &Sparkline {
        &self.sparkline
    }

    /// Why the most recent cycle failed, if it did.
    pub fn last_error(&self) -> Option<&CycleError> {
        self.last_error.as_ref()
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ctewatch_api::Endpoint;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ConnectionCounts, RoutingCounts, TrafficCounts};
    use crate::presenter::RecordingPresenter;
    use crate::sparkline::{NO_DATA_LABEL, SparklineFrame};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 1, h, m, s)
            .earliest()
            .expect("valid local time")
    }

    fn telemetry() -> Telemetry {
        Telemetry {
            stats: StatsSnapshot {
                uptime: 3725.0,
                connections: ConnectionCounts {
                    active: 5,
                    total: 100,
                    success: 95,
                    failed: 5,
                },
                traffic: TrafficCounts {
                    sent: 1536,
                    received: 512,
                    total: 2048,
                },
                ..StatsSnapshot::default()
            },
            chaos: ChaosSnapshot {
                lyapunov_exponent: 0.4213,
                shannon_entropy: 6.0,
                correlation_dimension: -1.5,
                samples_collected: 1500,
            },
            cache: CacheSnapshot {
                cache_size: 12,
                cache_hits: 3,
                cache_misses: 1,
                hit_rate: None,
            },
            fetched_at: at(14, 5, 9),
        }
    }

    fn transport_error() -> CycleError {
        CycleError::Transport {
            endpoint: Endpoint::Chaos,
            message: "connection refused".into(),
        }
    }

    fn online_dashboard() -> Dashboard<RecordingPresenter> {
        let mut dash = Dashboard::new(RecordingPresenter::new());
        dash.init();
        dash.on_success(&telemetry());
        dash
    }

    #[test]
    fn init_paints_offline() {
        let mut dash = Dashboard::new(RecordingPresenter::new());
        dash.init();
        let p = dash.presenter();
        assert_eq!(p.text(TextSink::Status), Some("Offline"));
        assert_eq!(p.text(TextSink::ServerStatus), Some(SERVER_OFFLINE));
        assert_eq!(p.text(TextSink::Sent), Some(PLACEHOLDER));
        assert_eq!(p.frame().and_then(SparklineFrame::label), Some(NO_DATA_LABEL));
        assert_eq!(dash.state(), ConnectivityState::Offline);
    }

    #[test]
    fn connection_success_rate() {
        let dash = online_dashboard();
        let p = dash.presenter();
        assert_eq!(p.text(TextSink::HeaderSuccessRate), Some("95.0%"));
        assert_eq!(p.text(TextSink::ConnectionRateLabel), Some("95%"));
        assert_eq!(p.text(TextSink::ActiveBadge), Some("5 active"));
        assert_eq!(p.bar(BarSink::ConnectionSuccess), Some(95.0));
    }

    #[test]
    fn traffic_total_readout() {
        let dash = online_dashboard();
        let p = dash.presenter();
        assert_eq!(p.text(TextSink::HeaderTraffic), Some("2.00 KB"));
        assert_eq!(p.text(TextSink::Sent), Some("1.50 KB"));
        assert_eq!(p.text(TextSink::Received), Some("512.00 B"));
        assert_eq!(dash.history().as_vec(), vec![2048]);
    }

    #[test]
    fn empty_routing_draws_empty_donut() {
        let dash = online_dashboard();
        let p = dash.presenter();
        assert_eq!(p.text(TextSink::RoutingTotal), Some("0"));
        assert_eq!(
            p.arc(ArcSink::Bypassed).map(|a| a.dasharray()).as_deref(),
            Some("0 377")
        );
        assert_eq!(
            p.arc(ArcSink::Tunneled).map(|a| a.dasharray()).as_deref(),
            Some("0 377")
        );
    }

    #[test]
    fn routing_donut_offsets_second_segment() {
        let mut dash = online_dashboard();
        let mut t = telemetry();
        t.stats.routing = RoutingCounts {
            bypassed: 1,
            tunneled: 3,
        };
        dash.on_success(&t);
        let p = dash.presenter();
        let bypassed = p.arc(ArcSink::Bypassed).expect("bypassed arc");
        let tunneled = p.arc(ArcSink::Tunneled).expect("tunneled arc");
        assert!((bypassed.dash - 94.25).abs() < 1e-9);
        assert!((tunneled.offset + 94.25).abs() < 1e-9);
        assert_eq!(p.text(TextSink::RoutingTotal), Some("4"));
    }

    #[test]
    fn failure_blanks_every_section() {
        let mut dash = online_dashboard();
        let transition = dash.on_failure(transport_error());
        assert_eq!(transition, Transition::WentOffline);

        let p = dash.presenter();
        for sink in TextSink::iter().filter(|s| !s.is_status_label()) {
            assert_eq!(p.text(sink), Some(PLACEHOLDER), "{sink} not blanked");
        }
        assert_eq!(p.text(TextSink::Status), Some("Offline"));
        assert_eq!(p.text(TextSink::ServerStatus), Some(SERVER_OFFLINE));
        for sink in BarSink::iter() {
            assert_eq!(p.bar(sink), Some(0.0));
        }
        for sink in ArcSink::iter() {
            let arc = p.arc(sink).expect("arc written");
            assert_eq!(arc.dash, 0.0);
            assert_eq!(arc.remaining(), sink.circumference());
        }
        assert!(dash.history().is_empty());
        assert_eq!(dash.last_error(), Some(&transport_error()));
    }

    #[test]
    fn forty_five_cycles_keep_last_forty() {
        let mut dash = Dashboard::new(RecordingPresenter::new());
        let mut t = telemetry();
        for total in 1..=45 {
            t.stats.traffic.total = total * 100;
            dash.on_success(&t);
        }
        let expected: Vec<u64> = (6..=45).map(|v| v * 100).collect();
        assert_eq!(dash.history().as_vec(), expected);
    }

    #[test]
    fn hit_rate_from_counters() {
        let dash = online_dashboard();
        let p = dash.presenter();
        assert_eq!(p.text(TextSink::HitRate), Some("75.0%"));
        assert_eq!(p.text(TextSink::CacheSizeBadge), Some("12 entries"));
        let ring = p.arc(ArcSink::HitRate).expect("hit-rate ring");
        assert!((ring.dash - 245.25).abs() < 1e-9);
    }

    #[test]
    fn precomputed_hit_rate_wins() {
        let mut dash = Dashboard::new(RecordingPresenter::new());
        let mut t = telemetry();
        t.cache.hit_rate = Some("12.5%".into());
        dash.on_success(&t);
        assert_eq!(dash.presenter().text(TextSink::HitRate), Some("12.5%"));
    }

    #[test]
    fn chaos_readouts_and_rings() {
        let dash = online_dashboard();
        let p = dash.presenter();
        assert_eq!(p.text(TextSink::Lyapunov), Some("0.421"));
        assert_eq!(p.text(TextSink::Entropy), Some("6.00"));
        assert_eq!(p.text(TextSink::Correlation), Some("-1.500"));
        assert_eq!(p.text(TextSink::SamplesBadge), Some("1.5K samples"));
        let entropy = p.arc(ArcSink::Entropy).expect("entropy ring");
        assert!((entropy.dash - 165.0).abs() < 1e-9);
    }

    #[test]
    fn header_and_server_readouts() {
        let dash = online_dashboard();
        let p = dash.presenter();
        assert_eq!(p.text(TextSink::Status), Some("Connected"));
        assert_eq!(p.text(TextSink::ServerStatus), Some(SERVER_RUNNING));
        assert_eq!(p.text(TextSink::LastUpdate), Some("14:05:09"));
        assert_eq!(p.text(TextSink::HeaderUptime), Some("1:02:05"));
        assert_eq!(p.text(TextSink::Uptime), Some("1h 2m"));
        assert_eq!(dash.last_update(), Some(at(14, 5, 9)));
    }

    #[test]
    fn unknown_uptime_reads_placeholder() {
        for uptime in [None, Some(0.0), Some(-5.0)] {
            let mut t = telemetry();
            t.stats = ctewatch_api::StatsResponse {
                uptime,
                ..Default::default()
            }
            .into();
            let mut dash = Dashboard::new(RecordingPresenter::new());
            dash.init();
            dash.on_success(&t);
            let p = dash.presenter();
            assert_eq!(p.text(TextSink::Uptime), Some(PLACEHOLDER), "{uptime:?}");
            assert_eq!(p.text(TextSink::HeaderUptime), Some(PLACEHOLDER), "{uptime:?}");
        }
    }

    #[test]
    fn connected_pulse_fires_once_per_recovery() {
        let mut dash = Dashboard::new(RecordingPresenter::new());
        dash.init();
        assert_eq!(dash.on_success(&telemetry()), Transition::BecameOnline);
        assert_eq!(dash.on_success(&telemetry()), Transition::StillOnline);
        assert_eq!(dash.on_success(&telemetry()), Transition::StillOnline);
        assert_eq!(dash.presenter().pulses(), 1);

        dash.on_failure(transport_error());
        assert_eq!(dash.on_failure(transport_error()), Transition::StillOffline);
        dash.on_success(&telemetry());
        assert_eq!(dash.presenter().pulses(), 2);
        assert_eq!(dash.last_error(), None);
    }

    #[test]
    fn resize_redraws_from_history() {
        let mut dash = online_dashboard();
        dash.on_success(&telemetry());
        let drawn = dash.presenter().frames_drawn();
        dash.resize(Surface::new(120.0, 40.0));
        assert_eq!(dash.presenter().frames_drawn(), drawn + 1);
        assert!(!dash.sparkline().frame().is_placeholder());
        assert_eq!(dash.sparkline().surface(), Surface::new(120.0, 40.0));
    }
}
