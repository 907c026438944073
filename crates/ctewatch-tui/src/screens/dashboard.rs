//! The dashboard screen.
//!
//! ┌─ ctewatch ───────────────────────────────────────────────────┐
//! │ status · last update · uptime · active · traffic · success   │
//! └──────────────────────────────────────────────────────────────┘
//! ┌─ Server ──────┐┌─ Connections ────────┐┌─ Routing ──────────┐
//! │ uptime ring   ││ counts + success bar ││ bypass/tunnel donut│
//! └───────────────┘└──────────────────────┘└────────────────────┘
//! ┌─ Traffic ────────────────────────────┐┌─ Protocols ────────┐
//! │ sent / received + sparkline          ││ share bars         │
//! └──────────────────────────────────────┘└────────────────────┘
//! ┌─ Chaos ──────────────────────────────┐┌─ DNS Cache ────────┐
//! │ lyapunov · entropy · correlation     ││ hit-rate ring      │
//! └──────────────────────────────────────┘└────────────────────┘

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use ctewatch_core::{
    ArcSink, BarSink, ConnectivityState, CycleError, Dashboard, Debouncer, Padding, Surface,
    TextSink,
};

use crate::action::Action;
use crate::app::split_frame;
use crate::component::Component;
use crate::theme;
use crate::view::DashboardView;
use crate::widgets::bar::bar_spans;
use crate::widgets::ring::Ring;
use crate::widgets::series::SeriesChart;

/// Width reserved for a ring next to its readouts.
const RING_WIDTH: u16 = 16;

/// Sparkline padding, in braille dots.
const CHART_PADDING: Padding = Padding {
    top: 4.0,
    right: 2.0,
    bottom: 4.0,
    left: 2.0,
};

// ── Layout ──────────────────────────────────────────────────────────

pub struct Areas {
    pub header: Rect,
    pub server: Rect,
    pub connections: Rect,
    pub routing: Rect,
    pub traffic: Rect,
    pub protocols: Rect,
    pub chaos: Rect,
    pub dns: Rect,
}

pub fn layout(area: Rect) -> Areas {
    let [header, top, middle, bottom] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(8),
        Constraint::Min(8),
        Constraint::Length(8),
    ])
    .areas(area);
    let [server, connections, routing] = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ])
    .areas(top);
    let [traffic, protocols] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(middle);
    let [chaos, dns] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(bottom);

    Areas {
        header,
        server,
        connections,
        routing,
        traffic,
        protocols,
        chaos,
        dns,
    }
}

/// Split the traffic panel's inner area into the readout row and the chart.
fn traffic_rows(inner: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner)
}

/// Sparkline surface for a dashboard drawn into `content`, measured in
/// braille dots.
pub fn chart_surface(content: Rect) -> Surface {
    let inner = panel("").inner(layout(content).traffic);
    let [_, chart] = traffic_rows(inner);
    Surface::new(f64::from(chart.width) * 2.0, f64::from(chart.height) * 4.0)
        .with_padding(CHART_PADDING)
}

// ── Screen ──────────────────────────────────────────────────────────

pub struct DashboardScreen {
    dashboard: Dashboard<DashboardView>,
    debouncer: Debouncer,
    action_tx: Option<UnboundedSender<Action>>,
    /// The first resize is applied at once; later ones are debounced.
    sized: bool,
}

impl DashboardScreen {
    pub fn new(resize_debounce: Duration) -> Self {
        let mut dashboard = Dashboard::new(DashboardView::new());
        dashboard.init();
        Self {
            dashboard,
            debouncer: Debouncer::new(resize_debounce),
            action_tx: None,
            sized: false,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.dashboard.state()
    }

    pub fn last_error(&self) -> Option<&CycleError> {
        self.dashboard.last_error()
    }

    fn on_terminal_resize(&mut self, width: u16, height: u16) {
        let (content, _) = split_frame(Rect::new(0, 0, width, height));
        let surface = chart_surface(content);
        if surface == self.dashboard.sparkline().surface() {
            self.debouncer.cancel();
            return;
        }
        if !self.sized {
            self.sized = true;
            self.dashboard.resize(surface);
            return;
        }
        if let Some(tx) = self.action_tx.clone() {
            debug!(width, height, "scheduling chart resize");
            self.debouncer.schedule(async move {
                let _ = tx.send(Action::SurfaceResized(surface));
            });
        }
    }
}

impl Component for DashboardScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Cycle(report) => {
                self.dashboard.apply(report);
            }
            Action::Resize(w, h) => self.on_terminal_resize(*w, *h),
            Action::SurfaceResized(surface) => self.dashboard.resize(*surface),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let view = self.dashboard.presenter();
        let now = Instant::now();
        let areas = layout(area);

        render_header(frame, areas.header, view, now);
        render_server(frame, areas.server, view, now);
        render_connections(frame, areas.connections, view, now);
        render_routing(frame, areas.routing, view, now);
        self.render_traffic(frame, areas.traffic, view, now);
        render_protocols(frame, areas.protocols, view, now);
        render_chaos(frame, areas.chaos, view, now);
        render_dns(frame, areas.dns, view, now);
    }
}

impl DashboardScreen {
    fn render_traffic(&self, frame: &mut Frame, area: Rect, view: &DashboardView, now: Instant) {
        let block = panel("Traffic").title_top(badge(view, TextSink::HeaderTraffic, now));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [readouts, chart] = traffic_rows(inner);
        let line = Line::from(vec![
            Span::styled("↑ ", Style::default().fg(theme::SERIES_CYAN)),
            readout(view, TextSink::Sent, now),
            Span::styled("   ↓ ", Style::default().fg(theme::ONLINE_GREEN)),
            readout(view, TextSink::Received, now),
        ]);
        frame.render_widget(Paragraph::new(line), readouts);

        if let Some(series) = view.series() {
            frame.render_widget(
                SeriesChart::new(series, self.dashboard.sparkline().surface()),
                chart,
            );
        }
    }
}

// ── Pieces ──────────────────────────────────────────────────────────

fn panel(title: &str) -> Block<'_> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default())
        .title(Span::styled(format!(" {title} "), theme::title_style()))
}

/// A readout styled by state: placeholder, just changed, or steady.
fn readout(view: &DashboardView, sink: TextSink, now: Instant) -> Span<'_> {
    let style = if view.is_placeholder(sink) {
        theme::placeholder()
    } else if view.is_fresh(sink, now) {
        theme::value_updated()
    } else {
        theme::value()
    };
    Span::styled(view.text(sink), style)
}

/// `label   value` on one line, label from the sink's display name.
fn labelled(view: &DashboardView, sink: TextSink, now: Instant) -> Line<'_> {
    Line::from(vec![
        Span::styled(format!("{sink:<12}"), theme::label()),
        readout(view, sink, now),
    ])
}

/// Label and value for the narrow column beside a ring.
fn short_labelled<'a>(label: &'static str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![Span::styled(label, theme::label()), value])
}

/// Right-aligned panel badge.
fn badge(view: &DashboardView, sink: TextSink, now: Instant) -> Line<'_> {
    Line::from(vec![Span::raw(" "), readout(view, sink, now), Span::raw(" ")]).right_aligned()
}

fn bar_line(view: &DashboardView, sink: BarSink, width: u16, color: Color) -> Line<'static> {
    Line::from(bar_spans(view.bar(sink), width, color).to_vec())
}

fn ring_split(inner: Rect) -> [Rect; 2] {
    Layout::horizontal([Constraint::Length(RING_WIDTH), Constraint::Min(0)]).areas(inner)
}

fn status_style(state: ConnectivityState) -> Style {
    match state {
        ConnectivityState::Online => theme::online(),
        ConnectivityState::Offline => theme::offline(),
    }
}

// ── Sections ────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, view: &DashboardView, now: Instant) {
    let mut status = status_style(view.state());
    if view.is_pulsing(now) {
        status = status.add_modifier(Modifier::REVERSED);
    }
    let dot = match view.state() {
        ConnectivityState::Online => "● ",
        ConnectivityState::Offline => "○ ",
    };

    let mut spans = vec![
        Span::styled(dot, status),
        Span::styled(view.text(TextSink::Status), status),
    ];
    for (label, sink) in [
        ("Updated", TextSink::LastUpdate),
        ("Uptime", TextSink::HeaderUptime),
        ("Active", TextSink::HeaderActive),
        ("Traffic", TextSink::HeaderTraffic),
        ("Success", TextSink::HeaderSuccessRate),
    ] {
        spans.push(Span::styled(format!("   {label} "), theme::label()));
        spans.push(readout(view, sink, now));
    }

    let block = panel("ctewatch");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_server(frame: &mut Frame, area: Rect, view: &DashboardView, now: Instant) {
    let block = panel("Server");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [ring, details] = ring_split(inner);

    frame.render_widget(
        Ring::new(view.arc(ArcSink::Uptime), theme::ONLINE_GREEN)
            .label(readout(view, TextSink::Uptime, now)),
        ring,
    );

    let server = Span::styled(
        view.text(TextSink::ServerStatus),
        status_style(view.state()),
    );
    let lines = vec![
        short_labelled("Status ", server),
        short_labelled("Up     ", readout(view, TextSink::Uptime, now)),
        short_labelled("Clock  ", readout(view, TextSink::HeaderUptime, now)),
    ];
    frame.render_widget(Paragraph::new(lines), details);
}

fn render_connections(frame: &mut Frame, area: Rect, view: &DashboardView, now: Instant) {
    let block = panel("Connections").title_top(badge(view, TextSink::ActiveBadge, now));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bar_width = inner.width.saturating_sub(6);
    let mut bar = bar_line(view, BarSink::ConnectionSuccess, bar_width, theme::ONLINE_GREEN);
    bar.push_span(Span::raw(" "));
    bar.push_span(readout(view, TextSink::ConnectionRateLabel, now));

    let lines = vec![
        labelled(view, TextSink::TotalConnections, now),
        labelled(view, TextSink::SuccessfulConnections, now),
        labelled(view, TextSink::FailedConnections, now),
        Line::default(),
        bar,
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_routing(frame: &mut Frame, area: Rect, view: &DashboardView, now: Instant) {
    let block = panel("Routing");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [ring, details] = ring_split(inner);

    frame.render_widget(
        Ring::donut(
            (view.arc(ArcSink::Bypassed), theme::AMBER),
            (view.arc(ArcSink::Tunneled), theme::TUNNEL_BLUE),
        )
        .label(readout(view, TextSink::RoutingTotal, now)),
        ring,
    );

    let legend = |sink: TextSink, color: Color| {
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::styled(format!("{sink:<10}"), theme::label()),
            readout(view, sink, now),
        ])
    };
    let lines = vec![
        legend(TextSink::Bypassed, theme::AMBER),
        legend(TextSink::Tunneled, theme::TUNNEL_BLUE),
    ];
    frame.render_widget(Paragraph::new(lines), details);
}

fn render_protocols(frame: &mut Frame, area: Rect, view: &DashboardView, now: Instant) {
    let block = panel("Protocols");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::with_capacity(6);
    for (text, bar) in [
        (TextSink::Http, BarSink::Http),
        (TextSink::Socks5, BarSink::Socks5),
        (TextSink::Shadowsocks, BarSink::Shadowsocks),
    ] {
        lines.push(labelled(view, text, now));
        lines.push(bar_line(view, bar, inner.width, theme::SERIES_CYAN));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_chaos(frame: &mut Frame, area: Rect, view: &DashboardView, now: Instant) {
    let block = panel("Chaos").title_top(badge(view, TextSink::SamplesBadge, now));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(inner);
    for (cell, (text, arc, title)) in cells.into_iter().zip([
        (TextSink::Lyapunov, ArcSink::Lyapunov, "Lyapunov"),
        (TextSink::Entropy, ArcSink::Entropy, "Entropy"),
        (TextSink::Correlation, ArcSink::Correlation, "Correlation"),
    ]) {
        frame.render_widget(
            Ring::new(view.arc(arc), theme::CHAOS_VIOLET)
                .label(readout(view, text, now))
                .block(Block::new().title(Line::styled(title, theme::label()).centered())),
            cell,
        );
    }
}

fn render_dns(frame: &mut Frame, area: Rect, view: &DashboardView, now: Instant) {
    let block = panel("DNS Cache").title_top(badge(view, TextSink::CacheSizeBadge, now));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [ring, details] = ring_split(inner);

    frame.render_widget(
        Ring::new(view.arc(ArcSink::HitRate), theme::SERIES_CYAN)
            .label(readout(view, TextSink::HitRate, now)),
        ring,
    );
    let lines = vec![
        labelled(view, TextSink::HitRate, now),
        labelled(view, TextSink::CacheHits, now),
        labelled(view, TextSink::CacheMisses, now),
    ];
    frame.render_widget(Paragraph::new(lines), details);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Local;
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    use ctewatch_api::Endpoint;
    use ctewatch_core::{
        ConnectionCounts, CycleReport, StatsSnapshot, Telemetry, TrafficCounts,
    };

    use super::*;

    fn healthy(cycle: u64) -> Action {
        let telemetry = Telemetry {
            stats: StatsSnapshot {
                uptime: 90061.0,
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
            chaos: ctewatch_core::ChaosSnapshot::default(),
            cache: ctewatch_core::CacheSnapshot::default(),
            fetched_at: Local::now(),
        };
        Action::Cycle(Box::new(CycleReport {
            cycle,
            result: Ok(telemetry),
        }))
    }

    fn failed(cycle: u64) -> Action {
        Action::Cycle(Box::new(CycleReport {
            cycle,
            result: Err(CycleError::Transport {
                endpoint: Endpoint::Chaos,
                message: "HTTP 503".into(),
            }),
        }))
    }

    fn draw(screen: &DashboardScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn starts_offline_with_placeholders() {
        let screen = DashboardScreen::new(Duration::from_millis(100));
        let text = draw(&screen);
        assert!(text.contains("Offline"));
        assert!(text.contains("OFFLINE"));
        assert!(text.contains("---"));
        assert!(text.contains("No Data"));
        assert_eq!(screen.state(), ConnectivityState::Offline);
    }

    #[test]
    fn healthy_cycle_fills_readouts() {
        let mut screen = DashboardScreen::new(Duration::from_millis(100));
        screen.update(&healthy(1)).unwrap();
        let text = draw(&screen);
        assert!(text.contains("Connected"));
        assert!(text.contains("RUNNING"));
        assert!(text.contains("95.0%"));
        assert!(text.contains("2.00 KB"));
        assert!(text.contains("5 active"));
        assert!(text.contains("Collecting data..."));
    }

    #[test]
    fn server_details_fit_beside_the_ring() {
        let mut screen = DashboardScreen::new(Duration::from_millis(100));
        let text = draw(&screen);
        assert!(text.contains("Status OFFLINE"), "{text}");
        assert!(text.contains("Clock  ---"), "{text}");

        screen.update(&healthy(1)).unwrap();
        let text = draw(&screen);
        assert!(text.contains("Status RUNNING"), "{text}");
        assert!(text.contains("Up     1d 1h"), "{text}");
        assert!(text.contains("Clock  25:01:01"), "{text}");
    }

    #[test]
    fn failure_blanks_everything_again() {
        let mut screen = DashboardScreen::new(Duration::from_millis(100));
        screen.update(&healthy(1)).unwrap();
        screen.update(&healthy(2)).unwrap();
        screen.update(&failed(3)).unwrap();

        let text = draw(&screen);
        assert!(text.contains("Offline"));
        assert!(!text.contains("95.0%"));
        assert!(text.contains("No Data"));
        assert_eq!(
            screen.last_error().map(CycleError::endpoint),
            Some(Endpoint::Chaos)
        );
    }

    #[test]
    fn chart_surface_tracks_the_traffic_panel() {
        let (content, _) = split_frame(Rect::new(0, 0, 120, 40));
        let surface = chart_surface(content);
        let areas = layout(content);
        // Borders take one cell per side; the readout row takes one line.
        assert_eq!(surface.width, f64::from(areas.traffic.width - 2) * 2.0);
        assert_eq!(surface.height, f64::from(areas.traffic.height - 3) * 4.0);
        assert_eq!(surface.padding, CHART_PADDING);
    }

    #[tokio::test(start_paused = true)]
    async fn later_resizes_are_debounced() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = DashboardScreen::new(Duration::from_millis(100));
        screen.init(tx).unwrap();

        // First size lands immediately.
        screen.update(&Action::Resize(120, 40)).unwrap();
        let (content, _) = split_frame(Rect::new(0, 0, 120, 40));
        assert_eq!(screen.dashboard.sparkline().surface(), chart_surface(content));

        // A burst of resizes produces one surface change, for the last size.
        screen.update(&Action::Resize(100, 40)).unwrap();
        screen.update(&Action::Resize(140, 45)).unwrap();
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(150)).await;
        let action = rx.recv().await.unwrap();
        let Action::SurfaceResized(surface) = action else {
            panic!("expected SurfaceResized, got {action:?}");
        };
        let (content, _) = split_frame(Rect::new(0, 0, 140, 45));
        assert_eq!(surface, chart_surface(content));
        assert!(rx.try_recv().is_err());

        screen.update(&Action::SurfaceResized(surface)).unwrap();
        assert_eq!(screen.dashboard.sparkline().surface(), surface);
    }
}
