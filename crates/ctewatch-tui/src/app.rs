//! Application core: event loop, action dispatch, footer and help overlay.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ctewatch_api::TelemetryClient;
use ctewatch_config::Config;
use ctewatch_core::{ConnectivityState, PollerConfig};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::run_data_bridge;
use crate::event::{Event, EventReader};
use crate::screens::dashboard::DashboardScreen;
use crate::theme;
use crate::tui::Tui;

const TICK_RATE: Duration = Duration::from_millis(250);
const RENDER_RATE: Duration = Duration::from_millis(50);

/// Dashboard content on top, one-line footer below.
pub fn split_frame(area: Rect) -> (Rect, Rect) {
    let [content, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    (content, footer)
}

pub struct App {
    screen: DashboardScreen,
    client: TelemetryClient,
    poller: PollerConfig,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    cancel: CancellationToken,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = config.to_transport_config()?;
        let client = TelemetryClient::new(&config.source.url, &transport)?;
        let poller = config.to_poller_config()?;
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Ok(Self {
            screen: DashboardScreen::new(config.resize_debounce()),
            client,
            poller,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            cancel: CancellationToken::new(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        let area = tui.area()?;
        self.action_tx.send(Action::Resize(area.width, area.height))?;

        let bridge = tokio::spawn(run_data_bridge(
            self.client.clone(),
            self.poller,
            self.action_tx.clone(),
            self.cancel.child_token(),
        ));
        let mut events = EventReader::new(TICK_RATE, RENDER_RATE);
        info!(base_url = %self.client.base_url(), "event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                if matches!(action, Action::Render) {
                    tui.draw(|frame| self.render(frame))?;
                } else {
                    self.process_action(&action)?;
                }
            }
        }

        events.stop();
        self.cancel.cancel();
        if let Err(e) = bridge.await {
            warn!(error = %e, "data bridge ended abnormally");
        }
        tui.exit();
        info!("event loop ended");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q') | KeyCode::Esc) => Ok(Some(Action::Quit)),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                Ok(Some(Action::ToggleHelp))
            }
            _ => self.screen.handle_key_event(key),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                debug!("quit requested");
                self.running = false;
            }
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            _ => {
                if let Some(follow_up) = self.screen.update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let (content, footer) = split_frame(area);
        self.screen.render(frame, content);
        self.render_footer(frame, footer);
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        match self.screen.state() {
            ConnectivityState::Online => {
                spans.push(Span::styled("● online", theme::online()));
            }
            ConnectivityState::Offline => {
                spans.push(Span::styled("○ offline", theme::offline()));
                if let Some(err) = self.screen.last_error() {
                    spans.push(Span::styled(
                        format!("  {}: {err}", err.endpoint()),
                        Style::default().fg(theme::OFFLINE_RED),
                    ));
                }
            }
        }
        spans.push(Span::styled("  │ ", theme::key_hint()));
        spans.push(Span::styled(self.client.base_url().as_str(), theme::key_hint()));
        spans.push(Span::styled("  │ ? help  q quit", theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 44u16.min(area.width.saturating_sub(4));
    let height = 10u16.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let popup = Rect::new(x, y, width, height);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(" Keys ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let lines = vec![
        Line::default(),
        key("q / Esc", "Quit"),
        key("Ctrl+c", "Quit"),
        key("?", "Toggle this help"),
        Line::default(),
        Line::styled("  Readouts show --- while the source", theme::key_hint()),
        Line::styled("  is unreachable.", theme::key_hint()),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
