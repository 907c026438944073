//! Block-character progress bars.

use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::theme;

/// Split `width` cells into filled/empty runs for `pct` (clamped).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn fmt_pct_bar(pct: f64, width: u16) -> (String, String) {
    let clamped = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((clamped / 100.0) * f64::from(width)).round() as u16;
    let empty = width.saturating_sub(filled);
    (
        "█".repeat(usize::from(filled)),
        "░".repeat(usize::from(empty)),
    )
}

/// Filled run in `color`, remainder on the dim track.
pub fn bar_spans(pct: f64, width: u16, color: Color) -> [Span<'static>; 2] {
    let (filled, empty) = fmt_pct_bar(pct, width);
    [
        Span::styled(filled, Style::default().fg(color)),
        Span::styled(empty, Style::default().fg(theme::TRACK)),
    ]
}
