//! Dashboard palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ─────────────────────────────────────────────────────────

pub const ONLINE_GREEN: Color = Color::Rgb(0, 229, 160); // #00e5a0
pub const OFFLINE_RED: Color = Color::Rgb(255, 69, 96); // #ff4560
pub const SERIES_CYAN: Color = Color::Rgb(0, 212, 255); // #00d4ff
pub const CHAOS_VIOLET: Color = Color::Rgb(168, 85, 247); // #a855f7
pub const AMBER: Color = Color::Rgb(255, 184, 0); // #ffb800
pub const TUNNEL_BLUE: Color = Color::Rgb(59, 130, 246); // #3b82f6

pub const TEXT: Color = Color::Rgb(226, 232, 240); // #e2e8f0
pub const MUTED: Color = Color::Rgb(100, 116, 139); // #64748b
pub const PLACEHOLDER: Color = Color::Rgb(61, 79, 106); // #3d4f6a
pub const TRACK: Color = Color::Rgb(30, 41, 59); // #1e293b
pub const BG_DARK: Color = Color::Rgb(10, 14, 23); // #0a0e17

/// Blend `color` toward the background. `alpha` 1.0 keeps the color,
/// 0.0 gives the background.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn fade(color: Color, alpha: f64) -> Color {
    let (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) = (color, BG_DARK) else {
        return color;
    };
    let a = alpha.clamp(0.0, 1.0);
    let mix = |c: u8, base: u8| (f64::from(base) + (f64::from(c) - f64::from(base)) * a).round() as u8;
    Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
}

// ── Semantic Styles ─────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(SERIES_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

/// Help overlay and other popups.
pub fn border_focused() -> Style {
    Style::default().fg(SERIES_CYAN)
}

pub fn label() -> Style {
    Style::default().fg(MUTED)
}

/// A live readout value.
pub fn value() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

/// A readout that changed within the highlight window.
pub fn value_updated() -> Style {
    Style::default()
        .fg(SERIES_CYAN)
        .add_modifier(Modifier::BOLD)
}

/// The `---` placeholder shown while offline.
pub fn placeholder() -> Style {
    Style::default().fg(PLACEHOLDER)
}

pub fn online() -> Style {
    Style::default().fg(ONLINE_GREEN).add_modifier(Modifier::BOLD)
}

pub fn offline() -> Style {
    Style::default().fg(OFFLINE_RED).add_modifier(Modifier::BOLD)
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(SERIES_CYAN).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_endpoints() {
        assert_eq!(fade(SERIES_CYAN, 1.0), SERIES_CYAN);
        assert_eq!(fade(SERIES_CYAN, 0.0), BG_DARK);
        assert_eq!(fade(Color::Reset, 0.5), Color::Reset);
    }
}
