//! Ring gauges and two-segment donuts drawn on a braille canvas.
//!
//! An [`ArcGeometry`] is a dash on a circular track: `dash` out of
//! `circumference`, starting `-offset` along the track. The track starts at
//! twelve o'clock and runs clockwise.

use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Paragraph, Widget};

use ctewatch_core::ArcGeometry;

use crate::theme;

const RADIUS: f64 = 0.9;
/// Samples for a full turn; partial arcs use a proportional share.
const STEPS_PER_TURN: f64 = 240.0;

/// Canvas points along `arc` on an ellipse with radii `(rx, ry)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
pub fn arc_points(arc: &ArcGeometry, rx: f64, ry: f64) -> Vec<(f64, f64)> {
    let sweep = arc.fraction();
    if sweep <= 0.0 {
        return Vec::new();
    }
    let start = if arc.circumference > 0.0 {
        -arc.offset / arc.circumference
    } else {
        0.0
    };
    let steps = (sweep * STEPS_PER_TURN).ceil().max(2.0) as usize;
    (0..=steps)
        .map(|i| {
            let t = start + sweep * (i as f64 / steps as f64);
            let angle = FRAC_PI_2 - TAU * t;
            (rx * angle.cos(), ry * angle.sin())
        })
        .collect()
}

pub struct Ring<'a> {
    segments: Vec<(ArcGeometry, Color)>,
    label: Option<Line<'a>>,
    block: Option<Block<'a>>,
}

impl<'a> Ring<'a> {
    pub fn new(arc: ArcGeometry, color: Color) -> Self {
        Self {
            segments: vec![(arc, color)],
            label: None,
            block: None,
        }
    }

    /// Two segments sharing one track.
    pub fn donut(a: (ArcGeometry, Color), b: (ArcGeometry, Color)) -> Self {
        Self {
            segments: vec![a, b],
            label: None,
            block: None,
        }
    }

    /// Text drawn across the middle of the ring.
    pub fn label(mut self, label: impl Into<Line<'a>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for Ring<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Braille dots are 2x4 per cell; stretch the bounds so the ring
        // stays round on the wider axis.
        let (w, h) = (f64::from(inner.width) * 2.0, f64::from(inner.height) * 4.0);
        let (xr, yr) = if w >= h { (w / h, 1.0) } else { (1.0, h / w) };

        let track = arc_points(&ArcGeometry::ring(100.0, 1.0), RADIUS, RADIUS);
        let arcs: Vec<(Vec<(f64, f64)>, Color)> = self
            .segments
            .iter()
            .map(|(arc, color)| (arc_points(arc, RADIUS, RADIUS), *color))
            .collect();

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-xr, xr])
            .y_bounds([-yr, yr])
            .paint(|ctx| {
                ctx.draw(&Points {
                    coords: &track,
                    color: theme::TRACK,
                });
                for (coords, color) in &arcs {
                    ctx.draw(&Points {
                        coords,
                        color: *color,
                    });
                }
            })
            .render(inner, buf);

        if let Some(label) = self.label {
            let row = Rect {
                y: inner.y + inner.height / 2,
                height: 1,
                ..inner
            };
            Paragraph::new(label)
                .alignment(Alignment::Center)
                .render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn empty_arc_has_no_points() {
        assert!(arc_points(&ArcGeometry::empty(220.0), 1.0, 1.0).is_empty());
    }

    #[test]
    fn quarter_arc_runs_clockwise_from_top() {
        let pts = arc_points(&ArcGeometry::ring(25.0, 283.0), 1.0, 1.0);
        assert!(close(pts[0], (0.0, 1.0)));
        assert!(close(pts[pts.len() - 1], (1.0, 0.0)));
    }

    #[test]
    fn offset_segment_starts_where_previous_ends() {
        let donut = ctewatch_core::Donut::split(1, 1, 377.0);
        let a = arc_points(&donut.a, 1.0, 1.0);
        let b = arc_points(&donut.b, 1.0, 1.0);
        // A ends at six o'clock; B picks up there and returns to the top.
        assert!(close(a[a.len() - 1], (0.0, -1.0)));
        assert!(close(b[0], (0.0, -1.0)));
        assert!(close(b[b.len() - 1], (0.0, 1.0)));
    }

    #[test]
    fn renders_label_in_the_middle_row() {
        let area = Rect::new(0, 0, 12, 5);
        let mut buf = Buffer::empty(area);
        Ring::new(ArcGeometry::ring(50.0, 283.0), theme::ONLINE_GREEN)
            .label("1d 1h")
            .render(area, &mut buf);
        let middle: String = (0..area.width)
            .map(|x| buf[(x, 2)].symbol().to_string())
            .collect();
        assert!(middle.contains("1d 1h"), "middle row: {middle:?}");
    }
}
