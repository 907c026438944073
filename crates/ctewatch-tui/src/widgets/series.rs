//! Traffic sparkline: a [`SparklineFrame`] drawn on a braille canvas whose
//! bounds are the frame's [`Surface`]. Surface `y` grows downward, canvas
//! `y` grows upward, so every point is flipped on the way in.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Paragraph, Widget};

use ctewatch_core::format::fmt_bytes;
use ctewatch_core::sparkline::Fade;
use ctewatch_core::{Point, SparklineFrame, Surface};

use crate::theme;

/// Opacity steps used to approximate the gradient under the line.
const FADE_BANDS: usize = 4;

pub struct SeriesChart<'a> {
    frame: &'a SparklineFrame,
    surface: Surface,
    block: Option<Block<'a>>,
}

impl<'a> SeriesChart<'a> {
    pub fn new(frame: &'a SparklineFrame, surface: Surface) -> Self {
        Self {
            frame,
            surface,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Fill points under `line` down to `baseline`, sampled every `(dx, dy)`
/// surface units and grouped into opacity bands by `fade`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
pub fn area_bands(
    line: &[Point],
    baseline: f64,
    fade: &Fade,
    dx: f64,
    dy: f64,
) -> [Vec<(f64, f64)>; FADE_BANDS] {
    let mut bands: [Vec<(f64, f64)>; FADE_BANDS] = Default::default();
    if dx <= 0.0 || dy <= 0.0 || fade.top_alpha <= 0.0 {
        return bands;
    }
    let top_band = (FADE_BANDS - 1) as f64;

    for pair in line.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let span = b.x - a.x;
        let mut x = a.x;
        while x < b.x || (span <= 0.0 && x <= b.x) {
            let t = if span > 0.0 { (x - a.x) / span } else { 0.0 };
            let top = a.y + (b.y - a.y) * t;
            let mut y = top;
            while y <= baseline {
                let level = (fade.alpha_at(y) / fade.top_alpha).clamp(0.0, 1.0);
                let band = (level * top_band).round() as usize;
                if let Some(bucket) = bands.get_mut(band) {
                    bucket.push((x, y));
                }
                y += dy;
            }
            if span <= 0.0 {
                break;
            }
            x += dx;
        }
    }
    bands
}

impl Widget for SeriesChart<'_> {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
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

        let (line, baseline, fade, marker, marker_radius, min, max) = match self.frame {
            SparklineFrame::Placeholder { label, .. } => {
                let row = Rect {
                    y: inner.y + inner.height / 2,
                    height: 1,
                    ..inner
                };
                Paragraph::new(Span::styled(*label, theme::placeholder()))
                    .alignment(Alignment::Center)
                    .render(row, buf);
                return;
            }
            SparklineFrame::Series {
                line,
                baseline,
                fade,
                marker,
                marker_radius,
                min,
                max,
                ..
            } => (line, *baseline, fade, *marker, *marker_radius, *min, *max),
        };

        let surface = self.surface;
        let h = surface.height;
        let dx = surface.width / (f64::from(inner.width) * 2.0);
        let dy = h / (f64::from(inner.height) * 4.0);
        let flip = |(x, y): (f64, f64)| (x, h - y);

        let bands: Vec<(Vec<(f64, f64)>, ratatui::style::Color)> =
            area_bands(line, baseline, fade, dx, dy)
                .into_iter()
                .enumerate()
                .map(|(i, pts)| {
                    let alpha = fade.top_alpha * (i as f64 + 1.0) / FADE_BANDS as f64;
                    (
                        pts.into_iter().map(flip).collect(),
                        theme::fade(theme::SERIES_CYAN, alpha),
                    )
                })
                .collect();

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, surface.width])
            .y_bounds([0.0, h])
            .paint(|ctx| {
                for (coords, color) in &bands {
                    ctx.draw(&Points {
                        coords,
                        color: *color,
                    });
                }
                ctx.layer();
                for pair in line.windows(2) {
                    let (x1, y1) = flip((pair[0].x, pair[0].y));
                    let (x2, y2) = flip((pair[1].x, pair[1].y));
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, theme::SERIES_CYAN));
                }
                let (mx, my) = flip((marker.x, marker.y));
                ctx.draw(&Circle {
                    x: mx,
                    y: my,
                    radius: marker_radius,
                    color: theme::TEXT,
                });
                ctx.print(0.0, h, Span::styled(fmt_bytes(max), theme::label()));
                ctx.print(0.0, dy, Span::styled(fmt_bytes(min), theme::label()));
            })
            .render(inner, buf);
    }
}
