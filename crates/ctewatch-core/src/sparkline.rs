//! Traffic sparkline: turns the rolling history into drawable geometry.
//!
//! [`render`] is pure. Coordinates are in surface units with the origin at
//! the top-left, so a larger value maps to a smaller `y`. Presenters decide
//! what a unit is (CSS pixels, braille dots, ...).

use crate::history::TrafficHistory;

pub const COLLECTING_LABEL: &str = "Collecting data...";
pub const NO_DATA_LABEL: &str = "No Data";

/// Area-fill opacity at the top of the surface.
pub const FADE_TOP_ALPHA: f64 = 0.35;
pub const MARKER_RADIUS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 6.0,
            right: 10.0,
            bottom: 6.0,
            left: 10.0,
        }
    }
}

/// The drawing area the sparkline is laid out on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(300.0, 80.0)
    }
}

impl Surface {
    /// A surface with the default padding.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    fn plot_width(&self) -> f64 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    fn plot_height(&self) -> f64 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }

    /// `y` of the bottom edge of the plot area.
    pub fn baseline(&self) -> f64 {
        self.height - self.padding.bottom
    }
}

/// Vertical opacity ramp for the area under the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub top_y: f64,
    pub bottom_y: f64,
    pub top_alpha: f64,
    pub bottom_alpha: f64,
}

impl Fade {
    /// Opacity at height `y`, interpolated and clamped to the ramp.
    pub fn alpha_at(&self, y: f64) -> f64 {
        let span = self.bottom_y - self.top_y;
        if span <= 0.0 {
            return self.top_alpha;
        }
        let t = ((y - self.top_y) / span).clamp(0.0, 1.0);
        self.top_alpha + (self.bottom_alpha - self.top_alpha) * t
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SparklineFrame {
    /// Nothing to plot; show `label` centred on the surface.
    Placeholder { label: &'static str, center: Point },
    Series {
        /// One point per sample, oldest first.
        line: Vec<Point>,
        /// Closed polygon: baseline under the first point, the line, then
        /// back to the baseline under the last point.
        area: Vec<Point>,
        baseline: f64,
        fade: Fade,
        /// Highlight on the newest sample.
        marker: Point,
        marker_radius: f64,
        min: u64,
        max: u64,
    },
}

impl SparklineFrame {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Placeholder { label, .. } => Some(label),
            Self::Series { .. } => None,
        }
    }
}

/// Lay out `history` on `surface`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn render(history: &TrafficHistory, surface: &Surface) -> SparklineFrame {
    let (min, max) = match (history.iter().min(), history.iter().max()) {
        (Some(min), Some(max)) if history.len() >= 2 => (min, max),
        _ => {
            return SparklineFrame::Placeholder {
                label: COLLECTING_LABEL,
                center: surface.center(),
            };
        }
    };

    let range = match max - min {
        0 => 1.0,
        r => r as f64,
    };
    let last = (history.len() - 1) as f64;
    let (pw, ph) = (surface.plot_width(), surface.plot_height());
    let pad = surface.padding;

    let line: Vec<Point> = history
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = pad.left + (i as f64 / last) * pw;
            let y = pad.top + (1.0 - (v - min) as f64 / range) * ph;
            Point::new(x, y)
        })
        .collect();

    let baseline = surface.baseline();
    let (Some(&first), Some(&newest)) = (line.first(), line.last()) else {
        return SparklineFrame::Placeholder {
            label: COLLECTING_LABEL,
            center: surface.center(),
        };
    };

    let mut area = Vec::with_capacity(line.len() + 2);
    area.push(Point::new(first.x, baseline));
    area.extend_from_slice(&line);
    area.push(Point::new(newest.x, baseline));

    SparklineFrame::Series {
        line,
        area,
        baseline,
        fade: Fade {
            top_y: 0.0,
            bottom_y: surface.height,
            top_alpha: FADE_TOP_ALPHA,
            bottom_alpha: 0.0,
        },
        marker: newest,
        marker_radius: MARKER_RADIUS,
        min,
        max,
    }
}

// ── Component ───────────────────────────────────────────────────────

/// Owns the traffic history and the surface it is drawn on, and keeps the
/// last rendered frame.
#[derive(Debug, Clone)]
pub struct Sparkline {
    history: TrafficHistory,
    surface: Surface,
    frame: SparklineFrame,
}

impl Default for Sparkline {
    fn default() -> Self {
        Self::new(Surface::default())
    }
}

impl Sparkline {
    pub fn new(surface: Surface) -> Self {
        let history = TrafficHistory::new();
        let frame = render(&history, &surface);
        Self {
            history,
            surface,
            frame,
        }
    }

    /// Record a sample and re-render.
    pub fn push(&mut self, total: u64) -> &SparklineFrame {
        self.history.push(total);
        self.frame = render(&self.history, &self.surface);
        &self.frame
    }

    /// Drop all samples and show the no-data placeholder.
    pub fn clear(&mut self) -> &SparklineFrame {
        self.history.clear();
        self.frame = SparklineFrame::Placeholder {
            label: NO_DATA_LABEL,
            center: self.surface.center(),
        };
        &self.frame
    }

    /// Re-render the current history on a new surface.
    pub fn resize(&mut self, surface: Surface) -> &SparklineFrame {
        self.surface = surface;
        self.frame = render(&self.history, &self.surface);
        &self.frame
    }

    pub fn frame(&self) -> &SparklineFrame {
        &self.frame
    }

    pub fn history(&self) -> &TrafficHistory {
        &self.history
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn history_of(values: &[u64]) -> TrafficHistory {
        let mut h = TrafficHistory::new();
        for v in values {
            h.push(*v);
        }
        h
    }

    #[test]
    fn fewer_than_two_samples_is_placeholder() {
        let surface = Surface::default();
        for values in [&[][..], &[5][..]] {
            let frame = render(&history_of(values), &surface);
            assert_eq!(
                frame,
                SparklineFrame::Placeholder {
                    label: COLLECTING_LABEL,
                    center: Point::new(150.0, 40.0),
                }
            );
        }
    }

    #[test]
    fn series_spans_padded_area() {
        let frame = render(&history_of(&[100, 300, 200]), &Surface::default());
        let SparklineFrame::Series {
            line,
            area,
            baseline,
            marker,
            min,
            max,
            ..
        } = frame
        else {
            panic!("expected a series");
        };
        assert_eq!(
            line,
            vec![
                Point::new(10.0, 74.0),
                Point::new(150.0, 6.0),
                Point::new(290.0, 40.0),
            ]
        );
        assert_eq!(baseline, 74.0);
        assert_eq!(area.len(), 5);
        assert_eq!(area[0], Point::new(10.0, 74.0));
        assert_eq!(area[4], Point::new(290.0, 74.0));
        assert_eq!(marker, Point::new(290.0, 40.0));
        assert_eq!((min, max), (100, 300));
    }

    #[test]
    fn flat_series_sits_on_baseline() {
        let frame = render(&history_of(&[42, 42]), &Surface::default());
        let SparklineFrame::Series { line, .. } = frame else {
            panic!("expected a series");
        };
        assert!(line.iter().all(|p| (p.y - 74.0).abs() < f64::EPSILON));
    }

    #[test]
    fn render_is_idempotent() {
        let history = history_of(&[1, 9, 4, 4, 7]);
        let surface = Surface::new(120.0, 32.0);
        assert_eq!(render(&history, &surface), render(&history, &surface));
    }

    #[test]
    fn fade_ramps_to_transparent() {
        let fade = Fade {
            top_y: 0.0,
            bottom_y: 80.0,
            top_alpha: FADE_TOP_ALPHA,
            bottom_alpha: 0.0,
        };
        assert!((fade.alpha_at(0.0) - 0.35).abs() < 1e-12);
        assert!((fade.alpha_at(40.0) - 0.175).abs() < 1e-12);
        assert!(fade.alpha_at(200.0).abs() < 1e-12);
    }

    #[test]
    fn component_clear_then_resize() {
        let mut spark = Sparkline::default();
        spark.push(1);
        assert_eq!(spark.push(2).label(), None);

        assert_eq!(spark.clear().label(), Some(NO_DATA_LABEL));
        assert!(spark.history().is_empty());

        let frame = spark.resize(Surface::new(100.0, 20.0));
        assert_eq!(frame.label(), Some(COLLECTING_LABEL));
        assert_eq!(spark.surface().width, 100.0);
    }

    #[test]
    fn tiny_surface_does_not_invert() {
        let frame = render(&history_of(&[1, 2]), &Surface::new(4.0, 4.0));
        let SparklineFrame::Series { line, .. } = frame else {
            panic!("expected a series");
        };
        assert_eq!(line[0].x, line[1].x);
    }
}
