//! Layout math for the bar and radar charts.
//!
//! Pure functions so the same geometry feeds the live SVG in the dashboard and
//! the snapshot drawn into the PDF report.

use std::f64::consts::PI;

use api::ModelResult;

/// Series colours, cycled by model index.
pub const PALETTE: [&str; 10] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#F97316", "#06B6D4", "#84CC16",
    "#EC4899", "#6366F1",
];

pub fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Frame {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            top: 20.0,
            right: 30.0,
            bottom: 100.0,
            left: 60.0,
        }
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - self.left - self.right).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - self.top - self.bottom).max(0.0)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(960.0, 384.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub frame: Frame,
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
    /// Y coordinate of the zero line.
    pub baseline: f64,
}

const TICK_COUNT: usize = 5;

/// One bar per model, in input order. The value axis always includes zero.
/// Missing values draw as empty slots.
pub fn bar_layout(models: &[ModelResult], metric: &str, frame: Frame) -> BarLayout {
    let values: Vec<f64> = models.iter().map(|m| m.metric(metric)).collect();
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (mut lo, mut hi) = finite.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi == lo {
        hi = lo + 1.0;
    }
    hi = nice_ceiling(hi);
    if lo < 0.0 {
        lo = -nice_ceiling(-lo);
    }

    let plot_h = frame.plot_height();
    let y_of = |v: f64| frame.top + plot_h * (hi - v) / (hi - lo);
    let baseline = y_of(0.0);

    let slot = if models.is_empty() {
        0.0
    } else {
        frame.plot_width() / models.len() as f64
    };
    let bar_width = slot * 0.7;

    let bars = models
        .iter()
        .zip(values)
        .enumerate()
        .map(|(idx, (model, value))| {
            let x = frame.left + slot * idx as f64 + (slot - bar_width) / 2.0;
            let (y, height) = if value.is_finite() {
                let top = y_of(value);
                (top.min(baseline), (top - baseline).abs())
            } else {
                (baseline, 0.0)
            };
            Bar {
                label: model.name.clone(),
                value,
                x,
                y,
                width: bar_width,
                height,
            }
        })
        .collect();

    let ticks = (0..=TICK_COUNT)
        .map(|step| {
            let value = lo + (hi - lo) * step as f64 / TICK_COUNT as f64;
            Tick {
                value,
                y: y_of(value),
            }
        })
        .collect();

    BarLayout {
        frame,
        bars,
        ticks,
        baseline,
    }
}

/// Round up to 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_ceiling(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let scaled = value / magnitude;
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|candidate| scaled <= *candidate + 1e-9)
        .unwrap_or(10.0);
    step * magnitude
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub metric: String,
    pub end: Point,
    pub label_at: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarSeries {
    pub name: String,
    pub color: &'static str,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarLayout {
    pub center: Point,
    pub radius: f64,
    pub axes: Vec<RadarAxis>,
    /// Concentric grid polygons at 20% steps.
    pub rings: Vec<Vec<Point>>,
    pub series: Vec<RadarSeries>,
}

const RING_COUNT: usize = 5;

/// Spokes start at twelve o'clock and run clockwise. Values are clamped to
/// `[0, 1]`, the range shared by the ratio metrics the radar is meant for.
pub fn radar_layout(models: &[ModelResult], metrics: &[String], center: Point, radius: f64) -> RadarLayout {
    let count = metrics.len();
    let at = |idx: usize, scale: f64| -> Point {
        let angle = -PI / 2.0 + 2.0 * PI * idx as f64 / count.max(1) as f64;
        Point {
            x: center.x + radius * scale * angle.cos(),
            y: center.y + radius * scale * angle.sin(),
        }
    };

    let axes = metrics
        .iter()
        .enumerate()
        .map(|(idx, metric)| RadarAxis {
            metric: metric.clone(),
            end: at(idx, 1.0),
            label_at: at(idx, 1.12),
        })
        .collect();

    let rings = (1..=RING_COUNT)
        .map(|ring| {
            let scale = ring as f64 / RING_COUNT as f64;
            (0..count).map(|idx| at(idx, scale)).collect()
        })
        .collect();

    let series = models
        .iter()
        .enumerate()
        .map(|(idx, model)| RadarSeries {
            name: model.name.clone(),
            color: series_color(idx),
            points: metrics
                .iter()
                .enumerate()
                .map(|(axis, metric)| {
                    let value = model.metric(metric);
                    let scale = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
                    at(axis, scale)
                })
                .collect(),
        })
        .collect();

    RadarLayout {
        center,
        radius,
        axes,
        rings,
        series,
    }
}

/// `x1,y1 x2,y2 …` for an SVG `points` attribute.
pub fn polygon_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
