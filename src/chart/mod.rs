//! Static chart strategies sharing the scale provider.
//!
//! Each [`Chart`] variant turns a dataset into [`Mark`]s inside a plot rectangle; the race itself
//! is driven by [`crate::RaceSession`] instead.

pub(crate) mod curve;

use std::borrow::Cow;

use crate::data::dataset::Dataset;
use crate::engine::interp::{MissingPolicy, sample};
use crate::engine::rank::rank;
use crate::engine::scale::{LinearScale, scale_time};
use crate::foundation::core::{BezPath, Canvas, CategoryId, Point, Rect, Rgba8};

/// Chart kind, selected by configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    /// Columns for every category at one instant, largest first.
    Bar {
        /// Instant to sample; the last keyframe when absent.
        #[serde(default)]
        time: Option<f64>,
        /// Fraction of each band left empty.
        #[serde(default = "default_padding")]
        padding: f64,
    },
    /// One line per category over time.
    Line {
        /// Catmull-Rom smoothing instead of straight segments.
        #[serde(default = "default_true")]
        smooth: bool,
        /// Dot at every keyframe.
        #[serde(default)]
        dots: bool,
    },
    /// One filled area per category over time, down to the zero baseline.
    Area {
        /// Catmull-Rom smoothing instead of straight segments.
        #[serde(default = "default_true")]
        smooth: bool,
    },
}

fn default_padding() -> f64 {
    0.1
}

fn default_true() -> bool {
    true
}

impl Default for Chart {
    fn default() -> Self {
        Self::Line {
            smooth: true,
            dots: false,
        }
    }
}

/// A drawable primitive in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
    /// Filled rectangle.
    Rect {
        /// Category drawn.
        id: CategoryId,
        /// Geometry.
        rect: Rect,
        /// Fill.
        color: Rgba8,
    },
    /// Stroked and/or filled path.
    Path {
        /// Category drawn.
        id: CategoryId,
        /// Geometry.
        path: BezPath,
        /// Stroke color, if stroked.
        stroke: Option<Rgba8>,
        /// Fill color, if filled.
        fill: Option<Rgba8>,
    },
    /// Filled circle.
    Dot {
        /// Category drawn.
        id: CategoryId,
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Fill.
        color: Rgba8,
    },
}

const DOT_RADIUS: f64 = 2.0;
const AREA_ALPHA: u8 = 96;

impl Chart {
    /// Marks for `dataset` laid out inside `plot`.
    pub fn marks(&self, dataset: &Dataset, plot: Rect) -> Vec<Mark> {
        match *self {
            Self::Bar { time, padding } => bar_marks(dataset, plot, time, padding),
            Self::Line { smooth, dots } => series_marks(dataset, plot, smooth, dots, false),
            Self::Area { smooth } => series_marks(dataset, plot, smooth, false, true),
        }
    }
}

fn value_scale(dataset: &Dataset, plot: Rect) -> LinearScale {
    let max = dataset
        .keyframes()
        .iter()
        .flat_map(|k| k.values.values().copied())
        .fold(0.0, f64::max);
    LinearScale::new((0.0, max), (plot.y1, plot.y0))
}

fn color_of(dataset: &Dataset, id: &CategoryId) -> Rgba8 {
    dataset
        .category(id.as_str())
        .map_or(Rgba8::rgb(0x99, 0x99, 0x99), |c| c.color)
}

fn bar_marks(dataset: &Dataset, plot: Rect, time: Option<f64>, padding: f64) -> Vec<Mark> {
    let at = time.unwrap_or_else(|| dataset.end_time());
    let s = sample(dataset, at, MissingPolicy::Zero);
    let ranked = rank(&s.values, s.values.len());
    if ranked.is_empty() {
        return Vec::new();
    }
    let y = value_scale(dataset, plot);
    let band = plot.width() / ranked.len() as f64;
    let pad = band * padding.clamp(0.0, 0.95);
    ranked
        .iter()
        .map(|e| {
            let x0 = plot.x0 + (e.rank - 1) as f64 * band + pad / 2.0;
            let top = y.map(e.value.max(0.0)).max(plot.y0);
            Mark::Rect {
                id: e.id.clone(),
                rect: Rect::new(x0, top, x0 + band - pad, plot.y1),
                color: color_of(dataset, &e.id),
            }
        })
        .collect()
}

fn series_marks(dataset: &Dataset, plot: Rect, smooth: bool, dots: bool, area: bool) -> Vec<Mark> {
    let y = value_scale(dataset, plot);
    let span = (dataset.start_time(), dataset.end_time());
    let mut out = Vec::new();

    for category in dataset.categories() {
        let points: Vec<Point> = dataset
            .keyframes()
            .iter()
            .filter_map(|k| {
                let v = *k.values.get(&category.id)?;
                Some(Point::new(
                    scale_time(k.time, span, (plot.x0, plot.x1)),
                    y.map(v),
                ))
            })
            .collect();
        let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) else {
            continue;
        };

        let mut path = if smooth {
            curve::catmull_rom(&points)
        } else {
            curve::polyline(&points)
        };
        let color = category.color;
        if area {
            let baseline = y.map(0.0);
            path.line_to(Point::new(last.x, baseline));
            path.line_to(Point::new(first.x, baseline));
            path.close_path();
            out.push(Mark::Path {
                id: category.id.clone(),
                path,
                stroke: Some(color),
                fill: Some(Rgba8 {
                    a: AREA_ALPHA,
                    ..color
                }),
            });
        } else {
            out.push(Mark::Path {
                id: category.id.clone(),
                path,
                stroke: Some(color),
                fill: None,
            });
        }
        if dots {
            out.extend(points.iter().map(|&center| Mark::Dot {
                id: category.id.clone(),
                center,
                radius: DOT_RADIUS,
                color,
            }));
        }
    }
    out
}

/// Standalone SVG document for `marks` on `canvas`.
pub fn to_svg(marks: &[Mark], canvas: Canvas, background: Rgba8) -> String {
    let (w, h) = (canvas.width, canvas.height);
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    svg.push('\n');
    svg.push_str(&format!(
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        background.to_hex()
    ));
    svg.push('\n');
    for mark in marks {
        let element = match mark {
            Mark::Rect { id, rect, color } => format!(
                r#"<rect data-id="{}" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                escape_attr(id.as_str()),
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height(),
                color.to_hex()
            ),
            Mark::Path {
                id,
                path,
                stroke,
                fill,
            } => format!(
                r#"<path data-id="{}" d="{}" fill="{}" stroke="{}"/>"#,
                escape_attr(id.as_str()),
                path.to_svg(),
                fill.map_or_else(|| "none".to_owned(), Rgba8::to_hex),
                stroke.map_or_else(|| "none".to_owned(), Rgba8::to_hex)
            ),
            Mark::Dot {
                id,
                center,
                radius,
                color,
            } => format!(
                r#"<circle data-id="{}" cx="{}" cy="{}" r="{radius}" fill="{}"/>"#,
                escape_attr(id.as_str()),
                center.x,
                center.y,
                color.to_hex()
            ),
        };
        svg.push_str(&element);
        svg.push('\n');
    }
    svg.push_str("</svg>\n");
    svg
}

/// Escape text for a double-quoted XML attribute.
fn escape_attr(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
#[path = "../../tests/unit/chart/mod.rs"]
mod tests;
