//! Chart renderers, one per chart kind, plus the drawing helpers they share.

mod axis;
mod bar;
mod distribution;
mod heatmap;
mod histogram;
mod line;
mod pie;
mod scatter;

use std::ops::Range;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::data::{Column, Table};
use crate::error::{ChartError, DrawContext, Result};
use crate::figure::Figure;
use crate::request::{ChartParams, Decorations, Marker};

pub(crate) const FONT: &str = "sans-serif";
pub(crate) const TITLE_SIZE: u32 = 20;
const LABEL_SIZE: u32 = 12;
const DESC_SIZE: u32 = 14;
const MAX_CATEGORY_LABELS: usize = 30;

pub(crate) type XYChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Draw the chart described by `params` onto `figure`.
pub fn draw(figure: &mut Figure, table: &Table, params: &ChartParams) -> Result<()> {
    match params {
        ChartParams::Line(p) => line::draw(figure, table, p),
        ChartParams::Bar(p) => bar::draw(figure, p),
        ChartParams::Scatter(p) => scatter::draw(figure, table, p),
        ChartParams::Histogram(p) => histogram::draw(figure, table, p),
        ChartParams::Pie(p) => pie::draw(figure, table, p),
        ChartParams::Heatmap(p) => heatmap::draw(figure, table, p),
        ChartParams::Boxplot(p) => distribution::draw_boxplot(figure, table, p),
        ChartParams::Violin(p) => distribution::draw_violin(figure, table, p),
    }
}

pub(crate) fn column<'t>(table: &'t Table, name: &str) -> Result<&'t Column> {
    table
        .column(name)
        .ok_or_else(|| ChartError::InvalidParameter(format!("column '{}' not found in table", name)))
}

/// Numeric view of a column; text cells make it a render failure.
pub(crate) fn numeric_column(table: &Table, name: &str) -> Result<Vec<f64>> {
    column(table, name)?.to_f64().ok_or_else(|| {
        ChartError::Render(format!("column '{}' contains non-numeric values", name))
    })
}

/// Data range with 5% padding on each side.
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min > max {
        0.0..1.0
    } else if min == max {
        let padding = (min.abs() * 0.05).max(1.0);
        (min - padding)..(max + padding)
    } else {
        let padding = max * 0.05 - min * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Cartesian chart with the title as caption. Ranges whose span is not
/// finite are rejected before any tick is generated.
pub(crate) fn cartesian<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    decor: &Decorations,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<XYChart<'a, DB>> {
    for (axis, range) in [("x", &x_range), ("y", &y_range)] {
        let span = range.end - range.start;
        if !span.is_finite() {
            return Err(ChartError::Render(format!(
                "{} data range {}..{} is too wide to plot",
                axis, range.start, range.end
            )));
        }
        if span <= 0.0 {
            return Err(ChartError::Render(format!(
                "{} data range {}..{} is empty",
                axis, range.start, range.end
            )));
        }
    }

    ChartBuilder::on(area)
        .margin(10)
        .caption(&decor.title, (FONT, TITLE_SIZE))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .draw_context("Failed to build chart")
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MeshOptions<'c> {
    /// Names for integer x positions.
    pub x_categories: Option<&'c [String]>,
    /// Names for integer y positions.
    pub y_categories: Option<&'c [String]>,
    /// Plain (non-scientific) y tick labels.
    pub plain_y: bool,
    /// Vertical grid lines; horizontal ones follow `grid` alone.
    pub x_grid: bool,
}

impl Default for MeshOptions<'_> {
    fn default() -> Self {
        Self {
            x_categories: None,
            y_categories: None,
            plain_y: false,
            x_grid: true,
        }
    }
}

/// Axes, tick labels, axis descriptions and (optionally) grid lines.
pub(crate) fn draw_mesh<DB: DrawingBackend>(
    chart: &mut XYChart<'_, DB>,
    decor: &Decorations,
    opts: MeshOptions<'_>,
) -> Result<()> {
    let x_names = opts.x_categories.unwrap_or(&[]);
    let y_names = opts.y_categories.unwrap_or(&[]);
    let x_fmt = move |x: &f64| category_label(x_names, *x);
    let y_cat_fmt = move |y: &f64| category_label(y_names, *y);
    let y_fmt = |y: &f64| plain_tick(*y);

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(decor.xlabel.as_str())
        .y_desc(decor.ylabel.as_str())
        .label_style((FONT, LABEL_SIZE))
        .axis_desc_style((FONT, DESC_SIZE));

    if opts.x_categories.is_some() {
        mesh.x_labels(x_names.len().clamp(1, MAX_CATEGORY_LABELS))
            .x_label_formatter(&x_fmt);
    }
    if opts.y_categories.is_some() {
        mesh.y_labels(y_names.len().clamp(1, MAX_CATEGORY_LABELS))
            .y_label_formatter(&y_cat_fmt);
    } else if opts.plain_y {
        mesh.y_label_formatter(&y_fmt);
    }
    if !decor.grid {
        mesh.disable_mesh();
    } else if !opts.x_grid {
        mesh.disable_x_mesh();
    }

    mesh.draw().draw_context("Failed to draw mesh")
}

/// Series legend box; skipped when no series carries a label.
pub(crate) fn draw_series_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut XYChart<'a, DB>,
    has_entries: bool,
) -> Result<()> {
    if !has_entries {
        return Ok(());
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, LABEL_SIZE))
        .draw()
        .draw_context("Failed to draw legend")
}

/// Series label shown in a legend; empty and `_`-prefixed labels are hidden.
pub(crate) fn legend_label(label: &str) -> Option<&str> {
    if label.is_empty() || label.starts_with('_') {
        None
    } else {
        Some(label)
    }
}

fn category_label(names: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

/// Tick label without exponent notation.
pub(crate) fn plain_tick(v: f64) -> String {
    let s = format!("{:.6}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Draw one marker per point.
pub(crate) fn draw_markers<DB: DrawingBackend>(
    chart: &mut XYChart<'_, DB>,
    points: &[(f64, f64)],
    marker: Marker,
    color: RGBColor,
    size: i32,
) -> Result<()> {
    let fill = color.filled();
    let s = size;
    let pts = points.iter().copied();
    let drawn = match marker {
        Marker::None => return Ok(()),
        Marker::Circle => chart
            .draw_series(pts.map(|pt| Circle::new(pt, s, fill)))
            .map(|_| ()),
        Marker::Point => chart
            .draw_series(pts.map(|pt| Circle::new(pt, (s / 2).max(1), fill)))
            .map(|_| ()),
        Marker::Square => chart
            .draw_series(pts.map(|pt| EmptyElement::at(pt) + Rectangle::new([(-s, -s), (s, s)], fill)))
            .map(|_| ()),
        Marker::TriangleUp => chart
            .draw_series(pts.map(|pt| {
                EmptyElement::at(pt) + Polygon::new(vec![(0, -s), (s, s), (-s, s)], fill)
            }))
            .map(|_| ()),
        Marker::TriangleDown => chart
            .draw_series(pts.map(|pt| {
                EmptyElement::at(pt) + Polygon::new(vec![(0, s), (s, -s), (-s, -s)], fill)
            }))
            .map(|_| ()),
        Marker::Diamond => chart
            .draw_series(pts.map(|pt| {
                EmptyElement::at(pt) + Polygon::new(vec![(0, -s), (s, 0), (0, s), (-s, 0)], fill)
            }))
            .map(|_| ()),
        Marker::Cross => chart
            .draw_series(pts.map(|pt| {
                EmptyElement::at(pt)
                    + PathElement::new(vec![(-s, -s), (s, s)], color.stroke_width(2))
                    + PathElement::new(vec![(-s, s), (s, -s)], color.stroke_width(2))
            }))
            .map(|_| ()),
        Marker::Plus => chart
            .draw_series(pts.map(|pt| {
                EmptyElement::at(pt)
                    + PathElement::new(vec![(-s, 0), (s, 0)], color.stroke_width(2))
                    + PathElement::new(vec![(0, -s), (0, s)], color.stroke_width(2))
            }))
            .map(|_| ()),
    };
    drawn.draw_context("Failed to draw markers")
}

/// Split a pixel-space polyline into the "on" pieces of a dash pattern.
/// `pattern` alternates on/off lengths and must have an even length.
pub(crate) fn dash_polyline(path: &[(i32, i32)], pattern: &[f64]) -> Vec<Vec<(i32, i32)>> {
    if pattern.is_empty() || pattern.iter().any(|&l| l <= 0.0) {
        return vec![path.to_vec()];
    }

    let mut pieces = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut idx = 0;
    let mut remaining = pattern[0];

    fn flush(current: &mut Vec<(f64, f64)>, pieces: &mut Vec<Vec<(i32, i32)>>) {
        if current.len() >= 2 {
            pieces.push(
                current
                    .iter()
                    .map(|&(x, y)| (x.round() as i32, y.round() as i32))
                    .collect(),
            );
        }
        current.clear();
    }

    for seg in path.windows(2) {
        let (ax, ay) = (seg[0].0 as f64, seg[0].1 as f64);
        let (bx, by) = (seg[1].0 as f64, seg[1].1 as f64);
        let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
        let at = |t: f64| (ax + (bx - ax) * t / len, ay + (by - ay) * t / len);

        let mut t = 0.0;
        while len - t > 1e-9 {
            let step = remaining.min(len - t);
            if idx % 2 == 0 {
                if current.is_empty() {
                    current.push(at(t));
                }
                current.push(at(t + step));
            }
            t += step;
            remaining -= step;
            if remaining <= 1e-9 {
                if idx % 2 == 0 {
                    flush(&mut current, &mut pieces);
                }
                idx = (idx + 1) % pattern.len();
                remaining = pattern[idx];
            }
        }
    }
    flush(&mut current, &mut pieces);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(vec![0.0, 10.0]), -0.5..10.5);
        assert_eq!(padded_range(vec![3.0, 3.0]), 2.0..4.0);
        assert_eq!(padded_range(vec![f64::NAN]), 0.0..1.0);
        assert_eq!(padded_range(Vec::new()), 0.0..1.0);
    }

    #[test]
    fn test_padded_range_of_extreme_values() {
        let range = padded_range(vec![-1e308, 1e308]);
        assert!(range.start.is_finite() && range.end.is_finite());
        assert!(!(range.end - range.start).is_finite());

        let range = padded_range(vec![1e308, 1e308]);
        assert!(range.start < range.end);
    }

    #[test]
    fn test_cartesian_rejects_infinite_span() {
        let decor = crate::request::Decorations {
            title: "t".to_string(),
            xlabel: "x".to_string(),
            ylabel: "y".to_string(),
            grid: true,
            figsize: crate::request::FigSize::new(4.0, 3.0),
        };
        let mut figure = Figure::new(crate::request::ChartKind::Line, &decor, 50).unwrap();
        let root = figure.root();
        let err = cartesian(&root, &decor, 0.0..1.0, -1e308..1e308)
            .err()
            .expect("wide range accepted");
        assert!(matches!(err, ChartError::Render(_)));
        assert!(err.cause().contains("too wide"));
    }

    #[test]
    fn test_legend_label() {
        assert_eq!(legend_label("sales"), Some("sales"));
        assert_eq!(legend_label(""), None);
        assert_eq!(legend_label("_hidden"), None);
    }

    #[test]
    fn test_plain_tick() {
        assert_eq!(plain_tick(1_000_000.0), "1000000");
        assert_eq!(plain_tick(0.25), "0.25");
        assert_eq!(plain_tick(-0.0), "0");
    }

    #[test]
    fn test_category_label() {
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&names, 1.0), "b");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, -1.0), "");
        assert_eq!(category_label(&names, 2.0), "");
    }

    #[test]
    fn test_dash_polyline_straight() {
        let pieces = dash_polyline(&[(0, 0), (20, 0)], &[6.0, 4.0]);
        assert_eq!(pieces, vec![vec![(0, 0), (6, 0)], vec![(10, 0), (16, 0)]]);
    }

    #[test]
    fn test_dash_polyline_across_vertices() {
        let pieces = dash_polyline(&[(0, 0), (4, 0), (4, 4)], &[6.0, 2.0]);
        assert_eq!(pieces[0], vec![(0, 0), (4, 0), (4, 2)]);
        assert_eq!(pieces.len(), 1);
    }
}
