use plotters::coord::Shift;
use plotters::prelude::*;

use crate::data::Table;
use crate::error::{DrawContext, Result};
use crate::figure::{Body, Figure};
use crate::request::{LineParams, LineStyleKind, Marker};

use super::axis::XAxis;
use super::{
    cartesian, column, dash_polyline, draw_markers, draw_mesh, draw_series_legend, legend_label,
    numeric_column, padded_range, MeshOptions,
};

const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: i32 = 4;

pub(super) fn draw(figure: &mut Figure, table: &Table, params: &LineParams) -> Result<()> {
    let x = XAxis::from_cells(column(table, &params.x)?.cells());
    let y = numeric_column(table, &params.y)?;

    let points: Vec<(f64, f64)> = x
        .positions()
        .iter()
        .zip(&y)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    figure.paint(|root| plot(root, params, &x, &points))?;
    figure.set_legend(legend_label(&params.label).map(str::to_string).into_iter().collect());
    figure.set_body(Body::Line { points });
    Ok(())
}

fn plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    params: &LineParams,
    x: &XAxis,
    points: &[(f64, f64)],
) -> Result<()> {
    let x_range = x.range(points.iter().map(|p| p.0), 0.0);
    let y_range = padded_range(points.iter().map(|p| p.1));

    let mut chart = cartesian(root, &params.decor, x_range, y_range)?;
    draw_mesh(
        &mut chart,
        &params.decor,
        MeshOptions {
            x_categories: x.categories(),
            plain_y: true,
            ..Default::default()
        },
    )?;

    let color = params.color;
    let style = color.stroke_width(LINE_WIDTH);
    match dash_pattern(params.linestyle) {
        None => {}
        Some(&[]) => {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), style))
                .draw_context("Failed to draw line series")?;
        }
        Some(pattern) => {
            let pixels: Vec<(i32, i32)> = points.iter().map(|p| chart.backend_coord(p)).collect();
            for piece in dash_polyline(&pixels, pattern) {
                root.draw(&PathElement::new(piece, style))
                    .draw_context("Failed to draw line series")?;
            }
        }
    }

    draw_markers(&mut chart, points, params.marker, color, MARKER_SIZE)?;

    let Some(label) = legend_label(&params.label) else {
        return draw_series_legend(&mut chart, false);
    };

    // Legend entry for the whole series
    let with_line = params.linestyle != LineStyleKind::None;
    let with_marker = params.marker != Marker::None;
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
        .draw_context("Failed to draw legend entry")?
        .label(label)
        .legend(move |(lx, ly)| {
            let line: Vec<(i32, i32)> = if with_line { vec![(0, 0), (20, 0)] } else { vec![] };
            let dot = if with_marker { MARKER_SIZE } else { 0 };
            EmptyElement::at((lx, ly))
                + PathElement::new(line, color.stroke_width(LINE_WIDTH))
                + Circle::new((10, 0), dot, color.filled())
        });

    draw_series_legend(&mut chart, true)
}

const SOLID: &[f64] = &[];
const DASHED: &[f64] = &[7.0, 3.0];
const DASH_DOT: &[f64] = &[6.0, 2.5, 1.5, 2.5];
const DOTTED: &[f64] = &[1.5, 2.5];

/// On/off lengths in pixels; empty for a solid line, `None` for no line.
fn dash_pattern(style: LineStyleKind) -> Option<&'static [f64]> {
    match style {
        LineStyleKind::Solid => Some(SOLID),
        LineStyleKind::Dashed => Some(DASHED),
        LineStyleKind::DashDot => Some(DASH_DOT),
        LineStyleKind::Dotted => Some(DOTTED),
        LineStyleKind::None => None,
    }
}
