use plotters::coord::Shift;
use plotters::prelude::*;

use crate::data::Table;
use crate::error::{DrawContext, Result};
use crate::figure::{Body, Figure};
use crate::request::HistogramParams;
use crate::stats::{self, Histogram};

use super::{cartesian, draw_mesh, numeric_column, padded_range, MeshOptions};

const FILL_ALPHA: f64 = 0.7;

pub(super) fn draw(figure: &mut Figure, table: &Table, params: &HistogramParams) -> Result<()> {
    let values = numeric_column(table, &params.column)?;
    let hist = stats::histogram(&values, params.bins);

    figure.paint(|root| plot(root, params, &hist))?;
    figure.set_legend(Vec::new());
    figure.set_body(Body::Histogram(hist));
    Ok(())
}

fn plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    params: &HistogramParams,
    hist: &Histogram,
) -> Result<()> {
    let x_range = padded_range(hist.edges.iter().copied());
    let max_count = hist.counts.iter().copied().max().unwrap_or(0);
    let y_max = if max_count == 0 { 1.0 } else { max_count as f64 * 1.05 };

    let mut chart = cartesian(root, &params.decor, x_range, 0.0..y_max)?;
    draw_mesh(&mut chart, &params.decor, MeshOptions::default())?;

    let bins: Vec<[(f64, f64); 2]> = hist
        .edges
        .windows(2)
        .zip(&hist.counts)
        .map(|(edge, &count)| [(edge[0], 0.0), (edge[1], count as f64)])
        .collect();

    let fill = params.color.mix(FILL_ALPHA).filled();
    chart
        .draw_series(bins.iter().map(|&corners| Rectangle::new(corners, fill)))
        .draw_context("Failed to draw histogram bins")?;
    chart
        .draw_series(bins.iter().map(|&corners| Rectangle::new(corners, BLACK.stroke_width(1))))
        .draw_context("Failed to draw histogram edges")?;

    Ok(())
}
