//! Per-column distribution charts: boxplot and violin.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::data::Table;
use crate::error::{ChartError, DrawContext, Result};
use crate::figure::{Body, Figure};
use crate::request::DistributionParams;
use crate::stats::{self, BoxStats, Density};

use super::{cartesian, column, draw_mesh, padded_range, MeshOptions, XYChart};

const BOX_HALF_WIDTH: f64 = 0.4;
const CAP_HALF_WIDTH: f64 = 0.2;
const OUTLINE: RGBColor = RGBColor(60, 60, 60);

/// Values of every selected column; requested text columns are a failure.
fn selected_values(table: &Table, params: &DistributionParams) -> Result<Vec<Vec<f64>>> {
    params
        .columns
        .iter()
        .map(|name| {
            column(table, name)?.to_f64().ok_or_else(|| {
                ChartError::Render(format!("column '{}' contains non-numeric values", name))
            })
        })
        .collect()
}

pub(super) fn draw_boxplot(figure: &mut Figure, table: &Table, params: &DistributionParams) -> Result<()> {
    let values = selected_values(table, params)?;
    let boxes: Vec<Option<BoxStats>> = values.iter().map(|v| stats::box_stats(v)).collect();
    let y_range = padded_range(values.iter().flatten().copied());

    figure.paint(|root| plot_boxes(root, params, &boxes, y_range))?;
    figure.set_legend(Vec::new());
    figure.set_body(Body::Boxes {
        columns: params.columns.clone(),
        stats: boxes,
    });
    Ok(())
}

pub(super) fn draw_violin(figure: &mut Figure, table: &Table, params: &DistributionParams) -> Result<()> {
    let values = selected_values(table, params)?;
    let densities: Vec<Density> = values.iter().map(|v| stats::kde(v)).collect();
    let boxes: Vec<Option<BoxStats>> = values.iter().map(|v| stats::box_stats(v)).collect();
    let y_range = padded_range(densities.iter().flat_map(|d| d.grid.iter().copied()));

    figure.paint(|root| plot_violins(root, params, &densities, &boxes, y_range))?;
    figure.set_legend(Vec::new());
    figure.set_body(Body::Violins {
        columns: params.columns.clone(),
        densities,
    });
    Ok(())
}

fn chart_for<'a, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    params: &DistributionParams,
    y_range: std::ops::Range<f64>,
) -> Result<XYChart<'a, DB>> {
    let x_range = -0.5..(params.columns.len() as f64 - 0.5);
    let mut chart = cartesian(root, &params.decor, x_range, y_range)?;
    draw_mesh(
        &mut chart,
        &params.decor,
        MeshOptions {
            x_categories: Some(params.columns.as_slice()),
            ..Default::default()
        },
    )?;
    Ok(chart)
}

fn plot_boxes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    params: &DistributionParams,
    boxes: &[Option<BoxStats>],
    y_range: std::ops::Range<f64>,
) -> Result<()> {
    let mut chart = chart_for(root, params, y_range)?;
    let colors = params.palette.colors(boxes.len());

    for (i, (stats, color)) in boxes.iter().zip(colors).enumerate() {
        let Some(s) = stats else { continue };
        let x = i as f64;
        let line = OUTLINE.stroke_width(1);

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - BOX_HALF_WIDTH, s.q1), (x + BOX_HALF_WIDTH, s.q3)],
                color.filled(),
            )))
            .draw_context("Failed to draw box")?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - BOX_HALF_WIDTH, s.q1), (x + BOX_HALF_WIDTH, s.q3)],
                line,
            )))
            .draw_context("Failed to draw box outline")?;

        let strokes = [
            // median
            vec![(x - BOX_HALF_WIDTH, s.median), (x + BOX_HALF_WIDTH, s.median)],
            // whiskers
            vec![(x, s.q1), (x, s.lower_whisker)],
            vec![(x, s.q3), (x, s.upper_whisker)],
            // caps
            vec![(x - CAP_HALF_WIDTH, s.lower_whisker), (x + CAP_HALF_WIDTH, s.lower_whisker)],
            vec![(x - CAP_HALF_WIDTH, s.upper_whisker), (x + CAP_HALF_WIDTH, s.upper_whisker)],
        ];
        chart
            .draw_series(strokes.into_iter().map(|path| PathElement::new(path, line)))
            .draw_context("Failed to draw whiskers")?;

        chart
            .draw_series(s.outliers.iter().map(|&y| {
                EmptyElement::at((x, y))
                    + Polygon::new(vec![(0, -4), (3, 0), (0, 4), (-3, 0)], OUTLINE.filled())
            }))
            .draw_context("Failed to draw outliers")?;
    }
    Ok(())
}

fn plot_violins<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    params: &DistributionParams,
    densities: &[Density],
    boxes: &[Option<BoxStats>],
    y_range: std::ops::Range<f64>,
) -> Result<()> {
    let mut chart = chart_for(root, params, y_range)?;
    let colors = params.palette.colors(densities.len());

    for (i, ((density, stats), color)) in densities.iter().zip(boxes).zip(colors).enumerate() {
        let Some(s) = stats else { continue };
        let x = i as f64;

        // Left edge bottom-to-top, then right edge top-to-bottom
        let left = density
            .grid
            .iter()
            .zip(&density.density)
            .map(|(&y, &d)| (x - d * BOX_HALF_WIDTH, y));
        let right = density
            .grid
            .iter()
            .zip(&density.density)
            .rev()
            .map(|(&y, &d)| (x + d * BOX_HALF_WIDTH, y));
        let outline: Vec<(f64, f64)> = left.chain(right).collect();

        chart
            .draw_series(std::iter::once(Polygon::new(outline.clone(), color.filled())))
            .draw_context("Failed to draw violin")?;
        chart
            .draw_series(std::iter::once(PathElement::new(outline, OUTLINE.stroke_width(1))))
            .draw_context("Failed to draw violin outline")?;

        // Inner box: whisker line, quartile bar, median dot
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, s.lower_whisker), (x, s.upper_whisker)],
                OUTLINE.stroke_width(1),
            )))
            .draw_context("Failed to draw violin whiskers")?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - 0.03, s.q1), (x + 0.03, s.q3)],
                OUTLINE.filled(),
            )))
            .draw_context("Failed to draw violin quartiles")?;
        chart
            .draw_series(std::iter::once(Circle::new((x, s.median), 3, WHITE.filled())))
            .draw_context("Failed to draw violin median")?;
    }
    Ok(())
}
