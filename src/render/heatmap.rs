use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::data::{format_number, Table};
use crate::error::{ChartError, DrawContext, Result};
use crate::figure::{Body, Figure};
use crate::palette::{is_dark, Colormap};
use crate::request::HeatmapParams;
use crate::stats;

use super::{cartesian, column, draw_mesh, MeshOptions, FONT};

const NAN_COLOR: RGBColor = RGBColor(220, 220, 220);
const COLORBAR_STEPS: usize = 100;

/// Correlation matrix of the selected columns, one cell per pair.
pub(super) fn draw(figure: &mut Figure, table: &Table, params: &HeatmapParams) -> Result<()> {
    let series = params
        .columns
        .iter()
        .map(|name| {
            column(table, name)?.to_f64().ok_or_else(|| {
                ChartError::Render(format!("cannot correlate non-numeric column '{}'", name))
            })
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let matrix = stats::correlation_matrix(&series);
    let labels = params.columns.clone();

    figure.paint(|root| plot(root, params, &labels, &matrix))?;
    figure.set_legend(Vec::new());
    figure.set_body(Body::Heatmap { labels, matrix });
    Ok(())
}

fn plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    params: &HeatmapParams,
    labels: &[String],
    matrix: &[Vec<f64>],
) -> Result<()> {
    let n = labels.len();
    let values: Vec<f64> = matrix.iter().flatten().copied().collect();
    let (vmin, vmax) = match stats::finite_extent(&values) {
        Some((lo, hi)) if lo < hi => (lo, hi),
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    };
    let norm = |v: f64| (v - vmin) / (vmax - vmin);

    let split = root.dim_in_pixel().0 * 86 / 100;
    let (main, bar) = root.split_horizontally(split);

    // Row 0 is drawn at the top, so y positions count down
    let y_names: Vec<String> = labels.iter().rev().cloned().collect();
    let extent = -0.5..(n as f64 - 0.5);
    let mut chart = cartesian(&main, &params.decor, extent.clone(), extent)?;
    draw_mesh(
        &mut chart,
        &params.decor,
        MeshOptions {
            x_categories: Some(labels),
            y_categories: Some(y_names.as_slice()),
            ..Default::default()
        },
    )?;

    let cells: Vec<(f64, f64, f64)> = matrix
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, &r)| (j as f64, (n - 1 - i) as f64, r))
        })
        .collect();

    let fill = |r: f64| {
        if r.is_nan() {
            NAN_COLOR
        } else {
            params.cmap.sample(norm(r))
        }
    };

    chart
        .draw_series(cells.iter().map(|&(x, y, r)| {
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], fill(r).filled())
        }))
        .draw_context("Failed to draw heatmap cells")?;

    if params.annot {
        let font_size = if n > 10 { 9 } else { 12 };
        chart
            .draw_series(cells.iter().map(|&(x, y, r)| {
                let ink = if is_dark(fill(r)) { WHITE } else { BLACK };
                let text = if r.is_nan() { "nan".to_string() } else { format!("{:.2}", r) };
                Text::new(
                    text,
                    (x, y),
                    (FONT, font_size)
                        .into_font()
                        .color(&ink)
                        .pos(Pos::new(HPos::Center, VPos::Center)),
                )
            }))
            .draw_context("Failed to draw annotations")?;
    }

    draw_colorbar(&bar, &params.cmap, vmin, vmax)
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cmap: &Colormap,
    vmin: f64,
    vmax: f64,
) -> Result<()> {
    // Too small to hold a bar and its labels
    let (w, h) = area.dim_in_pixel();
    if w < 60 || h < 120 {
        return Ok(());
    }

    let mut chart = ChartBuilder::on(area)
        .margin(5)
        .margin_top(45)
        .margin_bottom(50)
        .set_label_area_size(LabelAreaPosition::Right, 40)
        .build_cartesian_2d(0.0..1.0, vmin..vmax)
        .draw_context("Failed to build colorbar")?;

    let step = (vmax - vmin) / COLORBAR_STEPS as f64;
    chart
        .draw_series((0..COLORBAR_STEPS).map(|i| {
            let lo = vmin + i as f64 * step;
            let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
            Rectangle::new([(0.0, lo), (1.0, lo + step)], cmap.sample(t).filled())
        }))
        .draw_context("Failed to draw colorbar")?;

    let tick_fmt = |v: &f64| format_number((v * 100.0).round() / 100.0);
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&tick_fmt)
        .label_style((FONT, 10))
        .draw()
        .draw_context("Failed to draw colorbar axis")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::request::{ChartKind, Decorations, FigSize};

    fn params(columns: &[&str]) -> HeatmapParams {
        HeatmapParams {
            decor: Decorations {
                title: "Heatmap".to_string(),
                xlabel: "xlabel_here".to_string(),
                ylabel: "ylabel_here".to_string(),
                grid: true,
                figsize: FigSize::new(6.0, 4.5),
            },
            columns: columns.iter().map(|c| c.to_string()).collect(),
            annot: true,
            cmap: Colormap::by_name("viridis").unwrap(),
        }
    }

    fn table() -> Table {
        Table::new(vec![
            Column::numbers("a", &[1.0, 2.0, 3.0, 4.0]),
            Column::numbers("b", &[2.0, 4.0, 6.0, 8.0]),
            Column::numbers("flat", &[5.0, 5.0, 5.0, 5.0]),
            Column::parsed("name", &["w", "x", "y", "z"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_heatmap_correlated_columns() {
        let p = params(&["a", "b"]);
        let mut figure = Figure::new(ChartKind::Heatmap, &p.decor, 100).unwrap();
        draw(&mut figure, &table(), &p).unwrap();

        let Body::Heatmap { labels, matrix } = &figure.record().body else {
            panic!("Expected heatmap body");
        };
        assert_eq!(labels, &["a", "b"]);
        for row in matrix {
            for &r in row {
                assert!((r - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_heatmap_constant_column_is_nan() {
        let p = params(&["a", "flat"]);
        let mut figure = Figure::new(ChartKind::Heatmap, &p.decor, 100).unwrap();
        draw(&mut figure, &table(), &p).unwrap();
        let Body::Heatmap { matrix, .. } = &figure.record().body else {
            panic!("Expected heatmap body");
        };
        assert!(matrix[0][1].is_nan());
        assert!(matrix[1][1].is_nan());
    }

    #[test]
    fn test_heatmap_rejects_text_column() {
        let p = params(&["a", "name"]);
        let mut figure = Figure::new(ChartKind::Heatmap, &p.decor, 100).unwrap();
        let err = draw(&mut figure, &table(), &p).unwrap_err();
        assert!(matches!(err, ChartError::Render(_)));
        assert!(err.cause().contains("name"));
    }
}
