use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{DrawContext, Result};
use crate::figure::{Body, Figure};
use crate::request::BarParams;

use super::axis::XAxis;
use super::{cartesian, draw_mesh, draw_series_legend, legend_label, padded_range, MeshOptions};

const BAR_WIDTH: f64 = 0.8;

/// Bars come straight from the request sequences, not from table columns.
pub(super) fn draw(figure: &mut Figure, params: &BarParams) -> Result<()> {
    let x = XAxis::from_cells(&params.x);

    figure.paint(|root| plot(root, params, &x))?;
    figure.set_legend(legend_label(&params.label).map(str::to_string).into_iter().collect());
    figure.set_body(Body::Bars {
        categories: params.x.iter().map(|c| c.label()).collect(),
        heights: params.heights.clone(),
    });
    Ok(())
}

fn plot<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, params: &BarParams, x: &XAxis) -> Result<()> {
    let x_range = x.range(x.positions().iter().copied(), BAR_WIDTH / 2.0);
    // Bars grow from zero, so zero is always in view
    let y_range = padded_range(params.heights.iter().copied().chain(std::iter::once(0.0)));

    let mut chart = cartesian(root, &params.decor, x_range, y_range)?;
    draw_mesh(
        &mut chart,
        &params.decor,
        MeshOptions {
            x_categories: x.categories(),
            plain_y: true,
            x_grid: false,
            ..Default::default()
        },
    )?;

    let fill = params.color.filled();
    let half = BAR_WIDTH / 2.0;
    let bars = x
        .positions()
        .iter()
        .zip(&params.heights)
        .filter(|(pos, _)| pos.is_finite())
        .map(|(&pos, &h)| Rectangle::new([(pos - half, 0.0), (pos + half, h)], fill));

    let color = params.color;
    let series = chart.draw_series(bars).draw_context("Failed to draw bars")?;
    let label = legend_label(&params.label);
    if let Some(label) = label {
        series
            .label(label)
            .legend(move |(lx, ly)| Rectangle::new([(lx, ly - 5), (lx + 16, ly + 5)], color.filled()));
    }

    draw_series_legend(&mut chart, label.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cell;
    use crate::request::{ChartKind, Decorations, FigSize};

    fn params(x: Vec<Cell>, heights: Vec<f64>) -> BarParams {
        BarParams {
            decor: Decorations {
                title: "Bar Plot".to_string(),
                xlabel: "xlabel_here".to_string(),
                ylabel: "ylabel_here".to_string(),
                grid: true,
                figsize: FigSize::new(4.0, 3.0),
            },
            x,
            heights,
            color: RGBColor(0, 0, 255),
            label: "label_here".to_string(),
        }
    }

    #[test]
    fn test_bar_categories() {
        let p = params(
            vec![Cell::Text("apples".into()), Cell::Text("pears".into())],
            vec![3.0, 1_500_000.0],
        );
        let mut figure = Figure::new(ChartKind::Bar, &p.decor, 50).unwrap();
        draw(&mut figure, &p).unwrap();
        assert_eq!(
            figure.record().body,
            Body::Bars {
                categories: vec!["apples".to_string(), "pears".to_string()],
                heights: vec![3.0, 1_500_000.0],
            }
        );
        assert_eq!(figure.record().legend.entries, vec!["label_here"]);
    }

    #[test]
    fn test_bar_numeric_positions_and_negative_heights() {
        let p = params(vec![Cell::Number(1.0), Cell::Number(2.5)], vec![-2.0, 4.0]);
        let mut figure = Figure::new(ChartKind::Bar, &p.decor, 50).unwrap();
        draw(&mut figure, &p).unwrap();
        assert!(figure.pixels().iter().any(|&b| b != 255));
    }

    #[test]
    fn test_bar_empty_label_is_left_out_of_legend() {
        let mut p = params(vec![Cell::Text("a".into())], vec![1.0]);
        p.label = String::new();
        let mut figure = Figure::new(ChartKind::Bar, &p.decor, 50).unwrap();
        draw(&mut figure, &p).unwrap();
        assert!(figure.record().legend.requested);
        assert!(figure.record().legend.entries.is_empty());
    }

    #[test]
    fn test_bar_empty_sequences() {
        let p = params(vec![], vec![]);
        let mut figure = Figure::new(ChartKind::Bar, &p.decor, 50).unwrap();
        assert!(draw(&mut figure, &p).is_ok());
    }
}
