use plotters::coord::Shift;
use plotters::prelude::*;

use crate::data::Table;
use crate::error::Result;
use crate::figure::{Body, Figure};
use crate::request::{Marker, ScatterParams};

use super::axis::XAxis;
use super::{cartesian, column, draw_markers, draw_mesh, numeric_column, padded_range, MeshOptions};

const POINT_SIZE: i32 = 4;

pub(super) fn draw(figure: &mut Figure, table: &Table, params: &ScatterParams) -> Result<()> {
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
    // Unlabeled points: the legend step finds nothing to show
    figure.set_legend(Vec::new());
    figure.set_body(Body::Scatter { points });
    Ok(())
}

fn plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    params: &ScatterParams,
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
            ..Default::default()
        },
    )?;

    draw_markers(&mut chart, points, Marker::Circle, params.color, POINT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::request::{ChartKind, Decorations, FigSize};

    #[test]
    fn test_scatter_points_and_no_legend() {
        let table = Table::new(vec![
            Column::numbers("a", &[0.5, 1.5, 2.5]),
            Column::parsed("b", &["2", "", "8"]),
        ])
        .unwrap();
        let params = ScatterParams {
            decor: Decorations {
                title: "Scatter Plot".to_string(),
                xlabel: "xlabel_here".to_string(),
                ylabel: "ylabel_here".to_string(),
                grid: false,
                figsize: FigSize::new(4.0, 3.0),
            },
            x: "a".to_string(),
            y: "b".to_string(),
            color: RGBColor(255, 0, 0),
        };
        let mut figure = Figure::new(ChartKind::Scatter, &params.decor, 50).unwrap();
        draw(&mut figure, &table, &params).unwrap();

        assert_eq!(
            figure.record().body,
            Body::Scatter { points: vec![(0.5, 2.0), (2.5, 8.0)] }
        );
        assert!(figure.record().legend.requested);
        assert!(figure.record().legend.entries.is_empty());
        // some pixel is pure red
        assert!(figure.pixels().chunks(3).any(|px| px == [255, 0, 0]));
    }
}
