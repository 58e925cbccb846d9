use std::f64::consts::{FRAC_PI_2, TAU};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use crate::data::Table;
use crate::error::{ChartError, DrawContext, Result};
use crate::figure::{Body, Figure};
use crate::palette::CATEGORY10;
use crate::request::PieParams;

use super::{column, numeric_column, FONT, TITLE_SIZE};

const SHADOW_OFFSET: f64 = 0.02;
const PCT_DISTANCE: f64 = 0.6;
const LABEL_DISTANCE: f64 = 1.1;

/// Wedges are laid out in pixel space; the pie has no cartesian axes.
pub(super) fn draw(figure: &mut Figure, table: &Table, params: &PieParams) -> Result<()> {
    let sizes = numeric_column(table, &params.sizes)?;
    let labels = column(table, &params.labels)?.labels();

    if sizes.iter().any(|v| v.is_nan()) {
        return Err(ChartError::Render(format!(
            "column '{}' has missing values",
            params.sizes
        )));
    }
    if sizes.iter().any(|&v| v < 0.0) {
        return Err(ChartError::Render("wedge sizes must be non-negative".to_string()));
    }
    let total: f64 = sizes.iter().sum();
    if !(total > 0.0) {
        return Err(ChartError::Render("wedge sizes must sum to a positive value".to_string()));
    }

    let fractions: Vec<f64> = sizes.iter().map(|v| v / total).collect();
    let explode = params.explode.clone().unwrap_or_default();

    figure.paint(|root| plot(root, params, &labels, &fractions, &explode))?;
    figure.set_legend(labels.clone());
    figure.set_body(Body::Pie { labels, fractions });
    Ok(())
}

struct Wedge {
    center: (f64, f64),
    start: f64,
    sweep: f64,
    color: RGBColor,
}

impl Wedge {
    fn mid(&self) -> f64 {
        self.start + self.sweep / 2.0
    }

    /// Point at `distance` from the wedge's own center along `angle`
    /// (counter-clockwise from 3 o'clock; pixel y grows downward).
    fn at(&self, angle: f64, distance: f64) -> (f64, f64) {
        (
            self.center.0 + distance * angle.cos(),
            self.center.1 - distance * angle.sin(),
        )
    }

    fn outline(&self, radius: f64, shift: (f64, f64)) -> Vec<(i32, i32)> {
        let steps = ((self.sweep.to_degrees()).ceil() as usize).max(2);
        let px = |(x, y): (f64, f64)| ((x + shift.0).round() as i32, (y + shift.1).round() as i32);

        let mut points = Vec::with_capacity(steps + 2);
        points.push(px(self.center));
        for i in 0..=steps {
            let angle = self.start + self.sweep * i as f64 / steps as f64;
            points.push(px(self.at(angle, radius)));
        }
        points
    }
}

fn plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    params: &PieParams,
    labels: &[String],
    fractions: &[f64],
    explode: &[f64],
) -> Result<()> {
    let area = root
        .titled(&params.decor.title, (FONT, TITLE_SIZE))
        .draw_context("Failed to draw title")?;
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as f64, h as f64);

    draw_axis_labels(&area, params, w, h)?;

    let max_explode = explode.iter().copied().fold(0.0f64, f64::max);
    let radius = w.min(h) * 0.36 / (1.0 + max_explode);
    let (cx, cy) = (w / 2.0, h / 2.0);

    let mut start = FRAC_PI_2;
    let wedges: Vec<Wedge> = fractions
        .iter()
        .enumerate()
        .map(|(i, &frac)| {
            let sweep = frac * TAU;
            let mid = start + sweep / 2.0;
            let offset = explode.get(i).copied().unwrap_or(0.0) * radius;
            let wedge = Wedge {
                center: (cx + offset * mid.cos(), cy - offset * mid.sin()),
                start,
                sweep,
                color: CATEGORY10[i % CATEGORY10.len()],
            };
            start += sweep;
            wedge
        })
        .collect();

    let shadow = (-SHADOW_OFFSET * radius, SHADOW_OFFSET * radius);
    for wedge in wedges.iter().filter(|w| w.sweep > 0.0) {
        area.draw(&Polygon::new(wedge.outline(radius, shadow), BLACK.mix(0.25).filled()))
            .draw_context("Failed to draw wedge shadow")?;
    }
    for wedge in wedges.iter().filter(|w| w.sweep > 0.0) {
        area.draw(&Polygon::new(wedge.outline(radius, (0.0, 0.0)), wedge.color.filled()))
            .draw_context("Failed to draw wedge")?;
    }

    for ((wedge, label), frac) in wedges.iter().zip(labels).zip(fractions) {
        let mid = wedge.mid();
        let (lx, ly) = wedge.at(mid, radius * LABEL_DISTANCE);
        let hpos = if mid.cos() >= 0.0 { HPos::Left } else { HPos::Right };
        let label_style = (FONT, 12).into_font().color(&BLACK).pos(Pos::new(hpos, VPos::Center));
        area.draw(&Text::new(label.clone(), (lx as i32, ly as i32), label_style))
            .draw_context("Failed to draw wedge label")?;

        let (px, py) = wedge.at(mid, radius * PCT_DISTANCE);
        let pct_style = (FONT, 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(format!("{:.1}%", frac * 100.0), (px as i32, py as i32), pct_style))
            .draw_context("Failed to draw percentage label")?;
    }

    draw_legend(&area, labels, w)
}

fn draw_axis_labels<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    params: &PieParams,
    w: f64,
    h: f64,
) -> Result<()> {
    let xlabel_style = (FONT, 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    area.draw(&Text::new(
        params.decor.xlabel.clone(),
        ((w / 2.0) as i32, h as i32 - 8),
        xlabel_style,
    ))
    .draw_context("Failed to draw x label")?;

    let ylabel_style = (FONT, 14)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(
        params.decor.ylabel.clone(),
        (8, (h / 2.0) as i32),
        ylabel_style,
    ))
    .draw_context("Failed to draw y label")
}

/// Legend box in the upper right corner: one colored square per wedge.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    labels: &[String],
    w: f64,
) -> Result<()> {
    if labels.is_empty() {
        return Ok(());
    }

    let style = TextStyle::from((FONT, 12).into_font()).color(&BLACK);
    let mut text_w = 0;
    for label in labels {
        let (tw, _) = area
            .estimate_text_size(label, &style)
            .draw_context("Failed to measure legend text")?;
        text_w = text_w.max(tw as i32);
    }

    let row = 18;
    let box_w = text_w + 36;
    let box_h = row * labels.len() as i32 + 8;
    let x0 = w as i32 - box_w - 10;
    let y0 = 10;

    area.draw(&Rectangle::new([(x0, y0), (x0 + box_w, y0 + box_h)], WHITE.mix(0.8).filled()))
        .draw_context("Failed to draw legend")?;
    area.draw(&Rectangle::new([(x0, y0), (x0 + box_w, y0 + box_h)], BLACK.stroke_width(1)))
        .draw_context("Failed to draw legend")?;

    for (i, label) in labels.iter().enumerate() {
        let y = y0 + 4 + row * i as i32;
        let color = CATEGORY10[i % CATEGORY10.len()];
        area.draw(&Rectangle::new([(x0 + 6, y + 3), (x0 + 18, y + 15)], color.filled()))
            .draw_context("Failed to draw legend entry")?;
        area.draw(&Text::new(
            label.clone(),
            (x0 + 24, y + 9),
            style.pos(Pos::new(HPos::Left, VPos::Center)),
        ))
        .draw_context("Failed to draw legend entry")?;
    }
    Ok(())
}
