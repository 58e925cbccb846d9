//! The rendering surface: an owned RGB pixel buffer plus a record of what
//! was drawn on it.

use std::sync::atomic::{AtomicUsize, Ordering};

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{ChartError, DrawContext, Result};
use crate::request::{ChartKind, Decorations};
use crate::stats::{BoxStats, Density, Histogram};

static LIVE_FIGURES: AtomicUsize = AtomicUsize::new(0);

/// Legend state after the legend step has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    /// The legend step was executed.
    pub requested: bool,
    /// Labels shown in the legend box; empty means no box was drawn.
    pub entries: Vec<String>,
}

/// Data that ended up in the chart body, for inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Line { points: Vec<(f64, f64)> },
    Bars { categories: Vec<String>, heights: Vec<f64> },
    Scatter { points: Vec<(f64, f64)> },
    Histogram(Histogram),
    Pie { labels: Vec<String>, fractions: Vec<f64> },
    Heatmap { labels: Vec<String>, matrix: Vec<Vec<f64>> },
    Boxes { columns: Vec<String>, stats: Vec<Option<BoxStats>> },
    Violins { columns: Vec<String>, densities: Vec<Density> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureRecord {
    pub kind: ChartKind,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub grid: bool,
    pub legend: Legend,
    pub body: Body,
}

/// One rendering surface. Counted while alive; the count drops when the
/// figure is dropped, whichever path releases it.
pub struct Figure {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    record: FigureRecord,
}

impl Figure {
    /// Allocate a white surface sized `figsize × dpi`.
    pub fn new(kind: ChartKind, decor: &Decorations, dpi: u32) -> Result<Self> {
        let (width, height) = decor.figsize.pixels(dpi);
        let len = (width as u64)
            .checked_mul(height as u64)
            .and_then(|px| px.checked_mul(3))
            .and_then(|bytes| usize::try_from(bytes).ok())
            .ok_or_else(|| {
                ChartError::Render(format!("figure of {}x{} pixels is too large", width, height))
            })?;

        LIVE_FIGURES.fetch_add(1, Ordering::SeqCst);
        Ok(Figure {
            buffer: vec![255u8; len],
            width,
            height,
            record: FigureRecord {
                kind,
                title: decor.title.clone(),
                xlabel: decor.xlabel.clone(),
                ylabel: decor.ylabel.clone(),
                grid: decor.grid,
                legend: Legend::default(),
                body: Body::Empty,
            },
        })
    }

    /// Drawing area over the whole buffer.
    pub fn root(&mut self) -> DrawingArea<BitMapBackend<'_>, Shift> {
        BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height)).into_drawing_area()
    }

    /// Clear to white, run `draw` on the root area and present it.
    pub(crate) fn paint<F>(&mut self, draw: F) -> Result<()>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
    {
        let root = self.root();
        root.fill(&WHITE).draw_context("Failed to fill background")?;
        draw(&root)?;
        root.present().draw_context("Failed to present drawing")
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB8 pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    pub fn record(&self) -> &FigureRecord {
        &self.record
    }

    pub(crate) fn set_body(&mut self, body: Body) {
        self.record.body = body;
    }

    pub(crate) fn set_legend(&mut self, entries: Vec<String>) {
        self.record.legend = Legend {
            requested: true,
            entries,
        };
    }

    /// Number of figures currently alive in this process.
    pub fn live_count() -> usize {
        LIVE_FIGURES.load(Ordering::SeqCst)
    }
}

impl Drop for Figure {
    fn drop(&mut self) {
        LIVE_FIGURES.fetch_sub(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Figure")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("record", &self.record)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::FigSize;

    fn decor(w: f64, h: f64) -> Decorations {
        Decorations {
            title: "t".to_string(),
            xlabel: "x".to_string(),
            ylabel: "y".to_string(),
            grid: true,
            figsize: FigSize::new(w, h),
        }
    }

    #[test]
    fn test_figure_dimensions_follow_dpi() {
        let fig = Figure::new(ChartKind::Line, &decor(8.0, 4.0), 100).unwrap();
        assert_eq!((fig.width(), fig.height()), (800, 400));
        assert_eq!(fig.pixels().len(), 800 * 400 * 3);
        assert!(fig.pixels().iter().all(|&b| b == 255));
        assert_eq!(fig.record().title, "t");
        assert_eq!(fig.record().body, Body::Empty);
        assert!(!fig.record().legend.requested);
    }

    #[test]
    fn test_root_draws_into_buffer() {
        let mut fig = Figure::new(ChartKind::Scatter, &decor(0.1, 0.1), 100).unwrap();
        {
            let root = fig.root();
            root.fill(&BLACK).unwrap();
            root.present().unwrap();
        }
        assert!(fig.pixels().iter().all(|&b| b == 0));
    }
}
