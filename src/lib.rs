// Library exports for tableplot

pub mod csv_reader;
pub mod data;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod excel_reader;
pub mod figure;
pub mod palette;
pub mod render;
pub mod request;
pub mod session;
pub mod stats;

pub use data::{Cell, Column, Table};
pub use dispatch::{draw_figure, render};
pub use encode::{ImageArtifact, JPEG_MIME};
pub use error::{ChartError, IngestionError, RenderFailure, SessionError};
pub use figure::Figure;
pub use request::{ChartKind, ChartParams};
pub use session::Session;

use serde::Deserialize;

/// Rendering limits and resolution, loadable from JSON.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenderOptions {
    /// Pixels per `figsize` inch.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_max_bins")]
    pub max_bins: usize,
    /// Upper bound on width × height of a figure.
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
}

fn default_dpi() -> u32 { 100 }
fn default_max_bins() -> usize { 10_000 }
fn default_max_pixels() -> u64 { 40_000_000 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            max_bins: default_max_bins(),
            max_pixels: default_max_pixels(),
        }
    }
}
