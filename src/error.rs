use std::fmt::Display;

use crate::request::ChartKind;

/// Failure raised while resolving, drawing or encoding a single chart.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("render failure: {0}")]
    Render(String),

    #[error("encoding failure: {0}")]
    Encoding(String),

    #[error("unknown chart kind: {0}")]
    UnknownChartKind(String),
}

impl ChartError {
    /// The human-readable cause without the category prefix.
    pub fn cause(&self) -> &str {
        match self {
            ChartError::InvalidParameter(msg)
            | ChartError::Render(msg)
            | ChartError::Encoding(msg)
            | ChartError::UnknownChartKind(msg) => msg,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// Chart-kind-tagged failure returned by the dispatcher.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{kind} plot failed: {error}")]
pub struct RenderFailure {
    pub kind: String,
    pub error: ChartError,
}

impl RenderFailure {
    pub fn new(kind: ChartKind, error: ChartError) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            error,
        }
    }

    pub fn unknown_kind() -> Self {
        Self {
            kind: "unknown".to_string(),
            error: ChartError::UnknownChartKind("invalid plot type".to_string()),
        }
    }

    pub fn cause(&self) -> &str {
        self.error.cause()
    }
}

/// Failure while turning raw uploaded data into a `Table`.
#[derive(thiserror::Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    Invalid(String),

    #[error("Invalid file format '{0}'. Please upload a CSV or Excel file.")]
    InvalidFormat(String),
}

/// Failure surfaced by a `Session`.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("No file uploaded or no data provided for plotting")]
    NoTable,

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Render(#[from] RenderFailure),
}

/// Attach a short description to plotting backend errors, the way
/// `anyhow::Context` is used around drawing calls.
pub(crate) trait DrawContext<T> {
    fn draw_context(self, what: &str) -> Result<T>;
}

impl<T, E: Display> DrawContext<T> for std::result::Result<T, E> {
    fn draw_context(self, what: &str) -> Result<T> {
        self.map_err(|e| ChartError::Render(format!("{}: {}", what, e)))
    }
}
