//! Entry point: plot_type lookup, parameter resolution, drawing and
//! encoding, with every failure turned into a `RenderFailure`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{debug, warn};
use serde_json::Value;

use crate::data::Table;
use crate::encode::{encode_jpeg, ImageArtifact};
use crate::error::{ChartError, RenderFailure};
use crate::figure::Figure;
use crate::render as renderers;
use crate::request::{self, ChartKind};
use crate::RenderOptions;

/// Render `request` against `table` into a JPEG.
///
/// Never panics; the figure allocated for the call is released on every
/// path, including failures.
pub fn render(
    table: &Table,
    request: &Value,
    options: &RenderOptions,
) -> Result<ImageArtifact, RenderFailure> {
    let figure = draw_figure(table, request, options)?;
    let kind = figure.record().kind;
    let (width, height) = (figure.width(), figure.height());

    let artifact = encode_jpeg(figure).map_err(|e| fail(kind, e))?;
    debug!(
        "rendered {} chart: {}x{} pixels, {} bytes",
        kind,
        width,
        height,
        artifact.len()
    );
    Ok(artifact)
}

/// Resolve and draw without encoding, leaving the figure open for
/// inspection.
pub fn draw_figure(
    table: &Table,
    request: &Value,
    options: &RenderOptions,
) -> Result<Figure, RenderFailure> {
    let kind = chart_kind(request).ok_or_else(|| {
        warn!("rejected chart request: invalid plot type");
        RenderFailure::unknown_kind()
    })?;
    debug!("dispatching {} chart", kind);

    // Keys were checked by chart_kind, so the request is an object
    let fields = request.as_object().cloned().unwrap_or_default();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let params = request::resolve(kind, &fields, table, options)?;
        let mut figure = Figure::new(kind, params.decorations(), options.dpi)?;
        renderers::draw(&mut figure, table, &params)?;
        Ok(figure)
    }));

    match outcome {
        Ok(Ok(figure)) => Ok(figure),
        Ok(Err(e)) => Err(fail(kind, e)),
        Err(panic) => Err(fail(kind, ChartError::Render(panic_message(panic.as_ref())))),
    }
}

fn chart_kind(request: &Value) -> Option<ChartKind> {
    request
        .as_object()?
        .get("plot_type")?
        .as_str()
        .and_then(ChartKind::from_tag)
}

fn fail(kind: ChartKind, error: ChartError) -> RenderFailure {
    let failure = RenderFailure::new(kind, error);
    warn!("{}", failure);
    failure
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("plotting backend panicked: {}", detail)
}
