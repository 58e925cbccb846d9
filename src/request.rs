// Chart request resolution: loosely-typed JSON request -> typed, defaulted parameters

use std::fmt;

use plotters::style::RGBColor;
use serde_json::{Map, Value};

use crate::data::{Cell, Table};
use crate::error::{ChartError, Result};
use crate::palette::{self, Colormap, Palette};
use crate::RenderOptions;

/// The eight supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Histogram,
    Pie,
    Heatmap,
    Boxplot,
    Violin,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Pie,
        ChartKind::Heatmap,
        ChartKind::Boxplot,
        ChartKind::Violin,
    ];

    /// Parse the `plot_type` discriminator.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Histogram => "histogram",
            ChartKind::Pie => "pie",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Boxplot => "boxplot",
            ChartKind::Violin => "violin",
        }
    }

    fn default_title(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Plot",
            ChartKind::Bar => "Bar Plot",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Histogram => "Histogram",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::Boxplot => "Boxplot",
            ChartKind::Violin => "Violinplot",
        }
    }

    fn default_figsize(&self) -> FigSize {
        match self {
            ChartKind::Line | ChartKind::Bar | ChartKind::Scatter | ChartKind::Histogram => {
                FigSize::new(8.0, 4.0)
            }
            ChartKind::Pie => FigSize::new(8.0, 8.0),
            ChartKind::Heatmap | ChartKind::Boxplot | ChartKind::Violin => FigSize::new(8.0, 6.0),
        }
    }

    fn default_ylabel(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "Frequency",
            _ => "ylabel_here",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigSize {
    pub width: f64,
    pub height: f64,
}

impl FigSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions at the given resolution.
    pub fn pixels(&self, dpi: u32) -> (u32, u32) {
        let px = |inches: f64| (inches * dpi as f64).round().max(1.0) as u32;
        (px(self.width), px(self.height))
    }
}

/// Title, axis labels, grid and size shared by every chart kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorations {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub grid: bool,
    pub figsize: FigSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyleKind {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    None,
}

impl LineStyleKind {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "-" | "solid" => Some(LineStyleKind::Solid),
            "--" | "dashed" => Some(LineStyleKind::Dashed),
            "-." | "dashdot" => Some(LineStyleKind::DashDot),
            ":" | "dotted" => Some(LineStyleKind::Dotted),
            "" | " " | "None" | "none" => Some(LineStyleKind::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Point,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
    Plus,
    None,
}

impl Marker {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "o" => Some(Marker::Circle),
            "." => Some(Marker::Point),
            "s" => Some(Marker::Square),
            "^" => Some(Marker::TriangleUp),
            "v" => Some(Marker::TriangleDown),
            "D" | "d" => Some(Marker::Diamond),
            "x" => Some(Marker::Cross),
            "+" => Some(Marker::Plus),
            "" | " " | "None" | "none" => Some(Marker::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineParams {
    pub decor: Decorations,
    pub x: String,
    pub y: String,
    pub color: RGBColor,
    pub linestyle: LineStyleKind,
    pub marker: Marker,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarParams {
    pub decor: Decorations,
    /// Category (text) or position (number) of each bar.
    pub x: Vec<Cell>,
    pub heights: Vec<f64>,
    pub color: RGBColor,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterParams {
    pub decor: Decorations,
    pub x: String,
    pub y: String,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramParams {
    pub decor: Decorations,
    pub column: String,
    pub bins: usize,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieParams {
    pub decor: Decorations,
    pub sizes: String,
    pub labels: String,
    pub explode: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapParams {
    pub decor: Decorations,
    pub columns: Vec<String>,
    pub annot: bool,
    pub cmap: Colormap,
}

/// Shared by boxplot and violin.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionParams {
    pub decor: Decorations,
    pub columns: Vec<String>,
    pub palette: Palette,
}

/// Resolved parameters, one variant per chart kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartParams {
    Line(LineParams),
    Bar(BarParams),
    Scatter(ScatterParams),
    Histogram(HistogramParams),
    Pie(PieParams),
    Heatmap(HeatmapParams),
    Boxplot(DistributionParams),
    Violin(DistributionParams),
}

impl ChartParams {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartParams::Line(_) => ChartKind::Line,
            ChartParams::Bar(_) => ChartKind::Bar,
            ChartParams::Scatter(_) => ChartKind::Scatter,
            ChartParams::Histogram(_) => ChartKind::Histogram,
            ChartParams::Pie(_) => ChartKind::Pie,
            ChartParams::Heatmap(_) => ChartKind::Heatmap,
            ChartParams::Boxplot(_) => ChartKind::Boxplot,
            ChartParams::Violin(_) => ChartKind::Violin,
        }
    }

    pub fn decorations(&self) -> &Decorations {
        match self {
            ChartParams::Line(p) => &p.decor,
            ChartParams::Bar(p) => &p.decor,
            ChartParams::Scatter(p) => &p.decor,
            ChartParams::Histogram(p) => &p.decor,
            ChartParams::Pie(p) => &p.decor,
            ChartParams::Heatmap(p) => &p.decor,
            ChartParams::Boxplot(p) | ChartParams::Violin(p) => &p.decor,
        }
    }
}

/// Resolve a raw request into typed parameters for `kind`.
pub fn resolve(
    kind: ChartKind,
    request: &Map<String, Value>,
    table: &Table,
    options: &RenderOptions,
) -> Result<ChartParams> {
    let fields = Fields { map: request, table };
    let decor = resolve_decorations(kind, &fields, options)?;

    let params = match kind {
        ChartKind::Line => ChartParams::Line(LineParams {
            x: fields.required_column("x_data")?,
            y: fields.required_column("y_data")?,
            color: fields.color_or("color", "blue")?,
            linestyle: fields.parsed_or("linestyle", "-", LineStyleKind::parse)?,
            marker: fields.parsed_or("marker", "o", Marker::parse)?,
            label: fields.string_or("label", "label_here")?,
            decor,
        }),
        ChartKind::Bar => {
            let x = fields.category_array("x_data")?;
            let heights = fields.required_number_array("y_data")?;
            if x.len() != heights.len() {
                return Err(ChartError::InvalidParameter(format!(
                    "fields 'x_data' and 'y_data' must have the same length (x: {}, y: {})",
                    x.len(),
                    heights.len()
                )));
            }
            ChartParams::Bar(BarParams {
                x,
                heights,
                color: fields.color_or("color", "blue")?,
                label: fields.string_or("label", "label_here")?,
                decor,
            })
        }
        ChartKind::Scatter => ChartParams::Scatter(ScatterParams {
            x: fields.required_column("x_data")?,
            y: fields.required_column("y_data")?,
            color: fields.color_or("color", "blue")?,
            decor,
        }),
        ChartKind::Histogram => ChartParams::Histogram(HistogramParams {
            column: fields.required_column("data")?,
            bins: fields.positive_int_or("bins", 20, options.max_bins)?,
            color: fields.color_or("color", "blue")?,
            decor,
        }),
        ChartKind::Pie => {
            let sizes = fields.required_column("sizes")?;
            let labels = fields.required_column("labels")?;
            let explode = fields.number_array("explode")?;
            if let Some(offsets) = &explode {
                if offsets.len() != table.num_rows() {
                    return Err(ChartError::InvalidParameter(format!(
                        "field 'explode' has {} values but there are {} slices",
                        offsets.len(),
                        table.num_rows()
                    )));
                }
            }
            ChartParams::Pie(PieParams {
                sizes,
                labels,
                explode,
                decor,
            })
        }
        ChartKind::Heatmap => ChartParams::Heatmap(HeatmapParams {
            columns: fields.columns_or(|_| true)?,
            annot: fields.bool_or("annot", true)?,
            cmap: fields.parsed_or("cmap", "viridis", Colormap::by_name)?,
            decor,
        }),
        ChartKind::Boxplot | ChartKind::Violin => {
            let params = DistributionParams {
                columns: fields.columns_or(|name| {
                    table.column(name).map(|c| c.is_numeric()).unwrap_or(false)
                })?,
                palette: Palette::parse("color", &fields.string_or("color", "coolwarm")?)?,
                decor,
            };
            if kind == ChartKind::Boxplot {
                ChartParams::Boxplot(params)
            } else {
                ChartParams::Violin(params)
            }
        }
    };

    Ok(params)
}

fn resolve_decorations(
    kind: ChartKind,
    fields: &Fields<'_>,
    options: &RenderOptions,
) -> Result<Decorations> {
    let figsize = fields.figsize_or(kind.default_figsize())?;
    let (w, h) = figsize.pixels(options.dpi);
    if w as u64 * h as u64 > options.max_pixels {
        return Err(ChartError::InvalidParameter(format!(
            "field 'figsize' gives a {}x{} pixel figure, above the limit of {} pixels",
            w, h, options.max_pixels
        )));
    }

    Ok(Decorations {
        title: fields.string_or("title", kind.default_title())?,
        xlabel: fields.string_or("xlabel", "xlabel_here")?,
        ylabel: fields.string_or("ylabel", kind.default_ylabel())?,
        grid: fields.bool_or("grid", true)?,
        figsize,
    })
}

/// Typed accessors over the request map. JSON `null` counts as absent.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    table: &'a Table,
}

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn string_or(&self, key: &str, default: &str) -> Result<String> {
        match self.get(key) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(wrong_type(key, "a string", other)),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(wrong_type(key, "a boolean", other)),
        }
    }

    /// A string field mapped through `parse`; unknown values are rejected.
    fn parsed_or<T>(&self, key: &str, default: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
        let raw = self.string_or(key, default)?;
        parse(&raw).ok_or_else(|| {
            ChartError::InvalidParameter(format!("field '{}': unsupported value '{}'", key, raw))
        })
    }

    fn color_or(&self, key: &str, default: &str) -> Result<RGBColor> {
        palette::parse_color(key, &self.string_or(key, default)?)
    }

    fn positive_int_or(&self, key: &str, default: usize, max: usize) -> Result<usize> {
        let value = match self.get(key) {
            None => return Ok(default),
            Some(v) => v,
        };
        let n = value
            .as_u64()
            .filter(|&n| n > 0)
            .ok_or_else(|| wrong_type(key, "a positive integer", value))?;
        if n > max as u64 {
            return Err(ChartError::InvalidParameter(format!(
                "field '{}' is {}, above the limit of {}",
                key, n, max
            )));
        }
        Ok(n as usize)
    }

    fn figsize_or(&self, default: FigSize) -> Result<FigSize> {
        let value = match self.get("figsize") {
            None => return Ok(default),
            Some(v) => v,
        };
        let dims: Vec<f64> = value
            .as_array()
            .filter(|a| a.len() == 2)
            .and_then(|a| a.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>())
            .filter(|d| d.iter().all(|v| v.is_finite() && *v > 0.0))
            .ok_or_else(|| wrong_type("figsize", "a pair of positive numbers", value))?;
        Ok(FigSize::new(dims[0], dims[1]))
    }

    /// A required field naming a table column. Returns the table's spelling.
    fn required_column(&self, key: &str) -> Result<String> {
        let name = match self.get(key) {
            None => {
                return Err(ChartError::InvalidParameter(format!(
                    "missing required field '{}'",
                    key
                )))
            }
            Some(Value::String(s)) => s,
            Some(other) => return Err(wrong_type(key, "a column name", other)),
        };
        self.lookup_column(key, name)
    }

    fn lookup_column(&self, key: &str, name: &str) -> Result<String> {
        self.table
            .column(name)
            .map(|c| c.name().to_string())
            .ok_or_else(|| {
                ChartError::InvalidParameter(format!(
                    "column '{}' not found in table (field '{}')",
                    name, key
                ))
            })
    }

    /// The `columns` field, or every column accepted by `default_filter`.
    fn columns_or(&self, default_filter: impl Fn(&str) -> bool) -> Result<Vec<String>> {
        let value = match self.get("columns") {
            None => {
                let names: Vec<String> = self
                    .table
                    .column_names()
                    .into_iter()
                    .filter(|n| default_filter(n))
                    .collect();
                if names.is_empty() {
                    return Err(ChartError::InvalidParameter(
                        "table has no columns to plot".to_string(),
                    ));
                }
                return Ok(names);
            }
            Some(v) => v,
        };
        let items = value
            .as_array()
            .ok_or_else(|| wrong_type("columns", "an array of column names", value))?;
        if items.is_empty() {
            return Err(ChartError::InvalidParameter(
                "field 'columns' must name at least one column".to_string(),
            ));
        }
        items
            .iter()
            .map(|item| match item {
                Value::String(name) => self.lookup_column("columns", name),
                other => Err(wrong_type("columns", "an array of column names", other)),
            })
            .collect()
    }

    fn number_array(&self, key: &str) -> Result<Option<Vec<f64>>> {
        let value = match self.get(key) {
            None => return Ok(None),
            Some(v) => v,
        };
        value
            .as_array()
            .and_then(|a| a.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>())
            .map(Some)
            .ok_or_else(|| wrong_type(key, "an array of numbers", value))
    }

    fn required_number_array(&self, key: &str) -> Result<Vec<f64>> {
        self.number_array(key)?.ok_or_else(|| {
            ChartError::InvalidParameter(format!("missing required field '{}'", key))
        })
    }

    /// An array of strings and/or numbers.
    fn category_array(&self, key: &str) -> Result<Vec<Cell>> {
        let value = self.get(key).ok_or_else(|| {
            ChartError::InvalidParameter(format!("missing required field '{}'", key))
        })?;
        let items = value
            .as_array()
            .ok_or_else(|| wrong_type(key, "an array of strings or numbers", value))?;
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(Cell::Text(s.clone())),
                Value::Number(n) => n
                    .as_f64()
                    .map(Cell::Number)
                    .ok_or_else(|| wrong_type(key, "an array of strings or numbers", item)),
                other => Err(wrong_type(key, "an array of strings or numbers", other)),
            })
            .collect()
    }
}

fn wrong_type(key: &str, expected: &str, got: &Value) -> ChartError {
    ChartError::InvalidParameter(format!("field '{}' must be {}, got {}", key, expected, got))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use serde_json::json;

    fn table() -> Table {
        Table::new(vec![
            Column::numbers("x", &[1.0, 2.0, 3.0]),
            Column::numbers("y", &[10.0, 20.0, 30.0]),
            Column::parsed("name", &["a", "b", "c"]),
        ])
        .unwrap()
    }

    fn resolve_json(kind: ChartKind, request: Value) -> Result<ChartParams> {
        let map = request.as_object().cloned().unwrap();
        resolve(kind, &map, &table(), &RenderOptions::default())
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ChartKind::from_tag("unsupported_kind"), None);
        assert_eq!(ChartKind::from_tag("Line"), None);
    }

    #[test]
    fn test_line_defaults() {
        let params = resolve_json(ChartKind::Line, json!({"x_data": "x", "y_data": "y"})).unwrap();
        let ChartParams::Line(p) = params else {
            panic!("Expected line params");
        };
        assert_eq!(p.decor.title, "Line Plot");
        assert_eq!(p.decor.xlabel, "xlabel_here");
        assert_eq!(p.decor.ylabel, "ylabel_here");
        assert!(p.decor.grid);
        assert_eq!(p.decor.figsize, FigSize::new(8.0, 4.0));
        assert_eq!(p.color, RGBColor(0, 0, 255));
        assert_eq!(p.linestyle, LineStyleKind::Solid);
        assert_eq!(p.marker, Marker::Circle);
        assert_eq!(p.label, "label_here");
    }

    #[test]
    fn test_line_missing_column_names_it() {
        let err = resolve_json(ChartKind::Line, json!({"x_data": "x", "y_data": "nope"})).unwrap_err();
        assert!(matches!(err, ChartError::InvalidParameter(_)));
        assert!(err.cause().contains("nope"));
    }

    #[test]
    fn test_line_missing_field() {
        let err = resolve_json(ChartKind::Line, json!({"x_data": "x"})).unwrap_err();
        assert!(err.cause().contains("y_data"));
    }

    #[test]
    fn test_column_name_takes_table_spelling() {
        let params = resolve_json(ChartKind::Scatter, json!({"x_data": "X", "y_data": "y"})).unwrap();
        let ChartParams::Scatter(p) = params else {
            panic!("Expected scatter params");
        };
        assert_eq!(p.x, "x");
    }

    #[test]
    fn test_histogram_defaults_and_bins() {
        let ChartParams::Histogram(p) = resolve_json(ChartKind::Histogram, json!({"data": "x"})).unwrap() else {
            panic!("Expected histogram params");
        };
        assert_eq!(p.bins, 20);
        assert_eq!(p.decor.ylabel, "Frequency");

        for bad in [json!(0), json!(-3), json!(2.5), json!("10"), json!(1_000_000)] {
            let err = resolve_json(ChartKind::Histogram, json!({"data": "x", "bins": bad})).unwrap_err();
            assert!(matches!(err, ChartError::InvalidParameter(_)), "bins accepted");
        }
    }

    #[test]
    fn test_present_but_invalid_values_are_not_coerced() {
        let cases = [
            json!({"x_data": "x", "y_data": "y", "grid": "yes"}),
            json!({"x_data": "x", "y_data": "y", "title": 5}),
            json!({"x_data": "x", "y_data": "y", "figsize": [8]}),
            json!({"x_data": "x", "y_data": "y", "figsize": [8, -1]}),
            json!({"x_data": "x", "y_data": "y", "color": "not-a-color"}),
            json!({"x_data": "x", "y_data": "y", "linestyle": "~~"}),
            json!({"x_data": "x", "y_data": "y", "marker": "?"}),
        ];
        for request in cases {
            let result = resolve_json(ChartKind::Line, request.clone());
            assert!(
                matches!(result, Err(ChartError::InvalidParameter(_))),
                "accepted {}",
                request
            );
        }
    }

    #[test]
    fn test_null_fields_use_defaults() {
        let params = resolve_json(ChartKind::Line, json!({"x_data": "x", "y_data": "y", "title": null})).unwrap();
        assert_eq!(params.decorations().title, "Line Plot");
    }

    #[test]
    fn test_figsize_pixel_limit() {
        let err = resolve_json(
            ChartKind::Line,
            json!({"x_data": "x", "y_data": "y", "figsize": [1000, 1000]}),
        )
        .unwrap_err();
        assert!(err.cause().contains("figsize"));
    }

    #[test]
    fn test_bar_uses_request_sequences() {
        let ChartParams::Bar(p) = resolve_json(
            ChartKind::Bar,
            json!({"x_data": ["a", "b", 3], "y_data": [1, 2.5, 3]}),
        )
        .unwrap() else {
            panic!("Expected bar params");
        };
        assert_eq!(p.x[0], Cell::Text("a".to_string()));
        assert_eq!(p.x[2], Cell::Number(3.0));
        assert_eq!(p.heights, vec![1.0, 2.5, 3.0]);
        assert_eq!(p.decor.title, "Bar Plot");
    }

    #[test]
    fn test_bar_rejects_mismatch_and_column_names() {
        let err = resolve_json(ChartKind::Bar, json!({"x_data": ["a"], "y_data": [1, 2]})).unwrap_err();
        assert!(err.cause().contains("same length"));
        let err = resolve_json(ChartKind::Bar, json!({"x_data": "x", "y_data": "y"})).unwrap_err();
        assert!(err.cause().contains("x_data"));
        let err = resolve_json(ChartKind::Bar, json!({"x_data": ["a"], "y_data": ["1"]})).unwrap_err();
        assert!(err.cause().contains("y_data"));
    }

    #[test]
    fn test_pie_defaults_and_explode_length() {
        let ChartParams::Pie(p) = resolve_json(ChartKind::Pie, json!({"sizes": "x", "labels": "name"})).unwrap() else {
            panic!("Expected pie params");
        };
        assert_eq!(p.decor.figsize, FigSize::new(8.0, 8.0));
        assert_eq!(p.explode, None);

        let err = resolve_json(
            ChartKind::Pie,
            json!({"sizes": "x", "labels": "name", "explode": [0.1, 0.0]}),
        )
        .unwrap_err();
        assert!(err.cause().contains("explode"));
    }

    #[test]
    fn test_heatmap_columns_default_to_all() {
        let ChartParams::Heatmap(p) = resolve_json(ChartKind::Heatmap, json!({})).unwrap() else {
            panic!("Expected heatmap params");
        };
        assert_eq!(p.columns, vec!["x", "y", "name"]);
        assert!(p.annot);
        assert_eq!(p.cmap.name(), "viridis");
        assert_eq!(p.decor.figsize, FigSize::new(8.0, 6.0));
    }

    #[test]
    fn test_heatmap_rejects_bad_columns() {
        assert!(resolve_json(ChartKind::Heatmap, json!({"columns": []})).is_err());
        assert!(resolve_json(ChartKind::Heatmap, json!({"columns": "x"})).is_err());
        assert!(resolve_json(ChartKind::Heatmap, json!({"columns": ["x", "ghost"]})).is_err());
        assert!(resolve_json(ChartKind::Heatmap, json!({"cmap": "sparkles"})).is_err());
    }

    #[test]
    fn test_boxplot_default_columns_are_numeric() {
        let ChartParams::Boxplot(p) = resolve_json(ChartKind::Boxplot, json!({})).unwrap() else {
            panic!("Expected boxplot params");
        };
        assert_eq!(p.columns, vec!["x", "y"]);
        assert!(matches!(p.palette, Palette::Map(m) if m.name() == "coolwarm"));
    }

    #[test]
    fn test_violin_title() {
        let params = resolve_json(ChartKind::Violin, json!({"columns": ["x"]})).unwrap();
        assert_eq!(params.kind(), ChartKind::Violin);
        assert_eq!(params.decorations().title, "Violinplot");
    }
}
