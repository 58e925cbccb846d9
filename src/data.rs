use std::io::Read;

use serde_json::Value;

use crate::csv_reader;
use crate::excel_reader;
use crate::error::IngestionError;

/// A single table value as ingested.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

impl Cell {
    /// Type a raw text field: numbers, missing markers, otherwise text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed) {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Display form used for categorical axes and pie labels.
    pub fn label(&self) -> String {
        match self {
            Cell::Number(v) => format_number(*v),
            Cell::Text(s) => s.clone(),
            Cell::Missing => "nan".to_string(),
        }
    }
}

/// Format a number without a trailing `.0` for integral values.
pub(crate) fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Build a numeric column from plain values.
    pub fn numbers(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().map(|&v| Cell::Number(v)).collect())
    }

    /// Build a text column, typing each entry the way ingestion does.
    pub fn parsed(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(name, values.iter().map(|v| Cell::parse(v)).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when no cell holds text. Missing cells do not count against it.
    pub fn is_numeric(&self) -> bool {
        !self.cells.iter().any(|c| matches!(c, Cell::Text(_)))
    }

    /// Numeric view of the column, with missing cells as NaN.
    /// Returns `None` when any cell holds text.
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        self.cells
            .iter()
            .map(|c| match c {
                Cell::Number(v) => Some(*v),
                Cell::Missing => Some(f64::NAN),
                Cell::Text(_) => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.cells.iter().map(Cell::label).collect()
    }
}

/// In-memory tabular dataset. All columns share the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, IngestionError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(IngestionError::Invalid(format!(
                "column '{}' has {} values, expected {}",
                bad.name(),
                bad.len(),
                rows
            )));
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(IngestionError::Invalid(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Build a table from a header row and string rows, typing every cell.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, IngestionError> {
        let headers = dedup_headers(headers);
        let mut cells: Vec<Vec<Cell>> = vec![Vec::with_capacity(rows.len()); headers.len()];

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(IngestionError::Invalid(format!(
                    "row {} has {} fields, expected {}",
                    row_idx + 1,
                    row.len(),
                    headers.len()
                )));
            }
            for (col_cells, raw) in cells.iter_mut().zip(row) {
                col_cells.push(Cell::parse(raw));
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Self::new(columns)
    }

    /// Create a table from a JSON array of objects
    pub fn from_json(value: &Value) -> Result<Self, IngestionError> {
        let array = value.as_array().ok_or_else(|| {
            IngestionError::Invalid("Input data must be a JSON array of objects".to_string())
        })?;

        if array.is_empty() {
            return Err(IngestionError::Invalid("Input data array is empty".to_string()));
        }

        // Headers come from the first object, in its key order
        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| IngestionError::Invalid("Items in array must be objects".to_string()))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut cells: Vec<Vec<Cell>> = vec![Vec::with_capacity(array.len()); headers.len()];
        for item in array {
            let obj = item.as_object().ok_or_else(|| {
                IngestionError::Invalid("Items in array must be objects".to_string())
            })?;

            for (header, col_cells) in headers.iter().zip(cells.iter_mut()) {
                let cell = match obj.get(header) {
                    Some(Value::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
                    Some(Value::String(s)) => Cell::parse(s),
                    Some(Value::Bool(b)) => Cell::Text(b.to_string()),
                    Some(Value::Null) | None => Cell::Missing,
                    _ => {
                        return Err(IngestionError::Invalid(format!(
                            "Unsupported value type for field '{}'",
                            header
                        )))
                    }
                };
                col_cells.push(cell);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Self::new(columns)
    }

    /// Parse an uploaded file, picking the reader from its extension.
    pub fn from_upload<R: Read>(file_name: &str, reader: R) -> Result<Self, IngestionError> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            csv_reader::read_csv(reader)
        } else if lower.ends_with(".tsv") {
            csv_reader::read_delimited(reader, b'\t')
        } else if lower.ends_with(".json") {
            let value: Value = serde_json::from_reader(reader)?;
            Self::from_json(&value)
        } else if lower.ends_with(".xls") || lower.ends_with(".xlsx") {
            excel_reader::read_spreadsheet(reader)
        } else {
            Err(IngestionError::InvalidFormat(file_name.to_string()))
        }
    }

    /// Look a column up by exact name, falling back to a case-insensitive match.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Give blank headers a placeholder name and suffix repeated ones.
fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(headers.len());
    for (i, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            header.trim().to_string()
        };
        let mut name = base.clone();
        let mut n = 1;
        while out.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }
        out.push(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("3.5"), Cell::Number(3.5));
        assert_eq!(Cell::parse(" 7 "), Cell::Number(7.0));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("NA"), Cell::Missing);
        assert_eq!(Cell::parse("abc"), Cell::Text("abc".to_string()));
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".to_string()));
    }

    #[test]
    fn test_cell_label() {
        assert_eq!(Cell::Number(3.0).label(), "3");
        assert_eq!(Cell::Number(2.5).label(), "2.5");
        assert_eq!(Cell::Text("x".into()).label(), "x");
    }

    #[test]
    fn test_from_rows() {
        let table = Table::from_rows(
            strings(&["x", "y"]),
            vec![strings(&["1", "a"]), strings(&["2", "b"])],
        )
        .unwrap();
        assert_eq!(table.num_rows(), 2);
        assert!(table.column("x").unwrap().is_numeric());
        assert!(!table.column("y").unwrap().is_numeric());
    }

    #[test]
    fn test_from_rows_ragged() {
        let result = Table::from_rows(strings(&["x", "y"]), vec![strings(&["1"])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unequal_columns_rejected() {
        let result = Table::new(vec![
            Column::numbers("a", &[1.0, 2.0]),
            Column::numbers("b", &[1.0]),
        ]);
        assert!(result.unwrap_err().to_string().contains("column 'b'"));
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let table = Table::from_rows(strings(&["a", "a", ""]), vec![strings(&["1", "2", "3"])]).unwrap();
        assert_eq!(table.column_names(), vec!["a", "a.1", "Unnamed: 2"]);
    }

    #[test]
    fn test_column_lookup_case_insensitive_fallback() {
        let table = Table::new(vec![Column::numbers("Temp", &[1.0])]).unwrap();
        assert!(table.column("temp").is_some());
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_to_f64_with_missing_and_text() {
        let col = Column::parsed("a", &["1", "", "3"]);
        let values = col.to_f64().unwrap();
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());
        assert!(Column::parsed("b", &["1", "x"]).to_f64().is_none());
    }

    #[test]
    fn test_from_json() {
        let value = json!([
            {"name": "a", "value": 1},
            {"name": "b", "value": 2.5},
            {"name": "c"}
        ]);
        let table = Table::from_json(&value).unwrap();
        assert_eq!(table.num_rows(), 3);
        let values = table.column("value").unwrap().cells();
        assert_eq!(values[1], Cell::Number(2.5));
        assert_eq!(values[2], Cell::Missing);
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(Table::from_json(&json!({"a": 1})).is_err());
        assert!(Table::from_json(&json!([])).is_err());
    }

    #[test]
    fn test_from_upload_dispatches_on_extension() {
        let csv = "x,y\n1,2\n";
        let table = Table::from_upload("data.CSV", csv.as_bytes()).unwrap();
        assert_eq!(table.column_names(), vec!["x", "y"]);

        let err = Table::from_upload("book.xlsx", &b"not a workbook"[..]).unwrap_err();
        assert!(matches!(err, IngestionError::Spreadsheet(_)));

        let file = std::fs::File::open("test/fruit.xlsx").unwrap();
        let table = Table::from_upload("fruit.XLSX", file).unwrap();
        assert_eq!(table.column_names(), vec!["fruit", "share"]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.column("share").unwrap().to_f64(), Some(vec![35.0, 25.5, 15.0]));

        let err = Table::from_upload("notes.txt", &b""[..]).unwrap_err();
        assert!(matches!(err, IngestionError::InvalidFormat(_)));
    }
}
