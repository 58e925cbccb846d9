use std::io::{Cursor, Read};

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::data::Table;
use crate::error::IngestionError;

/// Read the first worksheet of an `.xls`/`.xlsx` workbook. The first row
/// holds the headers.
pub fn read_spreadsheet<R: Read>(mut reader: R) -> Result<Table, IngestionError> {
    // Workbooks are zip or OLE containers and need random access
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestionError::Invalid("Workbook has no worksheets".to_string()))??;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows
        .next()
        .ok_or_else(|| IngestionError::Invalid("Worksheet is empty".to_string()))?;
    let rows: Vec<Vec<String>> = rows.collect();
    if rows.is_empty() {
        return Err(IngestionError::Invalid(
            "Worksheet must contain at least one data row".to_string(),
        ));
    }

    Table::from_rows(headers, rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        other => other.to_string(),
    }
}
