use std::io::{self, Read};

use crate::data::Table;
use crate::error::IngestionError;

/// Read comma-separated data with a header row into a table.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, IngestionError> {
    read_delimited(reader, b',')
}

/// Read CSV from stdin (the CLI's default data source).
pub fn read_csv_from_stdin() -> Result<Table, IngestionError> {
    read_csv(io::stdin().lock())
}

/// Read delimited data with a header row into a table.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Table, IngestionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(IngestionError::Invalid("CSV file is empty".to_string()));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(|f| f.to_string()).collect::<Vec<String>>());
    }

    if rows.is_empty() {
        return Err(IngestionError::Invalid(
            "CSV must contain at least one data row".to_string(),
        ));
    }

    Table::from_rows(headers, rows)
}
