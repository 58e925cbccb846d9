//! Holds the most recently ingested table and renders requests against it.

use std::io::Read;

use log::info;
use serde_json::Value;

use crate::csv_reader;
use crate::data::Table;
use crate::dispatch;
use crate::encode::ImageArtifact;
use crate::error::SessionError;
use crate::RenderOptions;

#[derive(Debug, Clone, Default)]
pub struct Session {
    table: Option<Table>,
    options: RenderOptions,
}

impl Session {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            table: None,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Replace the current table, returning its column names.
    pub fn ingest_table(&mut self, table: Table) -> Vec<String> {
        let columns = table.column_names();
        info!(
            "ingested table: {} columns, {} rows",
            columns.len(),
            table.num_rows()
        );
        self.table = Some(table);
        columns
    }

    pub fn ingest_csv<R: Read>(&mut self, reader: R) -> Result<Vec<String>, SessionError> {
        let table = csv_reader::read_csv(reader)?;
        Ok(self.ingest_table(table))
    }

    /// Ingest a JSON array of records.
    pub fn ingest_json(&mut self, value: &Value) -> Result<Vec<String>, SessionError> {
        let table = Table::from_json(value)?;
        Ok(self.ingest_table(table))
    }

    /// Ingest an uploaded file; the reader is picked from `file_name`.
    /// A failed upload leaves the previous table in place.
    pub fn ingest_upload<R: Read>(
        &mut self,
        file_name: &str,
        reader: R,
    ) -> Result<Vec<String>, SessionError> {
        let table = Table::from_upload(file_name, reader)?;
        Ok(self.ingest_table(table))
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Column names of the current table, empty when none is loaded.
    pub fn columns(&self) -> Vec<String> {
        self.table
            .as_ref()
            .map(Table::column_names)
            .unwrap_or_default()
    }

    pub fn render(&self, request: &Value) -> Result<ImageArtifact, SessionError> {
        let table = self.table.as_ref().ok_or(SessionError::NoTable)?;
        Ok(dispatch::render(table, request, &self.options)?)
    }
}
