use polars::prelude::DataFrame;
use serde::Serialize;

use crate::errors::ParseError;

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceMetadata {
    pub source_hash: String,
    pub delimiter: char,
    pub source_columns: Vec<String>,
    pub rows_read: usize,
    pub rejected_rows: Vec<ParseError>,
}

impl SourceMetadata {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.rejected_rows.len()
    }
}

/// The loaded table: text columns untouched, numeric columns as nullable `f64`.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub metadata: SourceMetadata,
    pub df: DataFrame,
}
