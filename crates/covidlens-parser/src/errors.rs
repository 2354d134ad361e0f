use std::path::PathBuf;

use polars::prelude::PolarsError;
use serde::Serialize;
use thiserror::Error;

/// A single cell that could not be interpreted. Rows carrying one are dropped, not fatal.
#[derive(Debug, Clone, Error, Serialize)]
#[error("line {line_index} column '{column}': {message}")]
pub struct ParseError {
    pub line_index: usize,
    pub column: &'static str,
    pub value: String,
    pub message: String,
}

impl ParseError {
    pub fn new(
        line_index: usize,
        column: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line_index,
            column,
            value: value.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("source did not contain a header row")]
    EmptyHeader,

    #[error("required column '{0}' missing from source header")]
    MissingColumn(&'static str),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}
