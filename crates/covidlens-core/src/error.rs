// crates/covidlens-core/src/error.rs

use covidlens_parser::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load source table: {0}")]
    Load(#[from] LoadError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
