use polars::prelude::*;

use crate::error::Result;

/// Per-column null counts, one row per column in frame order.
pub fn missing_value_report(df: &DataFrame) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();
    let missing: Vec<u64> = df
        .get_columns()
        .iter()
        .map(|column| column.null_count() as u64)
        .collect();

    Ok(df![
        "column" => names,
        "missing" => missing,
    ]?)
}
