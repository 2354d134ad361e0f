use polars::prelude::*;

use crate::error::{PipelineError, Result};

/// The first `n` rows after a stable descending sort on `column`, nulls last.
pub fn top_n_by(df: &DataFrame, column: &str, n: usize) -> Result<DataFrame> {
    if df.column(column).is_err() {
        return Err(PipelineError::UnknownColumn(column.to_string()));
    }

    let top = df
        .clone()
        .lazy()
        .sort(
            [column],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .limit(n as IdxSize)
        .collect()?;
    Ok(top)
}
