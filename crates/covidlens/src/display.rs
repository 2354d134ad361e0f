use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use polars::prelude::{AnyValue, DataFrame};

/// Renders a frame as a terminal table; nulls print as empty cells.
pub fn render(df: &DataFrame) -> Result<Table> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>(),
    );

    for idx in 0..df.height() {
        let mut cells = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            cells.push(format_cell(column.get(idx)?));
        }
        table.add_row(cells);
    }

    Ok(table)
}

fn format_cell(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Float64(v) => format!("{v:.4}"),
        other => other.to_string(),
    }
}
