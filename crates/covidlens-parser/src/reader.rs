use std::collections::HashMap;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use polars::prelude::*;

use crate::errors::{LoadError, ParseError};
use crate::model::{LoadOptions, ParsedTable, SourceMetadata};
use crate::schema::{NumericColumn, TextColumn};

static MISSING_TOKENS: &[&str] = &["", "na", "nan", "null", "none", "n/a"];

pub fn load_path(path: &Path, options: &LoadOptions) -> Result<ParsedTable, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_bytes(&bytes, options)
}

pub fn load_table(content: &str, options: &LoadOptions) -> Result<ParsedTable, LoadError> {
    load_bytes(content.as_bytes(), options)
}

pub fn load_bytes(content: &[u8], options: &LoadOptions) -> Result<ParsedTable, LoadError> {
    let source_hash = blake3::hash(content).to_hex().to_string();

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(content);

    let header = reader.headers()?.clone();
    if header.is_empty() || header.iter().all(|field| field.trim().is_empty()) {
        return Err(LoadError::EmptyHeader);
    }
    let source_columns: Vec<String> = header
        .iter()
        .map(|field| field.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let layout = ColumnLayout::resolve(&source_columns)?;

    let mut columns = TableColumns::default();
    let mut rejected_rows = Vec::new();
    let mut rows_read = 0usize;

    for (offset, record) in reader.records().enumerate() {
        let record = record?;
        rows_read += 1;
        let line_index = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(offset + 2);

        match layout.read_row(&record, line_index) {
            Ok(row) => columns.push(row),
            Err(err) => rejected_rows.push(err),
        }
    }

    let df = columns.into_dataframe()?;

    Ok(ParsedTable {
        metadata: SourceMetadata {
            source_hash,
            delimiter: options.delimiter as char,
            source_columns,
            rows_read,
            rejected_rows,
        },
        df,
    })
}

struct ColumnLayout {
    text: Vec<(TextColumn, usize)>,
    numeric: Vec<(NumericColumn, usize)>,
}

impl ColumnLayout {
    fn resolve(header: &[String]) -> Result<Self, LoadError> {
        let positions: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let mut text = Vec::with_capacity(TextColumn::ALL.len());
        for column in TextColumn::ALL {
            let name = column.canonical_name();
            let idx = positions
                .get(name)
                .copied()
                .ok_or(LoadError::MissingColumn(name))?;
            text.push((column, idx));
        }

        let mut numeric = Vec::with_capacity(NumericColumn::ALL.len());
        for column in NumericColumn::ALL {
            let name = column.canonical_name();
            let idx = positions
                .get(name)
                .copied()
                .ok_or(LoadError::MissingColumn(name))?;
            numeric.push((column, idx));
        }

        Ok(Self { text, numeric })
    }

    fn read_row(&self, record: &StringRecord, line_index: usize) -> Result<RowValues, ParseError> {
        let mut row = RowValues::default();

        for (column, idx) in &self.text {
            let value = clean_text(record.get(*idx));
            match column {
                TextColumn::Location => row.location = value,
                TextColumn::IsoCode => row.iso_code = value,
                TextColumn::Date => row.date = value,
            }
        }

        for (position, (column, idx)) in self.numeric.iter().enumerate() {
            let raw = record.get(*idx).unwrap_or_default();
            row.numeric[position] = parse_optional_f64(raw, column.canonical_name(), line_index)?;
        }

        Ok(row)
    }
}

#[derive(Default)]
struct RowValues {
    location: Option<String>,
    iso_code: Option<String>,
    date: Option<String>,
    numeric: [Option<f64>; 5],
}

#[derive(Default)]
struct TableColumns {
    location: Vec<Option<String>>,
    iso_code: Vec<Option<String>>,
    date: Vec<Option<String>>,
    numeric: [Vec<Option<f64>>; 5],
}

impl TableColumns {
    fn push(&mut self, row: RowValues) {
        self.location.push(row.location);
        self.iso_code.push(row.iso_code);
        self.date.push(row.date);
        for (values, value) in self.numeric.iter_mut().zip(row.numeric) {
            values.push(value);
        }
    }

    fn into_dataframe(self) -> Result<DataFrame, LoadError> {
        let mut cols: Vec<Column> = Vec::with_capacity(TextColumn::ALL.len() + NumericColumn::ALL.len());

        for (column, values) in TextColumn::ALL
            .iter()
            .zip([&self.location, &self.iso_code, &self.date])
        {
            let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
            cols.push(Series::new(column.canonical_name().into(), utf8).into());
        }

        for (column, values) in NumericColumn::ALL.iter().zip(self.numeric) {
            cols.push(Series::new(column.canonical_name().into(), values).into());
        }

        Ok(DataFrame::new(cols)?)
    }
}

fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

pub(crate) fn is_missing_token(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

pub(crate) fn parse_optional_f64(
    value: &str,
    column: &'static str,
    line_index: usize,
) -> Result<Option<f64>, ParseError> {
    if is_missing_token(value) {
        return Ok(None);
    }
    let trimmed = value.trim();
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|err| {
            ParseError::new(
                line_index,
                column,
                trimmed,
                format!("failed to parse as number: {err}"),
            )
        })
}
