use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::schema::{DATE, ISO_CODE, LOCATION, TOTAL_CASES};

/// `NaiveDate::num_days_from_ce` of 1970-01-01; polars stores `Date` as days since that day.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
static DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// A row dropped by [`parse_dates`]. `row_index` is the 0-based position in the frame that
/// was passed in, not a source file line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRejection {
    pub row_index: usize,
    pub value: String,
    pub message: &'static str,
}

#[derive(Debug, Clone)]
pub struct DateParseResult {
    pub dataframe: DataFrame,
    pub rejected: Vec<DateRejection>,
}

/// Keeps rows whose `location` or `iso_code` is in `allow_list`. Source order is preserved.
pub fn filter_entities(df: &DataFrame, allow_list: &[String]) -> Result<DataFrame> {
    let allowed: HashSet<&str> = allow_list.iter().map(|entry| entry.trim()).collect();
    let locations = df.column(LOCATION)?.str()?;
    let codes = df.column(ISO_CODE)?.str()?;

    let keep: Vec<bool> = locations
        .into_iter()
        .zip(codes)
        .map(|(location, code)| {
            location.is_some_and(|value| allowed.contains(value))
                || code.is_some_and(|value| allowed.contains(value))
        })
        .collect();

    let filtered = filter_rows(df, keep)?;
    info!(
        rows_in = df.height(),
        rows_out = filtered.height(),
        "filtered to allow-listed entities"
    );
    Ok(filtered)
}

/// Removes rows with no date or no total case count. Other gaps are left for interpolation.
pub fn drop_incomplete(df: &DataFrame) -> Result<DataFrame> {
    let complete = df
        .clone()
        .lazy()
        .filter(col(DATE).is_not_null().and(col(TOTAL_CASES).is_not_null()))
        .collect()?;
    info!(
        rows_in = df.height(),
        rows_out = complete.height(),
        "dropped rows missing date or total_cases"
    );
    Ok(complete)
}

/// Converts the text `date` column to a polars `Date`. Rows whose date cannot be read are
/// dropped and reported rather than failing the run.
pub fn parse_dates(df: &DataFrame) -> Result<DateParseResult> {
    let raw = df.column(DATE)?.str()?;

    let mut days: Vec<Option<i32>> = Vec::with_capacity(df.height());
    let mut keep: Vec<bool> = Vec::with_capacity(df.height());
    let mut rejected = Vec::new();

    for (idx, value) in raw.into_iter().enumerate() {
        let parsed = match value {
            Some(text) => parse_date(text).ok_or_else(|| DateRejection {
                row_index: idx,
                value: text.to_string(),
                message: "unrecognised date format",
            }),
            None => Err(DateRejection {
                row_index: idx,
                value: String::new(),
                message: "missing date",
            }),
        };
        match parsed {
            Ok(date) => {
                days.push(Some(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE));
                keep.push(true);
            }
            Err(err) => {
                warn!(row = idx, value = %err.value, "dropping row with unparseable date");
                days.push(None);
                keep.push(false);
                rejected.push(err);
            }
        }
    }

    let date_series = Series::new(DATE.into(), days).cast(&DataType::Date)?;
    let mut with_dates = df.clone();
    with_dates.with_column(date_series)?;
    let dataframe = filter_rows(&with_dates, keep)?;

    Ok(DateParseResult {
        dataframe,
        rejected,
    })
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

pub(crate) fn filter_rows(df: &DataFrame, keep: Vec<bool>) -> Result<DataFrame> {
    let mask = Series::new("mask".into(), keep);
    Ok(df.filter(mask.bool()?)?)
}

/// Any primitive numeric column as `f64` values; integer counts are widened.
pub(crate) fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let as_f64 = df.column(name)?.cast(&DataType::Float64)?;
    Ok(as_f64.f64()?.into_iter().collect())
}

/// Grouping key per row: the entity name, falling back to its code. Rows with neither have
/// no entity.
pub(crate) fn entity_keys(df: &DataFrame) -> Result<Vec<Option<String>>> {
    let locations = df.column(LOCATION)?.str()?;
    let codes = df.column(ISO_CODE)?.str()?;
    Ok(locations
        .into_iter()
        .zip(codes)
        .map(|(location, code)| location.or(code).map(str::to_string))
        .collect())
}

/// Parsed dates as days since the Unix epoch.
pub(crate) fn date_days(df: &DataFrame) -> Result<Vec<Option<i32>>> {
    let physical = df.column(DATE)?.cast(&DataType::Int32)?;
    Ok(physical.i32()?.into_iter().collect())
}
