//! Column names used across the pipeline, including the derived metrics.

pub use covidlens_parser::schema::{
    NumericColumn, TextColumn, DATE, ISO_CODE, LOCATION, NEW_CASES, PEOPLE_VACCINATED,
    POPULATION, TOTAL_CASES, TOTAL_DEATHS,
};

pub const DEATH_RATE: &str = "death_rate";
pub const PCT_VACCINATED: &str = "pct_vaccinated";
pub const CASES_PER_100K: &str = "cases_per_100k";
pub const VACCINATION_RATE: &str = "vaccination_rate";
pub const PEOPLE_UNVACCINATED: &str = "people_unvaccinated";

/// Columns handed to the renderer for the per-date charts.
pub const FILTERED_OUTPUT_COLUMNS: [&str; 9] = [
    LOCATION,
    ISO_CODE,
    DATE,
    TOTAL_CASES,
    TOTAL_DEATHS,
    NEW_CASES,
    PEOPLE_VACCINATED,
    POPULATION,
    DEATH_RATE,
];

pub const DEFAULT_CORRELATION_COLUMNS: [&str; 4] = [TOTAL_CASES, TOTAL_DEATHS, NEW_CASES, DEATH_RATE];
