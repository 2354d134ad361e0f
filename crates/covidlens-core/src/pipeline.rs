use std::collections::HashSet;

use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::correlation::{correlation, CorrelationMatrix};
use crate::error::Result;
use crate::filters::{
    drop_incomplete, filter_entities, parse_dates, DateParseResult, DateRejection,
};
use crate::interpolation::interpolate_numeric;
use crate::metrics::{derive_death_rate, latest_per_entity};
use crate::ranking::top_n_by;
use crate::schema::{
    CASES_PER_100K, FILTERED_OUTPUT_COLUMNS, ISO_CODE, LOCATION, PEOPLE_VACCINATED, POPULATION,
    TOTAL_CASES, VACCINATION_RATE,
};

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub source_rows: usize,
    pub entity_rows: usize,
    pub complete_rows: usize,
    pub dated_rows: usize,
    pub rejected_dates: Vec<DateRejection>,
    pub entities: Vec<String>,
    /// Allow-list entries that matched no row.
    pub missing_entities: Vec<String>,
}

/// Everything the renderer consumes, each table derived once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    /// Allow-listed, cleaned, interpolated rows with `death_rate`.
    pub filtered: DataFrame,
    /// Latest row per allow-listed entity with the population ratios.
    pub latest: DataFrame,
    pub top_entities: DataFrame,
    /// Latest row per entity across the whole source, for the world map.
    pub world_latest: DataFrame,
    pub correlation: CorrelationMatrix,
    pub summary: PipelineSummary,
}

pub fn run_pipeline(table: &DataFrame, config: &PipelineConfig) -> Result<PipelineOutputs> {
    config.validate()?;
    info!(rows = table.height(), countries = ?config.countries, "starting pipeline");

    let selected = filter_entities(table, &config.countries)?;
    let complete = drop_incomplete(&selected)?;
    let DateParseResult {
        dataframe: dated,
        rejected,
    } = parse_dates(&complete)?;
    if !rejected.is_empty() {
        warn!(count = rejected.len(), "rows dropped for unparseable dates");
    }

    let interpolated = interpolate_numeric(&dated)?;
    let filtered = derive_death_rate(&interpolated)?.select(FILTERED_OUTPUT_COLUMNS)?;

    let latest = latest_per_entity(&filtered)?;
    let top_entities = top_n_by(&latest, TOTAL_CASES, config.top_n)?;
    let correlation = correlation(&filtered, &config.correlation_columns)?;
    let world_latest = world_snapshot(table)?;

    let entities = column_strings(&latest, LOCATION)?;
    let missing_entities = unmatched_entries(&latest, &config.countries)?;
    for entry in &missing_entities {
        warn!(entity = %entry, "allow-listed entity has no usable rows");
    }

    let summary = PipelineSummary {
        source_rows: table.height(),
        entity_rows: selected.height(),
        complete_rows: complete.height(),
        dated_rows: dated.height(),
        rejected_dates: rejected,
        entities,
        missing_entities,
    };
    info!(
        filtered_rows = filtered.height(),
        entities = summary.entities.len(),
        world_entities = world_latest.height(),
        "pipeline finished"
    );

    Ok(PipelineOutputs {
        filtered,
        latest,
        top_entities,
        world_latest,
        correlation,
        summary,
    })
}

/// Latest dated row per entity over the unfiltered table, reduced to the map columns.
/// No interpolation is applied here.
pub fn world_snapshot(table: &DataFrame) -> Result<DataFrame> {
    let dated = parse_dates(table)?.dataframe;
    let latest = latest_per_entity(&dated)?;
    Ok(latest.select([
        ISO_CODE,
        LOCATION,
        TOTAL_CASES,
        PEOPLE_VACCINATED,
        POPULATION,
        CASES_PER_100K,
        VACCINATION_RATE,
    ])?)
}

fn column_strings(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}

fn unmatched_entries(latest: &DataFrame, allow_list: &[String]) -> Result<Vec<String>> {
    let present: HashSet<String> = column_strings(latest, LOCATION)?
        .into_iter()
        .chain(column_strings(latest, ISO_CODE)?)
        .collect();
    Ok(allow_list
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty() && !present.contains(*entry))
        .map(str::to_string)
        .collect())
}
