//! Chart descriptions handed to the renderer. Each names the output table and columns it
//! draws from; no drawing happens here.

use serde::Serialize;

use crate::schema::{
    CASES_PER_100K, DATE, DEATH_RATE, ISO_CODE, LOCATION, NEW_CASES, PCT_VACCINATED,
    PEOPLE_UNVACCINATED, PEOPLE_VACCINATED, TOTAL_CASES, TOTAL_DEATHS,
};

pub const FILTERED_TABLE: &str = "filtered";
pub const LATEST_TABLE: &str = "latest";
pub const TOP_ENTITIES_TABLE: &str = "top_entities";
pub const WORLD_LATEST_TABLE: &str = "world_latest";
pub const CORRELATION_TABLE: &str = "correlation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Heatmap,
    Pie,
    Choropleth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub table: &'static str,
    pub x: Vec<String>,
    pub y: Vec<String>,
    /// Column that splits the data into one series (or one figure, for pies) per value.
    pub series: Option<&'static str>,
}

impl ChartSpec {
    fn new(
        id: &str,
        title: &str,
        kind: ChartKind,
        table: &'static str,
        x: &[&str],
        y: &[&str],
        series: Option<&'static str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            table,
            x: x.iter().map(|c| c.to_string()).collect(),
            y: y.iter().map(|c| c.to_string()).collect(),
            series,
        }
    }
}

pub fn chart_manifest(top_n: usize, correlation_columns: &[String]) -> Vec<ChartSpec> {
    let correlation_labels: Vec<&str> = correlation_columns.iter().map(String::as_str).collect();

    vec![
        ChartSpec::new(
            "total_cases_over_time",
            "Total COVID-19 Cases Over Time",
            ChartKind::Line,
            FILTERED_TABLE,
            &[DATE],
            &[TOTAL_CASES],
            Some(LOCATION),
        ),
        ChartSpec::new(
            "total_deaths_over_time",
            "Total COVID-19 Deaths Over Time",
            ChartKind::Line,
            FILTERED_TABLE,
            &[DATE],
            &[TOTAL_DEATHS],
            Some(LOCATION),
        ),
        ChartSpec::new(
            "daily_new_cases",
            "Daily New COVID-19 Cases Comparison",
            ChartKind::Line,
            FILTERED_TABLE,
            &[DATE],
            &[NEW_CASES],
            Some(LOCATION),
        ),
        ChartSpec::new(
            "death_rate_over_time",
            "COVID-19 Death Rate Over Time",
            ChartKind::Line,
            FILTERED_TABLE,
            &[DATE],
            &[DEATH_RATE],
            Some(LOCATION),
        ),
        ChartSpec::new(
            "top_entities_by_total_cases",
            &format!("Top {top_n} Countries by Total COVID-19 Cases"),
            ChartKind::Bar,
            TOP_ENTITIES_TABLE,
            &[TOTAL_CASES],
            &[LOCATION],
            None,
        ),
        ChartSpec::new(
            "correlation_matrix",
            "Correlation Matrix",
            ChartKind::Heatmap,
            CORRELATION_TABLE,
            &correlation_labels,
            &correlation_labels,
            None,
        ),
        ChartSpec::new(
            "people_vaccinated_over_time",
            "Cumulative People Vaccinated Over Time",
            ChartKind::Line,
            FILTERED_TABLE,
            &[DATE],
            &[PEOPLE_VACCINATED],
            Some(LOCATION),
        ),
        ChartSpec::new(
            "pct_vaccinated",
            "Percentage of Population Vaccinated",
            ChartKind::Bar,
            LATEST_TABLE,
            &[PCT_VACCINATED],
            &[LOCATION],
            None,
        ),
        ChartSpec::new(
            "vaccination_share",
            "Vaccination Share",
            ChartKind::Pie,
            LATEST_TABLE,
            &[],
            &[PEOPLE_VACCINATED, PEOPLE_UNVACCINATED],
            Some(LOCATION),
        ),
        ChartSpec::new(
            "cases_per_100k_map",
            "COVID-19 Cases per 100,000 People (Latest Available Data)",
            ChartKind::Choropleth,
            WORLD_LATEST_TABLE,
            &[ISO_CODE],
            &[CASES_PER_100K],
            Some(LOCATION),
        ),
    ]
}
