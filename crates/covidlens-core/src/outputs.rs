use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use covidlens_parser::SourceMetadata;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;

use crate::charts::{
    chart_manifest, ChartSpec, CORRELATION_TABLE, FILTERED_TABLE, LATEST_TABLE,
    TOP_ENTITIES_TABLE, WORLD_LATEST_TABLE,
};
use crate::config::PipelineConfig;
use crate::pipeline::{PipelineOutputs, PipelineSummary};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize)]
pub struct TableArtifact {
    pub name: &'static str,
    pub files: Vec<String>,
    pub rows: usize,
}

/// Index of everything written for the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct OutputManifest {
    pub generated_at: String,
    pub source: SourceMetadata,
    pub config: PipelineConfig,
    pub summary: PipelineSummary,
    pub tables: Vec<TableArtifact>,
    pub charts: Vec<ChartSpec>,
}

/// Writes every output table as CSV (plus parquet for the two main tables) and a
/// `manifest.json` describing tables and charts.
pub fn write_outputs(
    dir: &Path,
    outputs: &PipelineOutputs,
    source: &SourceMetadata,
    config: &PipelineConfig,
) -> Result<OutputManifest> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    let correlation_df = outputs
        .correlation
        .to_dataframe()
        .context("failed to tabulate correlation matrix")?;

    let tables: [(&'static str, &DataFrame, bool); 5] = [
        (FILTERED_TABLE, &outputs.filtered, true),
        (LATEST_TABLE, &outputs.latest, true),
        (TOP_ENTITIES_TABLE, &outputs.top_entities, false),
        (WORLD_LATEST_TABLE, &outputs.world_latest, false),
        (CORRELATION_TABLE, &correlation_df, false),
    ];

    let mut artifacts = Vec::with_capacity(tables.len());
    for (name, df, with_parquet) in tables {
        let mut files = vec![write_csv(dir, name, df)?];
        if with_parquet {
            files.push(write_parquet(dir, name, df)?);
        }
        artifacts.push(TableArtifact {
            name,
            files,
            rows: df.height(),
        });
    }

    let manifest = OutputManifest {
        generated_at: Utc::now().to_rfc3339(),
        source: source.clone(),
        config: config.clone(),
        summary: outputs.summary.clone(),
        tables: artifacts,
        charts: chart_manifest(config.top_n, &config.correlation_columns),
    };

    let manifest_path = dir.join(MANIFEST_FILE);
    let file = File::create(&manifest_path)
        .with_context(|| format!("failed to create '{}'", manifest_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &manifest)
        .context("failed to write manifest.json")?;

    Ok(manifest)
}

fn write_csv(dir: &Path, name: &str, df: &DataFrame) -> Result<String> {
    let file_name = format!("{name}.csv");
    let path = dir.join(&file_name);
    let mut file = create_file(&path)?;
    let mut clone = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut clone)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(file_name)
}

fn write_parquet(dir: &Path, name: &str, df: &DataFrame) -> Result<String> {
    let file_name = format!("{name}.parquet");
    let path = dir.join(&file_name);
    let mut file = create_file(&path)?;
    let mut clone = df.clone();
    ParquetWriter::new(&mut file)
        .with_compression(ParquetCompression::Zstd(None))
        .finish(&mut clone)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(file_name)
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create '{}'", path.display()))
}
