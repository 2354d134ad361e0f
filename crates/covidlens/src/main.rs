mod display;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use covidlens_core::{config::PipelineConfig, outputs, pipeline, report};
use covidlens_parser::{load_path, ParsedTable};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pandemic dataset cleaning and metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean the source table, derive metrics and write the renderer's tables
    Run(RunArgs),
    /// Print columns, the first rows and missing-value counts of the source table
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Source CSV (falls back to COVIDLENS_INPUT)
    #[arg(long)]
    input: Option<PathBuf>,
    /// TOML configuration (falls back to COVIDLENS_CONFIG, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for output tables and manifest.json
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Source CSV (falls back to COVIDLENS_INPUT)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Number of leading rows to print
    #[arg(long, default_value_t = 5)]
    rows: usize,
    /// Field delimiter of the source file
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn handle_run(args: RunArgs) -> Result<()> {
    let config = resolve_config(args.config)?;
    let input = resolve_input(args.input)?;
    let parsed = load_source(&input, &config)?;

    let results = pipeline::run_pipeline(&parsed.df, &config).context("pipeline failed")?;

    println!("Latest snapshot per entity:");
    println!("{}", display::render(&results.latest)?);
    println!("Top entities by total cases:");
    println!("{}", display::render(&results.top_entities)?);
    println!("Correlation matrix:");
    println!("{}", display::render(&results.correlation.to_dataframe()?)?);

    if let Some(dir) = args.output_dir {
        let manifest = outputs::write_outputs(&dir, &results, &parsed.metadata, &config)?;
        info!(
            dir = %dir.display(),
            tables = manifest.tables.len(),
            charts = manifest.charts.len(),
            "outputs written"
        );
        println!("Wrote {} tables to {}", manifest.tables.len(), dir.display());
    }

    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<()> {
    let config = PipelineConfig {
        delimiter: args.delimiter,
        ..PipelineConfig::default()
    };
    config.validate()?;
    let input = resolve_input(args.input)?;
    let parsed = load_source(&input, &config)?;

    println!("Source columns: {}", parsed.metadata.source_columns.join(", "));
    println!(
        "Rows read: {} (kept {}, rejected {})",
        parsed.metadata.rows_read,
        parsed.metadata.rows_kept(),
        parsed.metadata.rejected_rows.len()
    );
    println!("{}", display::render(&parsed.df.head(Some(args.rows)))?);
    println!("Missing values:");
    println!("{}", display::render(&report::missing_value_report(&parsed.df)?)?);

    Ok(())
}

fn load_source(input: &Path, config: &PipelineConfig) -> Result<ParsedTable> {
    let parsed = load_path(input, &config.load_options())
        .with_context(|| format!("failed to load '{}'", input.display()))?;
    for rejected in &parsed.metadata.rejected_rows {
        warn!(line = rejected.line_index, column = rejected.column, value = %rejected.value, "dropped row");
    }
    info!(
        rows = parsed.df.height(),
        hash = %parsed.metadata.source_hash,
        "loaded source table"
    );
    Ok(parsed)
}

fn resolve_input(arg: Option<PathBuf>) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(path),
        None => env::var("COVIDLENS_INPUT")
            .map(PathBuf::from)
            .context("--input (or COVIDLENS_INPUT) must be set"),
    }
}

fn resolve_config(arg: Option<PathBuf>) -> Result<PipelineConfig> {
    let path = arg.or_else(|| env::var("COVIDLENS_CONFIG").ok().map(PathBuf::from));
    match path {
        Some(path) => PipelineConfig::from_path(&path)
            .with_context(|| format!("failed to load config '{}'", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}
