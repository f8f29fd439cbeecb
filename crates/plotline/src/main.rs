//! CLI entry point: ingest a CSV file and recommend a chart for it.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use plotline::utils::truncate_str;
use plotline::{
    ChartAdvisor, ChartRecommendation, Column, Dataset, IngestConfig, IngestError, Ingestor,
    profile_column, recommend_chart,
};
use serde::Serialize;
use std::path::Path;
use tracing::{error, info, warn};

#[cfg(feature = "ai")]
use plotline::ai::{AnthropicConfig, AnthropicProvider, OpenRouterConfig, OpenRouterProvider};
#[cfg(feature = "ai")]
use std::env;
#[cfg(feature = "ai")]
use tracing::debug;

const NOT_CSV_MESSAGE: &str = "Please upload a CSV file.";
const TOO_SMALL_MESSAGE: &str = "This dataset needs at least 2 columns and 2 rows to visualize.";
const UNREADABLE_MESSAGE: &str =
    "We couldn't read this file. Check that it has a header row and is UTF-8 encoded.";

/// Chart advisor backends selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliProvider {
    /// Anthropic Messages API (ANTHROPIC_API_KEY)
    Anthropic,
    /// OpenRouter chat completions (OPENROUTER_API_KEY)
    Openrouter,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "CSV ingestion, column type inference and chart recommendation",
    long_about = "Cleans a CSV file, infers a semantic type for every column and \
                  recommends a chart for it.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  ANTHROPIC_API_KEY     API key for the Anthropic advisor\n  \
                  OPENROUTER_API_KEY    API key for the OpenRouter advisor\n\n\
                  EXAMPLES:\n  \
                  # Ingest and ask Anthropic for a chart\n  \
                  plotline -i sales.csv\n\n  \
                  # Use OpenRouter with a specific model\n  \
                  plotline -i sales.csv --provider openrouter --model openai/gpt-4o\n\n  \
                  # Default chart only, machine-readable output\n  \
                  plotline -i sales.csv --no-ai --json"
)]
struct Args {
    /// Path to the CSV file to ingest
    #[arg(short, long)]
    input: String,

    /// Chart advisor to consult
    #[arg(long, value_enum, default_value = "anthropic")]
    #[cfg_attr(not(feature = "ai"), allow(dead_code))]
    provider: CliProvider,

    /// Model name passed to the advisor (provider default if omitted)
    #[arg(long)]
    #[cfg_attr(not(feature = "ai"), allow(dead_code))]
    model: Option<String>,

    /// Skip the advisor and use the default chart
    #[arg(long, default_value = "false")]
    no_ai: bool,

    /// Maximum number of data rows kept; later rows are discarded
    #[arg(long, default_value_t = plotline::DEFAULT_MAX_ROWS)]
    max_rows: usize,

    /// Number of sample rows shown to the advisor
    #[arg(long, default_value_t = plotline::DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// Field delimiter (a single ASCII character)
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Accept records whose field count differs from the header
    #[arg(long)]
    allow_ragged_rows: bool,

    /// Number of rows shown in the table preview
    #[arg(long, default_value = "5")]
    preview: usize,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logs; only the final JSON document is written.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors in the log
    #[arg(short, long)]
    quiet: bool,
}

/// Machine-readable result printed with `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    columns: &'a [Column],
    row_count: usize,
    truncated: bool,
    recommendation: &'a ChartRecommendation,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    if !has_csv_extension(&args.input) {
        return Err(anyhow!(NOT_CSV_MESSAGE));
    }
    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;

    info!("Loading dataset from: {}", args.input);
    let contents = std::fs::read(&args.input)?;

    let dataset = match Ingestor::new(config).ingest_bytes(&contents) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Ingestion failed [{}]: {}", e.error_code(), e);
            return Err(anyhow!(user_message(&e)));
        }
    };

    let advisor = build_advisor(&args);
    let recommendation = recommend_chart(&dataset, advisor.as_deref(), args.sample_size);

    if args.json {
        let output = JsonOutput {
            columns: &dataset.columns,
            row_count: dataset.len(),
            truncated: dataset.truncated,
            recommendation: &recommendation,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_summary(&args, &dataset, &recommendation)
}

fn has_csv_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn build_config(args: &Args) -> Result<IngestConfig> {
    if !args.delimiter.is_ascii() {
        return Err(anyhow!(
            "Delimiter must be a single ASCII character, got '{}'",
            args.delimiter
        ));
    }

    Ok(IngestConfig::builder()
        .max_rows(args.max_rows)
        .delimiter(args.delimiter as u8)
        .allow_ragged_rows(args.allow_ragged_rows)
        .build()?)
}

/// Map an ingestion failure to the text shown to the user.
fn user_message(err: &IngestError) -> &'static str {
    if err.is_shape_error() {
        TOO_SMALL_MESSAGE
    } else {
        UNREADABLE_MESSAGE
    }
}

/// Build the configured chart advisor, if any.
///
/// A missing API key is not fatal: the default chart is used instead.
#[cfg(feature = "ai")]
fn build_advisor(args: &Args) -> Option<Box<dyn ChartAdvisor>> {
    if args.no_ai {
        info!("Advisor disabled, using the default chart");
        return None;
    }

    let result: Result<Box<dyn ChartAdvisor>> = match args.provider {
        CliProvider::Anthropic => {
            let api_key = env::var("ANTHROPIC_API_KEY").unwrap_or_default();
            let mut builder = AnthropicConfig::builder();
            if let Some(ref model) = args.model {
                builder = builder.model(model);
            }
            AnthropicProvider::with_config(api_key, builder.build())
                .map(|p| Box::new(p) as Box<dyn ChartAdvisor>)
        }
        CliProvider::Openrouter => {
            let api_key = env::var("OPENROUTER_API_KEY").unwrap_or_default();
            let mut builder = OpenRouterConfig::builder();
            if let Some(ref model) = args.model {
                builder = builder.model(model);
            }
            OpenRouterProvider::with_config(api_key, builder.build())
                .map(|p| Box::new(p) as Box<dyn ChartAdvisor>)
        }
    };

    match result {
        Ok(advisor) => {
            debug!(
                "Using {} advisor (model: {})",
                advisor.name(),
                advisor.model().unwrap_or("default")
            );
            Some(advisor)
        }
        Err(e) => {
            warn!("{}. Falling back to the default chart.", e);
            None
        }
    }
}

/// Advisor stand-in when the "ai" feature is disabled
#[cfg(not(feature = "ai"))]
fn build_advisor(args: &Args) -> Option<Box<dyn ChartAdvisor>> {
    if !args.no_ai {
        warn!("AI support not compiled in. Using the default chart.");
        warn!("Compile with --features ai to enable chart advisors.");
    }
    None
}

/// Print the human-readable report.
///
/// Uses `println!` intentionally: this is the primary output and must be
/// visible regardless of the log level.
fn print_summary(args: &Args, dataset: &Dataset, recommendation: &ChartRecommendation) -> Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("DATASET OVERVIEW");
    println!("{}", "=".repeat(80));
    println!("  File: {}", args.input);
    println!("  Rows: {}", dataset.len());
    println!("  Columns: {}", dataset.columns.len());
    if dataset.truncated {
        println!(
            "  Note: only the first {} rows were kept",
            args.max_rows
        );
    }
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    println!(
        "{:<24} {:<12} {:<10} {:<10}",
        "Column", "Type", "Missing", "Unique"
    );
    println!("{}", "-".repeat(60));
    for column in &dataset.columns {
        let profile = profile_column(dataset.column_values(&column.name));
        println!(
            "{:<24} {:<12} {:<10} {:<10}",
            truncate_str(&column.name, 23),
            column.column_type.as_str(),
            profile.null_count,
            profile.unique_count
        );
    }
    println!();

    if args.preview > 0 {
        println!("PREVIEW");
        println!("{}", "-".repeat(40));
        let df = dataset.to_dataframe()?;
        println!("{}", df.head(Some(args.preview)));
        println!();
    }

    let spec = &recommendation.spec;
    println!("CHART RECOMMENDATION");
    println!("{}", "-".repeat(40));
    match &recommendation.advisor {
        Some(name) if !recommendation.is_fallback() => println!("  Source: {}", name),
        _ => println!("  Source: default chart"),
    }
    println!("  Type: {}", spec.chart_type);
    println!("  Title: {}", spec.display_title());
    println!("  X: {}", spec.x.as_deref().unwrap_or("-"));
    println!("  Y: {}", spec.y.as_deref().unwrap_or("-"));
    for (label, value) in [("Y2", &spec.y2), ("Size", &spec.size), ("Color", &spec.color)] {
        if let Some(column) = value {
            println!("  {}: {}", label, column);
        }
    }
    if let Some(ref reasoning) = spec.reasoning {
        println!("  Why: {}", reasoning);
    }
    if let Some(ref warning) = recommendation.warning {
        println!("  Warning: {}", warning);
    }
    println!("{}", "=".repeat(80));

    Ok(())
}
