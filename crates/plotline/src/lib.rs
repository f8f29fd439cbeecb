//! CSV ingestion and chart recommendation.
//!
//! # Overview
//!
//! `plotline` turns an arbitrary, messy, user-supplied CSV file into a clean,
//! typed table that is ready both for prompting a language model and for
//! direct charting:
//!
//! - **Parsing**: quoted fields, blank-line skipping, BOM handling
//! - **Cleaning**: sentinel nulls (`n/a`, `-`, `NULL`, ...) and numeric text with
//!   currency symbols, percent signs and thousands separators
//! - **Type Detection**: each column is `numeric`, `date`, `categorical` or `text`
//! - **Sampling**: a deterministic, bounded row sample for prompts
//! - **Chart Recommendation**: an optional LLM advisor with a deterministic
//!   fallback chart
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use plotline::{Ingestor, IngestConfig, recommend_chart};
//! use plotline::ai::AnthropicProvider;
//!
//! let contents = std::fs::read("sales.csv")?;
//!
//! let config = IngestConfig::builder().max_rows(5000).build()?;
//! let dataset = Ingestor::new(config).ingest_bytes(&contents)?;
//!
//! for column in &dataset.columns {
//!     println!("{}: {}", column.name, column.column_type);
//! }
//!
//! // With an advisor; pass `None` for the default chart.
//! let provider = AnthropicProvider::new(std::env::var("ANTHROPIC_API_KEY")?)?;
//! let recommendation = recommend_chart(&dataset, Some(&provider), 20);
//! println!("{} of {:?} vs {:?}", recommendation.spec.chart_type,
//!     recommendation.spec.y, recommendation.spec.x);
//! ```
//!
//! # Errors
//!
//! Ingestion either yields a complete [`Dataset`] or exactly one
//! [`IngestError`]: `NOT_ENOUGH_DATA`, `NOT_ENOUGH_COLUMNS` or `PARSE_ERROR`.
//! Advisor failures never surface as errors from [`recommend_chart`]; they
//! produce the fallback chart with a warning instead.

pub mod ai;
pub mod chart;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod profiler;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use ai::ChartAdvisor;
pub use chart::{
    ChartField, ChartRecommendation, ChartRequest, ChartSpec, ChartSpecError, ChartType,
    RecommendationSource, recommend_chart,
};
pub use cleaner::{clean, clean_cell};
pub use config::{
    ConfigValidationError, DEFAULT_MAX_ROWS, DEFAULT_SAMPLE_SIZE, IngestConfig,
    IngestConfigBuilder,
};
pub use error::{IngestError, Result as IngestResult};
pub use pipeline::{Ingestor, ingest, ingest_bytes, sample_rows};
pub use profiler::{ColumnProfile, detect_column_type, profile_column};
pub use types::{CellValue, CleanedRow, Column, ColumnType, Dataset};
