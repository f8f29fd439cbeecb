//! Ingestion pipeline.
//!
//! Raw CSV bytes flow through [`read_raw_table`], then shape checks,
//! truncation, per-cell cleaning and per-column type detection, producing a
//! [`Dataset`](crate::types::Dataset). [`sample_rows`] picks the subset of
//! rows forwarded to a chart advisor.

mod ingestor;
mod reader;
mod sampler;

pub use ingestor::{Ingestor, ingest, ingest_bytes};
pub use reader::{RawTable, read_raw_table};
pub use sampler::sample_rows;
