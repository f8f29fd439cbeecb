//! The ingestion pipeline: parse → check → truncate → clean → classify.

use crate::cleaner::clean;
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::pipeline::reader::read_raw_table;
use crate::profiler::detect_column_type;
use crate::types::{CellValue, CleanedRow, Column, Dataset};
use csv::StringRecord;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns raw CSV contents into a cleaned, typed [`Dataset`].
///
/// An `Ingestor` holds only its configuration; every call is an independent
/// pure transformation, so one instance can be shared across threads.
///
/// # Example
///
/// ```rust,ignore
/// use plotline::{Ingestor, IngestConfig};
///
/// let ingestor = Ingestor::new(IngestConfig::builder().max_rows(1000).build()?);
/// let dataset = ingestor.ingest("City,Pop\nNYC,8000000\nLA,4000000\n")?;
/// assert_eq!(dataset.columns.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    config: IngestConfig,
}

static_assertions::assert_impl_all!(Ingestor: Send, Sync);
static_assertions::assert_impl_all!(Dataset: Send, Sync);
static_assertions::assert_impl_all!(IngestConfig: Send, Sync);

/// Trimmed, de-duplicated column keys and the key slot of each header field.
struct HeaderLayout {
    keys: Arc<[String]>,
    slots: Vec<usize>,
}

impl HeaderLayout {
    /// Trim header names and collapse duplicates onto their first position.
    fn from_headers(headers: &StringRecord) -> Self {
        let mut keys: Vec<String> = Vec::with_capacity(headers.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(headers.len());
        let mut slots = Vec::with_capacity(headers.len());

        for header in headers.iter() {
            let name = header.trim();
            let slot = match index.get(name) {
                Some(&slot) => {
                    debug!("Duplicate column '{}' collapses onto slot {}", name, slot);
                    slot
                }
                None => {
                    let slot = keys.len();
                    keys.push(name.to_string());
                    index.insert(name.to_string(), slot);
                    slot
                }
            };
            slots.push(slot);
        }

        Self {
            keys: keys.into(),
            slots,
        }
    }

    fn clean_record(&self, record: &StringRecord) -> CleanedRow {
        let mut values = vec![CellValue::Null; self.keys.len()];
        // Absent fields (short ragged rows) leave the slot untouched, so a
        // later duplicate header only overrides when it actually has a field.
        for (field_idx, &slot) in self.slots.iter().enumerate() {
            if let Some(raw) = record.get(field_idx) {
                values[slot] = clean(Some(raw));
            }
        }
        CleanedRow::new(Arc::clone(&self.keys), values)
    }
}

impl Ingestor {
    /// Create an ingestor with the given configuration.
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest CSV text.
    pub fn ingest(&self, contents: &str) -> Result<Dataset> {
        self.ingest_bytes(contents.as_bytes())
    }

    /// Ingest CSV bytes, expected to be UTF-8.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Parse`] if the CSV is malformed
    /// - [`IngestError::NotEnoughData`] if there are fewer than 2 data rows
    /// - [`IngestError::NotEnoughColumns`] if the header has fewer than 2
    ///   distinct names
    pub fn ingest_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        let start_time = Instant::now();

        let raw = read_raw_table(bytes, &self.config)?;

        if raw.len() < 2 {
            return Err(IngestError::NotEnoughData { rows: raw.len() });
        }

        let layout = HeaderLayout::from_headers(&raw.headers);
        if layout.keys.len() < 2 {
            return Err(IngestError::NotEnoughColumns {
                columns: layout.keys.len(),
            });
        }

        let total_rows = raw.len();
        let mut records = raw.records;
        let truncated = total_rows > self.config.max_rows;
        if truncated {
            warn!(
                "Input has {} data rows; keeping the first {}",
                total_rows, self.config.max_rows
            );
            records.truncate(self.config.max_rows);
        }

        let rows: Vec<CleanedRow> = records.iter().map(|r| layout.clean_record(r)).collect();
        debug!("Cleaned {} rows", rows.len());

        let columns: Vec<Column> = layout
            .keys
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let column_type = detect_column_type(rows.iter().filter_map(|r| r.get_index(idx)));
                debug!("Column '{}' classified as {}", name, column_type);
                Column::new(name.as_str(), column_type)
            })
            .collect();

        info!(
            "Ingested {} rows x {} columns in {:?}{}",
            rows.len(),
            columns.len(),
            start_time.elapsed(),
            if truncated { " (truncated)" } else { "" }
        );

        Ok(Dataset {
            rows,
            columns,
            truncated,
        })
    }
}

/// Ingest CSV text with the default configuration.
pub fn ingest(contents: &str) -> Result<Dataset> {
    Ingestor::default().ingest(contents)
}

/// Ingest CSV bytes with the default configuration.
pub fn ingest_bytes(bytes: &[u8]) -> Result<Dataset> {
    Ingestor::default().ingest_bytes(bytes)
}
