//! Configuration types for the ingestion pipeline.
//!
//! The classification thresholds used by the type detector are fixed policy
//! and live in [`crate::profiler`]; only parsing and truncation knobs are
//! configurable here.

use serde::{Deserialize, Serialize};

/// Default cap on retained data rows.
pub const DEFAULT_MAX_ROWS: usize = 5000;

/// Default number of rows sent to a chart advisor.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Configuration for the ingestion pipeline.
///
/// Use [`IngestConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use plotline::config::IngestConfig;
///
/// let config = IngestConfig::builder()
///     .max_rows(1000)
///     .delimiter(b';')
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum number of data rows retained. Rows beyond this cap are
    /// discarded before cleaning and the dataset is flagged as truncated.
    /// Default: 5000
    pub max_rows: usize,

    /// Field delimiter byte.
    /// Default: `b','`
    pub delimiter: u8,

    /// Accept records whose field count differs from the header row.
    /// Missing trailing fields become null; extra fields are ignored.
    /// When false, such records fail ingestion with a parse error.
    /// Default: false
    pub allow_ragged_rows: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            delimiter: DEFAULT_DELIMITER,
            allow_ragged_rows: false,
        }
    }
}

impl IngestConfig {
    /// Create a new configuration builder.
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // A dataset needs two rows to chart; a smaller cap could never succeed.
        if self.max_rows < 2 {
            return Err(ConfigValidationError::InvalidMaxRows(self.max_rows));
        }

        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(ConfigValidationError::InvalidDelimiter(self.delimiter));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("Invalid max rows: {0} (must be at least 2)")]
    InvalidMaxRows(usize),

    #[error("Invalid delimiter byte: {0:#04x} (must be ASCII and not a quote or line break)")]
    InvalidDelimiter(u8),
}

/// Builder for [`IngestConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct IngestConfigBuilder {
    max_rows: Option<usize>,
    delimiter: Option<u8>,
    allow_ragged_rows: Option<bool>,
}

impl IngestConfigBuilder {
    /// Set the maximum number of retained data rows.
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Set the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Accept or reject records whose length differs from the header.
    pub fn allow_ragged_rows(mut self, allow: bool) -> Self {
        self.allow_ragged_rows = Some(allow);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `IngestConfig` or an error if validation fails.
    pub fn build(self) -> Result<IngestConfig, ConfigValidationError> {
        let config = IngestConfig {
            max_rows: self.max_rows.unwrap_or(DEFAULT_MAX_ROWS),
            delimiter: self.delimiter.unwrap_or(DEFAULT_DELIMITER),
            allow_ragged_rows: self.allow_ragged_rows.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}
