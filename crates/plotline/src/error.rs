//! Error types for the CSV ingestion pipeline.
//!
//! Ingestion is all-or-nothing: it either yields a fully cleaned and typed
//! [`Dataset`](crate::types::Dataset) or exactly one [`IngestError`].
//!
//! Errors are serializable as `{ "code": ..., "message": ... }` so that a
//! caller (CLI, desktop shell, web handler) can map the stable code to its
//! own user-facing text.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The error type returned by ingestion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Fewer than two data rows were found after the header row.
    #[error("Not enough data: found {rows} data row(s), need at least 2")]
    NotEnoughData { rows: usize },

    /// The header row yields fewer than two distinct column names.
    #[error("Not enough columns: found {columns} distinct column(s), need at least 2")]
    NotEnoughColumns { columns: usize },

    /// The CSV parser reported malformed input.
    #[error("Failed to parse CSV: {0}")]
    Parse(String),
}

impl IngestError {
    /// Get the stable error code for this failure.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotEnoughData { .. } => "NOT_ENOUGH_DATA",
            Self::NotEnoughColumns { .. } => "NOT_ENOUGH_COLUMNS",
            Self::Parse(_) => "PARSE_ERROR",
        }
    }

    /// Check if the input parsed but was too small to chart.
    ///
    /// Such uploads should be answered with a request for a larger file
    /// rather than a hint about encoding or headers.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::NotEnoughData { .. } | Self::NotEnoughColumns { .. }
        )
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}

impl Serialize for IngestError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("IngestError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            IngestError::NotEnoughData { rows: 1 }.error_code(),
            "NOT_ENOUGH_DATA"
        );
        assert_eq!(
            IngestError::NotEnoughColumns { columns: 1 }.error_code(),
            "NOT_ENOUGH_COLUMNS"
        );
        assert_eq!(
            IngestError::Parse("bad quote".to_string()).error_code(),
            "PARSE_ERROR"
        );
    }

    #[test]
    fn test_is_shape_error() {
        assert!(IngestError::NotEnoughData { rows: 0 }.is_shape_error());
        assert!(IngestError::NotEnoughColumns { columns: 1 }.is_shape_error());
        assert!(!IngestError::Parse("x".to_string()).is_shape_error());
    }

    #[test]
    fn test_parse_error_wraps_message() {
        let error = IngestError::Parse("found record with 3 fields".to_string());
        assert!(error.to_string().contains("found record with 3 fields"));
    }

    #[test]
    fn test_error_serialization() {
        let error = IngestError::NotEnoughColumns { columns: 1 };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("NOT_ENOUGH_COLUMNS"));
        assert!(json.contains("need at least 2"));
    }

    #[test]
    fn test_from_csv_error_keeps_parser_message() {
        let data = "a,b\n1,2\n3,4,5\n";
        let mut reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let err = reader
            .records()
            .find_map(|r| r.err())
            .expect("ragged record should fail");

        let error = IngestError::from(err);
        assert_eq!(error.error_code(), "PARSE_ERROR");
        assert!(error.to_string().contains("found record with 3 fields"));
    }
}
