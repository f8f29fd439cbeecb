//! CSV reading into an uncleaned [`RawTable`].
//!
//! Parsing is delegated to the `csv` crate. This module only adds the
//! policies the ingestion pipeline needs on top of it: blank-line skipping,
//! record length checks, and BOM handling.

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parsed-but-uncleaned CSV contents.
///
/// Fields are addressed positionally against `headers`. A record may be
/// shorter than the header row only when ragged rows are allowed.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: StringRecord,
    pub records: Vec<StringRecord>,
}

impl RawTable {
    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A line holding nothing but unquoted whitespace reads as one blank field.
///
/// Decided on the raw line: a quoted `"   "` parses to the same record but
/// is a data row.
fn is_blank_record(record: &StringRecord, input: &[u8]) -> bool {
    if record.len() != 1 || record.get(0).is_some_and(|field| !field.trim().is_empty()) {
        return false;
    }
    let Some(start) = record.position().and_then(|p| usize::try_from(p.byte()).ok()) else {
        return false;
    };
    input
        .get(start..)
        .unwrap_or_default()
        .iter()
        // The recorded position can precede empty lines the parser skipped.
        .skip_while(|&&b| b == b'\n' || b == b'\r')
        .take_while(|&&b| b != b'\n')
        .all(u8::is_ascii_whitespace)
}

/// Read CSV bytes into a [`RawTable`].
///
/// The first non-empty line is the header row. Blank and whitespace-only
/// lines are skipped. Invalid UTF-8 and records whose field count differs
/// from the header (unless ragged rows are allowed) fail with
/// [`IngestError::Parse`].
pub fn read_raw_table(bytes: &[u8], config: &IngestConfig) -> Result<RawTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(config.delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let width = headers.len();
    let mut records = Vec::new();
    let mut extra_field_rows = 0usize;

    for result in reader.records() {
        let record = result?;

        if width > 1 && is_blank_record(&record, bytes) {
            continue;
        }

        if record.len() != width {
            if !config.allow_ragged_rows {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(IngestError::Parse(format!(
                    "record on line {} has {} fields, but the header has {}",
                    line,
                    record.len(),
                    width
                )));
            }
            if record.len() > width {
                extra_field_rows += 1;
            }
        }

        records.push(record);
    }

    if extra_field_rows > 0 {
        warn!(
            "Ignored surplus fields in {} record(s) wider than the header",
            extra_field_rows
        );
    }

    debug!(
        "Read {} data rows across {} header fields",
        records.len(),
        width
    );

    Ok(RawTable { headers, records })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &str) -> Result<RawTable> {
        read_raw_table(data.as_bytes(), &IngestConfig::default())
    }

    #[test]
    fn test_reads_headers_and_records() {
        let table = read("City,Pop\nNYC,8000000\nLA,4000000\n").unwrap();
        assert_eq!(table.headers.iter().collect::<Vec<_>>(), vec!["City", "Pop"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1].get(0), Some("LA"));
    }

    #[test]
    fn test_skips_blank_lines() {
        let table = read("a,b\n\n1,2\n\n\n3,4\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_skips_whitespace_only_lines() {
        let table = read("a,b\n1,2\n   \n3,4\n  ").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_quoted_whitespace_field_is_not_blank() {
        let err = read("a,b\n\"1\",\"2\"\n\"   \"\n3,4\n").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.to_string().contains("line 3"));

        let config = IngestConfig::builder().allow_ragged_rows(true).build().unwrap();
        let table = read_raw_table(b"a,b\n1,2\n\n\"   \"\n3,4\n", &config).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[1].get(0), Some("   "));
    }

    #[test]
    fn test_keeps_rows_of_empty_fields() {
        let table = read("a,b\n,\n1,2\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get(0), Some(""));
    }

    #[test]
    fn test_strips_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice(b"name,value\nx,1\n");
        let table = read_raw_table(&data, &IngestConfig::default()).unwrap();
        assert_eq!(table.headers.get(0), Some("name"));
    }

    #[test]
    fn test_quoted_fields() {
        let table = read("name,note\n\"Smith, John\",\"said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(table.records[0].get(0), Some("Smith, John"));
        assert_eq!(table.records[0].get(1), Some("said \"hi\""));
    }

    #[test]
    fn test_ragged_rows_rejected_by_default() {
        let err = read("a,b\n1,2\n3\n").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_ragged_rows_allowed() {
        let config = IngestConfig::builder().allow_ragged_rows(true).build().unwrap();
        let table = read_raw_table(b"a,b\n1,2\n3\n4,5,6\n", &config).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[1].get(1), None);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = read_raw_table(b"a,b\n\xff\xfe,1\n", &IngestConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_custom_delimiter() {
        let config = IngestConfig::builder().delimiter(b';').build().unwrap();
        let table = read_raw_table(b"a;b\n1,5;2\n", &config).unwrap();
        assert_eq!(table.records[0].get(0), Some("1,5"));
    }

    #[test]
    fn test_empty_input() {
        let table = read("").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }
}
