//! Core data types shared by the pipeline, the chart layer and the CLI.

use crate::utils::format_number;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Cell values
// ============================================================================

/// The cleaned contents of one CSV field.
///
/// Serializes untagged: `null`, a JSON number, or a JSON string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent value or a sentinel such as `"n/a"`.
    #[default]
    Null,
    /// A number recovered from formatted text such as `"$1,234.50"`.
    Number(f64),
    /// Trimmed text.
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The string form of a non-null value, as used for date parsing,
    /// distinct-value counting and category labels.
    pub fn display_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Number(n) => Some(Cow::Owned(format_number(*n))),
            Self::Text(s) => Some(Cow::Borrowed(s)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Date,
    Categorical,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Categorical => "categorical",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column of a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// One cleaned row: an ordered mapping from trimmed header name to value.
///
/// All rows of a dataset share the same key list, so the key set and key
/// order are identical across rows by construction. Serializes as a JSON
/// object in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRow {
    keys: Arc<[String]>,
    values: Vec<CellValue>,
}

impl CleanedRow {
    /// Build a row over a shared key list.
    ///
    /// `values` must be exactly as long as `keys`; missing positions are
    /// padded with [`CellValue::Null`] and surplus values are dropped.
    pub fn new(keys: Arc<[String]>, mut values: Vec<CellValue>) -> Self {
        values.resize(keys.len(), CellValue::Null);
        Self { keys, values }
    }

    /// Look up a value by column name.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.keys
            .iter()
            .position(|k| k == name)
            .map(|idx| &self.values[idx])
    }

    /// Look up a value by column position.
    pub fn get_index(&self, idx: usize) -> Option<&CellValue> {
        self.values.get(idx)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Iterate over `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.keys.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for CleanedRow {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// A fully cleaned and typed table, the sole output of ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub rows: Vec<CleanedRow>,
    pub columns: Vec<Column>,
    /// True when rows beyond the configured cap were discarded.
    pub truncated: bool,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Find a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Iterate over one column's values in row order.
    ///
    /// Yields nothing if the column does not exist.
    pub fn column_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a CellValue> + 'a {
        let idx = self.columns.iter().position(|c| c.name == name);
        self.rows
            .iter()
            .filter_map(move |row| idx.and_then(|i| row.get_index(i)))
    }
}
