//! Column profiling and semantic type detection.
//!
//! Classification is a pure function of one column's cleaned values and is
//! evaluated in fixed priority order:
//!
//! 1. no non-null values → `text`
//! 2. more than 80% numeric → `numeric`
//! 3. more than 80% date-like → `date`
//! 4. at most 20 distinct values, or fewer distinct values than half the
//!    non-null count → `categorical`
//! 5. otherwise → `text`

mod type_inference;

pub(crate) use type_inference::{is_date_string, parse_datetime};

use crate::types::{CellValue, ColumnType};
use crate::utils::is_numeric_string;
use serde::Serialize;
use std::collections::HashSet;

/// Fraction of non-null values that must be numeric for a numeric column.
pub const NUMERIC_RATIO_THRESHOLD: f64 = 0.8;

/// Fraction of non-null values that must be date-like for a date column.
pub const DATE_RATIO_THRESHOLD: f64 = 0.8;

/// Distinct-value count at or below which a column is categorical.
pub const MAX_CATEGORICAL_UNIQUE: usize = 20;

/// Distinct/non-null ratio below which a column is categorical.
pub const CATEGORICAL_UNIQUE_RATIO: f64 = 0.5;

/// Counts gathered over one column, plus the resulting classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub null_count: usize,
    pub non_null_count: usize,
    pub numeric_count: usize,
    pub date_count: usize,
    pub unique_count: usize,
    pub column_type: ColumnType,
}

impl ColumnProfile {
    pub fn numeric_ratio(&self) -> f64 {
        ratio(self.numeric_count, self.non_null_count)
    }

    pub fn date_ratio(&self) -> f64 {
        ratio(self.date_count, self.non_null_count)
    }

    pub fn unique_ratio(&self) -> f64 {
        ratio(self.unique_count, self.non_null_count)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn is_numeric_value(value: &CellValue) -> bool {
    match value {
        CellValue::Number(_) => true,
        CellValue::Text(s) => is_numeric_string(s),
        CellValue::Null => false,
    }
}

fn is_date_value(value: &CellValue) -> bool {
    value.display_text().is_some_and(|s| is_date_string(&s))
}

/// Classify one column from its cleaned values.
///
/// Later checks are only evaluated when earlier ones fail, so a column that
/// is 85% numeric is never considered for `date`.
pub fn detect_column_type<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> ColumnType {
    let non_null: Vec<&CellValue> = values.into_iter().filter(|v| !v.is_null()).collect();
    if non_null.is_empty() {
        return ColumnType::Text;
    }
    let total = non_null.len();

    let numeric = non_null.iter().filter(|v| is_numeric_value(v)).count();
    if ratio(numeric, total) > NUMERIC_RATIO_THRESHOLD {
        return ColumnType::Numeric;
    }

    let dates = non_null.iter().filter(|v| is_date_value(v)).count();
    if ratio(dates, total) > DATE_RATIO_THRESHOLD {
        return ColumnType::Date;
    }

    classify_by_cardinality(count_unique(&non_null), total)
}

/// Gather the full set of counts for one column.
///
/// Unlike [`detect_column_type`] every count is computed, so this is the
/// slower of the two; the classification is identical.
pub fn profile_column<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> ColumnProfile {
    let mut null_count = 0;
    let mut non_null = Vec::new();
    for value in values {
        if value.is_null() {
            null_count += 1;
        } else {
            non_null.push(value);
        }
    }

    let total = non_null.len();
    let numeric_count = non_null.iter().filter(|v| is_numeric_value(v)).count();
    let date_count = non_null.iter().filter(|v| is_date_value(v)).count();
    let unique_count = count_unique(&non_null);

    let column_type = if total == 0 {
        ColumnType::Text
    } else if ratio(numeric_count, total) > NUMERIC_RATIO_THRESHOLD {
        ColumnType::Numeric
    } else if ratio(date_count, total) > DATE_RATIO_THRESHOLD {
        ColumnType::Date
    } else {
        classify_by_cardinality(unique_count, total)
    };

    ColumnProfile {
        null_count,
        non_null_count: total,
        numeric_count,
        date_count,
        unique_count,
        column_type,
    }
}

fn count_unique(non_null: &[&CellValue]) -> usize {
    non_null
        .iter()
        .filter_map(|v| v.display_text())
        .collect::<HashSet<_>>()
        .len()
}

fn classify_by_cardinality(unique_count: usize, total: usize) -> ColumnType {
    if unique_count <= MAX_CATEGORICAL_UNIQUE || ratio(unique_count, total) < CATEGORICAL_UNIQUE_RATIO
    {
        ColumnType::Categorical
    } else {
        ColumnType::Text
    }
}
