//! Value cleaning for raw CSV cells.
//!
//! Every raw cell is normalized into exactly one of three shapes:
//! - [`CellValue::Null`] for missing cells and sentinel strings (`"n/a"`, `"-"`, ...)
//! - [`CellValue::Number`] for text that only becomes numeric once currency
//!   symbols, percent signs and grouping commas are stripped
//! - [`CellValue::Text`] for everything else, trimmed
//!
//! Plain numeric text such as `"42"` is left as text here; the
//! type detector recognizes it separately.

mod sanitizers;

use crate::types::CellValue;
use crate::utils::parse_number;
use std::borrow::Cow;

/// Strings treated as absent data. Matched case-sensitively after trimming.
pub const SENTINELS: [&str; 10] = [
    "", "-", "n/a", "N/A", "null", "NULL", "na", "NA", "none", "None",
];

/// Check if a trimmed value is a missing-data sentinel.
#[inline]
pub fn is_sentinel(value: &str) -> bool {
    SENTINELS.contains(&value)
}

/// Clean one raw cell.
///
/// # Example
///
/// ```rust,ignore
/// use plotline::cleaner::clean;
/// use plotline::CellValue;
///
/// assert_eq!(clean(Some(" N/A ")), CellValue::Null);
/// assert_eq!(clean(Some("$1,234.50")), CellValue::Number(1234.5));
/// assert_eq!(clean(Some("12,5")), CellValue::Text("12,5".into()));
/// ```
pub fn clean(raw: Option<&str>) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Null;
    };

    let value = raw.trim();
    if is_sentinel(value) {
        return CellValue::Null;
    }

    match sanitizers::strip_numeric_formatting(value) {
        Cow::Borrowed(_) => CellValue::Text(value.to_string()),
        // Something was stripped. Keep the original text when the remainder
        // is not a number, so "100% cotton" stays intact.
        Cow::Owned(stripped) => match parse_number(&stripped) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(value.to_string()),
        },
    }
}

/// Re-clean an already cleaned value.
///
/// Nulls and numbers are returned unchanged; text goes through [`clean`]
/// again, for which cleaner output is a fixed point.
pub fn clean_cell(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => clean(Some(s)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_missing_input_is_null() {
        assert_eq!(clean(None), CellValue::Null);
    }

    #[test]
    fn test_every_sentinel_is_null() {
        for sentinel in SENTINELS {
            assert_eq!(clean(Some(sentinel)), CellValue::Null, "sentinel {:?}", sentinel);
        }
    }

    #[test]
    fn test_sentinels_are_trimmed_but_case_sensitive() {
        assert_eq!(clean(Some("  n/a  ")), CellValue::Null);
        assert_eq!(clean(Some("   ")), CellValue::Null);
        assert_eq!(clean(Some("N/a")), text("N/a"));
        assert_eq!(clean(Some("NONE")), text("NONE"));
    }

    #[test]
    fn test_spreadsheet_error_markers_are_text() {
        assert_eq!(clean(Some("NULL")), CellValue::Null);
        assert_eq!(clean(Some("#N/A")), text("#N/A"));
    }

    #[test]
    fn test_currency_and_percent_become_numbers() {
        assert_eq!(clean(Some("$1,234.50")), CellValue::Number(1234.5));
        assert_eq!(clean(Some("45%")), CellValue::Number(45.0));
        assert_eq!(clean(Some("€2,000")), CellValue::Number(2000.0));
        assert_eq!(clean(Some(" £-3.25 ")), CellValue::Number(-3.25));
    }

    #[test]
    fn test_grouping_comma_alone_triggers_coercion() {
        assert_eq!(clean(Some("1,234")), CellValue::Number(1234.0));
        assert_eq!(clean(Some("8,000,000")), CellValue::Number(8_000_000.0));
    }

    #[test]
    fn test_decimal_comma_is_preserved() {
        assert_eq!(clean(Some("12,5")), text("12,5"));
    }

    #[test]
    fn test_partially_stripped_text_keeps_original() {
        assert_eq!(clean(Some("100% cotton")), text("100% cotton"));
        assert_eq!(clean(Some("$")), text("$"));
        assert_eq!(clean(Some("USD $5 / mo")), text("USD $5 / mo"));
    }

    #[test]
    fn test_untouched_text_is_not_coerced() {
        assert_eq!(clean(Some("42")), text("42"));
        assert_eq!(clean(Some("  NYC ")), text("NYC"));
        assert_eq!(clean(Some("2024-01-15")), text("2024-01-15"));
    }

    #[test]
    fn test_clean_cell_is_noop_for_null_and_numbers() {
        assert_eq!(clean_cell(&CellValue::Null), CellValue::Null);
        assert_eq!(clean_cell(&CellValue::Number(1234.5)), CellValue::Number(1234.5));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let inputs = [
            "$1,234.50", "45%", "n/a", "12,5", "100% cotton", "  hello ", "42", "-",
        ];
        for input in inputs {
            let once = clean(Some(input));
            let twice = clean_cell(&once);
            assert_eq!(once, twice, "input {:?}", input);
        }
    }
}
