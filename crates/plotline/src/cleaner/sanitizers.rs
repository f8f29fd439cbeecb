//! Formatting strippers applied to raw cell text before numeric coercion.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// Currency and percent symbols, removed wherever they occur.
static SYMBOL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$€£%]").expect("Invalid regex: currency symbols"));

/// Remove currency symbols, percent signs and grouping commas.
///
/// Returns the input unchanged (borrowed) when nothing was stripped, which
/// lets the caller detect "untouched" text with a cheap pointer-free check.
pub(crate) fn strip_numeric_formatting(value: &str) -> Cow<'_, str> {
    let without_symbols = SYMBOL_PATTERN.replace_all(value, "");
    if let Cow::Owned(stripped) = strip_grouping_commas(&without_symbols) {
        return Cow::Owned(stripped);
    }
    without_symbols
}

/// Remove commas used as thousands separators.
///
/// A comma counts as a separator when it is followed by exactly three ASCII
/// digits and then a non-digit or the end of the value: `1,234.50` and
/// `1,234,567` lose their commas, `12,5` and `1,2345` keep theirs.
pub(crate) fn strip_grouping_commas(value: &str) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    let is_grouping = |idx: usize| {
        bytes.get(idx + 1..idx + 4).is_some_and(|run| run.iter().all(u8::is_ascii_digit))
            && !bytes.get(idx + 4).is_some_and(u8::is_ascii_digit)
    };

    let positions: Vec<usize> = bytes
        .iter()
        .enumerate()
        .filter(|(idx, b)| **b == b',' && is_grouping(*idx))
        .map(|(idx, _)| idx)
        .collect();

    if positions.is_empty() {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() - positions.len());
    let mut last = 0;
    for pos in positions {
        out.push_str(&value[last..pos]);
        last = pos + 1;
    }
    out.push_str(&value[last..]);
    Cow::Owned(out)
}
