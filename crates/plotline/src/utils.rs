//! Shared utilities for cleaning and type detection.
//!
//! Numeric recognition lives here so that the value cleaner and the type
//! detector agree on what "parses as a number" means.

// =============================================================================
// Numeric Parsing Utilities
// =============================================================================

/// Try to parse a string as a finite number.
///
/// The input is trimmed first. Accepts the usual float syntax (optional
/// sign, decimal point, exponent). Rejects empty input, textual infinities
/// and NaN, and anything that overflows to infinity.
///
/// # Example
///
/// ```rust,ignore
/// use plotline::utils::parse_number;
///
/// assert_eq!(parse_number(" 1234.50 "), Some(1234.5));
/// assert_eq!(parse_number("1e3"), Some(1000.0));
/// assert_eq!(parse_number("NaN"), None);
/// assert_eq!(parse_number("12,5"), None);
/// ```
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    // Rust also accepts "inf", "infinity" and "nan"; none of them contain a digit.
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Check if a string can be parsed as a finite number.
#[inline]
pub fn is_numeric_string(s: &str) -> bool {
    parse_number(s).is_some()
}

/// Render a number the way it appears in prompts and category labels.
///
/// Integral values have no fractional part (`8000000`, not `8000000.0`) and
/// negative zero prints as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

// =============================================================================
// Display Utilities
// =============================================================================

/// Truncate a string to `max_chars` characters, appending an ellipsis.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
