//! Shared utilities for reading cells and computing rates.
//!
//! Cells arrive as polars `AnyValue`s of whatever type the loader inferred.
//! The helpers here give the rules one consistent view: a NaN float counts
//! as missing (like null), and textual or numeric readings are derived the
//! same way regardless of the column's dtype.

use polars::prelude::*;

// =============================================================================
// Cell Utilities
// =============================================================================

/// Check if a cell is absent: null, or a floating-point NaN.
#[inline]
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::Float64(v) => v.is_nan(),
        AnyValue::Float32(v) => v.is_nan(),
        _ => false,
    }
}

/// Render a present cell as text. Returns `None` for missing cells.
pub fn cell_text(value: &AnyValue<'_>) -> Option<String> {
    if is_missing(value) {
        return None;
    }
    let text = match value {
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(true) => "True".to_string(),
        AnyValue::Boolean(false) => "False".to_string(),
        other => other.to_string(),
    };
    Some(text)
}

/// Read a present cell as an integer.
///
/// Floats are truncated toward zero; strings must parse as an integer after
/// trimming. Returns `None` when the cell cannot be read as an integer.
pub fn cell_integer(value: &AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Boolean(b) => Some(i64::from(*b)),
        AnyValue::String(s) => s.trim().parse::<i64>().ok(),
        AnyValue::StringOwned(s) => s.trim().parse::<i64>().ok(),
        AnyValue::Float32(v) => truncate_float(f64::from(*v)),
        AnyValue::Float64(v) => truncate_float(*v),
        other if other.dtype().is_integer() => other.extract::<i64>(),
        _ => None,
    }
}

/// Read a present cell as a real number.
///
/// Strings must parse as a float after trimming. Returns `None` when the cell
/// cannot be read as a number.
pub fn cell_real(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Boolean(b) => Some(f64::from(u8::from(*b))),
        AnyValue::String(s) => s.trim().parse::<f64>().ok(),
        AnyValue::StringOwned(s) => s.trim().parse::<f64>().ok(),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        other if other.dtype().is_integer() => other.extract::<f64>(),
        _ => None,
    }
}

fn truncate_float(v: f64) -> Option<i64> {
    if v.is_finite() {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

// =============================================================================
// Text Case Utilities
// =============================================================================

#[inline]
fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

/// True when the text has at least one cased character and none is lower-case.
pub fn is_upper_cased(s: &str) -> bool {
    s.chars().any(is_cased) && !s.chars().any(char::is_lowercase)
}

/// True when the text is title-cased: at least one cased character, every
/// upper-case character follows an uncased one, and every lower-case
/// character follows a cased one.
pub fn is_title_cased(s: &str) -> bool {
    let mut cased = false;
    let mut previous_is_cased = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if previous_is_cased {
                return false;
            }
            previous_is_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_is_cased {
                return false;
            }
            previous_is_cased = true;
            cased = true;
        } else {
            previous_is_cased = false;
        }
    }

    cased
}

// =============================================================================
// DataFrame Utilities
// =============================================================================

/// Column names of a DataFrame as owned strings, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Check if a DataFrame has a column with this exact name.
#[inline]
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Type label for a column dtype, as shown in the summary report.
pub fn dtype_label(dtype: &DataType) -> String {
    dtype.to_string()
}

/// `count / total * 100`, or 0.0 when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

// =============================================================================
// Tests
// =============================================================================
