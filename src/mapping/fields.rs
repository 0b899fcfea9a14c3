//! Per-field formatting rules shared by the report mappers.
//!
//! Every helper takes the raw lookup result (`Option<&Value>`) so that a missing key, an explicit
//! `NULL`, and a blank string all follow the same default.

use crate::types::{Cell, Value};

/// Longest free-text value a fixed-width report column accepts.
pub const MAX_TEXT_LEN: usize = 100;

/// Date layout used in every report.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

fn present(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| !v.is_null())
}

/// Render a date as `DD/MM/YYYY`; null, absent, or unparseable values render empty.
pub fn format_date(v: Option<&Value>) -> Cell {
    match present(v).and_then(Value::as_date) {
        Some(d) => Cell::Text(d.format(DATE_FORMAT).to_string()),
        None => Cell::Empty,
    }
}

/// Cut `s` to at most `max` characters.
pub fn truncate_text(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

/// Trimmed text, empty when absent.
pub fn text_or_empty(v: Option<&Value>) -> Cell {
    match present(v).and_then(Value::as_text) {
        Some(s) => Cell::text(s.trim()),
        None => Cell::Empty,
    }
}

/// Trimmed free text cut to [`MAX_TEXT_LEN`] characters.
pub fn free_text(v: Option<&Value>) -> Cell {
    match present(v).and_then(Value::as_text) {
        Some(s) => Cell::text(truncate_text(s.trim(), MAX_TEXT_LEN)),
        None => Cell::Empty,
    }
}

/// Amount where zero is meaningful: absent renders as literal `0`.
pub fn amount_or_zero(v: Option<&Value>) -> Cell {
    Cell::Number(present(v).and_then(Value::as_f64).unwrap_or(0.0))
}

/// Amount where zero means "not applicable": zero and absent both render empty.
pub fn amount_or_empty(v: Option<&Value>) -> Cell {
    match present(v).and_then(Value::as_f64) {
        Some(x) if x != 0.0 => Cell::Number(x),
        _ => Cell::Empty,
    }
}

/// Whole count with a default for absent values (e.g. installments default to `1`).
pub fn count_or_default(v: Option<&Value>, default: i64) -> Cell {
    Cell::from(present(v).and_then(Value::as_i64).unwrap_or(default))
}

/// Integer code, empty when absent. Non-integer values fall back to their text.
pub fn integer_or_empty(v: Option<&Value>) -> Cell {
    match present(v) {
        Some(value) => match value.as_i64() {
            Some(i) => Cell::from(i),
            None => text_or_empty(Some(value)),
        },
        None => Cell::Empty,
    }
}
