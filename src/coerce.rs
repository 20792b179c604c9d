//! Type coercion between raw cells and table text.
//!
//! Import direction: every raw cell collapses to one canonical string. This
//! is lossy: display formatting (currency, percent, custom date
//! formats) is not recoverable because the engine hands over plain floats
//! and date-times, and kinds outside number/date/text become empty strings.
//!
//! Export direction: cells of decimal columns are forced to two fraction
//! digits; everything else keeps its natural text.

use crate::format::DecimalText;
use crate::grid::RawCell;
use crate::types::ColumnKind;
use chrono::NaiveDateTime;
use tracing::debug;

/// General date/time layout: short numeric date plus 24h time of day.
pub const GENERAL_DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Fixed notation is used for decimal exponents in `-4..15`, scientific outside.
const SCIENTIFIC_BELOW: i32 = -4;
const SCIENTIFIC_FROM: i32 = 15;

/// Canonical text form of a raw cell. Total and infallible.
pub fn coerce_to_text(cell: &RawCell) -> String {
    match cell {
        RawCell::Empty => String::new(),
        RawCell::Number(n) => format_general_number(*n),
        RawCell::DateTime(dt) => format_general_datetime(dt),
        RawCell::Text(s) => s.clone(),
        RawCell::Boolean(_) | RawCell::Duration(_) | RawCell::Error(_) => {
            debug!(kind = cell.kind_name(), "unrecognised cell kind coerced to empty");
            String::new()
        }
    }
}

/// Shortest round-trip rendering of a float, no grouping, no forced decimals.
/// Very large or very small magnitudes use `1.5E-07` style notation.
pub fn format_general_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // LowerExp without precision yields the shortest round-trip digits
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return format!("{}", value),
    };

    if (SCIENTIFIC_BELOW..SCIENTIFIC_FROM).contains(&exponent) {
        format!("{}", value)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}E{}{:02}", mantissa, sign, exponent.abs())
    }
}

pub fn format_general_datetime(value: &NaiveDateTime) -> String {
    value.format(GENERAL_DATETIME_FORMAT).to_string()
}

/// Two fraction digits, half-to-even, at least two integer digits: `3` → `03.00`.
pub fn coerce_decimal_for_export(value: f64) -> String {
    match DecimalText::from_f64(value) {
        Some(decimal) => decimal.to_fixed(2, 2),
        None => format_general_number(value),
    }
}

/// `coerce_decimal_for_export` applied to cell text, `None` if it is not a number.
pub fn coerce_decimal_text_for_export(text: &str) -> Option<String> {
    DecimalText::parse_lenient(text).map(|decimal| decimal.to_fixed(2, 2))
}

/// Export rendering of one table cell according to its column kind.
pub fn coerce_cell_for_export(text: &str, kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Text => text.to_string(),
        ColumnKind::Decimal => {
            coerce_decimal_text_for_export(text).unwrap_or_else(|| text.to_string())
        }
    }
}
