//! Formatter: display strings for numeric and date fields.
//!
//! Formatting only reads values. Records keep their numeric fields, so
//! derivation and annotation never see these strings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Record;
use crate::schema::{Field, FieldKind};

pub const CURRENCY_PREFIX: &str = "€";

/// Canonical string for an absent or non-positive amount.
pub const ZERO_MONEY: &str = "€0";

const ZERO_PERCENT: &str = "0.0%";

/// Display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Append the value change to the current value cell, e.g. `"€1,500,000 (+50.0%)"`.
    pub inline_change: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            inline_change: true,
        }
    }
}

/// `€1,500,000`. Absent or non-positive amounts render as [`ZERO_MONEY`].
pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => {
            let whole = v.round() as u64;
            format!("{CURRENCY_PREFIX}{}", group_thousands(whole))
        }
        _ => ZERO_MONEY.to_string(),
    }
}

/// `+50.0%`, `-12.3%`, `0.0%`, or empty when absent.
pub fn format_percent(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return String::new();
    };
    if format!("{:.1}", v.abs()) == "0.0" {
        return ZERO_PERCENT.to_string();
    }
    format!("{v:+.1}%")
}

/// `DD.MM.YYYY`, or empty when absent.
pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_default()
}

pub fn format_integer(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Current value with the already-derived change appended when it is non-zero.
///
/// Takes the derived percent as input rather than recomputing it, so the
/// suffix always agrees with the value change column and the highlight.
pub fn format_value_with_change(current: Option<f64>, percent_change: Option<f64>) -> String {
    let money = format_money(current);
    let pct = format_percent(percent_change);
    if pct.is_empty() || pct == ZERO_PERCENT {
        money
    } else {
        format!("{money} ({pct})")
    }
}

/// Display string for one cell of a derived record.
pub fn format_cell(record: &Record, field: Field, options: &DisplayOptions) -> String {
    match field.kind() {
        FieldKind::Text => record.text(field).unwrap_or_default().to_string(),
        FieldKind::Date => format_date(record.debut_date),
        FieldKind::Integer => format_integer(record.integer(field)),
        FieldKind::Percent => format_percent(record.number(field)),
        FieldKind::Money if field == Field::CurrentValue && options.inline_change => {
            format_value_with_change(record.current_value, record.percent_change)
        }
        FieldKind::Money => format_money(record.number(field)),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
