//! Parse-or-absent coercions for raw cells.
//!
//! None of these functions fail: malformed input yields `None`.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%b %d, %Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Non-negative integer. Accepts whole floats such as `"23.0"`.
pub fn parse_count(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<i64>() {
        return u32::try_from(v).ok();
    }
    let v = s.parse::<f64>().ok()?;
    if !v.is_finite() || v.fract() != 0.0 || v < 0.0 || v > f64::from(u32::MAX) {
        return None;
    }
    Some(v as u32)
}

/// Non-negative monetary amount. Accepts an optional `€` prefix and
/// `,`/`_` grouping.
pub fn parse_money(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_prefix('€').unwrap_or(s);
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    let v = cleaned.parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// English month name of a date.
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Calendar position (1-12) of an English month name, case-insensitive.
/// Accepts three-letter abbreviations.
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim();
    MONTH_NAMES
        .iter()
        .position(|m| {
            m.eq_ignore_ascii_case(name)
                || (name.len() == 3 && m[..3].eq_ignore_ascii_case(name))
        })
        .map(|i| i as u32 + 1)
}
