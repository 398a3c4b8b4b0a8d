use chrono::NaiveDate;

use crate::models::DATE_FORMAT;

/// Placeholder shown wherever a value is undefined.
pub const NOT_AVAILABLE: &str = "n/a";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(4504.348, 1), "4,504.3");
/// assert_eq!(format_number(3292679.0, 0), "3,292,679");
/// assert_eq!(format_number(-0.5, 2), "-0.50");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let factor = 10_f64.powi(decimals as i32);
    // Nudge by a relative epsilon so values such as 1.005 round the way they read.
    let scaled = value.abs() * factor;
    let rounded = (scaled + f64::EPSILON * scaled).round();

    let whole = (rounded / factor).trunc() as u64;
    let grouped = group_thousands(&whole.to_string());

    let body = if decimals == 0 {
        grouped
    } else {
        let frac = (rounded - (whole as f64) * factor).round() as u64;
        format!("{}.{:0width$}", grouped, frac, width = decimals as usize)
    };

    if value < 0.0 && rounded > 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Whole-number count with thousands separators, e.g. rental totals.
pub fn format_count(value: f64) -> String {
    format_number(value, 0)
}

/// Format an optional value, rendering `None` as [`NOT_AVAILABLE`].
pub fn format_optional(value: Option<f64>, decimals: u32) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_number(v, decimals))
}

/// Format with an explicit sign: `+0.630`, `-0.129`.
pub fn format_signed(value: f64, decimals: u32) -> String {
    if value > 0.0 {
        format!("+{}", format_number(value, decimals))
    } else {
        format_number(value, decimals)
    }
}

/// Signed percentage: `+18.4%`.
pub fn format_signed_percent(value: f64, decimals: u32) -> String {
    format!("{}%", format_signed(value, decimals))
}

/// `(value - base) / base * 100`, or `None` when `base` is zero.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::percent_change;
///
/// assert_eq!(percent_change(150.0, 100.0), Some(50.0));
/// assert_eq!(percent_change(1.0, 0.0), None);
/// ```
pub fn percent_change(value: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some((value - base) / base * 100.0)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Inclusive period label: `2011-01-01 to 2012-12-31`.
pub fn format_period(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} to {}", format_date(start), format_date(end))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
