//! Metric formatting.
//!
//! Every figure the dashboard shows goes through one of these functions so the
//! rounding and sign conventions stay identical across the table, the charts
//! and the exports.
//!
//! Rounding is Rust's fixed-point formatting (`{:.1}`), applied to the
//! decimal value: exact binary ties round half to even (`0.25` prints as
//! `0.2`), everything else to the nearest digit. Chart values use
//! `chart::round1` instead, which rounds ties up. The sign is taken from the
//! *rounded* text, so values that round to zero always print as `+0.0`.

use crate::domain::MetricUnit;

/// `+3.3bn` / `-1.9bn`: currency value in billions, one decimal, always signed.
pub fn format_bn(value: f64) -> String {
    format!("{}bn", signed_one_decimal(value / 1e9))
}

/// `+2.0%` / `-1.9%`: percentage, one decimal, always signed.
pub fn format_pct(value: f64) -> String {
    format!("{}%", signed_one_decimal(value))
}

/// Format a charted value (already converted to display units).
pub fn format_metric(value: f64, unit: MetricUnit) -> String {
    match unit {
        MetricUnit::Billions => format_bn(value * 1e9),
        MetricUnit::Percent => format_pct(value),
    }
}

/// Table cell for a currency value: billions, one decimal, no sign prefix.
pub fn format_bn_plain(value: f64) -> String {
    unsigned_one_decimal(value / 1e9)
}

/// Table cell for a percentage: one decimal, no sign prefix.
pub fn format_pct_plain(value: f64) -> String {
    unsigned_one_decimal(value)
}

/// Household money change: `+£1,234` / `-£56`, whole pounds.
pub fn format_gbp(value: f64) -> String {
    let pounds = value.abs().round();
    let sign = if value < 0.0 && pounds > 0.0 { '-' } else { '+' };
    format!("{sign}£{}", group_thousands(pounds as u64))
}

/// Decile chart axis tick: `+2%`, `0%`, `-3%`.
pub fn format_pct_tick(value: f64) -> String {
    let r = value.round();
    if r > 0.0 {
        format!("+{r:.0}%")
    } else if r < 0.0 {
        format!("{r:.0}%")
    } else {
        "0%".to_string()
    }
}

/// Decile chart point label: two decimals, `+` only for positive values.
pub fn format_pct_detail(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

/// Bar chart axis tick in display units (`+3.3`, `-1.2%`).
pub fn format_axis_value(value: f64, unit: MetricUnit) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    match unit {
        MetricUnit::Billions => format!("{sign}{value}"),
        MetricUnit::Percent => format!("{sign}{value}%"),
    }
}

fn signed_one_decimal(v: f64) -> String {
    let digits = format!("{:.1}", v.abs());
    let sign = if v < 0.0 && digits != "0.0" { '-' } else { '+' };
    format!("{sign}{digits}")
}

fn unsigned_one_decimal(v: f64) -> String {
    let digits = format!("{:.1}", v.abs());
    if v < 0.0 && digits != "0.0" {
        format!("-{digits}")
    } else {
        digits
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
