//! Human-readable readouts for telemetry values.
//!
//! Every function is total: out-of-domain input renders as [`PLACEHOLDER`]
//! rather than panicking or producing `NaN` text.

use chrono::{DateTime, TimeZone};

/// Shown wherever a value is unknown (offline, missing, out of range).
pub const PLACEHOLDER: &str = "---";

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Fixed-point text with exact ties rounded away from zero, so `6.25` at
/// one decimal reads `"6.3"` where `{:.1}` alone gives `"6.2"`.
///
/// A tie is only possible for dyadic values (multiples of 1/8 or coarser
/// at the precisions used here), whose full decimal expansion fits well
/// inside 40 digits.
pub fn to_fixed(value: f64, decimals: usize) -> String {
    let exact = format!("{:.40}", value.abs());
    let frac = exact.split_once('.').map_or("", |(_, f)| f);
    let tie = frac.as_bytes().get(decimals) == Some(&b'5')
        && frac.bytes().skip(decimals + 1).all(|b| b == b'0');
    let value = match (tie, value.is_sign_negative()) {
        (false, _) => value,
        (true, false) => value.next_up(),
        (true, true) => value.next_down(),
    };
    format!("{value:.decimals$}")
}

/// Format a byte count with base-1024 units and two decimals.
///
/// `0` → `"0 B"`, `2048` → `"2.00 KB"`. Values beyond the TB range stay in TB.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".into();
    }
    let mut unit = 0;
    let mut divisor: u64 = 1;
    while unit + 1 < BYTE_UNITS.len() && bytes / divisor >= 1024 {
        divisor *= 1024;
        unit += 1;
    }
    format!(
        "{} {}",
        to_fixed(bytes as f64 / divisor as f64, 2),
        BYTE_UNITS[unit]
    )
}

/// Whole seconds of a positive finite duration. Zero means the counter is
/// absent (missing on the wire defaults to 0) and reads as unknown.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn whole_seconds(seconds: f64) -> Option<u64> {
    (seconds.is_finite() && seconds > 0.0).then(|| seconds.floor() as u64)
}

/// Compact uptime: `"2d 3h"`, `"4h 5m"`, `"6m 7s"` or `"8s"`. Zero,
/// negative and non-finite input render as the placeholder.
pub fn fmt_uptime(seconds: f64) -> String {
    let Some(secs) = whole_seconds(seconds) else {
        return PLACEHOLDER.into();
    };
    let d = secs / 86_400;
    let h = (secs % 86_400) / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;

    if d > 0 {
        format!("{d}d {h}h")
    } else if h > 0 {
        format!("{h}h {m}m")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// Clock-style uptime `H:MM:SS`; hours are not wrapped at 24. Same
/// placeholder rule as [`fmt_uptime`].
pub fn fmt_uptime_clock(seconds: f64) -> String {
    let Some(secs) = whole_seconds(seconds) else {
        return PLACEHOLDER.into();
    };
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Abbreviated count: `"1.5M"`, `"2.3K"`, or the plain integer below 1000.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{}M", to_fixed(n as f64 / 1_000_000.0, 1))
    } else if n >= 1_000 {
        format!("{}K", to_fixed(n as f64 / 1_000.0, 1))
    } else {
        n.to_string()
    }
}

pub fn fmt_count_opt(n: Option<u64>) -> String {
    n.map_or_else(|| PLACEHOLDER.into(), fmt_count)
}

/// `"95.0%"` with the given number of decimals. Non-finite input renders
/// as the placeholder.
pub fn fmt_percent(pct: f64, decimals: usize) -> String {
    if pct.is_finite() {
        format!("{}%", to_fixed(pct, decimals))
    } else {
        PLACEHOLDER.into()
    }
}

/// Wall-clock `HH:MM:SS` of a timestamp in its own zone.
pub fn fmt_clock_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M:%S").to_string()
}
