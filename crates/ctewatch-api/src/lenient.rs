//! Lenient field decoders for telemetry payloads.
//!
//! The telemetry source is loosely typed: statistics may arrive as JSON
//! numbers, numeric strings (`"0.4213"`), strings with a unit suffix
//! (`"75.0%"`) or `null`. These decoders map all of them onto `Option`s
//! and leave defaulting to the caller. A value that cannot be read as a
//! number decodes to `None`, never to an error.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a floating-point statistic. Non-finite values decode to `None`.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

/// Decode a non-negative counter. Fractions are truncated, negatives are
/// treated as absent.
pub fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_count))
}

/// Decode a free-form text field that some sources emit as a number.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Read a JSON value as a finite `f64`.
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_float(s),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn value_to_count(value: &Value) -> Option<u64> {
    if let Value::Number(n) = value {
        if let Some(exact) = n.as_u64() {
            return Some(exact);
        }
    }
    let f = value_to_f64(value)?;
    if f < 0.0 {
        return None;
    }
    // `as` saturates at u64::MAX for out-of-range floats.
    Some(f.trunc() as u64)
}

/// Parse the longest numeric prefix of `s`, ignoring leading whitespace.
///
/// `"12.5%"` → 12.5, `" 3e2 ms"` → 300.0, `"abc"` → `None`.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let at = |i: usize| bytes.get(i).copied();
    let skip_digits = |mut i: usize| {
        while at(i).is_some_and(|b| b.is_ascii_digit()) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(at(0), Some(b'+' | b'-')));
    let int_end = skip_digits(end);
    let mut digits = int_end - end;
    end = int_end;

    if at(end) == Some(b'.') {
        let frac_end = skip_digits(end + 1);
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(at(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(at(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    t.get(..end)?.parse::<f64>().ok()
}
