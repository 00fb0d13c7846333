//! Number formatting matching the dashboard's browser-side helpers.

use crate::data::value::number_text;

/// Format `value` with exactly `digits` fractional digits.
///
/// Rounds like `Number.prototype.toFixed`: to the nearest representable
/// decimal, with exact ties going away from zero. Magnitudes of `1e21` and
/// above fall back to plain number text.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return number_text(value);
    }
    let value = if value == 0.0 { 0.0 } else { value };

    // Look 25 digits past the cut to detect an exact binary tie, which
    // std formatting would round to even.
    const PROBE: usize = 25;
    let wide = format!("{:.*}", digits + PROBE, value.abs());
    let (kept, tail) = wide.split_at(wide.len() - PROBE);
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');

    if !is_tie {
        return format!("{:.*}", digits, value);
    }

    let kept = kept.strip_suffix('.').unwrap_or(kept);
    let rounded = increment_last_digit(kept);
    if value.is_sign_negative() {
        format!("-{}", rounded)
    } else {
        rounded
    }
}

/// Add one unit in the last place of a non-negative decimal string.
fn increment_last_digit(decimal: &str) -> String {
    let mut bytes = decimal.as_bytes().to_vec();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                carry = false;
            }
        }
    }
    let mut out = String::from_utf8(bytes).unwrap_or_default();
    if carry {
        out.insert(0, '1');
    }
    out
}

const SECOND_MS: u64 = 1000;
const MINUTE_MS: u64 = 60 * SECOND_MS;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Format a duration given in milliseconds, e.g. `1 sec 500 ms`.
///
/// Zero components are omitted; a zero duration is `0 ms`. Fractional
/// milliseconds are truncated.
pub fn format_duration(millis: f64) -> String {
    if !millis.is_finite() {
        return number_text(millis);
    }
    let negative = millis < 0.0;
    let mut rest = millis.abs().trunc() as u64;

    let mut parts = Vec::new();
    let days = rest / DAY_MS;
    rest %= DAY_MS;
    if days > 0 {
        parts.push(format!("{} day{}", days, if days > 1 { "s" } else { "" }));
    }
    let hours = rest / HOUR_MS;
    rest %= HOUR_MS;
    if hours > 0 {
        parts.push(format!("{} hour{}", hours, if hours > 1 { "s" } else { "" }));
    }
    let minutes = rest / MINUTE_MS;
    rest %= MINUTE_MS;
    if minutes > 0 {
        parts.push(format!("{} min", minutes));
    }
    let seconds = rest / SECOND_MS;
    rest %= SECOND_MS;
    if seconds > 0 {
        parts.push(format!("{} sec", seconds));
    }
    if rest > 0 || parts.is_empty() {
        parts.push(format!("{} ms", rest));
    }

    let joined = parts.join(" ");
    if negative && joined != "0 ms" {
        format!("-{}", joined)
    } else {
        joined
    }
}
