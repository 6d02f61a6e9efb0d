//! Duration strings such as `500ms`, `5s` or `1h30m`.
//!
//! Durations are written as a sequence of decimal numbers, each with an
//! optional fraction and a unit suffix. Valid units are `ns`, `us` (or
//! `µs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted as zero.

use std::fmt;
use std::time::Duration;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

use super::ConfigError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parses a duration string.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] for empty input, negative
/// durations, missing or unknown units, and values that overflow.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDuration {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = value.trim();
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else if rest.starts_with('-') {
        return Err(invalid("must not be negative"));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            return Err(invalid("expected a number"));
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = unit_scale(unit).ok_or_else(|| {
            if unit.is_empty() {
                invalid("missing unit")
            } else {
                invalid(&format!("unknown unit '{unit}'"))
            }
        })?;

        total = total
            .checked_add(scale_number(number, scale).ok_or_else(|| invalid("invalid number"))?)
            .ok_or_else(|| invalid("duration overflows"))?;
        rest = tail;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid("duration overflows"))?;
    let nanos = u32::try_from(total % NANOS_PER_SEC).map_err(|_| invalid("duration overflows"))?;
    Ok(Duration::new(secs, nanos))
}

/// Formats a duration the way [`parse_duration`] reads it.
///
/// Produces `0s`, `250ms`, `1.5s`, `1m30s` or `2h0m0s` style output.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return with_fraction(nanos, NANOS_PER_MICRO, 3, "µs");
    }
    if nanos < NANOS_PER_SEC {
        return with_fraction(nanos, NANOS_PER_MILLI, 6, "ms");
    }

    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = secs % 3600 / 60;
    let seconds = with_fraction(
        u128::from(secs % 60) * NANOS_PER_SEC + u128::from(duration.subsec_nanos()),
        NANOS_PER_SEC,
        9,
        "s",
    );

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}")
    } else {
        seconds
    }
}

fn unit_scale(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Multiplies a decimal literal by `scale`, truncating sub-nanosecond digits.
fn scale_number(number: &str, scale: u128) -> Option<u128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains('.') {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut result = whole.checked_mul(scale)?;

    let mut place = scale;
    for digit in fraction.chars() {
        place /= 10;
        if place == 0 {
            break;
        }
        result += u128::from(digit.to_digit(10)?) * place;
    }
    Some(result)
}

fn with_fraction(nanos: u128, unit: u128, width: usize, suffix: &str) -> String {
    let whole = nanos / unit;
    let remainder = nanos % unit;
    if remainder == 0 {
        return format!("{whole}{suffix}");
    }
    let fraction = format!("{remainder:0width$}");
    format!("{whole}.{}{suffix}", fraction.trim_end_matches('0'))
}

/// Serializes a [`Duration`] as a duration string.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

/// Deserializes a [`Duration`] from a duration string or integer nanoseconds.
///
/// # Errors
///
/// Fails on malformed strings and negative integers.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    deserializer.deserialize_any(DurationVisitor)
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration string like \"5s\" or an integer number of nanoseconds")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Duration, E> {
        parse_duration(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Duration, E> {
        Ok(Duration::from_nanos(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Duration, E> {
        u64::try_from(value)
            .map(Duration::from_nanos)
            .map_err(|_| E::custom("duration must not be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse {
        use super::*;

        #[test]
        fn single_units() {
            assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
            assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
            assert_eq!(parse_duration("10us").unwrap(), Duration::from_micros(10));
            assert_eq!(parse_duration("10µs").unwrap(), Duration::from_micros(10));
            assert_eq!(parse_duration("42ns").unwrap(), Duration::from_nanos(42));
            assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
            assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        }

        #[test]
        fn compound_and_fractional() {
            assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
            assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
            assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
            assert_eq!(
                parse_duration("1h2m3.004s").unwrap(),
                Duration::new(3723, 4_000_000)
            );
        }

        #[test]
        fn zero_and_sign() {
            assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
            assert_eq!(parse_duration("+3s").unwrap(), Duration::from_secs(3));
        }

        #[test]
        fn rejects_malformed() {
            for bad in ["", "5", "s", "-5s", "5x", "1..2s", "abc"] {
                assert!(
                    matches!(parse_duration(bad), Err(ConfigError::InvalidDuration { .. })),
                    "expected '{bad}' to be rejected"
                );
            }
        }
    }

    mod format {
        use super::*;

        #[test]
        fn sub_second() {
            assert_eq!(format_duration(Duration::ZERO), "0s");
            assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
            assert_eq!(format_duration(Duration::from_micros(15)), "15µs");
            assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
            assert_eq!(format_duration(Duration::from_micros(1500)), "1.5ms");
        }

        #[test]
        fn seconds_and_up() {
            assert_eq!(format_duration(Duration::from_secs(5)), "5s");
            assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
            assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
            assert_eq!(format_duration(Duration::from_secs(7200)), "2h0m0s");
        }

        #[test]
        fn output_parses_back() {
            let d = Duration::new(3723, 4_000_000);
            assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }
    }
}
