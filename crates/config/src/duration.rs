//! Duration literals such as `"300ms"`, `"5s"` or `"2h30m"`.
//!
//! Grammar: an optional sign followed by one or more `<decimal><unit>` groups,
//! where unit is one of `ns`, `us` (`µs`, `μs`), `ms`, `s`, `m`, `h`. The
//! literal `"0"` is the only unit-less form accepted.

use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Largest magnitude representable as signed 64-bit nanoseconds (negative side).
const MAX_MAGNITUDE: u128 = 1 << 63;

/// Errors produced while parsing a duration literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("duration {0:?} is out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// Parse a duration literal into a signed time span.
pub fn parse_duration(input: &str) -> Result<time::Duration, DurationParseError> {
    let invalid = || DurationParseError::Invalid(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(time::Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let first = rest.as_bytes()[0];
        if !(first == b'.' || first.is_ascii_digit()) {
            return Err(invalid());
        }

        // Integer part.
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let mut whole: u128 = 0;
        for digit in rest[..int_len].bytes() {
            whole = whole * 10 + u128::from(digit - b'0');
            if whole > MAX_MAGNITUDE {
                return Err(DurationParseError::Overflow(input.to_string()));
            }
        }
        rest = &rest[int_len..];

        // Fractional part. Digits past the representable scale are dropped.
        let mut fraction: u128 = 0;
        let mut scale: f64 = 1.0;
        let mut frac_len = 0;
        if let Some(after_dot) = rest.strip_prefix('.') {
            frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            for digit in after_dot[..frac_len].bytes() {
                if fraction < MAX_MAGNITUDE / 10 {
                    fraction = fraction * 10 + u128::from(digit - b'0');
                    scale *= 10.0;
                }
            }
            rest = &after_dot[frac_len..];
        }
        if int_len == 0 && frac_len == 0 {
            return Err(invalid());
        }

        let unit_len = rest
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationParseError::MissingUnit(input.to_string()));
        }
        let unit = &rest[..unit_len];
        let per_unit = unit_nanos(unit).ok_or_else(|| DurationParseError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;
        rest = &rest[unit_len..];

        let mut group = whole
            .checked_mul(per_unit)
            .ok_or_else(|| DurationParseError::Overflow(input.to_string()))?;
        if fraction > 0 {
            group += (fraction as f64 * (per_unit as f64 / scale)) as u128;
        }
        total += group;
        if total > MAX_MAGNITUDE {
            return Err(DurationParseError::Overflow(input.to_string()));
        }
    }

    let nanos = if negative {
        -(total as i128)
    } else {
        if total == MAX_MAGNITUDE {
            return Err(DurationParseError::Overflow(input.to_string()));
        }
        total as i128
    };
    // Bounded to i64 above.
    Ok(time::Duration::nanoseconds(nanos as i64))
}

/// Format a duration as a literal accepted by [`parse_duration`].
///
/// Spans below one second use the largest fitting sub-second unit (`"1.5ms"`);
/// longer spans use hours, minutes and seconds (`"2h30m0s"`).
pub fn format_duration(duration: time::Duration) -> String {
    let nanos = duration.whole_nanoseconds();
    if nanos == 0 {
        return "0s".to_string();
    }
    let sign = if nanos < 0 { "-" } else { "" };
    let magnitude = nanos.unsigned_abs();

    if magnitude < NANOS_PER_SECOND {
        let body = if magnitude < NANOS_PER_MICRO {
            format!("{magnitude}ns")
        } else if magnitude < NANOS_PER_MILLI {
            format!("{}µs", with_fraction(magnitude, 3))
        } else {
            format!("{}ms", with_fraction(magnitude, 6))
        };
        return format!("{sign}{body}");
    }

    let hours = magnitude / NANOS_PER_HOUR;
    let minutes = (magnitude % NANOS_PER_HOUR) / NANOS_PER_MINUTE;
    let seconds = with_fraction(magnitude % NANOS_PER_MINUTE, 9);
    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

/// Render `value / 10^digits` with trailing fractional zeros removed.
fn with_fraction(value: u128, digits: u32) -> String {
    let divisor = 10u128.pow(digits);
    let whole = value / divisor;
    let fraction = value % divisor;
    if fraction == 0 {
        return whole.to_string();
    }
    let padded = format!("{fraction:0width$}", width = digits as usize);
    format!("{whole}.{}", padded.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn test_parse_single_units() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::seconds(5));
        assert_eq!(parse_duration("300ms").unwrap(), Duration::milliseconds(300));
        assert_eq!(parse_duration("10us").unwrap(), Duration::microseconds(10));
        assert_eq!(parse_duration("10µs").unwrap(), Duration::microseconds(10));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::nanoseconds(7));
        assert_eq!(parse_duration("15m").unwrap(), Duration::minutes(15));
    }

    #[test]
    fn test_parse_compound_and_fractional() {
        assert_eq!(
            parse_duration("2h30m").unwrap(),
            Duration::hours(2) + Duration::minutes(30)
        );
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::milliseconds(500));
        assert_eq!(
            parse_duration("1m0.25s").unwrap(),
            Duration::seconds(60) + Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_parse_sign_and_zero() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-1.5s").unwrap(), Duration::milliseconds(-1500));
        assert_eq!(parse_duration("+2m").unwrap(), Duration::minutes(2));
    }

    #[test]
    fn test_parse_rejects_malformed_literals() {
        assert!(matches!(parse_duration(""), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse_duration("-"), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse_duration(".s"), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse_duration("s"), Err(DurationParseError::Invalid(_))));
        assert!(matches!(
            parse_duration("100"),
            Err(DurationParseError::MissingUnit(_))
        ));
        assert!(matches!(
            parse_duration("5x"),
            Err(DurationParseError::UnknownUnit { .. })
        ));
        assert!(matches!(
            parse_duration("3000000h"),
            Err(DurationParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_format_matches_literal_grammar() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::nanoseconds(12)), "12ns");
        assert_eq!(format_duration(Duration::microseconds(1500)), "1.5ms");
        assert_eq!(format_duration(Duration::microseconds(20)), "20µs");
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::seconds(90)), "1m30s");
        assert_eq!(format_duration(Duration::hours(1)), "1h0m0s");
        assert_eq!(
            format_duration(Duration::hours(-2) - Duration::minutes(30)),
            "-2h30m0s"
        );
        assert_eq!(format_duration(Duration::milliseconds(2500)), "2.5s");
    }
}
