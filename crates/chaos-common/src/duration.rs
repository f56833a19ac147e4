//! Elapsed-time expressions such as `30s`, `5m30s` or `1.5h`
//!
//! Grammar: an optional sign followed by one or more `<number><unit>` pairs.
//! A number is decimal with an optional fraction (`1.5`, `.5`, `2.`); a unit is
//! one of `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m`, `h`. The bare string `0`
//! is accepted on its own.

use thiserror::Error;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

const UNITS: &[(&str, u64)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("\u{00b5}s", 1_000),
    ("\u{03bc}s", 1_000),
    ("ms", 1_000_000),
    ("s", NANOS_PER_SECOND),
    ("m", 60 * NANOS_PER_SECOND),
    ("h", 3_600 * NANOS_PER_SECOND),
];

/// Why an elapsed-time expression was rejected
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Malformed number, empty input, or a value that overflows
    #[error("invalid duration {0:?}")]
    Invalid(String),

    /// A number with no unit after it
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    /// A unit outside the supported set
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The unrecognized unit
        unit: String,
        /// The full expression
        input: String,
    },
}

/// Parse an elapsed-time expression into signed nanoseconds.
pub fn parse_duration(input: &str) -> Result<i64, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());

    let (negative, mut rest) = if let Some(r) = input.strip_prefix('-') {
        (true, r)
    } else if let Some(r) = input.strip_prefix('+') {
        (false, r)
    } else {
        (false, input)
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, after) = split_digits(rest);
        rest = after;
        let whole_value: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut fraction = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, after) = split_digits(after_dot);
            fraction = digits;
            rest = after;
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let (unit, after) = rest.split_at(unit_len);
        rest = after;

        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| DurationError::UnknownUnit {
                unit: unit.to_string(),
                input: input.to_string(),
            })?;

        let nanos = whole_value
            .checked_mul(scale)
            .and_then(|n| n.checked_add(fraction_nanos(fraction, scale)))
            .ok_or_else(invalid)?;
        total = total.checked_add(nanos).ok_or_else(invalid)?;
    }

    let limit = if negative {
        i64::MAX as u64 + 1
    } else {
        i64::MAX as u64
    };
    if total > limit {
        return Err(invalid());
    }

    let signed = total as i64;
    Ok(if negative { signed.wrapping_neg() } else { signed })
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Nanoseconds contributed by the fractional digits of a number in `scale` units.
///
/// Digits beyond what fits in a u64 are dropped; they are below nanosecond
/// precision for every supported unit.
fn fraction_nanos(digits: &str, scale: u64) -> u64 {
    let mut value: u64 = 0;
    let mut divisor: f64 = 1.0;
    for d in digits.bytes() {
        if value > (u64::MAX - 9) / 10 {
            break;
        }
        value = value * 10 + u64::from(d - b'0');
        divisor *= 10.0;
    }
    (value as f64 * (scale as f64 / divisor)) as u64
}
