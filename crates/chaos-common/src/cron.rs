//! Recurrence expressions for scheduled chaos
//!
//! Accepts five-field cron (`minute hour day-of-month month day-of-week`) and
//! six-field cron with a leading seconds field, Sunday being weekday 0. The
//! descriptors `@yearly`, `@annually`, `@monthly`, `@weekly`, `@daily`,
//! `@midnight`, `@hourly` and `@every <duration>` are also accepted.

use croner::Cron;
use thiserror::Error;

use crate::duration::{parse_duration, DurationError};

const EVERY_PREFIX: &str = "@every ";

/// Calendar descriptors and the five-field pattern each stands for
const DESCRIPTORS: &[(&str, &str)] = &[
    ("@yearly", "0 0 1 1 *"),
    ("@annually", "0 0 1 1 *"),
    ("@monthly", "0 0 1 * *"),
    ("@weekly", "0 0 * * 0"),
    ("@daily", "0 0 * * *"),
    ("@midnight", "0 0 * * *"),
    ("@hourly", "0 * * * *"),
];

/// Why a recurrence expression was rejected
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CronError {
    /// Blank expression
    #[error("empty spec string")]
    Empty,

    /// Fewer than five or more than six fields
    #[error("expected 5 to 6 fields, found {found}: {expr:?}")]
    FieldCount {
        /// Number of fields present
        found: usize,
        /// The full expression
        expr: String,
    },

    /// An `@` descriptor that is not recognized
    #[error("unrecognized descriptor: {0}")]
    UnknownDescriptor(String),

    /// `@every` with a malformed interval
    #[error("failed to parse duration {expr}: {source}")]
    Every {
        /// The descriptor
        expr: String,
        /// Why the interval was rejected
        source: DurationError,
    },

    /// `@every` with a zero or negative interval
    #[error("@every interval must be positive: {0}")]
    NonPositiveEvery(String),

    /// The fields do not form a valid cron pattern
    #[error("{message}: {expr:?}")]
    Pattern {
        /// The full expression
        expr: String,
        /// What the cron parser reported
        message: String,
    },
}

/// Validate a recurrence expression.
pub fn validate(expr: &str) -> Result<(), CronError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(CronError::Empty);
    }

    if let Some(interval) = trimmed.strip_prefix(EVERY_PREFIX) {
        return validate_every(trimmed, interval);
    }

    let pattern = if trimmed.starts_with('@') {
        DESCRIPTORS
            .iter()
            .find(|(name, _)| *name == trimmed)
            .map(|(_, pattern)| *pattern)
            .ok_or_else(|| CronError::UnknownDescriptor(trimmed.to_string()))?
    } else {
        let found = trimmed.split_whitespace().count();
        if !(5..=6).contains(&found) {
            return Err(CronError::FieldCount {
                found,
                expr: trimmed.to_string(),
            });
        }
        trimmed
    };

    Cron::new(pattern)
        .with_seconds_optional()
        .parse()
        .map(|_| ())
        .map_err(|e| CronError::Pattern {
            expr: trimmed.to_string(),
            message: e.to_string(),
        })
}

fn validate_every(descriptor: &str, interval: &str) -> Result<(), CronError> {
    let nanos = parse_duration(interval.trim()).map_err(|source| CronError::Every {
        expr: descriptor.to_string(),
        source,
    })?;
    if nanos <= 0 {
        return Err(CronError::NonPositiveEvery(descriptor.to_string()));
    }
    Ok(())
}
