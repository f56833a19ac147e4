//! Pod selection modes and the syntax of their companion `value`

use std::fmt;

use thiserror::Error;

use crate::field::{ErrorList, FieldError, FieldPath};
use crate::MAX_PERCENT;

/// How many of the selected pods an experiment acts on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PodMode {
    /// A single random pod
    One,
    /// Every selected pod
    All,
    /// Exactly `value` pods
    FixedCount,
    /// `value` percent of the selected pods
    FixedPercent,
    /// A random share of the selected pods, up to `value` percent
    RandomMaxPercent,
}

/// A mode string outside the supported set
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown mode {0:?}")]
pub struct UnknownPodMode(pub String);

/// Checks the `value` that accompanies a mode; `Err` carries the reason.
type ValueCheck = fn(PodMode, &str) -> Result<(), String>;

impl PodMode {
    /// Every supported mode
    pub const ALL: [PodMode; 5] = [
        Self::One,
        Self::All,
        Self::FixedCount,
        Self::FixedPercent,
        Self::RandomMaxPercent,
    ];

    /// Wire name of the mode
    pub fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::All => "all",
            Self::FixedCount => "fixed-count",
            Self::FixedPercent => "fixed-percent",
            Self::RandomMaxPercent => "random-max-percent",
        }
    }

    fn value_check(self) -> ValueCheck {
        match self {
            Self::One | Self::All => require_empty,
            Self::FixedCount => require_count,
            Self::FixedPercent | Self::RandomMaxPercent => require_percent,
        }
    }

    /// Check that `value` has the syntax this mode requires
    pub fn check_value(self, value: &str) -> Result<(), String> {
        (self.value_check())(self, value)
    }
}

impl std::str::FromStr for PodMode {
    type Err = UnknownPodMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one" => Ok(Self::One),
            "all" => Ok(Self::All),
            "fixed-count" | "fixed" => Ok(Self::FixedCount),
            "fixed-percent" => Ok(Self::FixedPercent),
            "random-max-percent" => Ok(Self::RandomMaxPercent),
            _ => Err(UnknownPodMode(s.to_string())),
        }
    }
}

impl fmt::Display for PodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn require_empty(mode: PodMode, value: &str) -> Result<(), String> {
    if value.is_empty() {
        Ok(())
    } else {
        Err(format!("value is not required for mode {mode}"))
    }
}

fn require_count(mode: PodMode, value: &str) -> Result<(), String> {
    value
        .parse::<u64>()
        .map(|_| ())
        .map_err(|_| format!("value must be a non-negative integer for mode {mode}"))
}

fn require_percent(mode: PodMode, value: &str) -> Result<(), String> {
    let percent: i64 = value
        .parse()
        .map_err(|e| format!("value must be an integer percentage for mode {mode}: {e}"))?;
    if (0..=MAX_PERCENT).contains(&percent) {
        Ok(())
    } else {
        Err(format!(
            "value must be within [0, {MAX_PERCENT}] for mode {mode}, got {percent}"
        ))
    }
}

/// Validate a (mode, value) pair.
///
/// `path` is the spec holding both fields; errors are reported against its
/// `mode` or `value` child. An unknown mode is reported alone, without looking
/// at the value.
pub fn validate_pod_mode(value: &str, mode: &str, path: &FieldPath) -> ErrorList {
    let mut errs = ErrorList::new();
    match mode.parse::<PodMode>() {
        Ok(mode) => {
            if let Err(detail) = mode.check_value(value) {
                errs.push(FieldError::invalid(path.child("value"), value, detail));
            }
        }
        Err(_) => {
            let supported: Vec<&str> = PodMode::ALL.iter().map(|m| m.as_str()).collect();
            errs.push(FieldError::invalid(
                path.child("mode"),
                mode,
                format!("unknown mode, supported modes: {}", supported.join(", ")),
            ));
        }
    }
    errs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(value: &str, mode: &str) -> ErrorList {
        validate_pod_mode(value, mode, &FieldPath::new("spec"))
    }

    fn detail(errs: &ErrorList) -> &str {
        &errs.iter().next().unwrap().detail
    }

    #[test]
    fn parses_wire_names() {
        for mode in PodMode::ALL {
            assert_eq!(mode.as_str().parse::<PodMode>(), Ok(mode));
        }
        assert_eq!("fixed".parse::<PodMode>(), Ok(PodMode::FixedCount));
        assert!("One".parse::<PodMode>().is_err());
    }

    #[test]
    fn one_and_all_take_no_value() {
        for mode in ["one", "all"] {
            assert!(check("", mode).is_empty());

            let errs = check("5", mode);
            assert_eq!(errs.len(), 1);
            assert_eq!(detail(&errs), format!("value is not required for mode {mode}"));
            assert_eq!(errs.iter().next().unwrap().path.as_str(), "spec.value");
        }
    }

    #[test]
    fn fixed_count_takes_non_negative_integer() {
        assert!(check("3", "fixed-count").is_empty());
        assert!(check("0", "fixed-count").is_empty());
        assert!(check("3", "fixed").is_empty());

        for bad in ["-1", "abc", "", "1.5"] {
            let errs = check(bad, "fixed-count");
            assert_eq!(errs.len(), 1, "expected rejection of {bad:?}");
            assert_eq!(
                detail(&errs),
                "value must be a non-negative integer for mode fixed-count"
            );
        }
    }

    #[test]
    fn percent_modes_accept_bounds() {
        for mode in ["fixed-percent", "random-max-percent"] {
            for ok in ["0", "50", "100"] {
                assert!(check(ok, mode).is_empty(), "{ok} should be valid for {mode}");
            }
        }
    }

    #[test]
    fn percent_modes_distinguish_range_from_parse_failure() {
        for mode in ["fixed-percent", "random-max-percent"] {
            let out_of_range = check("101", mode);
            assert!(detail(&out_of_range).contains("within [0, 100]"));

            let negative = check("-1", mode);
            assert!(detail(&negative).contains("within [0, 100]"));

            let garbage = check("half", mode);
            assert!(detail(&garbage).contains("integer percentage"));
        }
    }

    #[test]
    fn unknown_mode_skips_value() {
        let errs = check("not even a number", "some");
        assert_eq!(errs.len(), 1);
        let err = errs.iter().next().unwrap();
        assert_eq!(err.path.as_str(), "spec.mode");
        assert_eq!(err.value, "some");
        assert!(err.detail.starts_with("unknown mode"));
        assert!(err.detail.contains("random-max-percent"));
    }

    #[test]
    fn empty_mode_is_unknown() {
        let errs = check("", "");
        assert!(detail(&errs).starts_with("unknown mode"));
    }
}
