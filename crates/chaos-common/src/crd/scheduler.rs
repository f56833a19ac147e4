//! Recurring execution of chaos experiments

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cron;
use crate::duration::parse_duration;
use crate::field::{ErrorList, FieldError, FieldPath};

/// Schedule for a recurring experiment
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerSpec {
    /// Recurrence expression, e.g. `*/5 * * * *` or `@every 10m`
    pub cron: String,
}

/// Validate the optional scheduler and duration of a chaos spec.
///
/// Neither being set is valid and means a one-shot experiment. Each field that
/// is present is checked on its own, and both problems are reported when both
/// fields are malformed.
pub fn validate_scheduler(
    scheduler: Option<&SchedulerSpec>,
    duration: Option<&str>,
    path: &FieldPath,
) -> ErrorList {
    let mut errs = ErrorList::new();

    if let Some(scheduler) = scheduler {
        if let Err(e) = cron::validate(&scheduler.cron) {
            errs.push(FieldError::invalid(
                path.child("scheduler").child("cron"),
                scheduler.cron.as_str(),
                format!("invalid scheduler expression: {e}"),
            ));
        }
    }

    if let Some(duration) = duration {
        if let Err(e) = parse_duration(duration) {
            errs.push(FieldError::invalid(
                path.child("duration"),
                duration,
                format!("invalid duration: {e}"),
            ));
        }
    }

    errs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(cron: &str) -> SchedulerSpec {
        SchedulerSpec {
            cron: cron.to_string(),
        }
    }

    fn check(scheduler: Option<&SchedulerSpec>, duration: Option<&str>) -> ErrorList {
        validate_scheduler(scheduler, duration, &FieldPath::new("spec"))
    }

    #[test]
    fn one_shot_without_scheduler_or_duration() {
        assert!(check(None, None).is_empty());
    }

    #[test]
    fn valid_scheduler_and_duration() {
        assert!(check(Some(&scheduler("*/5 * * * *")), Some("30s")).is_empty());
        assert!(check(Some(&scheduler("@every 2m")), None).is_empty());
    }

    #[test]
    fn duration_alone_is_checked() {
        assert!(check(None, Some("30s")).is_empty());

        let errs = check(None, Some("30"));
        assert_eq!(errs.len(), 1);
        let err = errs.iter().next().unwrap();
        assert_eq!(err.path.as_str(), "spec.duration");
        assert!(err.detail.starts_with("invalid duration: "));
        assert!(err.detail.contains("missing unit"));
    }

    #[test]
    fn invalid_scheduler_expression() {
        let errs = check(Some(&scheduler("not-a-cron")), None);
        assert_eq!(errs.len(), 1);
        let err = errs.iter().next().unwrap();
        assert_eq!(err.path.as_str(), "spec.scheduler.cron");
        assert_eq!(err.value, "not-a-cron");
        assert!(err.detail.starts_with("invalid scheduler expression: "));
    }

    #[test]
    fn empty_scheduler_expression_is_invalid() {
        let errs = check(Some(&scheduler("")), Some("1m"));
        assert_eq!(errs.len(), 1);
        assert!(errs.iter().next().unwrap().detail.contains("empty spec string"));
    }

    #[test]
    fn both_failures_are_collected() {
        let errs = check(Some(&scheduler("61 * * * *")), Some("ten minutes"));
        let paths: Vec<&str> = errs.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["spec.scheduler.cron", "spec.duration"]);
    }
}
