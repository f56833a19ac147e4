//! Field paths and field-level validation errors
//!
//! Validators report every problem they find as a [`FieldError`] against the
//! path of the offending field (e.g. `spec.scheduler.cron`). The errors of one
//! validation pass are collected in an [`ErrorList`], which folds into a single
//! [`AggregateError`] when the resource is rejected.

use std::fmt;

use thiserror::Error;

/// Dotted path to a field of a resource, e.g. `spec.selector.namespaces`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// Create a root path
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    /// Path of a named child field
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    /// The rendered path
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single field that failed validation
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{path}: Invalid value: {value:?}: {detail}")]
pub struct FieldError {
    /// Path of the offending field
    pub path: FieldPath,
    /// The rejected value, as it appeared in the resource
    pub value: String,
    /// Human-readable cause
    pub detail: String,
}

impl FieldError {
    /// Report `value` at `path` as invalid
    pub fn invalid(path: FieldPath, value: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            path,
            value: value.into(),
            detail: detail.into(),
        }
    }
}

/// Ordered collection of field errors from one validation pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Returns true if no errors were collected
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of collected errors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the errors in the order they were collected
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Fold the list into one error, or `None` when it is empty
    pub fn into_aggregate(self) -> Option<AggregateError> {
        if self.0.is_empty() {
            None
        } else {
            Some(AggregateError { errors: self.0 })
        }
    }
}

impl Extend<FieldError> for ErrorList {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<FieldError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One or more field errors reported as a single failure
///
/// A single error renders as itself; several render as `[first, second]`
/// in collection order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}", render(.errors))]
pub struct AggregateError {
    errors: Vec<FieldError>,
}

impl AggregateError {
    /// The individual errors, in collection order
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

fn render(errors: &[FieldError]) -> String {
    match errors {
        [single] => single.to_string(),
        _ => {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            format!("[{}]", joined.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_error(field: &str, value: &str, detail: &str) -> FieldError {
        FieldError::invalid(FieldPath::new("spec").child(field), value, detail)
    }

    #[test]
    fn path_rendering() {
        let path = FieldPath::new("spec").child("scheduler").child("cron");
        assert_eq!(path.as_str(), "spec.scheduler.cron");
        assert_eq!(path.to_string(), "spec.scheduler.cron");
    }

    #[test]
    fn field_error_display_quotes_value() {
        let err = spec_error("value", "5", "value is not required for mode one");
        assert_eq!(
            err.to_string(),
            r#"spec.value: Invalid value: "5": value is not required for mode one"#
        );
    }

    #[test]
    fn empty_list_has_no_aggregate() {
        assert!(ErrorList::new().into_aggregate().is_none());
    }

    #[test]
    fn single_error_aggregate_renders_bare() {
        let list: ErrorList = vec![spec_error("duration", "30", "invalid duration")]
            .into_iter()
            .collect();
        let aggregate = list.into_aggregate().unwrap();
        assert_eq!(
            aggregate.to_string(),
            r#"spec.duration: Invalid value: "30": invalid duration"#
        );
    }

    #[test]
    fn multiple_errors_aggregate_in_order() {
        let mut list = ErrorList::new();
        list.push(spec_error("duration", "30", "first"));
        list.extend([spec_error("value", "x", "second")]);
        assert_eq!(list.len(), 2);

        let aggregate = list.into_aggregate().unwrap();
        let message = aggregate.to_string();
        assert!(message.starts_with('['));
        assert!(message.ends_with(']'));
        let first = message.find("first").unwrap();
        let second = message.find("second").unwrap();
        assert!(first < second);
        assert_eq!(aggregate.errors().len(), 2);
    }
}
