//! Error types for KernelChaos admission
//!
//! Malformed resources are an expected outcome, never a panic: every problem
//! found while validating is returned to the caller, which surfaces the
//! message verbatim as the reason a create or update was rejected.

use thiserror::Error;

use crate::field::{AggregateError, FieldError};

/// Main error type for KernelChaos admission
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The resource failed one or more field validations
    #[error("validation error for {resource}: {errors}")]
    Validation {
        /// `namespace/name` of the rejected resource
        resource: String,
        /// Every field error found, in validation order
        errors: AggregateError,
    },

    /// The resource could not be decoded
    #[error("serialization error for {kind}: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being decoded
        kind: String,
    },
}

impl Error {
    /// Create a validation error for the given resource
    pub fn validation(resource: impl Into<String>, errors: AggregateError) -> Self {
        Self::Validation {
            resource: resource.into(),
            errors,
        }
    }

    /// Create a serialization error for a specific resource kind
    pub fn serialization_for(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: kind.into(),
        }
    }

    /// Field errors carried by a validation failure (empty otherwise)
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation { errors, .. } => errors.errors(),
            Self::Serialization { .. } => &[],
        }
    }

    /// Returns true if this is a validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ErrorList, FieldPath};

    fn aggregate(details: &[&str]) -> AggregateError {
        details
            .iter()
            .map(|d| FieldError::invalid(FieldPath::new("spec").child("value"), "x", *d))
            .collect::<ErrorList>()
            .into_aggregate()
            .unwrap()
    }

    // ==========================================================================
    // Story Tests: Rejection messages reach the user
    // ==========================================================================

    /// Story: a rejected resource names itself and every broken field
    #[test]
    fn story_validation_error_names_resource_and_fields() {
        let err = Error::validation("chaos-testing/kernel-fault", aggregate(&["bad value"]));

        let msg = err.to_string();
        assert!(msg.contains("chaos-testing/kernel-fault"));
        assert!(msg.contains("spec.value"));
        assert!(msg.contains("bad value"));
        assert!(err.is_validation());
        assert_eq!(err.field_errors().len(), 1);
    }

    /// Story: aggregated errors keep every message
    #[test]
    fn story_validation_error_keeps_all_messages() {
        let err = Error::validation("ns/name", aggregate(&["first", "second"]));
        let msg = err.to_string();
        assert!(msg.contains("first"));
        assert!(msg.contains("second"));
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn serialization_error_carries_kind() {
        let err = Error::serialization_for("KernelChaos", "missing field `spec`");
        assert!(err.to_string().contains("missing field `spec`"));
        assert!(!err.is_validation());
        assert!(err.field_errors().is_empty());

        match err {
            Error::Serialization { kind, .. } => assert_eq!(kind, "KernelChaos"),
            _ => panic!("expected serialization error"),
        }
    }
}
