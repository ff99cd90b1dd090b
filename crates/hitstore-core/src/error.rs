//! Domain error types.

use thiserror::Error;

use crate::validation::ConstraintViolation;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// One or more field constraints were violated; nothing was persisted.
    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<ConstraintViolation>),

    /// The caller supplied a record that does not have the stored shape.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The underlying store is unreachable, errored, or timed out.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    /// Shorthand for a validation error with a single violation.
    #[must_use]
    pub fn violation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(vec![ConstraintViolation::new(field, message)])
    }

    /// Returns the violated constraints, or an empty slice for other variants.
    #[must_use]
    pub fn violations(&self) -> &[ConstraintViolation] {
        match self {
            Self::Validation(violations) => violations,
            Self::TypeMismatch(_) | Self::StoreUnavailable(_) => &[],
        }
    }
}

fn join_violations(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_every_violation() {
        let err = DomainError::Validation(vec![
            ConstraintViolation::new("rule_name", "must not be blank"),
            ConstraintViolation::new("number_of_hits", "must be greater than or equal to 0"),
        ]);

        assert_eq!(
            err.to_string(),
            "validation failed: rule_name must not be blank; \
             number_of_hits must be greater than or equal to 0"
        );
    }

    #[test]
    fn test_violations_is_empty_for_store_errors() {
        let err = DomainError::StoreUnavailable("connection refused".into());
        assert!(err.violations().is_empty());
    }
}
