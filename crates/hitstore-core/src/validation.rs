//! Field constraints checked before a hit event is persisted.
//!
//! Validation is a capability handed to the write path rather than a global:
//! callers pass any `Validator` implementation, and `ConstraintValidator`
//! carries the default constraint set.

use std::fmt;

use chrono::SubsecRound;
use serde::Serialize;

use crate::error::DomainError;
use crate::hit::{HitEventDraft, NewHitEvent};

/// Longest rule name the store accepts.
pub const MAX_RULE_NAME_LEN: usize = 255;

/// Fractional-second digits kept on an accepted timestamp.
const STORED_SUBSEC_DIGITS: u16 = 6;

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintViolation {
    /// The offending field.
    pub field: &'static str,
    /// What the constraint requires.
    pub message: String,
}

impl ConstraintViolation {
    /// Creates a new violation for `field`.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Checks a candidate hit event against field constraints.
pub trait Validator: Send + Sync {
    /// Returns every violated constraint. An empty result means the draft is valid.
    fn validate(&self, draft: &HitEventDraft) -> Vec<ConstraintViolation>;
}

/// The default constraint set.
///
/// - `rule_name` present, not blank, at most [`MAX_RULE_NAME_LEN`] characters
/// - `timestamp` present
/// - `number_of_hits` present and non-negative
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintValidator;

impl Validator for ConstraintValidator {
    fn validate(&self, draft: &HitEventDraft) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        match draft.rule_name.as_deref() {
            None => violations.push(ConstraintViolation::new("rule_name", "must not be null")),
            Some(name) if name.trim().is_empty() => {
                violations.push(ConstraintViolation::new("rule_name", "must not be blank"));
            }
            Some(name) if name.chars().count() > MAX_RULE_NAME_LEN => {
                violations.push(ConstraintViolation::new(
                    "rule_name",
                    format!("length must be at most {MAX_RULE_NAME_LEN}"),
                ));
            }
            Some(_) => {}
        }

        if draft.timestamp.is_none() {
            violations.push(ConstraintViolation::new("timestamp", "must not be null"));
        }

        match draft.number_of_hits {
            None => violations.push(ConstraintViolation::new(
                "number_of_hits",
                "must not be null",
            )),
            Some(hits) if hits < 0 => violations.push(ConstraintViolation::new(
                "number_of_hits",
                "must be greater than or equal to 0",
            )),
            Some(_) => {}
        }

        violations
    }
}

/// Runs `draft` through `validator` and, if nothing is violated, returns the
/// insertable record. The timestamp is truncated to microseconds, the
/// finest precision any store keeps, so a stored record always equals what
/// was accepted.
///
/// # Errors
///
/// Returns `DomainError::Validation` carrying every violated constraint.
pub fn validate_draft(
    draft: &HitEventDraft,
    validator: &dyn Validator,
) -> Result<NewHitEvent, DomainError> {
    let violations = validator.validate(draft);
    if !violations.is_empty() {
        return Err(DomainError::Validation(violations));
    }

    match (&draft.rule_name, draft.timestamp, draft.number_of_hits) {
        (Some(rule_name), Some(timestamp), Some(number_of_hits)) if number_of_hits >= 0 => {
            Ok(NewHitEvent {
                rule_name: rule_name.clone(),
                timestamp: timestamp.trunc_subsecs(STORED_SUBSEC_DIGITS),
                number_of_hits,
            })
        }
        // A custom validator let an incomplete draft through.
        _ => Err(DomainError::Validation(ConstraintValidator.validate(draft))),
    }
}
