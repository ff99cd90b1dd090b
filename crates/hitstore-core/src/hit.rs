//! Hit event records and daily aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted rule-match occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// The rule that produced the event.
    pub rule_name: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The number of hits this event represents.
    pub number_of_hits: i64,
}

/// A caller-supplied candidate hit event.
///
/// Every field is optional so that a missing value can be reported as a
/// constraint violation instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEventDraft {
    /// The rule that produced the event.
    pub rule_name: Option<String>,
    /// When the event occurred.
    pub timestamp: Option<DateTime<Utc>>,
    /// The number of hits this event represents.
    pub number_of_hits: Option<i64>,
}

impl HitEventDraft {
    /// Builds a fully populated draft.
    #[must_use]
    pub fn new(rule_name: impl Into<String>, timestamp: DateTime<Utc>, number_of_hits: i64) -> Self {
        Self {
            rule_name: Some(rule_name.into()),
            timestamp: Some(timestamp),
            number_of_hits: Some(number_of_hits),
        }
    }
}

/// A validated hit event waiting for a store-assigned id.
///
/// Only [`crate::validation::validate_draft`] produces values of this type,
/// so every insert has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHitEvent {
    pub(crate) rule_name: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) number_of_hits: i64,
}

impl NewHitEvent {
    /// The rule that produced the event.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// When the event occurred.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The number of hits, guaranteed non-negative.
    #[must_use]
    pub fn number_of_hits(&self) -> i64 {
        self.number_of_hits
    }

    /// Attaches the store-assigned id.
    #[must_use]
    pub fn with_id(self, id: Uuid) -> HitEvent {
        HitEvent {
            id,
            rule_name: self.rule_name,
            timestamp: self.timestamp,
            number_of_hits: self.number_of_hits,
        }
    }
}

/// One UTC calendar day's summed hit count for a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHits {
    /// `YYYY-MM-DD`.
    pub day: String,
    /// Sum of `number_of_hits` over the day.
    pub number_of_hits: i64,
}
