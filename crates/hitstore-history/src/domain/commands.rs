//! Commands for the hit history context.

use chrono::{DateTime, Utc};
use hitstore_core::command::Command;
use hitstore_core::hit::HitEventDraft;
use uuid::Uuid;

/// Command to record one rule-match event.
#[derive(Debug, Clone)]
pub struct RecordHit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The candidate event, validated before it is stored.
    pub draft: HitEventDraft,
}

impl Command for RecordHit {
    fn command_type(&self) -> &'static str {
        "history.record_hit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete every event older than a cutoff.
#[derive(Debug, Clone)]
pub struct PurgeHitsBefore {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Events with a timestamp strictly before this instant are deleted.
    pub cutoff: DateTime<Utc>,
}

impl Command for PurgeHitsBefore {
    fn command_type(&self) -> &'static str {
        "history.purge_hits_before"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
