//! Hit event store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::hit::{DailyHits, HitEvent, NewHitEvent};
use crate::pipeline::DailyHitsPipeline;

/// Persistence port for hit events.
///
/// Implementations own the stored collection. Every method is a single
/// round trip; failures are reported as `DomainError::StoreUnavailable` and
/// are never retried here.
#[async_trait]
pub trait HitEventStore: Send + Sync {
    /// Total number of stored events.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Persists a validated event and returns it with its assigned id.
    async fn insert(&self, event: NewHitEvent) -> Result<HitEvent, DomainError>;

    /// Every stored event, in store order.
    async fn all(&self) -> Result<Vec<HitEvent>, DomainError>;

    /// Deletes every event whose timestamp is strictly before `cutoff`.
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<(), DomainError>;

    /// Runs the daily aggregation pipeline. Results are sorted by day.
    async fn aggregate(&self, pipeline: &DailyHitsPipeline)
    -> Result<Vec<DailyHits>, DomainError>;
}
