//! Per-call time limit for any `HitEventStore`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hitstore_core::error::DomainError;
use hitstore_core::hit::{DailyHits, HitEvent, NewHitEvent};
use hitstore_core::pipeline::DailyHitsPipeline;
use hitstore_core::repository::HitEventStore;
use tracing::warn;

/// Default bound on a single store round trip.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Wraps a store so that every call fails with `StoreUnavailable` once
/// `limit` elapses. The in-flight call is dropped; nothing is retried.
#[derive(Debug, Clone)]
pub struct TimeoutHitEventStore<S> {
    inner: S,
    limit: Duration,
}

impl<S> TimeoutHitEventStore<S> {
    /// Bounds every call on `inner` by `limit`.
    #[must_use]
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// The configured limit.
    #[must_use]
    pub fn limit(&self) -> Duration {
        self.limit
    }

    async fn bounded<T: Send>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, DomainError>> + Send,
    ) -> Result<T, DomainError> {
        if let Ok(result) = tokio::time::timeout(self.limit, call).await {
            result
        } else {
            let limit_ms = u64::try_from(self.limit.as_millis()).unwrap_or(u64::MAX);
            warn!(operation, limit_ms, "store call timed out");
            Err(DomainError::StoreUnavailable(format!(
                "{operation} timed out after {limit_ms}ms"
            )))
        }
    }
}

#[async_trait]
impl<S: HitEventStore> HitEventStore for TimeoutHitEventStore<S> {
    async fn count(&self) -> Result<u64, DomainError> {
        self.bounded("count", self.inner.count()).await
    }

    async fn insert(&self, event: NewHitEvent) -> Result<HitEvent, DomainError> {
        self.bounded("insert", self.inner.insert(event)).await
    }

    async fn all(&self) -> Result<Vec<HitEvent>, DomainError> {
        self.bounded("all", self.inner.all()).await
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<(), DomainError> {
        self.bounded("delete_before", self.inner.delete_before(cutoff))
            .await
    }

    async fn aggregate(
        &self,
        pipeline: &DailyHitsPipeline,
    ) -> Result<Vec<DailyHits>, DomainError> {
        self.bounded("aggregate", self.inner.aggregate(pipeline))
            .await
    }
}
