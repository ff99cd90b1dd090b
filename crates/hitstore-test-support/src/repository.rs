//! `HitEventStore` implementations for tests and local runs.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hitstore_core::error::DomainError;
use hitstore_core::hit::{DailyHits, HitEvent, NewHitEvent};
use hitstore_core::pipeline::DailyHitsPipeline;
use hitstore_core::repository::HitEventStore;
use uuid::Uuid;

/// A hit event store backed by a `Vec`. Evaluates aggregation pipelines in
/// process with `DailyHitsPipeline::evaluate`.
#[derive(Debug, Default)]
pub struct InMemoryHitEventStore {
    events: Mutex<Vec<HitEvent>>,
}

impl InMemoryHitEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `events`, bypassing validation.
    #[must_use]
    pub fn with_events(events: Vec<HitEvent>) -> Self {
        Self {
            events: Mutex::new(events),
        }
    }

    /// Returns a snapshot of the stored events.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn snapshot(&self) -> Vec<HitEvent> {
        self.events.lock().unwrap().clone()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<HitEvent>>, DomainError> {
        self.events
            .lock()
            .map_err(|e| DomainError::StoreUnavailable(format!("store mutex poisoned: {e}")))
    }
}

#[async_trait]
impl HitEventStore for InMemoryHitEventStore {
    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.lock()?.len() as u64)
    }

    async fn insert(&self, event: NewHitEvent) -> Result<HitEvent, DomainError> {
        let stored = event.with_id(Uuid::now_v7());
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn all(&self) -> Result<Vec<HitEvent>, DomainError> {
        Ok(self.lock()?.clone())
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<(), DomainError> {
        self.lock()?.retain(|event| event.timestamp >= cutoff);
        Ok(())
    }

    async fn aggregate(
        &self,
        pipeline: &DailyHitsPipeline,
    ) -> Result<Vec<DailyHits>, DomainError> {
        Ok(pipeline.evaluate(self.lock()?.iter()))
    }
}

/// A store that always returns `StoreUnavailable`. Useful for testing
/// error-propagation paths.
#[derive(Debug)]
pub struct FailingHitEventStore;

fn connection_refused() -> DomainError {
    DomainError::StoreUnavailable("connection refused".into())
}

#[async_trait]
impl HitEventStore for FailingHitEventStore {
    async fn count(&self) -> Result<u64, DomainError> {
        Err(connection_refused())
    }

    async fn insert(&self, _event: NewHitEvent) -> Result<HitEvent, DomainError> {
        Err(connection_refused())
    }

    async fn all(&self) -> Result<Vec<HitEvent>, DomainError> {
        Err(connection_refused())
    }

    async fn delete_before(&self, _cutoff: DateTime<Utc>) -> Result<(), DomainError> {
        Err(connection_refused())
    }

    async fn aggregate(
        &self,
        _pipeline: &DailyHitsPipeline,
    ) -> Result<Vec<DailyHits>, DomainError> {
        Err(connection_refused())
    }
}

/// A store whose calls never complete. Used to exercise timeouts.
#[derive(Debug)]
pub struct StallingHitEventStore;

#[async_trait]
impl HitEventStore for StallingHitEventStore {
    async fn count(&self) -> Result<u64, DomainError> {
        std::future::pending().await
    }

    async fn insert(&self, _event: NewHitEvent) -> Result<HitEvent, DomainError> {
        std::future::pending().await
    }

    async fn all(&self) -> Result<Vec<HitEvent>, DomainError> {
        std::future::pending().await
    }

    async fn delete_before(&self, _cutoff: DateTime<Utc>) -> Result<(), DomainError> {
        std::future::pending().await
    }

    async fn aggregate(
        &self,
        _pipeline: &DailyHitsPipeline,
    ) -> Result<Vec<DailyHits>, DomainError> {
        std::future::pending().await
    }
}
