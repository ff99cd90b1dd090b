//! Shared test stores and utilities for the hitstore workspace.

mod clock;
mod repository;

pub use clock::FixedClock;
pub use repository::{FailingHitEventStore, InMemoryHitEventStore, StallingHitEventStore};
