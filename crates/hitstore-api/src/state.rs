//! Shared application state.

use std::sync::Arc;

use hitstore_core::clock::Clock;
use hitstore_core::repository::HitEventStore;
use hitstore_core::validation::Validator;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of "today" for trailing windows.
    pub clock: Arc<dyn Clock>,
    /// Constraints applied to incoming hit events.
    pub validator: Arc<dyn Validator>,
    /// Hit event persistence.
    pub store: Arc<dyn HitEventStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        validator: Arc<dyn Validator>,
        store: Arc<dyn HitEventStore>,
    ) -> Self {
        Self {
            clock,
            validator,
            store,
        }
    }
}
