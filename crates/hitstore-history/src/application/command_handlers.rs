//! Command handlers for the hit history context.
//!
//! Handlers validate input, call the store once, and return. They hold no
//! state between calls.

use chrono::{DateTime, Utc};
use hitstore_core::clock::Clock;
use hitstore_core::command::Command;
use hitstore_core::error::DomainError;
use hitstore_core::hit::HitEvent;
use hitstore_core::repository::HitEventStore;
use hitstore_core::validation::{Validator, validate_draft};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::commands::{PurgeHitsBefore, RecordHit};
use crate::domain::window::RetentionPolicy;

/// Handles the `RecordHit` command: validates the draft and persists it.
///
/// # Errors
///
/// Returns `DomainError::Validation` if any constraint is violated (nothing is
/// stored), or `DomainError::StoreUnavailable` if the insert fails.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
    )
)]
pub async fn handle_record_hit(
    command: &RecordHit,
    validator: &dyn Validator,
    store: &dyn HitEventStore,
) -> Result<HitEvent, DomainError> {
    let new_event = validate_draft(&command.draft, validator).inspect_err(|e| {
        warn!(error = %e, "rejected hit event");
    })?;

    let stored = store.insert(new_event).await?;
    debug!(id = %stored.id, rule_name = %stored.rule_name, "recorded hit event");

    Ok(stored)
}

/// Handles the `PurgeHitsBefore` command: deletes every event with a
/// timestamp strictly before the cutoff. Repeating it is a no-op.
///
/// # Errors
///
/// Returns `DomainError::StoreUnavailable` if the delete fails.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        cutoff = %command.cutoff,
    )
)]
pub async fn handle_purge_before(
    command: &PurgeHitsBefore,
    store: &dyn HitEventStore,
) -> Result<(), DomainError> {
    store.delete_before(command.cutoff).await?;
    info!("purged hit events before cutoff");
    Ok(())
}

/// Applies `policy` as of the clock's current date. Returns the cutoff used.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the cutoff cannot be computed, or
/// `DomainError::StoreUnavailable` if the delete fails.
pub async fn handle_apply_retention(
    policy: RetentionPolicy,
    clock: &dyn Clock,
    store: &dyn HitEventStore,
) -> Result<DateTime<Utc>, DomainError> {
    let command = PurgeHitsBefore {
        correlation_id: Uuid::new_v4(),
        cutoff: policy.cutoff(clock.today())?,
    };
    handle_purge_before(&command, store).await?;
    Ok(command.cutoff)
}
