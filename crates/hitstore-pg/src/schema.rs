//! Hit event store database schema.

use sqlx::migrate::Migrator;

/// Table holding one row per recorded hit event.
pub const HIT_EVENTS_TABLE: &str = "rule_hit_events";

/// Embedded migrations creating [`HIT_EVENTS_TABLE`] and its indexes.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
