//! PostgreSQL-backed hit event store.
//!
//! [`pg_hit_event_store::PgHitEventStore`] compiles the typed aggregation
//! pipeline into parameterized SQL. [`timeout::TimeoutHitEventStore`] bounds
//! every round trip of any store.

pub mod pg_hit_event_store;
pub mod schema;
pub mod timeout;
