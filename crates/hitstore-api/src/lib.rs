//! HTTP service for recording rule hits and querying daily totals.

pub mod config;
pub mod error;
pub mod retention;
pub mod routes;
pub mod state;
pub mod telemetry;
