//! hitstore core: rule-hit records, validation, and the aggregation pipeline.
//!
//! This crate defines the types and traits every other crate in the
//! workspace depends on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod hit;
pub mod pipeline;
pub mod repository;
pub mod validation;
