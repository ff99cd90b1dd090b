//! Rule hit history.
//!
//! Records rule-match events after validation, purges them by age, and
//! answers per-rule daily totals over a trailing window of calendar days.

pub mod application;
pub mod domain;
