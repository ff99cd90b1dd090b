//! Domain layer: commands and calendar windows.

pub mod commands;
pub mod window;
