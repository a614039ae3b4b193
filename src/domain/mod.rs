//! Core domain types and logic.

pub mod command;
pub mod config_validation;
pub mod error;
pub mod graph;
pub mod holding;
pub mod loader;
pub mod money;
pub mod portfolio;
pub mod settings;
pub mod time_series;
