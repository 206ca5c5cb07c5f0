//! # Unit Components
//!
//! Tests grouped by the module they exercise.


/// Configuration defaults, JSON overrides and validation.
pub mod config;


/// Signals, VCD writer and clock driver.
pub mod sim;
