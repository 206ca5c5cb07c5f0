//! Pseudo-terminal serial co-simulation library.
//!
//! This crate bridges a clocked circuit model to the host through pseudo-terminals:
//! 1. **Host:** Pseudo-terminal channels and a pollable SIGINT flag.
//! 2. **SoC:** Endpoint registry, serial receive/transmit peripherals, and the echo system.
//! 3. **Simulation:** Two-phase signals, the `Design` contract, VCD tracing, and the clock driver.
//! 4. **Configuration:** JSON-deserialisable run settings with compiled-in defaults.
//! 5. **Statistics:** Per-run counters reported when the driver stops.

/// Common types and constants (errors, roles, limits).
pub mod common;
/// Simulator configuration (defaults, hierarchical config structures).
pub mod config;
/// Host-side I/O (pseudo-terminals, interrupts).
pub mod host;
/// Signals, design contract, waveform writer and driver.
pub mod sim;
/// System-on-chip (endpoint registry, devices, echo system).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Error type and result alias shared by every fallible operation.
pub use crate::common::{SimError, SimResult};
/// Clock driver; construct with `Driver::new`.
pub use crate::sim::Driver;
/// Echo system; construct with `System::new`.
pub use crate::soc::System;
