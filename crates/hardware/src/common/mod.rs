//! Common utilities and types used throughout the simulator.
//!
//! This module provides building blocks shared across all components. It includes:
//! 1. **Constants:** Cycle limits, bus widths and trace sampling parameters.
//! 2. **Error Handling:** The `SimError` taxonomy and the endpoint `Role` type.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types and role definitions.
pub mod error;

pub use constants::{DATA_BITS, DEFAULT_SERIAL_ID, MAX_CYCLES, MAX_DELTA_CYCLES, SAMPLES_PER_CYCLE};
pub use error::{Role, SimError, SimResult};
