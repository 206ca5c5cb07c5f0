//! Simulation engine.
//!
//! Provides the two-phase signal primitives, the `Design` contract a circuit model
//! implements, the VCD waveform writer, and the driver that advances the clock.

/// Design contract and debug item lists.
pub mod design;

/// Clock driver, trace output and interrupt handling.
pub mod driver;

/// Two-phase wires and clock edge detection.
pub mod signal;

/// Value Change Dump writer.
pub mod vcd;

pub use design::{DebugItems, Design};
pub use driver::Driver;
