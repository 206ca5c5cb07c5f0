//! Common constants used throughout the simulator.

/// Largest accepted cycle count; also the default, meaning "run until interrupted".
pub const MAX_CYCLES: u64 = u64::MAX >> 1;

/// Width of the serial data bus in bits.
pub const DATA_BITS: u32 = 8;

/// Waveform samples per clock cycle (one at clock-low, one at clock-high).
pub const SAMPLES_PER_CYCLE: u64 = 2;

/// Upper bound on eval/commit passes inside a single `step`.
pub const MAX_DELTA_CYCLES: usize = 64;

/// Identifier used by the default serial port when none is configured.
pub const DEFAULT_SERIAL_ID: &str = "serial0";
