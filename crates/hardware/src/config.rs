//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline constants (cycle limit, serial identifier, history depth).
//! 2. **Structures:** Hierarchical config for the driver and the serial port.
//! 3. **Validation:** Range checks applied after deserialization and CLI overrides.
//!
//! Configuration is read from JSON (`sim --config run.json`), or use `Config::default()`.
//! Command-line flags override the file.
//!
//! ```
//! use ptysim_core::config::Config;
//!
//! let json = r#"{ "driver": { "cycles": 1000, "prompt": false } }"#;
//! let config = Config::from_json(json).unwrap();
//! assert_eq!(config.driver.cycles, 1000);
//! assert_eq!(config.serial.id, "serial0");
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::common::{SimError, SimResult};

/// Default configuration constants.
mod defaults {
    use crate::common::{DEFAULT_SERIAL_ID, MAX_CYCLES};

    /// Cycle count when none is given: effectively "until interrupted".
    pub const CYCLES: u64 = MAX_CYCLES;

    /// Whether to wait for Enter before the clock starts.
    pub const PROMPT: bool = true;

    /// Identifier of the serial endpoint used by the echo system.
    pub const SERIAL_ID: &str = DEFAULT_SERIAL_ID;

    /// Clock divisor reset value. Accepted on the port but not used for timing.
    pub const DIVISOR: u32 = 1;

    /// Words in the echo system's receive history memory.
    pub const HISTORY_DEPTH: usize = 16;
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Clock stepping, tracing and operator gate.
    #[serde(default)]
    pub driver: DriverConfig,
    /// Serial port wiring.
    #[serde(default)]
    pub serial: SerialConfig,
}

impl Config {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// `SimError::Config` on malformed JSON or unknown fields, `SimError::Argument` if a
    /// value is out of range.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// `SimError::Argument` describing the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        self.driver.validate()?;
        self.serial.validate()
    }
}

/// Driver settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Number of clock cycles to run.
    #[serde(default = "DriverConfig::default_cycles")]
    pub cycles: u64,

    /// VCD output path; tracing is off when unset.
    #[serde(default)]
    pub trace_path: Option<PathBuf>,

    /// Include memory contents in the trace. Only meaningful with `trace_path`.
    #[serde(default)]
    pub trace_memories: bool,

    /// Block on "Press Enter" before the first cycle.
    #[serde(default = "DriverConfig::default_prompt")]
    pub prompt: bool,
}

impl DriverConfig {
    fn default_cycles() -> u64 {
        defaults::CYCLES
    }

    fn default_prompt() -> bool {
        defaults::PROMPT
    }

    /// Returns `true` if a trace file was requested.
    pub fn tracing(&self) -> bool {
        self.trace_path.is_some()
    }

    fn validate(&self) -> SimResult<()> {
        if self.cycles > defaults::CYCLES {
            return Err(SimError::Argument(cycles_range_message()));
        }
        if self.trace_memories && self.trace_path.is_none() {
            tracing::warn!("trace_memories has no effect without a trace path");
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            cycles: defaults::CYCLES,
            trace_path: None,
            trace_memories: false,
            prompt: defaults::PROMPT,
        }
    }
}

/// Serial port settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerialConfig {
    /// Endpoint identifier shared by the receive and transmit halves.
    #[serde(default = "SerialConfig::default_id")]
    pub id: String,

    /// Clock divisor reset value.
    #[serde(default = "SerialConfig::default_divisor")]
    pub divisor: u32,

    /// Depth of the echo system's history memory.
    #[serde(default = "SerialConfig::default_history_depth")]
    pub history_depth: usize,
}

impl SerialConfig {
    fn default_id() -> String {
        defaults::SERIAL_ID.to_owned()
    }

    fn default_divisor() -> u32 {
        defaults::DIVISOR
    }

    fn default_history_depth() -> usize {
        defaults::HISTORY_DEPTH
    }

    pub(crate) fn validate(&self) -> SimResult<()> {
        if self.id.is_empty() {
            return Err(SimError::Argument("serial id must not be empty".to_owned()));
        }
        if self.history_depth == 0 || self.history_depth > 256 {
            return Err(SimError::Argument(
                "serial history_depth must be between 1 and 256".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            id: defaults::SERIAL_ID.to_owned(),
            divisor: defaults::DIVISOR,
            history_depth: defaults::HISTORY_DEPTH,
        }
    }
}

/// Error text for a cycle count above the limit.
pub fn cycles_range_message() -> String {
    format!(
        "Cycles must be a positive integer lesser than or equal to {}",
        defaults::CYCLES
    )
}

/// Parses a command-line cycle count.
///
/// Accepts decimal integers from 0 up to `MAX_CYCLES`; anything else (including
/// values that do not fit in 64 bits) is an argument error.
///
/// # Errors
///
/// `SimError::Argument` carrying [`cycles_range_message`].
pub fn parse_cycles(text: &str) -> SimResult<u64> {
    text.trim()
        .parse::<u64>()
        .ok()
        .filter(|&cycles| cycles <= defaults::CYCLES)
        .ok_or_else(|| SimError::Argument(cycles_range_message()))
}
