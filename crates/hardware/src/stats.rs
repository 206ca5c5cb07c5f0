//! Simulation statistics collection and reporting.
//!
//! This module tracks what a run did. It provides:
//! 1. **Progress:** Cycles completed and trace samples written.
//! 2. **Traffic:** Bytes moved through the serial port in each direction.
//! 3. **Timing:** Host wall-clock time and the resulting simulated clock rate.

use std::fmt;
use std::time::Instant;

use crate::soc::devices::SerialPort;

/// Statistics for one driver run.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Clock cycles fully applied (both edges stepped).
    pub cycles: u64,
    /// Waveform samples recorded; zero when tracing is off.
    pub trace_samples: u64,
    /// Bytes read from the host terminal.
    pub bytes_received: u64,
    /// Bytes written to the host terminal.
    pub bytes_sent: u64,
    /// `true` if the run stopped on SIGINT rather than the cycle limit.
    pub interrupted: bool,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            trace_samples: 0,
            bytes_received: 0,
            bytes_sent: 0,
            interrupted: false,
        }
    }
}

impl SimStats {
    /// Starts the wall clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the byte counters of `port`.
    pub fn record_serial(&mut self, port: &SerialPort) {
        self.bytes_received = port.rx.bytes_received();
        self.bytes_sent = port.tx.bytes_sent();
    }

    /// Seconds of host time since the run started.
    pub fn host_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Simulated clock rate in kHz; zero before any time has passed.
    #[allow(clippy::cast_precision_loss)]
    pub fn khz(&self) -> f64 {
        let seconds = self.host_seconds();
        if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "host_seconds             {:.4} s", self.host_seconds())?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_freq                 {:.2} kHz", self.khz())?;
        writeln!(f, "trace_samples            {}", self.trace_samples)?;
        writeln!(f, "serial.rx_bytes          {}", self.bytes_received)?;
        writeln!(f, "serial.tx_bytes          {}", self.bytes_sent)?;
        write!(f, "interrupted              {}", self.interrupted)
    }
}
