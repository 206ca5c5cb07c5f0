//! Echo system construction and top-level `System` type.
//!
//! This module builds the demonstration circuit driven by the CLI. It wires:
//! 1. **Serial port:** A receive/transmit pair on the configured endpoint identifier.
//! 2. **Holding register:** One byte plus a full flag; the receiver is acknowledged while
//!    the register is empty and the transmitter while it is full, so every byte typed into
//!    the terminal comes straight back.
//! 3. **History memory:** A small ring of every accepted byte, visible in the waveform
//!    trace when memories are traced.

use crate::common::{DATA_BITS, SimResult};
use crate::config::SerialConfig;
use crate::sim::design::{DebugItems, Design};
use crate::sim::signal::{ClockEdge, Wire};
use crate::soc::devices::SerialPort;
use crate::soc::endpoint::EndpointRegistry;

/// Instance name of the serial port inside the echo system.
const SERIAL_NAME: &str = "echo.serial";

/// Pending history write, applied at commit.
#[derive(Clone, Copy, Debug)]
struct MemWrite {
    addr: usize,
    data: u8,
}

/// Top-level echo design.
#[derive(Debug)]
pub struct System {
    clk: ClockEdge,
    /// Serial port wired to the host pseudo-terminal.
    pub serial: SerialPort,
    full: Wire<bool>,
    hold: Wire<u8>,
    history: Vec<u8>,
    history_write: Option<MemWrite>,
    wptr: Wire<u8>,
    echoed: u64,
}

impl System {
    /// Builds the echo system on the process-default endpoint registry.
    ///
    /// # Errors
    ///
    /// See [`System::with_registry`].
    pub fn new(config: &SerialConfig) -> SimResult<Self> {
        Self::with_registry(config, &EndpointRegistry::global())
    }

    /// Builds the echo system, acquiring its endpoint from `registry`.
    ///
    /// # Errors
    ///
    /// `SimError::Argument` for an empty identifier or a history depth outside
    /// `1..=256`, which is checked before any endpoint is touched; otherwise endpoint
    /// creation failures and role collisions from the serial port.
    pub fn with_registry(config: &SerialConfig, registry: &EndpointRegistry) -> SimResult<Self> {
        config.validate()?;
        let mut serial = SerialPort::new(SERIAL_NAME, &config.id, registry)?;
        serial.set_divisor(config.divisor);
        tracing::info!(
            id = %config.id,
            path = serial.device_path(),
            history = config.history_depth,
            "echo system built"
        );
        Ok(Self {
            clk: ClockEdge::default(),
            serial,
            full: Wire::new(false),
            hold: Wire::new(0),
            history: vec![0; config.history_depth],
            history_write: None,
            wptr: Wire::new(0),
            echoed: 0,
        })
    }

    /// Byte currently held for transmission, if any.
    pub fn held(&self) -> Option<u8> {
        self.full.get().then(|| self.hold.get())
    }

    /// Committed history contents, oldest slot first.
    pub fn history(&self) -> &[u8] {
        &self.history
    }

    /// Number of bytes handed back to the transmitter.
    pub fn echoed(&self) -> u64 {
        self.echoed
    }

    /// Drives the synchronous reset input of the serial port.
    pub fn set_reset(&mut self, rst: bool) {
        self.serial.set_reset(rst);
    }

    /// Returns every register of the design to its reset value.
    ///
    /// Buffered host input in the receiver survives.
    pub fn reset(&mut self) {
        self.full.set(false);
        self.hold.set(0);
        self.wptr.set(0);
        self.history_write = None;
        self.serial.reset();
    }

    fn drive_handshake(&mut self) {
        let full = self.full.get();
        self.serial.rx.ports.ack = !full;
        self.serial.tx.ports.ack = full;
        self.serial.tx.ports.data = self.hold.get();
    }

    fn on_posedge(&mut self) {
        if self.full.get() {
            if self.serial.tx.rdy() {
                self.full.set(false);
                self.echoed += 1;
            }
        } else if self.serial.rx.rdy() {
            let byte = self.serial.rx.data();
            let addr = usize::from(self.wptr.get()) % self.history.len();
            self.hold.set(byte);
            self.full.set(true);
            self.history_write = Some(MemWrite { addr, data: byte });
            self.wptr.set(((addr + 1) % self.history.len()) as u8);
        }
    }
}

impl Design for System {
    fn set_clock(&mut self, level: bool) {
        self.clk.set(level);
        self.serial.set_clock(level);
    }

    fn eval(&mut self) -> SimResult<()> {
        // Handshake inputs must see committed register values before the port samples them.
        self.drive_handshake();
        if self.clk.posedge() {
            self.on_posedge();
        }
        self.serial.eval()
    }

    fn commit(&mut self) -> bool {
        let mut changed = self.clk.commit();
        changed |= self.full.commit();
        changed |= self.hold.commit();
        changed |= self.wptr.commit();
        if let Some(write) = self.history_write.take() {
            if self.history[write.addr] != write.data {
                self.history[write.addr] = write.data;
                changed = true;
            }
        }
        changed |= self.serial.commit();
        changed
    }

    fn debug_info(&self, items: &mut DebugItems) {
        let bits = DATA_BITS;
        items.add_wire("clk", 1);
        items.add_wire("echo.full", 1);
        items.add_wire("echo.hold", bits);
        items.add_wire("echo.wptr", 8);
        items.add_wire(format!("{SERIAL_NAME}.rx.rdy"), 1);
        items.add_wire(format!("{SERIAL_NAME}.rx.ack"), 1);
        items.add_wire(format!("{SERIAL_NAME}.rx.data"), bits);
        items.add_wire(format!("{SERIAL_NAME}.rx.err_overflow"), 1);
        items.add_wire(format!("{SERIAL_NAME}.rx.err_frame"), 1);
        items.add_wire(format!("{SERIAL_NAME}.rx.err_parity"), 1);
        items.add_wire(format!("{SERIAL_NAME}.tx.rdy"), 1);
        items.add_wire(format!("{SERIAL_NAME}.tx.ack"), 1);
        items.add_wire(format!("{SERIAL_NAME}.tx.data"), bits);
        items.add_memory("echo.history", bits, self.history.len());
    }

    fn debug_values(&self, values: &mut Vec<u64>) {
        let rx = &self.serial.rx.ports;
        let tx = &self.serial.tx.ports;
        values.extend([
            u64::from(self.clk.level()),
            u64::from(self.full.get()),
            u64::from(self.hold.get()),
            u64::from(self.wptr.get()),
            u64::from(rx.rdy.get()),
            u64::from(rx.ack),
            u64::from(rx.data.get()),
            u64::from(rx.err.overflow.get()),
            u64::from(rx.err.frame.get()),
            u64::from(rx.err.parity.get()),
            u64::from(tx.rdy.get()),
            u64::from(tx.ack),
            u64::from(tx.data),
        ]);
        values.extend(self.history.iter().copied().map(u64::from));
    }
}
