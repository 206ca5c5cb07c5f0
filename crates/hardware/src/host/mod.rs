//! Host-side I/O.
//!
//! This module contains everything that touches the host operating system:
//! 1. **Channel:** The `HostChannel` capability the serial peripherals talk through.
//! 2. **Pseudo-terminal:** `PtyFile`, the libc-backed channel used outside of tests.
//! 3. **Interrupts:** A pollable SIGINT flag checked between clock edges.

/// Pollable SIGINT listener.
pub mod interrupt;

/// Pseudo-terminal master implementation of `HostChannel`.
pub mod pty;

pub use interrupt::Interrupt;
pub use pty::PtyFile;

use crate::common::SimResult;

/// Byte-oriented host channel shared by the receive and transmit halves of a port.
///
/// Readiness checks must never block and must never change observable state, so
/// a peripheral may poll them on every edge.
pub trait HostChannel: std::fmt::Debug {
    /// Returns `true` if at least one byte can be read without blocking.
    fn readable(&self) -> SimResult<bool>;
    /// Returns `true` if one byte can be written without blocking.
    fn writable(&self) -> SimResult<bool>;
    /// Reads exactly one byte.
    fn read_byte(&self) -> SimResult<u8>;
    /// Writes exactly one byte, blocking until it is accepted.
    fn write_byte(&self, byte: u8) -> SimResult<()>;
    /// Host-visible path an operator attaches a terminal client to.
    fn device_path(&self) -> &str;
}
