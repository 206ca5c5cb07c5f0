//! Co-simulated devices.
//!
//! This module contains the peripherals whose behaviour is modelled in software and
//! bridged to the host: the two halves of a pty-backed serial port and the full-duplex
//! pair that combines them.

/// Full-duplex serial port (receiver + transmitter on one endpoint).
pub mod serial;

/// Serial receiver (host to circuit).
pub mod serial_rx;

/// Serial transmitter (circuit to host).
pub mod serial_tx;

pub use serial::SerialPort;
pub use serial_rx::{RxErrors, SerialRx, SerialRxPorts};
pub use serial_tx::{SerialTx, SerialTxPorts};

pub use crate::soc::traits::Peripheral;
