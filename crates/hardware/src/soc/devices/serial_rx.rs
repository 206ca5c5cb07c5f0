//! Serial receiver backed by a host channel.
//!
//! From the circuit's side this is a ready/acknowledge source of 8-bit words. From the
//! host's side it drains the endpoint one byte per rising edge, without ever blocking.
//!
//! Per rising edge, in this order:
//! 1. **Pop:** if `ack` and `rdy` were both high, the front byte was consumed.
//! 2. **Refill:** if the channel is readable, append exactly one byte.
//! 3. **Publish:** if bytes remain, drive `rdy` high and `data` with the front byte.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::common::{Role, SimError, SimResult};
use crate::sim::signal::{ClockEdge, Wire};
use crate::soc::endpoint::{Endpoint, EndpointRegistry};
use crate::soc::traits::Peripheral;

/// Receiver error outputs. This model never produces errors; all three stay low.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RxErrors {
    /// Receive FIFO overflow.
    pub overflow: Wire<bool>,
    /// Framing error (bad stop bit).
    pub frame: Wire<bool>,
    /// Parity mismatch.
    pub parity: Wire<bool>,
}

impl RxErrors {
    fn hold_low(&mut self) {
        self.overflow.set(false);
        self.frame.set(false);
        self.parity.set(false);
    }

    fn commit(&mut self) -> bool {
        // Non-short-circuiting so every wire is committed.
        self.overflow.commit() | self.frame.commit() | self.parity.commit()
    }
}

/// Port list of the receiver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerialRxPorts {
    /// Clock input.
    pub clk: ClockEdge,
    /// Synchronous reset input.
    pub rst: bool,
    /// Clock divisor input. Accepted for interface compatibility; timing is not modelled.
    pub divisor: u32,
    /// Consumer acknowledge input.
    pub ack: bool,
    /// Received word output.
    pub data: Wire<u8>,
    /// Data-valid output.
    pub rdy: Wire<bool>,
    /// Error outputs.
    pub err: RxErrors,
}

/// Receive half of a pty-backed serial port.
#[derive(Debug)]
pub struct SerialRx {
    name: String,
    endpoint: Rc<Endpoint>,
    buffer: VecDeque<u8>,
    /// Port list.
    pub ports: SerialRxPorts,
    bytes_received: u64,
    bytes_delivered: u64,
}

impl SerialRx {
    /// Creates a receiver wired to endpoint `id`, acquiring it from `registry`.
    ///
    /// # Errors
    ///
    /// `SimError::EndpointInit` if the endpoint has to be created and that fails;
    /// `SimError::RoleCollision` if another receiver is already wired to `id`.
    pub fn new(name: impl Into<String>, id: &str, registry: &EndpointRegistry) -> SimResult<Self> {
        let endpoint = registry.acquire(id)?;
        Self::with_endpoint(name, endpoint)
    }

    /// Creates a receiver on an already acquired endpoint.
    ///
    /// # Errors
    ///
    /// `SimError::RoleCollision` if the endpoint already has a receiver.
    pub fn with_endpoint(name: impl Into<String>, endpoint: Rc<Endpoint>) -> SimResult<Self> {
        let name = name.into();
        endpoint.mark_receiver()?;
        println!("Assigning '{}' to {}", name, endpoint.device_path());
        tracing::debug!(name = %name, id = endpoint.id(), "receiver attached");
        Ok(Self {
            name,
            endpoint,
            buffer: VecDeque::new(),
            ports: SerialRxPorts::default(),
            bytes_received: 0,
            bytes_delivered: 0,
        })
    }

    /// Endpoint this receiver reads from.
    pub fn endpoint(&self) -> &Rc<Endpoint> {
        &self.endpoint
    }

    /// Bytes read from the host but not yet acknowledged by the circuit.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes read from the host.
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Total bytes handed to the circuit.
    pub fn bytes_delivered(&self) -> u64 {
        self.bytes_delivered
    }

    /// Committed `rdy` output.
    pub fn rdy(&self) -> bool {
        self.ports.rdy.get()
    }

    /// Committed `data` output.
    pub fn data(&self) -> u8 {
        self.ports.data.get()
    }

    fn publish_front(&mut self) {
        if let Some(&front) = self.buffer.front() {
            self.ports.rdy.set(true);
            self.ports.data.set(front);
        }
    }
}

impl Drop for SerialRx {
    fn drop(&mut self) {
        self.endpoint.release(Role::Receiver);
    }
}

impl Peripheral for SerialRx {
    fn name(&self) -> &str {
        &self.name
    }

    fn clock(&self) -> &ClockEdge {
        &self.ports.clk
    }

    /// Deasserts `rdy` unless host bytes are still buffered; those are kept, never dropped.
    fn reset(&mut self) {
        self.ports.rdy.set(false);
        self.ports.err.hold_low();
        self.publish_front();
    }

    fn eval_on_edge(&mut self) -> SimResult<()> {
        if self.ports.rst {
            self.reset();
            return Ok(());
        }

        if self.ports.ack && self.ports.rdy.get() {
            if self.buffer.pop_front().is_none() {
                return Err(SimError::ReceiveUnderflow {
                    id: self.endpoint.id().to_owned(),
                });
            }
            self.bytes_delivered += 1;
            self.ports.rdy.set(false);
        }

        let channel = self.endpoint.channel();
        if channel.readable()? {
            let byte = channel.read_byte()?;
            tracing::trace!(name = %self.name, byte, "rx");
            self.buffer.push_back(byte);
            self.bytes_received += 1;
        }

        self.publish_front();
        Ok(())
    }

    fn eval_base(&mut self) {
        self.ports.err.hold_low();
    }

    fn commit(&mut self) -> bool {
        let mut changed = self.ports.clk.commit();
        changed |= self.ports.data.commit();
        changed |= self.ports.rdy.commit();
        changed |= self.ports.err.commit();
        changed
    }
}
