//! Serial transmitter backed by a host channel.
//!
//! Per rising edge: if `ack` and `rdy` were both high, the presented byte is written
//! to the channel (a blocking write, but the channel was just reported writable);
//! then `rdy` is driven with a fresh non-blocking writability check.

use std::rc::Rc;

use crate::common::{Role, SimResult};
use crate::sim::signal::{ClockEdge, Wire};
use crate::soc::endpoint::{Endpoint, EndpointRegistry};
use crate::soc::traits::Peripheral;

/// Port list of the transmitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerialTxPorts {
    /// Clock input.
    pub clk: ClockEdge,
    /// Synchronous reset input.
    pub rst: bool,
    /// Clock divisor input. Accepted for interface compatibility; timing is not modelled.
    pub divisor: u32,
    /// Producer acknowledge input.
    pub ack: bool,
    /// Word to transmit.
    pub data: u8,
    /// Channel-can-accept output.
    pub rdy: Wire<bool>,
}

/// Transmit half of a pty-backed serial port.
#[derive(Debug)]
pub struct SerialTx {
    name: String,
    endpoint: Rc<Endpoint>,
    /// Port list.
    pub ports: SerialTxPorts,
    bytes_sent: u64,
}

impl SerialTx {
    /// Creates a transmitter wired to endpoint `id`, acquiring it from `registry`.
    ///
    /// # Errors
    ///
    /// `SimError::EndpointInit` if the endpoint has to be created and that fails;
    /// `SimError::RoleCollision` if another transmitter is already wired to `id`.
    pub fn new(name: impl Into<String>, id: &str, registry: &EndpointRegistry) -> SimResult<Self> {
        let endpoint = registry.acquire(id)?;
        Self::with_endpoint(name, endpoint)
    }

    /// Creates a transmitter on an already acquired endpoint.
    ///
    /// # Errors
    ///
    /// `SimError::RoleCollision` if the endpoint already has a transmitter.
    pub fn with_endpoint(name: impl Into<String>, endpoint: Rc<Endpoint>) -> SimResult<Self> {
        let name = name.into();
        endpoint.mark_transmitter()?;
        println!("Assigning '{}' to {}", name, endpoint.device_path());
        tracing::debug!(name = %name, id = endpoint.id(), "transmitter attached");
        Ok(Self {
            name,
            endpoint,
            ports: SerialTxPorts::default(),
            bytes_sent: 0,
        })
    }

    /// Endpoint this transmitter writes to.
    pub fn endpoint(&self) -> &Rc<Endpoint> {
        &self.endpoint
    }

    /// Total bytes written to the host.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Committed `rdy` output.
    pub fn rdy(&self) -> bool {
        self.ports.rdy.get()
    }
}

impl Drop for SerialTx {
    fn drop(&mut self) {
        self.endpoint.release(Role::Transmitter);
    }
}

impl Peripheral for SerialTx {
    fn name(&self) -> &str {
        &self.name
    }

    fn clock(&self) -> &ClockEdge {
        &self.ports.clk
    }

    fn reset(&mut self) {
        self.ports.rdy.set(false);
    }

    fn eval_on_edge(&mut self) -> SimResult<()> {
        if self.ports.rst {
            self.reset();
            return Ok(());
        }

        let channel = self.endpoint.channel();
        if self.ports.ack && self.ports.rdy.get() {
            tracing::trace!(name = %self.name, byte = self.ports.data, "tx");
            channel.write_byte(self.ports.data)?;
            self.bytes_sent += 1;
        }
        self.ports.rdy.set(channel.writable()?);
        Ok(())
    }

    fn commit(&mut self) -> bool {
        let mut changed = self.ports.clk.commit();
        changed |= self.ports.rdy.commit();
        changed
    }
}
