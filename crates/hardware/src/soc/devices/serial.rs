//! Full-duplex serial port: one receiver and one transmitter on a shared endpoint.

use std::rc::Rc;

use crate::common::{Role, SimError, SimResult};
use crate::soc::devices::{SerialRx, SerialTx};
use crate::soc::endpoint::EndpointRegistry;
use crate::soc::traits::Peripheral;

/// Receiver/transmitter pair wired to the same pseudo-terminal.
#[derive(Debug)]
pub struct SerialPort {
    /// Host-to-circuit half.
    pub rx: SerialRx,
    /// Circuit-to-host half.
    pub tx: SerialTx,
}

impl SerialPort {
    /// Creates both halves on endpoint `id`. Instances are named `<name>.rx` and `<name>.tx`.
    ///
    /// # Errors
    ///
    /// Endpoint creation failures and role collisions from either half. Both roles are
    /// checked before either is claimed.
    pub fn new(name: &str, id: &str, registry: &EndpointRegistry) -> SimResult<Self> {
        let endpoint = registry.acquire(id)?;
        for role in [Role::Receiver, Role::Transmitter] {
            if endpoint.has_role(role) {
                return Err(SimError::RoleCollision {
                    id: id.to_owned(),
                    role,
                });
            }
        }
        let rx = SerialRx::with_endpoint(format!("{name}.rx"), Rc::clone(&endpoint))?;
        let tx = SerialTx::with_endpoint(format!("{name}.tx"), endpoint)?;
        Ok(Self { rx, tx })
    }

    /// Drives the clock input of both halves.
    pub fn set_clock(&mut self, level: bool) {
        self.rx.ports.clk.set(level);
        self.tx.ports.clk.set(level);
    }

    /// Drives the reset input of both halves.
    pub fn set_reset(&mut self, rst: bool) {
        self.rx.ports.rst = rst;
        self.tx.ports.rst = rst;
    }

    /// Drives the divisor input of both halves.
    pub fn set_divisor(&mut self, divisor: u32) {
        self.rx.ports.divisor = divisor;
        self.tx.ports.divisor = divisor;
    }

    /// Device path operators attach to.
    pub fn device_path(&self) -> &str {
        self.rx.endpoint().device_path()
    }

    /// Evaluates both halves for one delta cycle.
    ///
    /// # Errors
    ///
    /// Host I/O failures and receive underflow.
    pub fn eval(&mut self) -> SimResult<()> {
        self.rx.eval()?;
        self.tx.eval()
    }

    /// Commits both halves.
    pub fn commit(&mut self) -> bool {
        let rx = self.rx.commit();
        let tx = self.tx.commit();
        rx || tx
    }

    /// Resets both halves.
    pub fn reset(&mut self) {
        self.rx.reset();
        self.tx.reset();
    }
}
