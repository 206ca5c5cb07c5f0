//! Peripheral trait for co-simulated blocks.
//!
//! This module defines the `Peripheral` trait implemented by every block whose behaviour
//! is modelled in software rather than elaborated from the netlist. It provides:
//! 1. **Identification:** `name` for diagnostics.
//! 2. **Edge evaluation:** `eval_on_edge`, run only on a rising clock edge.
//! 3. **Base protocol:** `eval_base` for ports a model does not customise, and `commit`.
//! 4. **Lifecycle:** `reset`.
//!
//! Implementors are single-threaded; they share host channels through `Rc`.

use crate::common::SimResult;
use crate::sim::signal::ClockEdge;

/// A clocked block evaluated alongside the rest of the design.
pub trait Peripheral {
    /// Instance name (e.g. `"echo.serial.rx"`).
    fn name(&self) -> &str;

    /// Clock input of this block.
    fn clock(&self) -> &ClockEdge;

    /// Returns outputs to their reset state.
    fn reset(&mut self);

    /// Sequential logic; called once per rising clock edge.
    ///
    /// # Errors
    ///
    /// Host I/O failures and invariant violations, all fatal.
    fn eval_on_edge(&mut self) -> SimResult<()>;

    /// Combinational step shared by all models; drives outputs the model leaves alone.
    fn eval_base(&mut self) {}

    /// Full evaluation for one delta cycle.
    ///
    /// # Errors
    ///
    /// Whatever `eval_on_edge` returns.
    fn eval(&mut self) -> SimResult<()> {
        if self.clock().posedge() {
            self.eval_on_edge()?;
        }
        self.eval_base();
        Ok(())
    }

    /// Commits driven outputs and latches the clock; returns `true` if anything changed.
    fn commit(&mut self) -> bool;
}
