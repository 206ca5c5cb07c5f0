//! Stepping helpers and real pseudo-terminal utilities.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::thread;
use std::time::{Duration, Instant};

use ptysim_core::common::SimResult;
use ptysim_core::sim::Design;
use ptysim_core::soc::Endpoint;
use ptysim_core::soc::devices::{Peripheral, SerialRx, SerialTx};
use tracing_subscriber::EnvFilter;

/// How long to wait for bytes written to a pty slave to show up on the master.
pub const PTY_TIMEOUT: Duration = Duration::from_secs(2);

/// Routes simulator logs through the test harness, filtered by `RUST_LOG`.
///
/// Errors only unless `RUST_LOG` asks for more. Safe to call from every test; only
/// the first call installs the subscriber.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Runs eval/commit passes until the peripheral settles.
pub fn settle<P: Peripheral + ?Sized>(peripheral: &mut P) -> SimResult<()> {
    loop {
        peripheral.eval()?;
        if !peripheral.commit() {
            return Ok(());
        }
    }
}

/// Drives one full clock cycle (low, then high) into a receiver.
pub fn rx_cycle(rx: &mut SerialRx) -> SimResult<()> {
    rx.ports.clk.set(false);
    settle(rx)?;
    rx.ports.clk.set(true);
    settle(rx)
}

/// Drives one full clock cycle (low, then high) into a transmitter.
pub fn tx_cycle(tx: &mut SerialTx) -> SimResult<()> {
    tx.ports.clk.set(false);
    settle(tx)?;
    tx.ports.clk.set(true);
    settle(tx)
}

/// Drives one full clock cycle into a design.
pub fn design_cycle<D: Design + ?Sized>(design: &mut D) -> SimResult<()> {
    design.set_clock(false);
    let _low = design.step()?;
    design.set_clock(true);
    let _high = design.step()?;
    Ok(())
}

/// Opens the slave side of a pseudo-terminal the way a terminal client would.
pub fn open_slave(path: &str) -> File {
    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
        .unwrap()
}

/// Waits until the endpoint's channel reports input, or the timeout expires.
///
/// Writes to a pty slave reach the master asynchronously.
pub fn wait_readable(endpoint: &Endpoint) -> bool {
    let deadline = Instant::now() + PTY_TIMEOUT;
    while Instant::now() < deadline {
        if endpoint.channel().readable().unwrap() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}
