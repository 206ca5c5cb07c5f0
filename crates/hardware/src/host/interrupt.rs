//! SIGINT as a pollable event.
//!
//! Installing the listener replaces the default disposition of SIGINT (terminate
//! the process) with a handler that only sets a flag. The driver loop checks that
//! flag between clock edges, so an interrupt can never tear down a half-applied
//! cycle or a half-written trace.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::SIGINT;

use crate::common::{SimError, SimResult};

/// Cooperative stop request.
///
/// Cloning yields a handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// Creates a flag that is not wired to any signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a flag and routes SIGINT to it.
    ///
    /// # Errors
    ///
    /// `SimError::HostIo` if the handler cannot be registered.
    pub fn install() -> SimResult<Self> {
        let interrupt = Self::new();
        let _id = signal_hook::flag::register(SIGINT, Arc::clone(&interrupt.flag))
            .map_err(|source| SimError::HostIo {
                call: "sigaction",
                source,
            })?;
        tracing::debug!("SIGINT listener installed");
        Ok(interrupt)
    }

    /// Requests a stop, as if SIGINT had been delivered.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once a stop has been requested. Never blocks.
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
