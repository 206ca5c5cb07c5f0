//! Simulation error definitions.
//!
//! This module defines the single error type surfaced by the simulator. It provides:
//! 1. **Host errors:** Pseudo-terminal setup failures and failed reads/writes on an open channel.
//! 2. **Configuration errors:** Role collisions on an endpoint, malformed arguments and config files.
//! 3. **Invariant violations:** Receive-buffer underflow and designs that never settle.
//!
//! Wrapped OS and parser errors are exposed through `source()` only, so an alternate
//! (`{:#}`) rendering of the chain names each cause once.
//!
//! None of these are retried. The simulator is a development tool and treats every
//! failure as fatal at the point where it is observed.

use std::fmt;
use std::io;

use thiserror::Error;

/// Which half of a serial endpoint a peripheral occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Host-to-circuit direction (reads from the pseudo-terminal).
    Receiver,
    /// Circuit-to-host direction (writes to the pseudo-terminal).
    Transmitter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Receiver => write!(f, "RX"),
            Self::Transmitter => write!(f, "TX"),
        }
    }
}

/// Errors raised while building or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// An OS call failed while opening or configuring a pseudo-terminal.
    #[error("{call} failed")]
    EndpointInit {
        /// Name of the failing libc call (e.g. `"posix_openpt"`).
        call: &'static str,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Two peripherals claimed the same role on one endpoint identifier.
    #[error("{role} port collision on endpoint '{id}'")]
    RoleCollision {
        /// Endpoint identifier both peripherals were wired to.
        id: String,
        /// The role that was already taken.
        role: Role,
    },

    /// A read, write or poll on an already configured channel failed.
    #[error("{call} failed")]
    HostIo {
        /// Name of the failing libc call (e.g. `"read"`).
        call: &'static str,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Malformed command-line input.
    #[error("{0}")]
    Argument(String),

    /// A malformed configuration file.
    #[error("invalid configuration")]
    Config(#[from] serde_json::Error),

    /// The receive half tried to pop from an empty buffer.
    ///
    /// Unreachable under a correct handshake, since ready is only asserted while
    /// the buffer holds data.
    #[error("receive buffer underflow on endpoint '{id}'")]
    ReceiveUnderflow {
        /// Endpoint identifier of the offending receiver.
        id: String,
    },

    /// A design kept changing state after the delta-cycle limit.
    #[error("design did not settle after {deltas} delta cycles")]
    Convergence {
        /// Number of eval/commit passes attempted.
        deltas: usize,
    },

    /// Writing the waveform trace failed.
    #[error("cannot write trace")]
    Trace(#[from] io::Error),
}

impl SimError {
    /// Builds an `EndpointInit` error from the current `errno`.
    pub fn endpoint_init(call: &'static str) -> Self {
        Self::EndpointInit {
            call,
            source: io::Error::last_os_error(),
        }
    }

    /// Builds a `HostIo` error from the current `errno`.
    pub fn host_io(call: &'static str) -> Self {
        Self::HostIo {
            call,
            source: io::Error::last_os_error(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;
