//! Shared test infrastructure.

/// Stepping helpers and real pseudo-terminal utilities.
pub mod harness;

/// Mock implementations of host-side components.
pub mod mocks;
