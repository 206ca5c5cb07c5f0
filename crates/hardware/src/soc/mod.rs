//! System-on-Chip (SoC) Components.
//!
//! This module organizes the components that make up the simulated system,
//! including the endpoint registry shared by serial peripherals, the devices
//! themselves, and the builder for the echo system.

/// Echo system builder.
pub mod builder;

/// Co-simulated device implementations.
pub mod devices;

/// Serial endpoint registry.
pub mod endpoint;

/// Peripheral trait definitions.
pub mod traits;

pub use builder::System;
pub use endpoint::{Endpoint, EndpointRegistry};
