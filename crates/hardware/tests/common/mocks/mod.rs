//! Mock host components.

/// In-memory host channel.
pub mod channel;

pub use channel::{MockChannel, MockHost, MockPool, mock_registry};
