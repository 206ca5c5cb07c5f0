//! Contract between the simulation driver and a circuit model.
//!
//! A design exposes a single clock input, an evaluate/commit pair, and a flat list
//! of debug items the waveform writer can sample. `step` is provided: it runs delta
//! cycles until nothing changes.

use crate::common::{MAX_DELTA_CYCLES, SimError, SimResult};

/// Whether a debug item is a single signal or an array of words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugKind {
    /// A wire or register; contributes one value.
    Wire,
    /// A memory; contributes `depth` values, one per word.
    Memory {
        /// Number of words.
        depth: usize,
    },
}

/// One traceable signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugItem {
    /// Hierarchical name, components separated by `.`.
    pub name: String,
    /// Width in bits (1..=64).
    pub width: u32,
    /// Wire or memory.
    pub kind: DebugKind,
}

impl DebugItem {
    /// Number of values this item contributes to a `debug_values` snapshot.
    pub fn value_count(&self) -> usize {
        match self.kind {
            DebugKind::Wire => 1,
            DebugKind::Memory { depth } => depth,
        }
    }

    /// `true` for memories.
    pub fn is_memory(&self) -> bool {
        matches!(self.kind, DebugKind::Memory { .. })
    }
}

/// Ordered collection of debug items.
///
/// The order here is the order of values in `Design::debug_values`.
#[derive(Clone, Debug, Default)]
pub struct DebugItems {
    items: Vec<DebugItem>,
}

impl DebugItems {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a wire.
    pub fn add_wire(&mut self, name: impl Into<String>, width: u32) {
        self.items.push(DebugItem {
            name: name.into(),
            width,
            kind: DebugKind::Wire,
        });
    }

    /// Registers a memory of `depth` words.
    pub fn add_memory(&mut self, name: impl Into<String>, width: u32, depth: usize) {
        self.items.push(DebugItem {
            name: name.into(),
            width,
            kind: DebugKind::Memory { depth },
        });
    }

    /// Iterates over the registered items.
    pub fn iter(&self) -> impl Iterator<Item = &DebugItem> {
        self.items.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of values a snapshot of these items contains.
    pub fn value_count(&self) -> usize {
        self.items.iter().map(DebugItem::value_count).sum()
    }
}

/// A clocked circuit the driver can advance.
pub trait Design {
    /// Drives the clock input.
    fn set_clock(&mut self, level: bool);

    /// Evaluates every cell against committed values, driving `next` values.
    ///
    /// # Errors
    ///
    /// Any error raised by a peripheral during evaluation.
    fn eval(&mut self) -> SimResult<()>;

    /// Commits all `next` values; returns `true` if anything changed.
    fn commit(&mut self) -> bool;

    /// Runs delta cycles until the design settles; returns how many were needed.
    ///
    /// # Errors
    ///
    /// Propagates `eval` errors, or `SimError::Convergence` if the design is still
    /// changing after `MAX_DELTA_CYCLES` passes.
    fn step(&mut self) -> SimResult<usize> {
        for delta in 1..=MAX_DELTA_CYCLES {
            self.eval()?;
            if !self.commit() {
                return Ok(delta);
            }
        }
        Err(SimError::Convergence {
            deltas: MAX_DELTA_CYCLES,
        })
    }

    /// Lists traceable signals.
    fn debug_info(&self, items: &mut DebugItems);

    /// Appends the committed value of every debug item, in `debug_info` order.
    fn debug_values(&self, values: &mut Vec<u64>);
}
