//! Two-phase signal primitives.
//!
//! Every stateful signal has a `curr` value (what the rest of the circuit observes
//! during evaluation) and a `next` value (what evaluation drives). `commit` promotes
//! `next` to `curr` and reports whether anything changed, which is what lets a
//! design iterate delta cycles until it settles.

/// A driven signal with separate current and next values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wire<T> {
    /// Value visible to readers during the current delta cycle.
    pub curr: T,
    /// Value that becomes visible after the next commit.
    pub next: T,
}

impl<T: Copy + PartialEq> Wire<T> {
    /// Creates a wire whose current and next values are both `value`.
    pub const fn new(value: T) -> Self {
        Self {
            curr: value,
            next: value,
        }
    }

    /// Returns the committed value.
    #[inline]
    pub fn get(&self) -> T {
        self.curr
    }

    /// Drives `value` for the next commit.
    #[inline]
    pub fn set(&mut self, value: T) {
        self.next = value;
    }

    /// Promotes `next` to `curr`; returns `true` if the value changed.
    #[inline]
    pub fn commit(&mut self) -> bool {
        if self.curr == self.next {
            return false;
        }
        self.curr = self.next;
        true
    }
}

/// Clock input with edge detection.
///
/// The level seen at the previous commit is remembered, so an edge is reported on
/// exactly one delta cycle: the first evaluation after the level changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockEdge {
    level: bool,
    prev: bool,
}

impl ClockEdge {
    /// Drives the clock input.
    #[inline]
    pub fn set(&mut self, level: bool) {
        self.level = level;
    }

    /// Current clock level.
    #[inline]
    pub fn level(&self) -> bool {
        self.level
    }

    /// `true` on the first evaluation after a low-to-high transition.
    #[inline]
    pub fn posedge(&self) -> bool {
        self.level && !self.prev
    }

    /// `true` on the first evaluation after a high-to-low transition.
    #[inline]
    pub fn negedge(&self) -> bool {
        !self.level && self.prev
    }

    /// Latches the current level for the next edge check.
    #[inline]
    pub fn commit(&mut self) -> bool {
        let changed = self.prev != self.level;
        self.prev = self.level;
        changed
    }
}
