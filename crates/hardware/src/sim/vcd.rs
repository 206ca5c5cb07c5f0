//! Value Change Dump writer.
//!
//! Produces IEEE 1364 VCD text into an in-memory `buffer`. The caller decides when
//! the buffer reaches the disk: the driver writes and clears it once per cycle, after
//! the clock-high sample, so a trace on disk always ends on a cycle boundary.
//!
//! The header (timescale, variable declarations) is emitted together with the first
//! sample; that sample dumps every value, later samples only the ones that changed.
//! Dotted item names are declared as nested `$scope`s under `top`.

use std::fmt::Write as _;

use crate::sim::design::{DebugItem, DebugItems};

/// Identifier characters allowed by the VCD grammar.
const ID_FIRST: u8 = b'!';
const ID_RADIX: usize = (b'~' - b'!' + 1) as usize;

const UPSCOPE: &str = "$upscope $end\n";

/// A declared VCD variable.
#[derive(Clone, Debug)]
struct Var {
    ident: String,
    name: String,
    width: u32,
    /// Index into the design's value snapshot.
    slot: usize,
}

/// Incremental VCD text generator.
#[derive(Debug, Default)]
pub struct VcdWriter {
    /// Text produced since the last time the caller drained it.
    pub buffer: String,
    timescale: Option<(u32, String)>,
    scope: String,
    vars: Vec<Var>,
    last: Vec<Option<u64>>,
    header_done: bool,
}

impl VcdWriter {
    /// Creates a writer with top-level scope `top`.
    pub fn new() -> Self {
        Self {
            scope: "top".to_owned(),
            ..Self::default()
        }
    }

    /// Sets the `$timescale` declaration, e.g. `(1, "us")`.
    pub fn timescale(&mut self, number: u32, unit: &str) {
        self.timescale = Some((number, unit.to_owned()));
    }

    /// Declares every item, expanding memories into one variable per word.
    pub fn add(&mut self, items: &DebugItems) {
        self.declare(items, true);
    }

    /// Declares wires only; memory words are skipped.
    pub fn add_without_memories(&mut self, items: &DebugItems) {
        self.declare(items, false);
    }

    /// Number of declared variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    fn declare(&mut self, items: &DebugItems, with_memories: bool) {
        let mut slot = 0;
        for item in items.iter() {
            if item.is_memory() {
                if with_memories {
                    for index in 0..item.value_count() {
                        self.push_var(format!("{}[{index}]", item.name), item, slot + index);
                    }
                }
            } else {
                self.push_var(item.name.clone(), item, slot);
            }
            slot += item.value_count();
        }
    }

    fn push_var(&mut self, name: String, item: &DebugItem, slot: usize) {
        let ident = encode_ident(self.vars.len());
        self.vars.push(Var {
            ident,
            name,
            width: item.width,
            slot,
        });
        self.last.push(None);
    }

    /// Records `values` (a full `Design::debug_values` snapshot) at `time`.
    pub fn sample(&mut self, time: u64, values: &[u64]) {
        if !self.header_done {
            self.write_header();
            self.header_done = true;
        }

        let _ = writeln!(self.buffer, "#{time}");
        for (var, last) in self.vars.iter().zip(self.last.iter_mut()) {
            let value = values.get(var.slot).copied().unwrap_or(0) & mask(var.width);
            if *last == Some(value) {
                continue;
            }
            *last = Some(value);
            if var.width == 1 {
                let _ = writeln!(self.buffer, "{value}{}", var.ident);
            } else {
                let _ = writeln!(self.buffer, "b{value:b} {}", var.ident);
            }
        }
    }

    fn write_header(&mut self) {
        if let Some((number, unit)) = &self.timescale {
            let _ = writeln!(self.buffer, "$timescale {number} {unit} $end");
        }
        let _ = writeln!(self.buffer, "$scope module {} $end", self.scope);

        // Dotted names nest: `echo.serial.rx.rdy` is `rdy` inside echo/serial/rx.
        let mut open: Vec<&str> = Vec::new();
        for var in &self.vars {
            let (path, leaf) = split_scope(&var.name);
            let common = open
                .iter()
                .zip(&path)
                .take_while(|(outer, inner)| outer == inner)
                .count();
            self.buffer.push_str(&UPSCOPE.repeat(open.len() - common));
            open.truncate(common);
            for &module in &path[common..] {
                let _ = writeln!(self.buffer, "$scope module {module} $end");
                open.push(module);
            }
            let _ = writeln!(
                self.buffer,
                "$var wire {} {} {leaf} $end",
                var.width, var.ident
            );
        }
        self.buffer.push_str(&UPSCOPE.repeat(open.len() + 1));
        self.buffer.push_str("$enddefinitions $end\n");
    }
}

/// Splits a dotted name into its enclosing scopes and the leaf name.
fn split_scope(name: &str) -> (Vec<&str>, &str) {
    match name.rsplit_once('.') {
        Some((scopes, leaf)) => (scopes.split('.').collect(), leaf),
        None => (Vec::new(), name),
    }
}

/// Bit mask covering the low `width` bits.
fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Encodes a variable index as a short printable identifier (`!`, `"`, ..., `!!`, ...).
fn encode_ident(mut index: usize) -> String {
    let mut ident = String::new();
    loop {
        ident.push(char::from(ID_FIRST + (index % ID_RADIX) as u8));
        index /= ID_RADIX;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    ident
}
