//! Clock driver.
//!
//! The driver owns the run loop. Each cycle it:
//! 1. **Steps the clock:** Drives the clock low then high, settling the design after each.
//! 2. **Traces:** Samples the design after each half-cycle and writes the VCD text to disk
//!    once the cycle is complete.
//! 3. **Checks for interrupts:** A raised SIGINT flag ends the run after the cycle.
//!
//! `start` wraps the loop with the operator-facing gate and status lines. The trace file
//! is created before either, so a bad path aborts startup before anything is printed.

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::common::{SAMPLES_PER_CYCLE, SimError, SimResult};
use crate::config::DriverConfig;
use crate::host::Interrupt;
use crate::sim::design::{DebugItems, Design};
use crate::sim::vcd::VcdWriter;
use crate::stats::SimStats;

/// VCD writer bound to its output file.
#[derive(Debug)]
struct Tracer {
    file: File,
    vcd: VcdWriter,
    values: Vec<u64>,
}

impl Tracer {
    fn create(path: &Path, items: &DebugItems, memories: bool) -> SimResult<Self> {
        let file = File::create(path)?;
        let mut vcd = VcdWriter::new();
        vcd.timescale(1, "us");
        if memories {
            vcd.add(items);
        } else {
            vcd.add_without_memories(items);
        }
        tracing::info!(path = %path.display(), vars = vcd.var_count(), "trace opened");
        Ok(Self {
            file,
            vcd,
            values: Vec::with_capacity(items.value_count()),
        })
    }

    fn sample<D: Design + ?Sized>(&mut self, design: &D, time: u64) {
        self.values.clear();
        design.debug_values(&mut self.values);
        self.vcd.sample(time, &self.values);
    }

    fn flush(&mut self) -> SimResult<()> {
        self.file.write_all(self.vcd.buffer.as_bytes())?;
        self.vcd.buffer.clear();
        Ok(())
    }
}

/// Advances a design through clock cycles.
#[derive(Debug, Clone)]
pub struct Driver {
    config: DriverConfig,
}

impl Driver {
    /// Creates a driver with the given run settings.
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Run settings.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Runs up to `cycles` clock cycles, stopping early once `interrupt` is raised.
    ///
    /// The interrupt is only observed between cycles, so the design and the trace always
    /// end on a cycle boundary.
    ///
    /// # Errors
    ///
    /// `SimError::Trace` if the trace file cannot be created or written, plus anything
    /// the design raises while stepping.
    pub fn run<D: Design + ?Sized>(
        &self,
        design: &mut D,
        interrupt: &Interrupt,
    ) -> SimResult<SimStats> {
        let tracer = self.open_trace(design)?;
        self.run_with(design, tracer, interrupt)
    }

    /// Creates the trace file, if one is configured, so setup errors surface before
    /// the run starts.
    fn open_trace<D: Design + ?Sized>(&self, design: &D) -> SimResult<Option<Tracer>> {
        let Some(path) = &self.config.trace_path else {
            return Ok(None);
        };
        let mut items = DebugItems::new();
        design.debug_info(&mut items);
        Tracer::create(path, &items, self.config.trace_memories).map(Some)
    }

    fn run_with<D: Design + ?Sized>(
        &self,
        design: &mut D,
        mut tracer: Option<Tracer>,
        interrupt: &Interrupt,
    ) -> SimResult<SimStats> {
        let mut stats = SimStats::new();
        tracing::debug!(cycles = self.config.cycles, "run loop entered");
        for cycle in 0..self.config.cycles {
            for (phase, level) in [false, true].into_iter().enumerate() {
                design.set_clock(level);
                let _deltas = design.step()?;
                if let Some(tracer) = tracer.as_mut() {
                    tracer.sample(design, cycle * SAMPLES_PER_CYCLE + phase as u64);
                    stats.trace_samples += 1;
                }
            }
            if let Some(tracer) = tracer.as_mut() {
                tracer.flush()?;
            }
            stats.cycles += 1;

            if interrupt.is_raised() {
                stats.interrupted = true;
                break;
            }
        }

        tracing::info!(
            cycles = stats.cycles,
            samples = stats.trace_samples,
            interrupted = stats.interrupted,
            "run finished"
        );
        Ok(stats)
    }

    /// Interactive entry point: opens the trace, waits for Enter (if enabled), installs
    /// the SIGINT listener, prints status lines to `out`, then runs.
    ///
    /// # Errors
    ///
    /// `SimError::Trace` before anything is printed if the trace file cannot be created;
    /// `SimError::HostIo` on console or signal setup failures, plus anything `run` returns.
    pub fn start<D, R, W>(&self, design: &mut D, mut input: R, mut out: W) -> SimResult<SimStats>
    where
        D: Design + ?Sized,
        R: BufRead,
        W: Write,
    {
        let tracer = self.open_trace(design)?;

        if self.config.prompt {
            write!(out, "Press Enter to start simulation...").map_err(console("write"))?;
            out.flush().map_err(console("write"))?;
            let mut line = String::new();
            let _read = input.read_line(&mut line).map_err(console("read"))?;
        }

        let interrupt = Interrupt::install()?;
        writeln!(out, "Running.").map_err(console("write"))?;
        writeln!(out, "Press Ctrl-C to exit simulation.").map_err(console("write"))?;
        out.flush().map_err(console("write"))?;

        let stats = self.run_with(design, tracer, &interrupt)?;

        // The carriage return overwrites the `^C` echoed by the terminal.
        writeln!(out, "\rExiting.").map_err(console("write"))?;
        out.flush().map_err(console("write"))?;
        Ok(stats)
    }
}

fn console(call: &'static str) -> impl FnOnce(io::Error) -> SimError {
    move |source| SimError::HostIo { call, source }
}
