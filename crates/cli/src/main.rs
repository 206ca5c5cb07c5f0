//! Pty-backed serial co-simulation CLI.
//!
//! This binary runs the echo system against a host pseudo-terminal. It performs:
//! 1. **Argument parsing:** Cycle limit, waveform trace options and an optional JSON config.
//! 2. **Construction:** Builds the echo system, printing the device path each serial half is
//!    assigned to.
//! 3. **Run:** Waits for Enter, then steps the clock until the limit or Ctrl-C.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use ptysim_core::SimError;
use ptysim_core::config::{Config, parse_cycles};
use ptysim_core::sim::Driver;
use ptysim_core::soc::System;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Cycle-stepped serial co-simulation over a pseudo-terminal",
    long_about = "Runs an echo circuit whose serial port is bridged to a host pseudo-terminal.\n\nAttach a terminal client (e.g. `screen <path>` or `picocom <path>`) to the device path printed at startup; every byte typed is echoed back by the circuit.\n\nExamples:\n  sim\n  sim -c 100000 -t echo.vcd\n  sim -t echo.vcd -m --no-prompt"
)]
struct Cli {
    /// Number of clock cycles to simulate (default: until interrupted).
    #[arg(short, long, value_name = "N")]
    cycles: Option<String>,

    /// Write a VCD waveform trace to PATH.
    #[arg(short, long, value_name = "PATH")]
    trace: Option<PathBuf>,

    /// Include memory contents in the trace (only meaningful with --trace).
    #[arg(short = 'm', long)]
    trace_memories: bool,

    /// JSON configuration file; command-line flags take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start immediately instead of waiting for Enter.
    #[arg(long)]
    no_prompt: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies flag overrides.
    fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Config::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(cycles) = &self.cycles {
            config.driver.cycles = parse_cycles(cycles)?;
        }
        if let Some(trace) = &self.trace {
            config.driver.trace_path = Some(trace.clone());
        }
        if self.trace_memories {
            config.driver.trace_memories = true;
        }
        if self.no_prompt {
            config.driver.prompt = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn run(config: Config) -> Result<()> {
    let mut system = System::new(&config.serial).context("building echo system")?;
    let driver = Driver::new(config.driver);

    let stdin = io::stdin();
    let mut stats = driver.start(&mut system, stdin.lock(), io::stdout())?;
    stats.record_serial(&system.serial);
    tracing::info!("run statistics\n{stats}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // `--help` and `--version` go to stdout and succeed; everything else is a usage error.
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return code;
        }
    };

    init_tracing();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            if err.downcast_ref::<SimError>().is_some_and(|e| matches!(e, SimError::Argument(_))) {
                eprintln!("{}", Cli::command().render_usage());
            }
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
