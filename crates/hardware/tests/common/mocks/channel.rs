//! In-memory host channel.
//!
//! A `MockHost` is the "terminal side" a test controls: bytes it types become readable
//! on the channel, bytes the channel writes are collected in `output`. The channel and
//! the host share state, so a test keeps the host handle after the registry takes the
//! channel.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;

use ptysim_core::common::{SimError, SimResult};
use ptysim_core::host::HostChannel;
use ptysim_core::soc::EndpointRegistry;

#[derive(Debug, Default)]
struct HostState {
    input: VecDeque<u8>,
    output: Vec<u8>,
    blocked: bool,
    broken: bool,
    polls: usize,
}

/// Test-side handle to a mock terminal.
#[derive(Clone, Debug, Default)]
pub struct MockHost {
    state: Rc<RefCell<HostState>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues bytes as if typed into the terminal.
    pub fn type_bytes(&self, bytes: &[u8]) {
        self.state.borrow_mut().input.extend(bytes.iter().copied());
    }

    /// Bytes typed but not yet read by the circuit.
    pub fn unread(&self) -> usize {
        self.state.borrow().input.len()
    }

    /// Everything the circuit has written so far.
    pub fn output(&self) -> Vec<u8> {
        self.state.borrow().output.clone()
    }

    /// When set, the channel reports itself as not writable.
    pub fn set_blocked(&self, blocked: bool) {
        self.state.borrow_mut().blocked = blocked;
    }

    /// When set, every read and write fails with an I/O error.
    pub fn set_broken(&self, broken: bool) {
        self.state.borrow_mut().broken = broken;
    }

    /// Number of readiness polls performed.
    pub fn polls(&self) -> usize {
        self.state.borrow().polls
    }

    /// Creates a channel backed by this host.
    pub fn channel(&self, path: impl Into<String>) -> MockChannel {
        MockChannel {
            host: self.clone(),
            path: path.into(),
        }
    }
}

/// `HostChannel` implementation backed by a `MockHost`.
#[derive(Debug)]
pub struct MockChannel {
    host: MockHost,
    path: String,
}

impl HostChannel for MockChannel {
    fn readable(&self) -> SimResult<bool> {
        let mut state = self.host.state.borrow_mut();
        state.polls += 1;
        Ok(!state.input.is_empty())
    }

    fn writable(&self) -> SimResult<bool> {
        let mut state = self.host.state.borrow_mut();
        state.polls += 1;
        Ok(!state.blocked)
    }

    fn read_byte(&self) -> SimResult<u8> {
        let mut state = self.host.state.borrow_mut();
        if state.broken {
            return Err(SimError::HostIo {
                call: "read",
                source: io::Error::from(io::ErrorKind::BrokenPipe),
            });
        }
        state.input.pop_front().ok_or_else(|| SimError::HostIo {
            call: "read",
            source: io::Error::from(io::ErrorKind::WouldBlock),
        })
    }

    fn write_byte(&self, byte: u8) -> SimResult<()> {
        let mut state = self.host.state.borrow_mut();
        if state.broken {
            return Err(SimError::HostIo {
                call: "write",
                source: io::Error::from(io::ErrorKind::BrokenPipe),
            });
        }
        state.output.push(byte);
        Ok(())
    }

    fn device_path(&self) -> &str {
        &self.path
    }
}

/// Mock hosts created by a mock registry, keyed by endpoint identifier.
#[derive(Clone, Debug, Default)]
pub struct MockPool {
    hosts: Rc<RefCell<HashMap<String, MockHost>>>,
    opened: Rc<Cell<usize>>,
}

impl MockPool {
    /// Host for `id`; created on first use so tests can type before the endpoint exists.
    pub fn host(&self, id: &str) -> MockHost {
        self.hosts
            .borrow_mut()
            .entry(id.to_owned())
            .or_default()
            .clone()
    }

    /// Number of channels the registry has opened.
    pub fn opened(&self) -> usize {
        self.opened.get()
    }
}

/// Registry whose endpoints are backed by mock hosts, named `/dev/mock/<id>`.
pub fn mock_registry() -> (EndpointRegistry, MockPool) {
    let pool = MockPool::default();
    let opener_pool = pool.clone();
    let registry = EndpointRegistry::with_opener(move |id| {
        opener_pool.opened.set(opener_pool.opened.get() + 1);
        let host = opener_pool.host(id);
        Ok(Box::new(host.channel(format!("/dev/mock/{id}"))) as Box<dyn HostChannel>)
    });
    (registry, pool)
}
