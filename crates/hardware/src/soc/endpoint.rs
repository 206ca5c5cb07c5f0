//! Serial endpoint registry.
//!
//! Maps a textual identifier to a shared host channel. This module provides:
//! 1. **Shared ownership:** Every peripheral holds an `Rc<Endpoint>`; the registry only
//!    keeps a `Weak`, so the table never keeps an endpoint alive.
//! 2. **Lazy eviction:** An endpoint removes its own table entry when its last owner
//!    drops it, closing the underlying descriptor. The identifier is then free again.
//! 3. **Role occupancy:** At most one receiver and one transmitter per endpoint. A
//!    peripheral gives its role back when it is dropped.
//!
//! The simulator is single-threaded, so the table lives behind `Rc<RefCell<_>>` and the
//! process default is a thread-local.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::common::{Role, SimError, SimResult};
use crate::host::{HostChannel, PtyFile};

type Table = HashMap<String, Weak<Endpoint>>;
type Opener = dyn Fn(&str) -> SimResult<Box<dyn HostChannel>>;

thread_local! {
    static GLOBAL: EndpointRegistry = EndpointRegistry::new();
}

/// One host channel shared by the peripherals wired to the same identifier.
#[derive(Debug)]
pub struct Endpoint {
    id: String,
    channel: Box<dyn HostChannel>,
    has_rx: Cell<bool>,
    has_tx: Cell<bool>,
    table: Weak<RefCell<Table>>,
}

impl Endpoint {
    /// Identifier this endpoint is registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Host channel backing this endpoint.
    pub fn channel(&self) -> &dyn HostChannel {
        self.channel.as_ref()
    }

    /// Host-visible device path of the channel.
    pub fn device_path(&self) -> &str {
        self.channel.device_path()
    }

    /// Returns `true` if `role` is already occupied.
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Receiver => self.has_rx.get(),
            Role::Transmitter => self.has_tx.get(),
        }
    }

    /// Claims `role` for the calling peripheral.
    ///
    /// # Errors
    ///
    /// `SimError::RoleCollision` if another peripheral already holds `role`. This is a
    /// wiring error in the circuit description and must abort construction.
    pub fn mark(&self, role: Role) -> SimResult<()> {
        let slot = match role {
            Role::Receiver => &self.has_rx,
            Role::Transmitter => &self.has_tx,
        };
        if slot.replace(true) {
            return Err(SimError::RoleCollision {
                id: self.id.clone(),
                role,
            });
        }
        Ok(())
    }

    /// Frees `role` so another peripheral can claim it.
    pub fn release(&self, role: Role) {
        match role {
            Role::Receiver => self.has_rx.set(false),
            Role::Transmitter => self.has_tx.set(false),
        }
    }

    /// Claims the receive role. See [`Endpoint::mark`].
    ///
    /// # Errors
    ///
    /// `SimError::RoleCollision` if a receiver is already registered.
    pub fn mark_receiver(&self) -> SimResult<()> {
        self.mark(Role::Receiver)
    }

    /// Claims the transmit role. See [`Endpoint::mark`].
    ///
    /// # Errors
    ///
    /// `SimError::RoleCollision` if a transmitter is already registered.
    pub fn mark_transmitter(&self) -> SimResult<()> {
        self.mark(Role::Transmitter)
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            if let Ok(mut table) = table.try_borrow_mut() {
                // Only a dead link is ours to evict.
                if table.get(&self.id).is_some_and(|w| w.strong_count() == 0) {
                    let _ = table.remove(&self.id);
                }
            }
        }
        tracing::debug!(id = %self.id, "endpoint released");
    }
}

/// Identifier → endpoint table.
///
/// Cloning yields another handle to the same table.
#[derive(Clone)]
pub struct EndpointRegistry {
    table: Rc<RefCell<Table>>,
    opener: Rc<Opener>,
}

impl EndpointRegistry {
    /// Creates an empty registry that backs every endpoint with a fresh pseudo-terminal.
    pub fn new() -> Self {
        Self::with_opener(|_id| Ok(Box::new(PtyFile::open()?) as Box<dyn HostChannel>))
    }

    /// Creates an empty registry with a custom channel factory.
    ///
    /// The factory runs once per endpoint creation and receives the identifier.
    pub fn with_opener<F>(opener: F) -> Self
    where
        F: Fn(&str) -> SimResult<Box<dyn HostChannel>> + 'static,
    {
        Self {
            table: Rc::new(RefCell::new(HashMap::new())),
            opener: Rc::new(opener),
        }
    }

    /// Returns a handle to this thread's default registry.
    pub fn global() -> Self {
        GLOBAL.with(Self::clone)
    }

    /// Returns the live endpoint for `id`, creating it on first use.
    ///
    /// # Errors
    ///
    /// `SimError::EndpointInit` if a new channel has to be opened and that fails.
    pub fn acquire(&self, id: &str) -> SimResult<Rc<Endpoint>> {
        if let Some(endpoint) = self.table.borrow().get(id).and_then(Weak::upgrade) {
            return Ok(endpoint);
        }

        let channel = (self.opener)(id)?;
        let endpoint = Rc::new(Endpoint {
            id: id.to_owned(),
            channel,
            has_rx: Cell::new(false),
            has_tx: Cell::new(false),
            table: Rc::downgrade(&self.table),
        });
        let _stale = self
            .table
            .borrow_mut()
            .insert(id.to_owned(), Rc::downgrade(&endpoint));

        tracing::info!(id, path = endpoint.device_path(), "endpoint created");
        Ok(endpoint)
    }

    /// Returns `true` if a live endpoint is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.table
            .borrow()
            .get(id)
            .is_some_and(|w| w.strong_count() > 0)
    }

    /// Number of entries currently in the table.
    pub fn live_count(&self) -> usize {
        self.table.borrow().len()
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EndpointRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointRegistry")
            .field("ids", &self.table.borrow().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
