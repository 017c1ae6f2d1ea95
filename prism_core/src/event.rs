//! Audit events.
//!
//! Calls emit [`LogRecord`]s while they run. Records of a call that fails are
//! dropped with the rest of its effects; records of a committed transaction
//! are stamped into [`EventRecord`]s and kept in an [`EventLog`].

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::abi::Calldata;
use crate::diamond::FacetCut;
use crate::id::{Address, RoleId, TxId};

/// Structured audit events emitted by the dispatch core and its modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// One registry mutation batch. `init` is `Address::ZERO` and `calldata`
    /// is `None` when the batch had no initialization call.
    DiamondCut {
        cuts: Vec<FacetCut>,
        init: Address,
        calldata: Option<Calldata>,
    },
    RoleGranted {
        role: RoleId,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: RoleId,
        account: Address,
        sender: Address,
    },
    RoleAdminChanged {
        role: RoleId,
        previous_admin: RoleId,
        new_admin: RoleId,
    },
    DelegateAdded {
        delegate: Address,
        sender: Address,
    },
    DelegateRemoved {
        delegate: Address,
        sender: Address,
    },
    Enabled {
        account: Address,
    },
    Disabled {
        account: Address,
    },
    /// Free-form event for business modules.
    Custom {
        name: String,
        data: Value,
    },
}

impl Event {
    /// Short name of the event variant.
    pub fn name(&self) -> &str {
        match self {
            Event::DiamondCut { .. } => "DiamondCut",
            Event::RoleGranted { .. } => "RoleGranted",
            Event::RoleRevoked { .. } => "RoleRevoked",
            Event::RoleAdminChanged { .. } => "RoleAdminChanged",
            Event::DelegateAdded { .. } => "DelegateAdded",
            Event::DelegateRemoved { .. } => "DelegateRemoved",
            Event::Enabled { .. } => "Enabled",
            Event::Disabled { .. } => "Disabled",
            Event::Custom { name, .. } => name,
        }
    }
}

/// An event together with the account whose storage context emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub emitter: Address,
    pub event: Event,
}

/// A committed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    pub emitter: Address,
    pub event: Event,
}

impl EventRecord {
    pub fn new(tx_id: TxId, record: LogRecord) -> Self {
        Self {
            tx_id,
            timestamp: Utc::now(),
            emitter: record.emitter,
            event: record.event,
        }
    }
}

/// A thread-safe, bounded log of committed events.
#[derive(Debug)]
pub struct EventLog {
    events: Mutex<VecDeque<EventRecord>>,
    max_size: usize,
}

impl EventLog {
    /// Create a new event log with a maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_size.min(1024))),
            max_size,
        }
    }

    /// Append a record, removing the oldest if at capacity
    pub fn append(&self, record: EventRecord) {
        let mut events = self.events.lock();
        if self.max_size == 0 {
            return;
        }
        if events.len() >= self.max_size {
            if let Some(dropped) = events.pop_front() {
                trace!("Event log full, dropped {} from {}", dropped.event.name(), dropped.tx_id);
            }
        }
        events.push_back(record);
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().iter().cloned().collect()
    }

    /// Events emitted by one account
    pub fn events_for(&self, emitter: &Address) -> Vec<EventRecord> {
        self.events
            .lock()
            .iter()
            .filter(|record| &record.emitter == emitter)
            .cloned()
            .collect()
    }

    /// Events committed by one transaction
    pub fn events_of(&self, tx_id: &TxId) -> Vec<EventRecord> {
        self.events
            .lock()
            .iter()
            .filter(|record| &record.tx_id == tx_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(1000)
    }
}
