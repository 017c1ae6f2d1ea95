//! Helpers for testing modules without the full runtime.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::abi::Calldata;
use crate::error::{Error, Result};
use crate::event::LogRecord;
use crate::host::{CallContext, Frame, Host};
use crate::id::Address;
use crate::module::Module;
use crate::storage::Storage;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// A minimal host: plain accounts with optional code, no dispatch table.
#[derive(Debug, Default)]
pub struct MemoryHost {
    code: HashMap<Address, Arc<dyn Module>>,
    storage: HashMap<Address, Storage>,
    events: Vec<LogRecord>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `module` at `address`.
    pub fn install(&mut self, address: Address, module: Arc<dyn Module>) {
        self.code.insert(address, module);
        self.storage.entry(address).or_default();
    }

    /// Create an account without code.
    pub fn create_account(&mut self, address: Address) {
        self.storage.entry(address).or_default();
    }

    /// Run `f` in a frame whose storage is `account`'s and whose caller is
    /// `caller`. Effects are discarded if `f` fails.
    pub fn with_context<T>(
        &mut self,
        account: Address,
        caller: Address,
        f: impl FnOnce(&mut CallContext<'_>) -> Result<T>,
    ) -> Result<T> {
        self.create_account(account);
        let storage_snapshot = self.storage.clone();
        let events_len = self.events.len();
        let mut ctx = CallContext::new(self, Frame::call(caller, account, 0));
        let result = f(&mut ctx);
        if result.is_err() {
            self.storage = storage_snapshot;
            self.events.truncate(events_len);
        }
        result
    }

    pub fn events(&self) -> &[LogRecord] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn account_storage(&self, account: &Address) -> Option<&Storage> {
        self.storage.get(account)
    }
}

impl Host for MemoryHost {
    fn storage(&self, account: &Address) -> Result<&Storage> {
        self.storage.get(account).ok_or(Error::NoCode(*account))
    }

    fn storage_mut(&mut self, account: &Address) -> Result<&mut Storage> {
        self.storage.get_mut(account).ok_or(Error::NoCode(*account))
    }

    fn execute(&mut self, frame: Frame, calldata: &Calldata) -> Result<Value> {
        let module = self
            .code
            .get(&frame.code_address)
            .cloned()
            .ok_or(Error::NoCode(frame.code_address))?;
        let storage_snapshot = self.storage.clone();
        let events_len = self.events.len();
        let result = {
            let mut ctx = CallContext::new(self, frame);
            module.execute(&mut ctx, calldata)
        };
        if result.is_err() {
            self.storage = storage_snapshot;
            self.events.truncate(events_len);
        }
        result
    }

    fn emit(&mut self, record: LogRecord) {
        self.events.push(record);
    }

    fn has_code(&self, address: &Address) -> bool {
        self.code.contains_key(address)
    }
}
