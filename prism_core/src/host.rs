//! Execution context for module code.
//!
//! A [`Host`] owns accounts and runs message calls; a [`CallContext`] is the
//! view of one executing frame that a module sees.

use serde_json::Value;

use crate::abi::Calldata;
use crate::error::{Error, Result};
use crate::event::{Event, LogRecord};
use crate::id::Address;
use crate::storage::Storage;

/// One message-call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Account whose storage the code runs against.
    pub address: Address,
    /// Account whose code is running.
    pub code_address: Address,
    /// Effective caller.
    pub caller: Address,
    /// Value forwarded with the call.
    pub value: u128,
    /// Whether state modification is forbidden.
    pub is_static: bool,
}

impl Frame {
    /// A plain call: code and storage both belong to `target`.
    pub fn call(caller: Address, target: Address, value: u128) -> Self {
        Self {
            address: target,
            code_address: target,
            caller,
            value,
            is_static: false,
        }
    }

    /// A read-only call to `target`.
    pub fn static_call(caller: Address, target: Address) -> Self {
        Self {
            is_static: true,
            ..Self::call(caller, target, 0)
        }
    }
}

/// The runtime a [`CallContext`] executes against.
pub trait Host {
    /// Storage of `account`.
    fn storage(&self, account: &Address) -> Result<&Storage>;

    /// Mutable storage of `account`.
    fn storage_mut(&mut self, account: &Address) -> Result<&mut Storage>;

    /// Run the code at `frame.code_address` in `frame`. A failing frame
    /// leaves no trace of its own storage writes or events.
    fn execute(&mut self, frame: Frame, calldata: &Calldata) -> Result<Value>;

    /// Record an event emitted in the current transaction.
    fn emit(&mut self, record: LogRecord);

    /// Whether `address` holds code.
    fn has_code(&self, address: &Address) -> bool;
}

/// What a module sees while it runs.
pub struct CallContext<'h> {
    host: &'h mut dyn Host,
    frame: Frame,
}

impl<'h> CallContext<'h> {
    pub fn new(host: &'h mut dyn Host, frame: Frame) -> Self {
        Self { host, frame }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Effective caller of the running operation.
    pub fn caller(&self) -> Address {
        self.frame.caller
    }

    /// Account whose storage this frame runs against.
    pub fn this(&self) -> Address {
        self.frame.address
    }

    pub fn code_address(&self) -> Address {
        self.frame.code_address
    }

    pub fn value(&self) -> u128 {
        self.frame.value
    }

    pub fn is_static(&self) -> bool {
        self.frame.is_static
    }

    pub fn storage(&self) -> Result<&Storage> {
        self.host.storage(&self.frame.address)
    }

    pub fn storage_mut(&mut self) -> Result<&mut Storage> {
        if self.frame.is_static {
            return Err(Error::StaticCallViolation);
        }
        self.host.storage_mut(&self.frame.address)
    }

    pub fn emit(&mut self, event: Event) -> Result<()> {
        if self.frame.is_static {
            return Err(Error::StaticCallViolation);
        }
        self.host.emit(LogRecord {
            emitter: self.frame.address,
            event,
        });
        Ok(())
    }

    pub fn has_code(&self, address: &Address) -> bool {
        self.host.has_code(address)
    }

    /// Call `target` with this frame's account as the caller.
    pub fn call(&mut self, target: Address, calldata: &Calldata, value: u128) -> Result<Value> {
        let frame = Frame {
            is_static: self.frame.is_static,
            ..Frame::call(self.frame.address, target, value)
        };
        self.host.execute(frame, calldata)
    }

    /// Read-only call to `target`.
    pub fn static_call(&mut self, target: Address, calldata: &Calldata) -> Result<Value> {
        let frame = Frame::static_call(self.frame.address, target);
        self.host.execute(frame, calldata)
    }

    /// Run the code at `code` against this frame's storage, caller and value.
    pub fn delegate_call(&mut self, code: Address, calldata: &Calldata) -> Result<Value> {
        let frame = Frame {
            code_address: code,
            ..self.frame
        };
        self.host.execute(frame, calldata)
    }
}
