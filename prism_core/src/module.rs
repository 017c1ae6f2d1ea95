//! The interface every installable module implements.

use std::fmt::Debug;

use serde_json::Value;

use crate::abi::Calldata;
use crate::error::Result;
use crate::host::CallContext;
use crate::id::{InterfaceId, Selector};
use crate::storage::Namespace;

/// An installable unit of logic.
///
/// A module is deployed once at its own address and may then be registered
/// into any number of diamonds. When a diamond dispatches to it, `execute`
/// runs against the diamond's storage with the diamond's caller; when it is
/// called directly, it runs against its own storage.
pub trait Module: Send + Sync + Debug {
    /// Human-readable name, used in logs and layout reports.
    fn name(&self) -> &str;

    /// Every selector this module can serve.
    fn selectors(&self) -> Vec<Selector>;

    /// Capability interface this module implements, if it declares one.
    fn interface_id(&self) -> InterfaceId {
        InterfaceId::NONE
    }

    /// Selectors grouped by the capability interface they implement. The
    /// default is one group holding every selector under `interface_id`.
    fn interfaces(&self) -> Vec<(InterfaceId, Vec<Selector>)> {
        vec![(self.interface_id(), self.selectors())]
    }

    /// Storage namespaces this module writes.
    fn storage_layout(&self) -> Vec<Namespace> {
        Vec::new()
    }

    /// Run the operation named by `calldata.selector`.
    fn execute(&self, ctx: &mut CallContext<'_>, calldata: &Calldata) -> Result<Value>;
}
