//! Fallback router of a diamond.

use prism_core::abi::Calldata;
use prism_core::error::{Error, Result};
use prism_core::host::CallContext;
use serde_json::Value;
use tracing::trace;

use crate::registry;

/// Route `calldata` to the module registered for its selector and run that
/// module against this frame's storage, caller and value.
///
/// An unregistered selector fails with [`Error::FunctionNotFound`]; a
/// failure raised by the module is returned unchanged.
pub fn dispatch(ctx: &mut CallContext<'_>, calldata: &Calldata) -> Result<Value> {
    let selector = calldata.selector;
    let facet = registry::facet_address(ctx.storage()?, &selector)?
        .ok_or(Error::FunctionNotFound(selector))?;
    trace!(
        "Diamond {} routing {} to {} (caller {})",
        ctx.this(),
        selector,
        facet,
        ctx.caller()
    );
    ctx.delegate_call(facet, calldata)
}
