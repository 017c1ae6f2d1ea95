//! Delegating access control.
//!
//! A diamond may trust external accounts to answer role-membership queries.
//! A principal holds a role if the local role store says so or any
//! registered delegate's `hasRole` does; delegates are queried in
//! registration order and the first `true` wins.

use lazy_static::lazy_static;
use prism_core::abi::{self, Calldata};
use prism_core::error::{Error, Result};
use prism_core::event::Event;
use prism_core::host::CallContext;
use prism_core::id::{Address, RoleId};
use prism_core::interfaces::HAS_ROLE;
use prism_core::storage::{Namespace, Storage};
use tracing::{debug, trace};

use crate::roles::DELEGATE_ADMIN_ROLE;
use crate::{control, gate};

lazy_static! {
    pub static ref NAMESPACE: Namespace = Namespace::new("prism.access.delegates");
    static ref LIST_KEY: String = NAMESPACE.key(["list"]);
}

/// Registered delegates, in registration order.
pub fn delegates(storage: &Storage) -> Result<Vec<Address>> {
    storage.get_or_default(&LIST_KEY)
}

pub fn is_delegate(storage: &Storage, delegate: &Address) -> Result<bool> {
    Ok(delegates(storage)?.contains(delegate))
}

/// Register `delegate`. Requires the delegate-admin role. Returns whether
/// the set changed.
pub fn add_delegate(ctx: &mut CallContext<'_>, delegate: &Address) -> Result<bool> {
    gate::require_enabled(ctx)?;
    control::check_role(ctx, &DELEGATE_ADMIN_ROLE)?;
    if delegate.is_zero() {
        return Err(Error::revert("delegate can't be address(0)"));
    }
    if *delegate == ctx.this() {
        return Err(Error::revert("diamond can't delegate to itself"));
    }
    if !ctx.has_code(delegate) {
        return Err(Error::revert(format!("delegate {} has no code", delegate)));
    }

    let mut list = delegates(ctx.storage()?)?;
    if list.contains(delegate) {
        return Ok(false);
    }
    require_membership_answer(ctx, delegate)?;
    list.push(*delegate);
    ctx.storage_mut()?.set(LIST_KEY.as_str(), &list)?;

    let sender = ctx.caller();
    debug!("Added access-control delegate {}", delegate);
    ctx.emit(Event::DelegateAdded {
        delegate: *delegate,
        sender,
    })?;
    Ok(true)
}

/// A delegate must answer `hasRole` with a boolean before it is trusted.
fn require_membership_answer(ctx: &mut CallContext<'_>, delegate: &Address) -> Result<()> {
    let query = Calldata::encode(*HAS_ROLE, &(RoleId::SUPER, Address::ZERO))?;
    let answer = ctx
        .static_call(*delegate, &query)
        .and_then(abi::decode_output::<bool>);
    match answer {
        Ok(_) => Ok(()),
        Err(e) => Err(Error::revert(format!(
            "delegate {} does not answer hasRole: {}",
            delegate, e
        ))),
    }
}

/// Unregister `delegate`. Requires the delegate-admin role. Returns whether
/// the set changed.
pub fn remove_delegate(ctx: &mut CallContext<'_>, delegate: &Address) -> Result<bool> {
    gate::require_enabled(ctx)?;
    control::check_role(ctx, &DELEGATE_ADMIN_ROLE)?;

    let mut list = delegates(ctx.storage()?)?;
    let before = list.len();
    list.retain(|d| d != delegate);
    if list.len() == before {
        return Ok(false);
    }
    if list.is_empty() {
        ctx.storage_mut()?.remove(&LIST_KEY);
    } else {
        ctx.storage_mut()?.set(LIST_KEY.as_str(), &list)?;
    }

    let sender = ctx.caller();
    debug!("Removed access-control delegate {}", delegate);
    ctx.emit(Event::DelegateRemoved {
        delegate: *delegate,
        sender,
    })?;
    Ok(true)
}

/// Ask each delegate, in registration order, whether `account` holds
/// `role`.
pub fn delegate_has_role(
    ctx: &mut CallContext<'_>,
    role: &RoleId,
    account: &Address,
) -> Result<bool> {
    let list = delegates(ctx.storage()?)?;
    if list.is_empty() {
        return Ok(false);
    }
    let query = Calldata::encode(*HAS_ROLE, &(role, account))?;
    for delegate in list {
        let answer: bool = abi::decode_output(ctx.static_call(delegate, &query)?)?;
        trace!("Delegate {} answered {} for role {}", delegate, answer, role);
        if answer {
            return Ok(true);
        }
    }
    Ok(false)
}
