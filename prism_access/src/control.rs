//! Access control.
//!
//! Gated role operations built on the [role store](crate::roles). Only a
//! member of a role's admin role may grant or revoke it or change its admin;
//! the admin lookup is a single hop, never a chain. Grants and revocations
//! are idempotent and emit an event only on an actual transition.
//!
//! When the disable gate is installed and disabled, every mutating operation
//! here fails with [`Error::Disabled`] before authorization is checked.

use prism_core::error::{Error, Result};
use prism_core::event::Event;
use prism_core::host::CallContext;
use prism_core::id::{Address, RoleId};
use prism_core::interfaces::IACCESS_CONTROL_DELEGATING;
use prism_core::introspection;
use tracing::debug;

use crate::{delegation, gate, roles};

/// Whether `account` holds `role`, locally or, when delegation is
/// installed, according to any registered delegate.
pub fn has_role(ctx: &mut CallContext<'_>, role: &RoleId, account: &Address) -> Result<bool> {
    if roles::has_role(ctx.storage()?, role, account) {
        return Ok(true);
    }
    if introspection::supports_interface(ctx.storage()?, &IACCESS_CONTROL_DELEGATING)? {
        return delegation::delegate_has_role(ctx, role, account);
    }
    Ok(false)
}

/// Fail with a missing-role error unless `account` holds `role`.
pub fn check_role_for(ctx: &mut CallContext<'_>, role: &RoleId, account: &Address) -> Result<()> {
    if has_role(ctx, role, account)? {
        Ok(())
    } else {
        Err(Error::missing_role(*account, *role))
    }
}

/// Fail with a missing-role error unless the caller holds `role`.
pub fn check_role(ctx: &mut CallContext<'_>, role: &RoleId) -> Result<()> {
    let caller = ctx.caller();
    check_role_for(ctx, role, &caller)
}

/// Grant `role` to `account`. The caller must hold the role's admin.
pub fn grant_role(ctx: &mut CallContext<'_>, role: &RoleId, account: &Address) -> Result<bool> {
    gate::require_enabled(ctx)?;
    let admin = roles::role_admin(ctx.storage()?, role)?;
    check_role(ctx, &admin)?;
    grant_role_unchecked(ctx, role, account)
}

/// Revoke `role` from `account`. The caller must hold the role's admin.
pub fn revoke_role(ctx: &mut CallContext<'_>, role: &RoleId, account: &Address) -> Result<bool> {
    gate::require_enabled(ctx)?;
    let admin = roles::role_admin(ctx.storage()?, role)?;
    check_role(ctx, &admin)?;
    revoke_role_unchecked(ctx, role, account)
}

/// Drop the caller's own membership of `role`.
pub fn renounce_role(ctx: &mut CallContext<'_>, role: &RoleId) -> Result<bool> {
    gate::require_enabled(ctx)?;
    let caller = ctx.caller();
    revoke_role_unchecked(ctx, role, &caller)
}

/// Make `admin` the administering role of `role`. The caller must hold the
/// current admin of `role`.
pub fn set_role_admin(ctx: &mut CallContext<'_>, role: &RoleId, admin: &RoleId) -> Result<bool> {
    gate::require_enabled(ctx)?;
    let current = roles::role_admin(ctx.storage()?, role)?;
    check_role(ctx, &current)?;
    set_role_admin_unchecked(ctx, role, admin)
}

/// Grant without authorization, for initializers. Emits on change.
pub fn grant_role_unchecked(
    ctx: &mut CallContext<'_>,
    role: &RoleId,
    account: &Address,
) -> Result<bool> {
    let changed = roles::grant(ctx.storage_mut()?, role, account)?;
    if changed {
        let sender = ctx.caller();
        debug!("Granted role {} to {} (sender {})", role, account, sender);
        ctx.emit(Event::RoleGranted {
            role: *role,
            account: *account,
            sender,
        })?;
    }
    Ok(changed)
}

/// Revoke without authorization. Emits on change.
pub fn revoke_role_unchecked(
    ctx: &mut CallContext<'_>,
    role: &RoleId,
    account: &Address,
) -> Result<bool> {
    let changed = roles::revoke(ctx.storage_mut()?, role, account);
    if changed {
        let sender = ctx.caller();
        debug!("Revoked role {} from {} (sender {})", role, account, sender);
        ctx.emit(Event::RoleRevoked {
            role: *role,
            account: *account,
            sender,
        })?;
    }
    Ok(changed)
}

/// Set a role's admin without authorization. Emits on change.
pub fn set_role_admin_unchecked(
    ctx: &mut CallContext<'_>,
    role: &RoleId,
    admin: &RoleId,
) -> Result<bool> {
    match roles::set_admin(ctx.storage_mut()?, role, admin)? {
        Some(previous_admin) => {
            debug!("Admin of role {} changed from {} to {}", role, previous_admin, admin);
            ctx.emit(Event::RoleAdminChanged {
                role: *role,
                previous_admin,
                new_admin: *admin,
            })?;
            Ok(true)
        }
        None => Ok(false),
    }
}
