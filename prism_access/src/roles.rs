//! Role store.
//!
//! Persistent role membership and role administration, read and written
//! directly against a [`Storage`]. Nothing here checks authorization; see
//! [`crate::control`] for the gated operations.
//!
//! Layout under `prism.access.roles`:
//!
//! - `<role>.members.<account>` holds `true` for every member
//! - `<role>.admin` holds the administering role when it is not the super-role

use lazy_static::lazy_static;
use prism_core::error::Result;
use prism_core::id::{Address, RoleId};
use prism_core::storage::{Namespace, Storage};

lazy_static! {
    pub static ref NAMESPACE: Namespace = Namespace::new("prism.access.roles");

    /// May register, replace and remove modules.
    pub static ref DIAMOND_CUT_ROLE: RoleId = RoleId::from_name("DIAMOND_CUT_ROLE");

    /// May enable and disable the diamond.
    pub static ref DISABLER_ROLE: RoleId = RoleId::from_name("DISABLER_ROLE");

    /// May add and remove access-control delegates.
    pub static ref DELEGATE_ADMIN_ROLE: RoleId = RoleId::from_name("DELEGATE_ADMIN_ROLE");
}

/// The super-role. Administers every role without an explicit admin.
pub const SUPER_ROLE: RoleId = RoleId::SUPER;

fn members_prefix(role: &RoleId) -> String {
    format!("{}.", NAMESPACE.key([role.to_hex().as_str(), "members"]))
}

fn member_key(role: &RoleId, account: &Address) -> String {
    NAMESPACE.key([role.to_hex().as_str(), "members", account.to_hex().as_str()])
}

fn admin_key(role: &RoleId) -> String {
    NAMESPACE.key([role.to_hex().as_str(), "admin"])
}

/// Whether `account` is a local member of `role`.
pub fn has_role(storage: &Storage, role: &RoleId, account: &Address) -> bool {
    storage.contains(&member_key(role, account))
}

/// The role administering `role`; the super-role unless set otherwise.
pub fn role_admin(storage: &Storage, role: &RoleId) -> Result<RoleId> {
    Ok(storage.get(&admin_key(role))?.unwrap_or(SUPER_ROLE))
}

/// Add `account` to `role`. Returns whether membership changed.
pub fn grant(storage: &mut Storage, role: &RoleId, account: &Address) -> Result<bool> {
    if has_role(storage, role, account) {
        return Ok(false);
    }
    storage.set(member_key(role, account), &true)?;
    Ok(true)
}

/// Remove `account` from `role`. Returns whether membership changed.
pub fn revoke(storage: &mut Storage, role: &RoleId, account: &Address) -> bool {
    storage.remove(&member_key(role, account))
}

/// Set the admin of `role`. Returns the previous admin if it changed.
///
/// Setting the super-role clears the entry, so the role falls back to
/// default administration.
pub fn set_admin(storage: &mut Storage, role: &RoleId, admin: &RoleId) -> Result<Option<RoleId>> {
    let previous = role_admin(storage, role)?;
    if previous == *admin {
        return Ok(None);
    }
    if *admin == SUPER_ROLE {
        storage.remove(&admin_key(role));
    } else {
        storage.set(admin_key(role), admin)?;
    }
    Ok(Some(previous))
}

/// Local members of `role`. No ordering is promised.
pub fn members(storage: &Storage, role: &RoleId) -> Vec<Address> {
    let prefix = members_prefix(role);
    storage
        .keys_with_prefix(&prefix)
        .filter_map(|key| format!("0x{}", &key[prefix.len()..]).parse().ok())
        .collect()
}
