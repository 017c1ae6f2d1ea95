//! Typed calldata builders for the access-control and gate operations.

use prism_core::abi::Calldata;
use prism_core::error::Result;
use prism_core::id::{Address, RoleId};
use prism_core::interfaces::{
    ADD_DELEGATE, DISABLE, DISABLED, ENABLE, ENABLED, GET_DELEGATES, GET_ROLE_ADMIN,
    GET_ROLE_MEMBERS, GRANT_ROLE, HAS_ROLE, IS_DELEGATE, REMOVE_DELEGATE, RENOUNCE_ROLE,
    REVOKE_ROLE, SET_ROLE_ADMIN,
};

pub fn has_role(role: &RoleId, account: &Address) -> Result<Calldata> {
    Calldata::encode(*HAS_ROLE, &(role, account))
}

pub fn get_role_admin(role: &RoleId) -> Result<Calldata> {
    Calldata::encode(*GET_ROLE_ADMIN, &(role,))
}

pub fn get_role_members(role: &RoleId) -> Result<Calldata> {
    Calldata::encode(*GET_ROLE_MEMBERS, &(role,))
}

pub fn grant_role(role: &RoleId, account: &Address) -> Result<Calldata> {
    Calldata::encode(*GRANT_ROLE, &(role, account))
}

pub fn revoke_role(role: &RoleId, account: &Address) -> Result<Calldata> {
    Calldata::encode(*REVOKE_ROLE, &(role, account))
}

pub fn renounce_role(role: &RoleId) -> Result<Calldata> {
    Calldata::encode(*RENOUNCE_ROLE, &(role,))
}

pub fn set_role_admin(role: &RoleId, admin: &RoleId) -> Result<Calldata> {
    Calldata::encode(*SET_ROLE_ADMIN, &(role, admin))
}

pub fn add_delegate(delegate: &Address) -> Result<Calldata> {
    Calldata::encode(*ADD_DELEGATE, &(delegate,))
}

pub fn remove_delegate(delegate: &Address) -> Result<Calldata> {
    Calldata::encode(*REMOVE_DELEGATE, &(delegate,))
}

pub fn is_delegate(delegate: &Address) -> Result<Calldata> {
    Calldata::encode(*IS_DELEGATE, &(delegate,))
}

pub fn get_delegates() -> Calldata {
    Calldata::new(*GET_DELEGATES)
}

pub fn enabled() -> Calldata {
    Calldata::new(*ENABLED)
}

pub fn disabled() -> Calldata {
    Calldata::new(*DISABLED)
}

pub fn enable() -> Calldata {
    Calldata::new(*ENABLE)
}

pub fn disable() -> Calldata {
    Calldata::new(*DISABLE)
}
