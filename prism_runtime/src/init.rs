//! Diamond initializer.
//!
//! A stateless module meant to run once, by delegate call, as the
//! initialization call of a cut. It applies role admin assignments and then
//! role grants to the calling diamond without authorization checks, so it
//! must only be reachable through the gated cut path.

use lazy_static::lazy_static;
use prism_access::{control, roles};
use prism_core::abi::Calldata;
use prism_core::error::{Error, Result};
use prism_core::host::CallContext;
use prism_core::id::{Address, RoleId, Selector};
use prism_core::module::Module;
use prism_core::storage::Namespace;
use serde_json::Value;
use tracing::debug;

lazy_static! {
    pub static ref INITIALIZE_ROLES: Selector =
        Selector::from_signature("initializeRoles((bytes32,bytes32)[],(bytes32,address)[])");
}

/// Calldata that sets `admins` and then grants `grants`.
pub fn initialize_roles_call(
    admins: &[(RoleId, RoleId)],
    grants: &[(RoleId, Address)],
) -> Result<Calldata> {
    Calldata::encode(*INITIALIZE_ROLES, &(admins, grants))
}

#[derive(Debug, Clone, Default)]
pub struct DiamondInit;

impl DiamondInit {
    pub fn new() -> Self {
        Self
    }
}

impl Module for DiamondInit {
    fn name(&self) -> &str {
        "diamond-init"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![*INITIALIZE_ROLES]
    }

    fn storage_layout(&self) -> Vec<Namespace> {
        vec![roles::NAMESPACE.clone()]
    }

    fn execute(&self, ctx: &mut CallContext<'_>, calldata: &Calldata) -> Result<Value> {
        if calldata.selector != *INITIALIZE_ROLES {
            return Err(Error::revert(format!(
                "diamond-init does not implement {}",
                calldata.selector
            )));
        }
        let (admins, grants): (Vec<(RoleId, RoleId)>, Vec<(RoleId, Address)>) =
            calldata.decode()?;

        for (role, admin) in &admins {
            control::set_role_admin_unchecked(ctx, role, admin)?;
        }
        for (role, account) in &grants {
            if account.is_zero() {
                return Err(Error::revert(format!("role {} granted to address(0)", role)));
            }
            control::grant_role_unchecked(ctx, role, account)?;
        }
        debug!(
            "Initialized diamond {}: {} admin(s), {} grant(s)",
            ctx.this(),
            admins.len(),
            grants.len()
        );
        Ok(Value::Null)
    }
}
