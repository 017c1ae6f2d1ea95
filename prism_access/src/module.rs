//! Installable access-control and gate modules.
//!
//! Both modules decode their arguments from calldata, run the matching
//! operation from [`crate::control`], [`crate::delegation`] or
//! [`crate::gate`] against the calling diamond's storage, and encode the
//! result.

use prism_core::abi::{self, Calldata};
use prism_core::error::{Error, Result};
use prism_core::host::CallContext;
use prism_core::id::{Address, InterfaceId, RoleId, Selector};
use prism_core::interfaces::{
    ADD_DELEGATE, DISABLE, DISABLED, ENABLE, ENABLED, GET_DELEGATES, GET_ROLE_ADMIN,
    GET_ROLE_MEMBERS, GRANT_ROLE, HAS_ROLE, IDISABLEABLE, IS_DELEGATE, REMOVE_DELEGATE,
    RENOUNCE_ROLE, REVOKE_ROLE, SET_ROLE_ADMIN,
};
use prism_core::module::Module;
use prism_core::storage::Namespace;
use serde_json::Value;
use tracing::trace;

use crate::strategy::AccessStrategy;
use crate::{control, delegation, gate, roles};

/// Role management, delegation, or both, depending on the strategy it was
/// built with.
#[derive(Debug, Clone)]
pub struct AccessControlModule {
    strategy: AccessStrategy,
    name: String,
}

impl AccessControlModule {
    pub fn new(strategy: AccessStrategy) -> Self {
        Self {
            strategy,
            name: format!("access-control-{}", strategy),
        }
    }

    pub fn strategy(&self) -> AccessStrategy {
        self.strategy
    }

    fn unsupported(&self, selector: &Selector) -> Error {
        Error::revert(format!("{} does not implement {}", self.name, selector))
    }
}

impl Module for AccessControlModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn selectors(&self) -> Vec<Selector> {
        self.strategy.selectors()
    }

    fn interfaces(&self) -> Vec<(InterfaceId, Vec<Selector>)> {
        self.strategy.interfaces()
    }

    fn storage_layout(&self) -> Vec<Namespace> {
        let mut layout = vec![roles::NAMESPACE.clone()];
        if self.strategy.consults_delegates() {
            layout.push(delegation::NAMESPACE.clone());
        }
        layout
    }

    fn execute(&self, ctx: &mut CallContext<'_>, calldata: &Calldata) -> Result<Value> {
        let selector = calldata.selector;
        if !self.strategy.exposes(&selector) {
            return Err(self.unsupported(&selector));
        }
        trace!("{} executing {} for {}", self.name, selector, ctx.caller());

        match selector {
            s if s == *HAS_ROLE => {
                let (role, account): (RoleId, Address) = calldata.decode()?;
                abi::encode_output(&self.strategy.has_role(ctx, &role, &account)?)
            }
            s if s == *GET_ROLE_ADMIN => {
                let (role,): (RoleId,) = calldata.decode()?;
                abi::encode_output(&roles::role_admin(ctx.storage()?, &role)?)
            }
            s if s == *GET_ROLE_MEMBERS => {
                let (role,): (RoleId,) = calldata.decode()?;
                abi::encode_output(&roles::members(ctx.storage()?, &role))
            }
            s if s == *GRANT_ROLE => {
                let (role, account): (RoleId, Address) = calldata.decode()?;
                abi::encode_output(&control::grant_role(ctx, &role, &account)?)
            }
            s if s == *REVOKE_ROLE => {
                let (role, account): (RoleId, Address) = calldata.decode()?;
                abi::encode_output(&control::revoke_role(ctx, &role, &account)?)
            }
            s if s == *RENOUNCE_ROLE => {
                let (role,): (RoleId,) = calldata.decode()?;
                abi::encode_output(&control::renounce_role(ctx, &role)?)
            }
            s if s == *SET_ROLE_ADMIN => {
                let (role, admin): (RoleId, RoleId) = calldata.decode()?;
                abi::encode_output(&control::set_role_admin(ctx, &role, &admin)?)
            }
            s if s == *ADD_DELEGATE => {
                let (delegate,): (Address,) = calldata.decode()?;
                abi::encode_output(&delegation::add_delegate(ctx, &delegate)?)
            }
            s if s == *REMOVE_DELEGATE => {
                let (delegate,): (Address,) = calldata.decode()?;
                abi::encode_output(&delegation::remove_delegate(ctx, &delegate)?)
            }
            s if s == *IS_DELEGATE => {
                let (delegate,): (Address,) = calldata.decode()?;
                abi::encode_output(&delegation::is_delegate(ctx.storage()?, &delegate)?)
            }
            s if s == *GET_DELEGATES => abi::encode_output(&delegation::delegates(ctx.storage()?)?),
            other => Err(self.unsupported(&other)),
        }
    }
}

/// The enabled/disabled gate.
#[derive(Debug, Clone, Default)]
pub struct DisableableModule;

impl DisableableModule {
    pub fn new() -> Self {
        Self
    }
}

impl Module for DisableableModule {
    fn name(&self) -> &str {
        "disableable"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![*ENABLED, *DISABLED, *ENABLE, *DISABLE]
    }

    fn interface_id(&self) -> InterfaceId {
        *IDISABLEABLE
    }

    fn storage_layout(&self) -> Vec<Namespace> {
        vec![gate::NAMESPACE.clone()]
    }

    fn execute(&self, ctx: &mut CallContext<'_>, calldata: &Calldata) -> Result<Value> {
        match calldata.selector {
            s if s == *ENABLED => abi::encode_output(&gate::is_enabled(ctx.storage()?)),
            s if s == *DISABLED => abi::encode_output(&gate::is_disabled(ctx.storage()?)),
            s if s == *ENABLE => abi::encode_output(&gate::enable(ctx)?),
            s if s == *DISABLE => abi::encode_output(&gate::disable(ctx)?),
            other => Err(Error::revert(format!("disableable does not implement {}", other))),
        }
    }
}
