//! Access-control strategies.
//!
//! A diamond composes exactly one strategy at install time. The strategy
//! decides which operations the access module exposes and whether its
//! `hasRole` consults delegates.

use std::fmt;
use std::str::FromStr;

use prism_core::error::{Error, Result};
use prism_core::host::CallContext;
use prism_core::id::{Address, InterfaceId, RoleId, Selector};
use prism_core::interfaces::{
    ADD_DELEGATE, GET_DELEGATES, GET_ROLE_ADMIN, GET_ROLE_MEMBERS, GRANT_ROLE, HAS_ROLE,
    IACCESS_CONTROL, IACCESS_CONTROL_DELEGATING, IS_DELEGATE, REMOVE_DELEGATE, RENOUNCE_ROLE,
    REVOKE_ROLE, SET_ROLE_ADMIN,
};
use serde::{Deserialize, Serialize};

use crate::{delegation, roles};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStrategy {
    /// Local role store only; exposes grant, revoke, renounce and setAdmin.
    Local,
    /// Local role store OR delegates; exposes delegate management and
    /// queries, but roles are granted by the delegates.
    Delegating,
    /// Both surfaces, with OR semantics across every source.
    Combined,
}

fn role_management() -> Vec<Selector> {
    vec![
        *HAS_ROLE,
        *GET_ROLE_ADMIN,
        *GRANT_ROLE,
        *REVOKE_ROLE,
        *RENOUNCE_ROLE,
        *SET_ROLE_ADMIN,
        *GET_ROLE_MEMBERS,
    ]
}

fn delegate_management() -> Vec<Selector> {
    vec![*ADD_DELEGATE, *REMOVE_DELEGATE, *IS_DELEGATE, *GET_DELEGATES]
}

impl AccessStrategy {
    /// Selectors grouped by capability interface.
    pub fn interfaces(&self) -> Vec<(InterfaceId, Vec<Selector>)> {
        match self {
            AccessStrategy::Local => vec![(*IACCESS_CONTROL, role_management())],
            AccessStrategy::Delegating => {
                let mut selectors = vec![*HAS_ROLE, *GET_ROLE_ADMIN, *GET_ROLE_MEMBERS];
                selectors.extend(delegate_management());
                vec![(*IACCESS_CONTROL_DELEGATING, selectors)]
            }
            AccessStrategy::Combined => vec![
                (*IACCESS_CONTROL, role_management()),
                (*IACCESS_CONTROL_DELEGATING, delegate_management()),
            ],
        }
    }

    pub fn selectors(&self) -> Vec<Selector> {
        self.interfaces()
            .into_iter()
            .flat_map(|(_, selectors)| selectors)
            .collect()
    }

    pub fn consults_delegates(&self) -> bool {
        !matches!(self, AccessStrategy::Local)
    }

    pub fn exposes(&self, selector: &Selector) -> bool {
        self.selectors().contains(selector)
    }

    /// Membership as answered by this strategy's `hasRole`.
    pub fn has_role(
        &self,
        ctx: &mut CallContext<'_>,
        role: &RoleId,
        account: &Address,
    ) -> Result<bool> {
        if roles::has_role(ctx.storage()?, role, account) {
            return Ok(true);
        }
        if self.consults_delegates() {
            return delegation::delegate_has_role(ctx, role, account);
        }
        Ok(false)
    }
}

impl fmt::Display for AccessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessStrategy::Local => write!(f, "local"),
            AccessStrategy::Delegating => write!(f, "delegating"),
            AccessStrategy::Combined => write!(f, "combined"),
        }
    }
}

impl FromStr for AccessStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AccessStrategy::Local),
            "delegating" => Ok(AccessStrategy::Delegating),
            "combined" => Ok(AccessStrategy::Combined),
            _ => Err(Error::Config(format!("Invalid access strategy: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surfaces() {
        let local = AccessStrategy::Local;
        assert!(local.exposes(&GRANT_ROLE));
        assert!(!local.exposes(&ADD_DELEGATE));
        assert!(!local.consults_delegates());

        let delegating = AccessStrategy::Delegating;
        assert!(delegating.exposes(&HAS_ROLE));
        assert!(delegating.exposes(&ADD_DELEGATE));
        assert!(!delegating.exposes(&GRANT_ROLE));

        let combined = AccessStrategy::Combined;
        assert!(combined.exposes(&GRANT_ROLE));
        assert!(combined.exposes(&ADD_DELEGATE));
        assert_eq!(combined.interfaces().len(), 2);
    }

    #[test]
    fn test_no_duplicate_selectors() {
        for strategy in [
            AccessStrategy::Local,
            AccessStrategy::Delegating,
            AccessStrategy::Combined,
        ] {
            let mut selectors = strategy.selectors();
            let total = selectors.len();
            selectors.sort();
            selectors.dedup();
            assert_eq!(selectors.len(), total, "{} repeats a selector", strategy);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Combined".parse::<AccessStrategy>().unwrap(), AccessStrategy::Combined);
        assert!("global".parse::<AccessStrategy>().is_err());
    }
}
