//! Read-only introspection of a diamond's registry and capability flags.

use prism_core::abi::{self, Calldata};
use prism_core::error::{Error, Result};
use prism_core::host::CallContext;
use prism_core::id::{Address, InterfaceId, Selector};
use prism_core::interfaces::{
    FACETS, FACET_ADDRESS, FACET_ADDRESSES, FACET_FUNCTION_SELECTORS, IDIAMOND_LOUPE, IERC165,
    SUPPORTS_INTERFACE,
};
use prism_core::introspection;
use prism_core::module::Module;
use serde_json::Value;

use crate::registry;

#[derive(Debug, Clone, Default)]
pub struct DiamondLoupeModule;

impl DiamondLoupeModule {
    pub fn new() -> Self {
        Self
    }
}

impl Module for DiamondLoupeModule {
    fn name(&self) -> &str {
        "diamond-loupe"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![
            *FACETS,
            *FACET_FUNCTION_SELECTORS,
            *FACET_ADDRESSES,
            *FACET_ADDRESS,
            *SUPPORTS_INTERFACE,
        ]
    }

    fn interfaces(&self) -> Vec<(InterfaceId, Vec<Selector>)> {
        vec![
            (
                *IDIAMOND_LOUPE,
                vec![*FACETS, *FACET_FUNCTION_SELECTORS, *FACET_ADDRESSES, *FACET_ADDRESS],
            ),
            (*IERC165, vec![*SUPPORTS_INTERFACE]),
        ]
    }

    fn execute(&self, ctx: &mut CallContext<'_>, calldata: &Calldata) -> Result<Value> {
        let storage = ctx.storage()?;
        match calldata.selector {
            s if s == *FACETS => abi::encode_output(&registry::facets(storage)?),
            s if s == *FACET_FUNCTION_SELECTORS => {
                let (facet,): (Address,) = calldata.decode()?;
                abi::encode_output(&registry::facet_function_selectors(storage, &facet)?)
            }
            s if s == *FACET_ADDRESSES => abi::encode_output(&registry::facet_addresses(storage)?),
            s if s == *FACET_ADDRESS => {
                let (selector,): (Selector,) = calldata.decode()?;
                let facet = registry::facet_address(storage, &selector)?.unwrap_or(Address::ZERO);
                abi::encode_output(&facet)
            }
            s if s == *SUPPORTS_INTERFACE => {
                let (interface_id,): (InterfaceId,) = calldata.decode()?;
                abi::encode_output(&introspection::supports_interface(storage, &interface_id)?)
            }
            other => Err(Error::revert(format!(
                "diamond-loupe does not implement {}",
                other
            ))),
        }
    }
}

/// Calldata builders for the loupe operations.
pub mod calls {
    use super::*;

    pub fn facets() -> Calldata {
        Calldata::new(*FACETS)
    }

    pub fn facet_function_selectors(facet: &Address) -> Result<Calldata> {
        Calldata::encode(*FACET_FUNCTION_SELECTORS, &(facet,))
    }

    pub fn facet_addresses() -> Calldata {
        Calldata::new(*FACET_ADDRESSES)
    }

    pub fn facet_address(selector: &Selector) -> Result<Calldata> {
        Calldata::encode(*FACET_ADDRESS, &(selector,))
    }

    pub fn supports_interface(interface_id: &InterfaceId) -> Result<Calldata> {
        Calldata::encode(*SUPPORTS_INTERFACE, &(interface_id,))
    }
}
