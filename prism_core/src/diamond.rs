//! Registry mutation and introspection records shared by the runtime and
//! the audit log.

use serde::{Deserialize, Serialize};

use crate::id::{Address, InterfaceId, Selector};
use crate::module::Module;

/// What a cut does to its selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetCutAction {
    Add,
    Replace,
    Remove,
}

/// One Add/Replace/Remove instruction against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCut {
    pub facet_address: Address,
    pub action: FacetCutAction,
    pub function_selectors: Vec<Selector>,
    /// Capability declared alongside the cut; `InterfaceId::NONE` declares
    /// nothing. Replace cuts never touch capability flags.
    pub interface_id: InterfaceId,
}

impl FacetCut {
    pub fn new(
        facet_address: Address,
        action: FacetCutAction,
        function_selectors: Vec<Selector>,
        interface_id: InterfaceId,
    ) -> Self {
        Self {
            facet_address,
            action,
            function_selectors,
            interface_id,
        }
    }

    /// Add every selector of `module`, deployed at `facet_address`: one cut
    /// per capability interface the module declares.
    pub fn add_module(facet_address: Address, module: &dyn Module) -> Vec<Self> {
        module
            .interfaces()
            .into_iter()
            .map(|(interface_id, selectors)| {
                Self::new(facet_address, FacetCutAction::Add, selectors, interface_id)
            })
            .collect()
    }

    /// Remove every selector of `module`, clearing its capability flags.
    pub fn remove_module(module: &dyn Module) -> Vec<Self> {
        module
            .interfaces()
            .into_iter()
            .map(|(interface_id, selectors)| Self::remove(selectors, interface_id))
            .collect()
    }

    /// Point every selector of `module` at `facet_address`.
    pub fn replace(facet_address: Address, module: &dyn Module) -> Self {
        Self::new(
            facet_address,
            FacetCutAction::Replace,
            module.selectors(),
            InterfaceId::NONE,
        )
    }

    /// Remove `selectors`, clearing `interface_id` if one is given.
    pub fn remove(function_selectors: Vec<Selector>, interface_id: InterfaceId) -> Self {
        Self::new(
            Address::ZERO,
            FacetCutAction::Remove,
            function_selectors,
            interface_id,
        )
    }
}

/// A module address together with the selectors it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetInfo {
    pub facet_address: Address,
    pub function_selectors: Vec<Selector>,
}
