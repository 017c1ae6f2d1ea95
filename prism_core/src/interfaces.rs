//! Selectors and capability ids of the dispatch core's own surfaces.

use lazy_static::lazy_static;

use crate::id::{InterfaceId, Selector};

/// Operation signatures, grouped by the interface they belong to.
pub mod signatures {
    pub const DIAMOND_CUT: &str = "diamondCut((address,uint8,bytes4[],bytes4)[],address,bytes)";

    pub const FACETS: &str = "facets()";
    pub const FACET_FUNCTION_SELECTORS: &str = "facetFunctionSelectors(address)";
    pub const FACET_ADDRESSES: &str = "facetAddresses()";
    pub const FACET_ADDRESS: &str = "facetAddress(bytes4)";

    pub const SUPPORTS_INTERFACE: &str = "supportsInterface(bytes4)";

    pub const HAS_ROLE: &str = "hasRole(bytes32,address)";
    pub const GET_ROLE_ADMIN: &str = "getRoleAdmin(bytes32)";
    pub const GRANT_ROLE: &str = "grantRole(bytes32,address)";
    pub const REVOKE_ROLE: &str = "revokeRole(bytes32,address)";
    pub const RENOUNCE_ROLE: &str = "renounceRole(bytes32)";
    pub const SET_ROLE_ADMIN: &str = "setRoleAdmin(bytes32,bytes32)";
    pub const GET_ROLE_MEMBERS: &str = "getRoleMembers(bytes32)";

    pub const ADD_DELEGATE: &str = "addDelegate(address)";
    pub const REMOVE_DELEGATE: &str = "removeDelegate(address)";
    pub const IS_DELEGATE: &str = "isDelegate(address)";
    pub const GET_DELEGATES: &str = "getDelegates()";

    pub const ENABLED: &str = "enabled()";
    pub const DISABLED: &str = "disabled()";
    pub const ENABLE: &str = "enable()";
    pub const DISABLE: &str = "disable()";
}

lazy_static! {
    pub static ref DIAMOND_CUT: Selector = Selector::from_signature(signatures::DIAMOND_CUT);

    pub static ref FACETS: Selector = Selector::from_signature(signatures::FACETS);
    pub static ref FACET_FUNCTION_SELECTORS: Selector =
        Selector::from_signature(signatures::FACET_FUNCTION_SELECTORS);
    pub static ref FACET_ADDRESSES: Selector = Selector::from_signature(signatures::FACET_ADDRESSES);
    pub static ref FACET_ADDRESS: Selector = Selector::from_signature(signatures::FACET_ADDRESS);

    pub static ref SUPPORTS_INTERFACE: Selector =
        Selector::from_signature(signatures::SUPPORTS_INTERFACE);

    pub static ref HAS_ROLE: Selector = Selector::from_signature(signatures::HAS_ROLE);
    pub static ref GET_ROLE_ADMIN: Selector = Selector::from_signature(signatures::GET_ROLE_ADMIN);
    pub static ref GRANT_ROLE: Selector = Selector::from_signature(signatures::GRANT_ROLE);
    pub static ref REVOKE_ROLE: Selector = Selector::from_signature(signatures::REVOKE_ROLE);
    pub static ref RENOUNCE_ROLE: Selector = Selector::from_signature(signatures::RENOUNCE_ROLE);
    pub static ref SET_ROLE_ADMIN: Selector = Selector::from_signature(signatures::SET_ROLE_ADMIN);
    pub static ref GET_ROLE_MEMBERS: Selector =
        Selector::from_signature(signatures::GET_ROLE_MEMBERS);

    pub static ref ADD_DELEGATE: Selector = Selector::from_signature(signatures::ADD_DELEGATE);
    pub static ref REMOVE_DELEGATE: Selector = Selector::from_signature(signatures::REMOVE_DELEGATE);
    pub static ref IS_DELEGATE: Selector = Selector::from_signature(signatures::IS_DELEGATE);
    pub static ref GET_DELEGATES: Selector = Selector::from_signature(signatures::GET_DELEGATES);

    pub static ref ENABLED: Selector = Selector::from_signature(signatures::ENABLED);
    pub static ref DISABLED: Selector = Selector::from_signature(signatures::DISABLED);
    pub static ref ENABLE: Selector = Selector::from_signature(signatures::ENABLE);
    pub static ref DISABLE: Selector = Selector::from_signature(signatures::DISABLE);

    pub static ref IERC165: InterfaceId = InterfaceId::from_selectors(&[*SUPPORTS_INTERFACE]);
    pub static ref IDIAMOND_CUT: InterfaceId = InterfaceId::from_selectors(&[*DIAMOND_CUT]);
    pub static ref IDIAMOND_LOUPE: InterfaceId = InterfaceId::from_selectors(&[
        *FACETS,
        *FACET_FUNCTION_SELECTORS,
        *FACET_ADDRESSES,
        *FACET_ADDRESS,
    ]);
    pub static ref IACCESS_CONTROL: InterfaceId = InterfaceId::from_selectors(&[
        *HAS_ROLE,
        *GET_ROLE_ADMIN,
        *GRANT_ROLE,
        *REVOKE_ROLE,
        *RENOUNCE_ROLE,
    ]);
    pub static ref IACCESS_CONTROL_DELEGATING: InterfaceId =
        InterfaceId::from_selectors(&[*ADD_DELEGATE, *REMOVE_DELEGATE, *IS_DELEGATE]);
    pub static ref IDISABLEABLE: InterfaceId =
        InterfaceId::from_selectors(&[*ENABLED, *DISABLED, *ENABLE, *DISABLE]);
}
