//! # Prism Access
//!
//! `prism_access` provides role-based access control for Prism diamonds.
//!
//! Key concepts:
//!
//! 1. **Role Store**: Role membership and a single-hop admin for every role,
//!    kept in the diamond's own storage.
//!
//! 2. **Access Control**: Grant, revoke, renounce and admin changes, each
//!    authorized by the role's admin and emitting an event only on change.
//!
//! 3. **Delegation**: External accounts trusted to answer `hasRole`, combined
//!    with the local store under OR semantics.
//!
//! 4. **Disable Gate**: An advisory kill-switch that mutating operations
//!    consult before applying effects.

pub mod calls;
pub mod control;
pub mod delegation;
pub mod gate;
pub mod module;
pub mod roles;
pub mod strategy;

// Re-export key types for convenience
pub use module::{AccessControlModule, DisableableModule};
pub use roles::{DELEGATE_ADMIN_ROLE, DIAMOND_CUT_ROLE, DISABLER_ROLE, SUPER_ROLE};
pub use strategy::AccessStrategy;
