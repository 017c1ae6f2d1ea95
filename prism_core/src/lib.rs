//! # Prism Core
//!
//! Core types and interfaces for the Prism dispatch core.
//!
//! A diamond is an address-stable entry point whose behavior is composed of
//! independently swappable modules. This crate defines what every other
//! Prism crate builds on:
//!
//! - Fixed-width identifiers for accounts, operations, capabilities and roles
//! - The error taxonomy shared by the registry, access control and modules
//! - The flat storage arena shared by every module installed in a diamond
//! - The `Module` trait and the `CallContext` modules execute in
//! - Audit events and the committed event log
//! - Capability-support flags

pub mod abi;
pub mod diamond;
pub mod error;
pub mod event;
pub mod host;
pub mod id;
pub mod interfaces;
pub mod introspection;
pub mod module;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export key items for convenience
pub use abi::Calldata;
pub use diamond::{FacetCut, FacetCutAction, FacetInfo};
pub use error::{AccessError, CutError, Error, ErrorKind, Result};
pub use event::{Event, EventLog, EventRecord, LogRecord};
pub use host::{CallContext, Frame, Host};
pub use id::{Address, InterfaceId, RoleId, Selector, TxId};
pub use module::Module;
pub use storage::{Namespace, Storage};
