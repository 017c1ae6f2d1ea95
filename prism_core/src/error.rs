//! Error types for the Prism dispatch core.
//!
//! Every failure aborts the call that raised it and discards that call's
//! effects. [`Error::kind`] sorts errors into the categories callers need to
//! tell apart: a routing failure is never a module failure, and a missing
//! role is never a registry precondition failure.

use thiserror::Error;

use crate::id::{Address, RoleId, Selector};

/// Root error type for the dispatch core.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Function does not exist: no module registered for selector {0}")]
    FunctionNotFound(Selector),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("Diamond cut error: {0}")]
    Cut(#[from] CutError),

    #[error("Contract is disabled")]
    Disabled,

    #[error("Module reverted: {0}")]
    Revert(String),

    #[error("No code at address {0}")]
    NoCode(Address),

    #[error("State modification attempted in a static call")]
    StaticCallViolation,

    #[error("Call depth limit of {0} exceeded")]
    CallDepthExceeded(usize),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sequencer error: {0}")]
    Sequencer(String),
}

/// Errors raised by the access-control subsystem.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("account {account} is missing role {role}")]
    MissingRole { account: Address, role: RoleId },
}

/// Registry precondition failures raised by the cut engine.
#[derive(Debug, Error)]
pub enum CutError {
    #[error("No selectors in facet to cut")]
    NoSelectors,

    #[error("Add facet can't be address(0)")]
    AddZeroAddress,

    #[error("Can't add function that already exists: {0}")]
    SelectorExists(Selector),

    #[error("Replace facet can't be address(0)")]
    ReplaceZeroAddress,

    #[error("Can't replace function with same function: {0}")]
    ReplaceSameFacet(Selector),

    #[error("Function does not exist: {0}")]
    SelectorNotFound(Selector),

    #[error("Facet has no code: {0}")]
    NoCode(Address),

    #[error("Initialization function reverted at {init}: {source}")]
    InitReverted {
        init: Address,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The operation identifier has no registered module.
    Routing,
    /// The caller lacks a required role.
    Authorization,
    /// A registry mutation violated an Add/Replace/Remove precondition.
    RegistryPrecondition,
    /// The disable gate rejected the operation.
    Gate,
    /// The dispatched module's own logic failed.
    Module,
    /// Runtime, storage or codec failure.
    Internal,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FunctionNotFound(_) => ErrorKind::Routing,
            Error::Access(_) => ErrorKind::Authorization,
            Error::Cut(_) => ErrorKind::RegistryPrecondition,
            Error::Disabled => ErrorKind::Gate,
            Error::Revert(_) => ErrorKind::Module,
            Error::NoCode(_)
            | Error::StaticCallViolation
            | Error::CallDepthExceeded(_)
            | Error::Storage(_)
            | Error::Codec(_)
            | Error::Config(_)
            | Error::Sequencer(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for a module-level failure.
    pub fn revert(reason: impl Into<String>) -> Self {
        Error::Revert(reason.into())
    }

    /// Shorthand for a missing-role failure.
    pub fn missing_role(account: Address, role: RoleId) -> Self {
        Error::Access(AccessError::MissingRole { account, role })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

/// Result type used throughout the dispatch core.
pub type Result<T> = std::result::Result<T, Error>;
