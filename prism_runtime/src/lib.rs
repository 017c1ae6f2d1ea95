//! # Prism Runtime
//!
//! `prism_runtime` hosts Prism diamonds: it owns accounts, executes
//! transactions atomically, and provides the registry, cut engine and
//! dispatcher that make a diamond an address-stable entry point over
//! swappable modules.
//!
//! Key concepts:
//!
//! 1. **Capability Registry**: Selector to module records and the loupe
//!    queries over them, stored in the diamond's own storage.
//!
//! 2. **Registry Mutator**: Batches of Add/Replace/Remove cuts applied with
//!    an optional initialization call, all or nothing.
//!
//! 3. **Dispatcher**: Routes each call to the registered module, running it
//!    with the diamond's storage, caller and value.
//!
//! 4. **Sequencer**: Executes submitted transactions one at a time in
//!    arrival order.

pub mod config;
pub mod cut;
pub mod dispatch;
pub mod init;
pub mod loupe;
pub mod registry;
pub mod runtime;
pub mod sequencer;
pub mod stats;

// Re-export key types for convenience
pub use config::{DeploymentConfig, RuntimeConfig};
pub use cut::{DiamondCutModule, InitCall};
pub use init::DiamondInit;
pub use loupe::DiamondLoupeModule;
pub use runtime::{DiamondArgs, Deployment, Receipt, Runtime, SystemModules, Transaction};
pub use sequencer::{Sequencer, SequencerHandle};
pub use stats::{ExecutionStats, ModuleStats};
