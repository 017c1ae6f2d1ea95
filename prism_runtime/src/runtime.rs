//! The host runtime.
//!
//! A [`Runtime`] owns every account: its code, if any, and its storage.
//! Module accounts run their module; diamond accounts run the
//! [dispatcher](crate::dispatch). Every message call is its own frame: a
//! frame that fails restores all storage and drops its events before the
//! failure reaches the caller, and a transaction commits only if its
//! outermost frame succeeds.
//!
//! Rollback uses a write journal. The first time a frame writes an account,
//! the account's previous storage is recorded; a failing frame replays its
//! part of the journal backwards.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use prism_access::{control, AccessControlModule, DisableableModule, DIAMOND_CUT_ROLE, SUPER_ROLE};
use prism_core::abi::Calldata;
use prism_core::diamond::{FacetCut, FacetInfo};
use prism_core::error::{Error, Result};
use prism_core::event::{EventLog, EventRecord, LogRecord};
use prism_core::host::{CallContext, Frame, Host};
use prism_core::id::{Address, TxId};
use prism_core::module::Module;
use prism_core::storage::{find_overlaps, Overlap, Storage};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{DeploymentConfig, RuntimeConfig};
use crate::cut::{self, DiamondCutModule, InitCall};
use crate::dispatch;
use crate::init::{self, DiamondInit};
use crate::loupe::DiamondLoupeModule;
use crate::registry;
use crate::stats::ExecutionStats;

#[derive(Debug, Clone)]
enum Code {
    Module(Arc<dyn Module>),
    Diamond,
}

/// A message call submitted from outside the runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub value: u128,
    pub calldata: Calldata,
}

impl Transaction {
    pub fn new(from: Address, to: Address, calldata: Calldata) -> Self {
        Self {
            from,
            to,
            value: 0,
            calldata,
        }
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }
}

/// Outcome of a committed transaction.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub tx_id: TxId,
    pub from: Address,
    pub to: Address,
    pub output: Value,
    pub events: Vec<LogRecord>,
    pub committed_at: DateTime<Utc>,
}

/// Arguments of a diamond's constructor.
#[derive(Debug, Clone)]
pub struct DiamondArgs {
    pub owner: Address,
    /// Cuts applied after the built-in cut and loupe modules.
    pub cuts: Vec<FacetCut>,
    pub init: Option<InitCall>,
}

impl DiamondArgs {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            cuts: Vec::new(),
            init: None,
        }
    }

    pub fn with_cuts(mut self, cuts: Vec<FacetCut>) -> Self {
        self.cuts.extend(cuts);
        self
    }

    pub fn with_init(mut self, init: Address, calldata: Calldata) -> Self {
        self.init = Some((init, calldata));
        self
    }
}

/// Addresses of the modules every runtime deploys at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemModules {
    pub cut: Address,
    pub loupe: Address,
    pub init: Address,
}

/// A diamond deployed from a [`DeploymentConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub diamond: Address,
    pub access: Address,
    pub gate: Option<Address>,
}

/// Owns all accounts and executes transactions against them.
pub struct Runtime {
    code: HashMap<Address, Code>,
    storage: HashMap<Address, Storage>,
    /// Storage of each account before the frame that first wrote it;
    /// `None` for accounts created in that frame.
    journal: Vec<(Address, Option<Storage>)>,
    /// Journal length at the start of each open frame.
    checkpoints: Vec<usize>,
    pending: Vec<LogRecord>,
    depth: usize,
    max_call_depth: usize,
    nonce: u64,
    system: SystemModules,
    event_log: Arc<EventLog>,
    stats: Arc<ExecutionStats>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut runtime = Self {
            code: HashMap::new(),
            storage: HashMap::new(),
            journal: Vec::new(),
            checkpoints: Vec::new(),
            pending: Vec::new(),
            depth: 0,
            max_call_depth: config.max_call_depth,
            nonce: 0,
            system: SystemModules {
                cut: Address::ZERO,
                loupe: Address::ZERO,
                init: Address::ZERO,
            },
            event_log: Arc::new(EventLog::new(config.event_log_capacity)),
            stats: Arc::new(ExecutionStats::new()),
        };
        runtime.system = SystemModules {
            cut: runtime.deploy_module(Arc::new(DiamondCutModule::new())),
            loupe: runtime.deploy_module(Arc::new(DiamondLoupeModule::new())),
            init: runtime.deploy_module(Arc::new(DiamondInit::new())),
        };
        runtime
    }

    fn next_address(&mut self) -> Address {
        self.nonce += 1;
        Address::derive(&Address::ZERO, self.nonce)
    }

    pub fn system_modules(&self) -> SystemModules {
        self.system
    }

    /// Deploy `module` at a fresh address.
    pub fn deploy_module(&mut self, module: Arc<dyn Module>) -> Address {
        let address = self.next_address();
        info!("Deployed module {} at {}", module.name(), address);
        self.code.insert(address, Code::Module(module));
        self.storage.insert(address, Storage::new());
        address
    }

    /// Deploy a diamond. The constructor registers the cut and loupe
    /// modules, grants the owner the super-role and the diamond-cut role,
    /// applies `args.cuts` and runs `args.init`, all in one transaction that
    /// emits a single `DiamondCut` record.
    pub fn deploy_diamond(&mut self, args: DiamondArgs) -> Result<Address> {
        if args.owner.is_zero() {
            return Err(Error::revert("diamond owner can't be address(0)"));
        }
        let diamond = self.next_address();
        self.code.insert(diamond, Code::Diamond);
        self.storage.insert(diamond, Storage::new());

        let mut cuts = FacetCut::add_module(self.system.cut, &DiamondCutModule::new());
        cuts.extend(FacetCut::add_module(self.system.loupe, &DiamondLoupeModule::new()));
        cuts.extend(args.cuts);

        let owner = args.owner;
        let init = args.init;
        let result = self.atomically(|runtime| {
            let mut ctx = CallContext::new(runtime, Frame::call(owner, diamond, 0));
            control::grant_role_unchecked(&mut ctx, &SUPER_ROLE, &owner)?;
            control::grant_role_unchecked(&mut ctx, &DIAMOND_CUT_ROLE, &owner)?;
            cut::apply_cuts(&mut ctx, &cuts, init.as_ref())
        });

        match result {
            Ok(()) => {
                let events = self.commit(TxId::new());
                info!(
                    "Deployed diamond {} owned by {} ({} event(s))",
                    diamond,
                    owner,
                    events.len()
                );
                Ok(diamond)
            }
            Err(e) => {
                self.code.remove(&diamond);
                self.storage.remove(&diamond);
                warn!("Diamond constructor reverted: {}", e);
                Err(e)
            }
        }
    }

    /// Deploy the access module, the gate if configured, and a diamond
    /// composing them, applying the configured admins and grants.
    pub fn deploy_from_config(&mut self, config: &DeploymentConfig) -> Result<Deployment> {
        let access_module: Arc<dyn Module> =
            Arc::new(AccessControlModule::new(config.diamond.access));
        let access = self.deploy_module(access_module.clone());
        let mut cuts = FacetCut::add_module(access, access_module.as_ref());

        let gate = if config.diamond.gate {
            let gate_module: Arc<dyn Module> = Arc::new(DisableableModule::new());
            let gate = self.deploy_module(gate_module.clone());
            cuts.extend(FacetCut::add_module(gate, gate_module.as_ref()));
            Some(gate)
        } else {
            None
        };

        let admins = config.resolved_admins()?;
        let grants = config.resolved_grants()?;
        let mut args = DiamondArgs::new(config.diamond.owner).with_cuts(cuts);
        if !admins.is_empty() || !grants.is_empty() {
            args = args.with_init(
                self.system.init,
                init::initialize_roles_call(&admins, &grants)?,
            );
        }

        let diamond = self.deploy_diamond(args)?;
        Ok(Deployment {
            diamond,
            access,
            gate,
        })
    }

    /// Execute `tx` atomically. On failure nothing it did survives.
    pub fn transact(&mut self, tx: Transaction) -> Result<Receipt> {
        let tx_id = TxId::new();
        let frame = Frame::call(tx.from, tx.to, tx.value);
        match self.atomically(|runtime| runtime.execute(frame, &tx.calldata)) {
            Ok(output) => {
                let events = self.commit(tx_id);
                debug!(
                    "Transaction {} from {} to {} committed with {} event(s)",
                    tx_id,
                    tx.from,
                    tx.to,
                    events.len()
                );
                Ok(Receipt {
                    tx_id,
                    from: tx.from,
                    to: tx.to,
                    output,
                    events,
                    committed_at: Utc::now(),
                })
            }
            Err(e) => {
                warn!(
                    "Transaction {} from {} to {} reverted: {}",
                    tx_id, tx.from, tx.to, e
                );
                Err(e)
            }
        }
    }

    /// Read-only call. Never changes state.
    pub fn view(&mut self, from: Address, to: Address, calldata: &Calldata) -> Result<Value> {
        let result = self.atomically(|runtime| {
            runtime.execute(Frame::static_call(from, to), calldata)
        });
        self.pending.clear();
        result
    }

    fn atomically<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.begin_frame();
        let events_len = self.pending.len();
        let result = f(self);
        self.end_frame(checkpoint, result.is_ok());
        if result.is_err() {
            self.pending.truncate(events_len);
        }
        result
    }

    fn begin_frame(&mut self) -> usize {
        let checkpoint = self.journal.len();
        self.checkpoints.push(checkpoint);
        checkpoint
    }

    fn end_frame(&mut self, checkpoint: usize, succeeded: bool) {
        self.checkpoints.pop();
        if !succeeded {
            self.rollback(checkpoint);
        }
        if self.checkpoints.is_empty() {
            self.journal.clear();
        }
    }

    fn rollback(&mut self, checkpoint: usize) {
        while self.journal.len() > checkpoint {
            let Some((account, previous)) = self.journal.pop() else {
                break;
            };
            match previous {
                Some(storage) => {
                    self.storage.insert(account, storage);
                }
                None => {
                    self.storage.remove(&account);
                }
            }
        }
    }

    fn commit(&mut self, tx_id: TxId) -> Vec<LogRecord> {
        let events = std::mem::take(&mut self.pending);
        for record in &events {
            self.event_log.append(EventRecord::new(tx_id, record.clone()));
        }
        events
    }

    pub fn storage_of(&self, account: &Address) -> Option<&Storage> {
        self.storage.get(account)
    }

    pub fn module_at(&self, address: &Address) -> Option<Arc<dyn Module>> {
        match self.code.get(address) {
            Some(Code::Module(module)) => Some(module.clone()),
            _ => None,
        }
    }

    pub fn is_diamond(&self, address: &Address) -> bool {
        matches!(self.code.get(address), Some(Code::Diamond))
    }

    /// Modules registered in `diamond` and the selectors each serves.
    pub fn facets(&self, diamond: &Address) -> Result<Vec<FacetInfo>> {
        registry::facets(self.diamond_storage(diamond)?)
    }

    /// Storage namespaces declared by more than one module registered in
    /// `diamond`. Empty for a well-composed diamond.
    pub fn layout_conflicts(&self, diamond: &Address) -> Result<Vec<Overlap>> {
        let storage = self.diamond_storage(diamond)?;
        let layouts: Vec<_> = registry::facet_addresses(storage)?
            .into_iter()
            .filter_map(|facet| {
                self.module_at(&facet)
                    .map(|module| (format!("{}@{}", module.name(), facet), module.storage_layout()))
            })
            .collect();
        Ok(find_overlaps(&layouts))
    }

    fn diamond_storage(&self, diamond: &Address) -> Result<&Storage> {
        if !self.is_diamond(diamond) {
            return Err(Error::NoCode(*diamond));
        }
        Host::storage(self, diamond)
    }

    pub fn event_log(&self) -> Arc<EventLog> {
        self.event_log.clone()
    }

    pub fn stats(&self) -> Arc<ExecutionStats> {
        self.stats.clone()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for Runtime {
    fn storage(&self, account: &Address) -> Result<&Storage> {
        self.storage.get(account).ok_or(Error::NoCode(*account))
    }

    fn storage_mut(&mut self, account: &Address) -> Result<&mut Storage> {
        let storage = self.storage.get(account).ok_or(Error::NoCode(*account))?;
        if let Some(&checkpoint) = self.checkpoints.last() {
            let journaled = self
                .journal
                .iter()
                .skip(checkpoint)
                .any(|(written, _)| written == account);
            if !journaled {
                self.journal.push((*account, Some(storage.clone())));
            }
        }
        self.storage.get_mut(account).ok_or(Error::NoCode(*account))
    }

    fn execute(&mut self, frame: Frame, calldata: &Calldata) -> Result<Value> {
        if self.depth >= self.max_call_depth {
            return Err(Error::CallDepthExceeded(self.max_call_depth));
        }
        let code = self
            .code
            .get(&frame.code_address)
            .cloned()
            .ok_or(Error::NoCode(frame.code_address))?;

        let checkpoint = self.begin_frame();
        let events_len = self.pending.len();
        if !self.storage.contains_key(&frame.address) {
            self.journal.push((frame.address, None));
            self.storage.insert(frame.address, Storage::new());
        }

        self.depth += 1;
        let started = Instant::now();
        let result = {
            let mut ctx = CallContext::new(self, frame);
            match &code {
                Code::Module(module) => module.execute(&mut ctx, calldata),
                Code::Diamond => dispatch::dispatch(&mut ctx, calldata),
            }
        };
        self.depth -= 1;
        self.stats
            .record(frame.code_address, started.elapsed(), result.is_ok());

        self.end_frame(checkpoint, result.is_ok());
        if result.is_err() {
            self.pending.truncate(events_len);
        }
        result
    }

    fn emit(&mut self, record: LogRecord) {
        self.pending.push(record);
    }

    fn has_code(&self, address: &Address) -> bool {
        self.code.contains_key(address)
    }
}
