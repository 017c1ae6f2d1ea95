//! Registry mutator.
//!
//! [`apply_cuts`] applies a batch of Add/Replace/Remove cuts to the
//! registry of the diamond the context runs against, then runs the optional
//! initialization call by delegate call. Preconditions are checked cut by
//! cut in batch order and the first failure aborts the batch; the caller's
//! frame rolls back whatever was applied before it.

use prism_access::{control, gate, DIAMOND_CUT_ROLE};
use prism_core::abi::Calldata;
use prism_core::diamond::{FacetCut, FacetCutAction};
use prism_core::error::{CutError, Error, Result};
use prism_core::event::Event;
use prism_core::host::CallContext;
use prism_core::id::{Address, InterfaceId, Selector};
use prism_core::interfaces::{DIAMOND_CUT, IDIAMOND_CUT};
use prism_core::introspection;
use prism_core::module::Module;
use prism_core::storage::Namespace;
use serde_json::Value;
use tracing::{debug, info};

use crate::registry;

/// The optional post-cut initialization call: code to delegate-call and
/// the calldata to run it with.
pub type InitCall = (Address, Calldata);

/// Calldata for `diamondCut`. `None` for `init` encodes the null target
/// with an empty payload.
pub fn diamond_cut_call(cuts: &[FacetCut], init: Option<&InitCall>) -> Result<Calldata> {
    let (target, payload) = match init {
        Some((target, payload)) => (*target, Some(payload)),
        None => (Address::ZERO, None),
    };
    Calldata::encode(*DIAMOND_CUT, &(cuts, target, payload))
}

/// Apply `cuts` and run `init`, then emit one `DiamondCut` record.
pub fn apply_cuts(
    ctx: &mut CallContext<'_>,
    cuts: &[FacetCut],
    init: Option<&InitCall>,
) -> Result<()> {
    for cut in cuts {
        apply_cut(ctx, cut)?;
    }

    ctx.emit(Event::DiamondCut {
        cuts: cuts.iter().map(recorded_cut).collect(),
        init: init.map(|(target, _)| *target).unwrap_or(Address::ZERO),
        calldata: init.map(|(_, payload)| payload.clone()),
    })?;

    if let Some((target, payload)) = init {
        initialize(ctx, *target, payload)?;
    }

    info!(
        "Applied {} cut(s) to diamond {} (init {})",
        cuts.len(),
        ctx.this(),
        init.map(|(target, _)| target.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    Ok(())
}

/// Remove cuts name no module.
fn recorded_cut(cut: &FacetCut) -> FacetCut {
    match cut.action {
        FacetCutAction::Remove => FacetCut {
            facet_address: Address::ZERO,
            ..cut.clone()
        },
        _ => cut.clone(),
    }
}

fn apply_cut(ctx: &mut CallContext<'_>, cut: &FacetCut) -> Result<()> {
    if cut.function_selectors.is_empty() {
        return Err(CutError::NoSelectors.into());
    }
    match cut.action {
        FacetCutAction::Add => add(ctx, cut.facet_address, &cut.function_selectors)?,
        FacetCutAction::Replace => replace(ctx, cut.facet_address, &cut.function_selectors)?,
        FacetCutAction::Remove => remove(ctx, &cut.function_selectors)?,
    }
    match cut.action {
        FacetCutAction::Add => set_interface(ctx, &cut.interface_id, true),
        FacetCutAction::Remove => set_interface(ctx, &cut.interface_id, false),
        FacetCutAction::Replace => Ok(()),
    }
}

fn add(ctx: &mut CallContext<'_>, facet: Address, selectors: &[Selector]) -> Result<()> {
    if facet.is_zero() {
        return Err(CutError::AddZeroAddress.into());
    }
    require_code(ctx, &facet)?;
    let storage = ctx.storage_mut()?;
    for selector in selectors {
        if registry::facet_address(storage, selector)?.is_some() {
            return Err(CutError::SelectorExists(*selector).into());
        }
        registry::insert(storage, *selector, facet)?;
    }
    debug!("Added {} selector(s) served by {}", selectors.len(), facet);
    Ok(())
}

fn replace(ctx: &mut CallContext<'_>, facet: Address, selectors: &[Selector]) -> Result<()> {
    if facet.is_zero() {
        return Err(CutError::ReplaceZeroAddress.into());
    }
    require_code(ctx, &facet)?;
    let storage = ctx.storage_mut()?;
    for selector in selectors {
        match registry::facet_address(storage, selector)? {
            None => return Err(CutError::SelectorNotFound(*selector).into()),
            Some(current) if current == facet => {
                return Err(CutError::ReplaceSameFacet(*selector).into())
            }
            Some(_) => registry::update(storage, selector, facet)?,
        }
    }
    debug!("Replaced {} selector(s), now served by {}", selectors.len(), facet);
    Ok(())
}

fn remove(ctx: &mut CallContext<'_>, selectors: &[Selector]) -> Result<()> {
    let storage = ctx.storage_mut()?;
    for selector in selectors {
        if registry::facet_address(storage, selector)?.is_none() {
            return Err(CutError::SelectorNotFound(*selector).into());
        }
        registry::delete(storage, selector)?;
    }
    debug!("Removed {} selector(s)", selectors.len());
    Ok(())
}

fn set_interface(ctx: &mut CallContext<'_>, interface_id: &InterfaceId, supported: bool) -> Result<()> {
    introspection::set_supports_interface(ctx.storage_mut()?, interface_id, supported)
}

fn require_code(ctx: &CallContext<'_>, address: &Address) -> Result<()> {
    if ctx.has_code(address) {
        Ok(())
    } else {
        Err(CutError::NoCode(*address).into())
    }
}

fn initialize(ctx: &mut CallContext<'_>, target: Address, payload: &Calldata) -> Result<()> {
    require_code(ctx, &target)?;
    ctx.delegate_call(target, payload)
        .map(|_| ())
        .map_err(|source| {
            Error::from(CutError::InitReverted {
                init: target,
                source: Box::new(source),
            })
        })
}

/// Serves `diamondCut` for the diamond that registered it. Gated by the
/// disable gate and the diamond-cut role.
#[derive(Debug, Clone, Default)]
pub struct DiamondCutModule;

impl DiamondCutModule {
    pub fn new() -> Self {
        Self
    }
}

impl Module for DiamondCutModule {
    fn name(&self) -> &str {
        "diamond-cut"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![*DIAMOND_CUT]
    }

    fn interface_id(&self) -> InterfaceId {
        *IDIAMOND_CUT
    }

    fn storage_layout(&self) -> Vec<Namespace> {
        vec![registry::NAMESPACE.clone(), introspection::NAMESPACE.clone()]
    }

    fn execute(&self, ctx: &mut CallContext<'_>, calldata: &Calldata) -> Result<Value> {
        if calldata.selector != *DIAMOND_CUT {
            return Err(Error::revert(format!(
                "diamond-cut does not implement {}",
                calldata.selector
            )));
        }
        gate::require_enabled(ctx)?;
        control::check_role(ctx, &DIAMOND_CUT_ROLE)?;

        let (cuts, target, payload): (Vec<FacetCut>, Address, Option<Calldata>) =
            calldata.decode()?;
        let init = match (target.is_zero(), payload) {
            (true, None) => None,
            (true, Some(_)) => {
                return Err(Error::revert("init is address(0) but calldata is not empty"))
            }
            (false, Some(payload)) => Some((target, payload)),
            (false, None) => {
                return Err(Error::revert("calldata is empty but init is not address(0)"))
            }
        };

        apply_cuts(ctx, &cuts, init.as_ref())?;
        Ok(Value::Null)
    }
}
