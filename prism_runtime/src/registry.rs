//! Capability registry.
//!
//! The selector table of a diamond, kept in the diamond's own storage under
//! `prism.diamond.registry`:
//!
//! - `selectors` holds every registered selector, in registration order
//! - `facet.<selector>` holds the serving module and the selector's
//!   position in `selectors`
//!
//! Removal swaps the last selector into the freed position, so a removed
//! selector leaves no record behind and the list stays dense.

use lazy_static::lazy_static;
use prism_core::diamond::FacetInfo;
use prism_core::error::{Error, Result};
use prism_core::id::{Address, Selector};
use prism_core::storage::{Namespace, Storage};
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref NAMESPACE: Namespace = Namespace::new("prism.diamond.registry");
    static ref SELECTORS_KEY: String = NAMESPACE.key(["selectors"]);
}

/// Registry entry of one selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRecord {
    pub facet_address: Address,
    pub position: usize,
}

fn record_key(selector: &Selector) -> String {
    NAMESPACE.key(["facet", selector.to_hex().as_str()])
}

pub fn record(storage: &Storage, selector: &Selector) -> Result<Option<FacetRecord>> {
    storage.get(&record_key(selector))
}

/// The module serving `selector`, if any.
pub fn facet_address(storage: &Storage, selector: &Selector) -> Result<Option<Address>> {
    Ok(record(storage, selector)?.map(|r| r.facet_address))
}

/// Every registered selector, in registration order with removals
/// back-filled from the end.
pub fn selectors(storage: &Storage) -> Result<Vec<Selector>> {
    storage.get_or_default(&SELECTORS_KEY)
}

/// Register an unregistered selector.
pub fn insert(storage: &mut Storage, selector: Selector, facet_address: Address) -> Result<()> {
    let mut list = selectors(storage)?;
    let record = FacetRecord {
        facet_address,
        position: list.len(),
    };
    list.push(selector);
    storage.set(record_key(&selector), &record)?;
    storage.set(SELECTORS_KEY.as_str(), &list)
}

/// Point a registered selector at another module.
pub fn update(storage: &mut Storage, selector: &Selector, facet_address: Address) -> Result<()> {
    let mut record = record(storage, selector)?
        .ok_or_else(|| Error::Storage(format!("selector {} is not registered", selector)))?;
    record.facet_address = facet_address;
    storage.set(record_key(selector), &record)
}

/// Delete a registered selector's record entirely.
pub fn delete(storage: &mut Storage, selector: &Selector) -> Result<()> {
    let removed = record(storage, selector)?
        .ok_or_else(|| Error::Storage(format!("selector {} is not registered", selector)))?;
    let mut list = selectors(storage)?;
    let last = list
        .pop()
        .ok_or_else(|| Error::Storage("selector list is empty".to_string()))?;

    if last != *selector {
        let mut moved = record(storage, &last)?
            .ok_or_else(|| Error::Storage(format!("selector {} has no record", last)))?;
        moved.position = removed.position;
        let slot = list.get_mut(removed.position).ok_or_else(|| {
            Error::Storage(format!(
                "selector {} records position {} outside the list",
                selector, removed.position
            ))
        })?;
        *slot = last;
        storage.set(record_key(&last), &moved)?;
    }
    storage.remove(&record_key(selector));

    if list.is_empty() {
        storage.remove(&SELECTORS_KEY);
        Ok(())
    } else {
        storage.set(SELECTORS_KEY.as_str(), &list)
    }
}

/// Modules with the selectors each serves, in first-registration order.
pub fn facets(storage: &Storage) -> Result<Vec<FacetInfo>> {
    let mut facets: Vec<FacetInfo> = Vec::new();
    for selector in selectors(storage)? {
        let Some(facet_address) = facet_address(storage, &selector)? else {
            continue;
        };
        match facets.iter_mut().find(|f| f.facet_address == facet_address) {
            Some(info) => info.function_selectors.push(selector),
            None => facets.push(FacetInfo {
                facet_address,
                function_selectors: vec![selector],
            }),
        }
    }
    Ok(facets)
}

/// Selectors served by `facet`.
pub fn facet_function_selectors(storage: &Storage, facet: &Address) -> Result<Vec<Selector>> {
    let mut found = Vec::new();
    for selector in selectors(storage)? {
        if facet_address(storage, &selector)?.as_ref() == Some(facet) {
            found.push(selector);
        }
    }
    Ok(found)
}

/// Every module serving at least one selector.
pub fn facet_addresses(storage: &Storage) -> Result<Vec<Address>> {
    Ok(facets(storage)?
        .into_iter()
        .map(|f| f.facet_address)
        .collect())
}
