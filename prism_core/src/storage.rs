//! Flat storage arena.
//!
//! Each account owns one [`Storage`]: an ordered map from dot-separated keys
//! to JSON values. Modules running against a diamond share its storage, so
//! each module declares the [`Namespace`]s it writes and
//! [`find_overlaps`] reports any two owners whose namespaces collide.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A storage key prefix owned by one module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a key under this namespace from path segments.
    pub fn key<I, S>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = self.0.clone();
        for segment in segments {
            key.push('.');
            key.push_str(segment.as_ref());
        }
        key
    }

    /// Whether two namespaces overlap: equal, or one is a prefix of the
    /// other at a segment boundary.
    pub fn overlaps(&self, other: &Namespace) -> bool {
        fn nested(outer: &str, inner: &str) -> bool {
            inner == outer
                || (inner.starts_with(outer) && inner.as_bytes().get(outer.len()) == Some(&b'.'))
        }
        nested(&self.0, &other.0) || nested(&other.0, &self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two owners that declared overlapping namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub first_owner: String,
    pub first: Namespace,
    pub second_owner: String,
    pub second: Namespace,
}

/// Find every overlapping pair among the declared layouts.
pub fn find_overlaps(layouts: &[(String, Vec<Namespace>)]) -> Vec<Overlap> {
    let mut overlaps = Vec::new();
    for (i, (first_owner, first_spaces)) in layouts.iter().enumerate() {
        for (second_owner, second_spaces) in layouts.iter().skip(i + 1) {
            for first in first_spaces {
                for second in second_spaces {
                    if first.overlaps(second) {
                        overlaps.push(Overlap {
                            first_owner: first_owner.clone(),
                            first: first.clone(),
                            second_owner: second_owner.clone(),
                            second: second.clone(),
                        });
                    }
                }
            }
        }
    }
    overlaps
}

/// Persistent key-value storage of one account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    slots: BTreeMap<String, Value>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and decode a slot. Missing slots read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.slots.get(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| Error::Storage(format!("slot {} holds unexpected data: {}", key, e))),
            None => Ok(None),
        }
    }

    /// Read a slot, falling back to `T::default()` when missing.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Encode and write a slot.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .map_err(|e| Error::Storage(format!("cannot encode slot {}: {}", key, e)))?;
        self.slots.insert(key, value);
        Ok(())
    }

    /// Delete a slot, returning whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Keys starting with `prefix`, in key order.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.slots
            .range(prefix.to_string()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
