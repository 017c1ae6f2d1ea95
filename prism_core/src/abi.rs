//! Call payload encoding.
//!
//! A call carries a selector and a JSON array of arguments. Arguments are
//! encoded from and decoded into tuples, so `(RoleId, Address)` travels as
//! `["0x…", "0x…"]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::id::Selector;

/// Payload of a call: the operation identifier and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calldata {
    pub selector: Selector,
    pub args: Value,
}

impl Calldata {
    /// Calldata without arguments.
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            args: Value::Array(Vec::new()),
        }
    }

    /// Calldata with `args` encoded as a JSON array. Pass a tuple; a single
    /// argument is written `(arg,)`.
    pub fn encode<T: Serialize>(selector: Selector, args: &T) -> Result<Self> {
        let args = serde_json::to_value(args)?;
        if !args.is_array() {
            return Err(Error::Codec(format!(
                "arguments for {} must encode to an array",
                selector
            )));
        }
        Ok(Self { selector, args })
    }

    /// Decode the arguments into a tuple.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.args.clone()).map_err(|e| {
            Error::Codec(format!("invalid arguments for {}: {}", self.selector, e))
        })
    }
}

/// Encode a return value.
pub fn encode_output<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Decode a return value.
pub fn decode_output<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Codec(format!("invalid return data: {}", e)))
}
