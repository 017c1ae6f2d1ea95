#![allow(dead_code)]

use std::sync::Arc;

use prism_core::abi::Calldata;
use prism_core::error::{Error, Result};
use prism_core::host::CallContext;
use prism_core::storage::Namespace;
use prism_core::{Address, Module, Selector};
use prism_runtime::config::{DeploymentConfig, DiamondConfig, RoleGrant, RoleRef, RuntimeConfig};
use prism_runtime::{Deployment, Runtime, Transaction};
use prism_access::AccessStrategy;
use serde_json::{json, Value};

pub const SENTINEL_KEY: &str = "demo.sentinel";

pub fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

pub fn owner() -> Address {
    addr(0xaa)
}

pub fn target() -> Selector {
    Selector::from_u32(0x11223344)
}

/// Answers the target selector with a fixed tag.
#[derive(Debug)]
pub struct Tagged(pub &'static str);

impl Module for Tagged {
    fn name(&self) -> &str {
        self.0
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![target()]
    }

    fn execute(&self, _ctx: &mut CallContext<'_>, _calldata: &Calldata) -> Result<Value> {
        Ok(json!(self.0))
    }
}

/// Answers the target selector with the sentinel stored in the diamond.
#[derive(Debug)]
pub struct SentinelReader;

impl Module for SentinelReader {
    fn name(&self) -> &str {
        "sentinel-reader"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![target()]
    }

    fn execute(&self, ctx: &mut CallContext<'_>, _calldata: &Calldata) -> Result<Value> {
        Ok(json!(ctx.storage()?.get::<u64>(SENTINEL_KEY)?))
    }
}

pub fn write_sentinel_selector() -> Selector {
    Selector::from_signature("writeSentinel(uint256,bool)")
}

/// Initializer that writes a sentinel, then fails if asked to.
#[derive(Debug)]
pub struct SentinelInit;

impl Module for SentinelInit {
    fn name(&self) -> &str {
        "sentinel-init"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![write_sentinel_selector()]
    }

    fn storage_layout(&self) -> Vec<Namespace> {
        vec![Namespace::new("demo")]
    }

    fn execute(&self, ctx: &mut CallContext<'_>, calldata: &Calldata) -> Result<Value> {
        let (value, fail): (u64, bool) = calldata.decode()?;
        ctx.storage_mut()?.set(SENTINEL_KEY, &value)?;
        if fail {
            return Err(Error::revert("sentinel init refused"));
        }
        Ok(Value::Null)
    }
}

pub fn sentinel_call(value: u64, fail: bool) -> Calldata {
    Calldata::encode(write_sentinel_selector(), &(value, fail)).unwrap()
}

pub fn config(access: AccessStrategy, gate: bool, roles: Vec<(&str, Address)>) -> DeploymentConfig {
    DeploymentConfig {
        runtime: RuntimeConfig::default(),
        diamond: DiamondConfig {
            owner: owner(),
            access,
            gate,
        },
        roles: roles
            .into_iter()
            .map(|(role, account)| RoleGrant {
                role: RoleRef(role.to_string()),
                account,
            })
            .collect(),
        admins: Vec::new(),
    }
}

pub fn deploy(runtime: &mut Runtime, access: AccessStrategy, gate: bool) -> Deployment {
    let config = config(
        access,
        gate,
        vec![("DISABLER_ROLE", owner()), ("DELEGATE_ADMIN_ROLE", owner())],
    );
    runtime.deploy_from_config(&config).unwrap()
}

pub fn deploy_module(runtime: &mut Runtime, module: impl Module + 'static) -> Address {
    runtime.deploy_module(Arc::new(module))
}

pub fn tx(from: Address, to: Address, calldata: Calldata) -> Transaction {
    Transaction::new(from, to, calldata)
}
