//! Deployment configuration.
//!
//! A `Prism.toml` describes the runtime limits and one diamond to deploy:
//! its owner, access strategy, whether the disable gate is installed, and
//! the role grants and admin assignments applied by the constructor.
//!
//! ```toml
//! [runtime]
//! event_log_capacity = 1000
//! max_call_depth = 64
//!
//! [diamond]
//! owner = "0x00000000000000000000000000000000000000aa"
//! access = "combined"
//! gate = true
//!
//! [[roles]]
//! role = "DISABLER_ROLE"
//! account = "0x00000000000000000000000000000000000000aa"
//!
//! [[admins]]
//! role = "MINTER"
//! admin = "MINTER_ADMIN"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use prism_access::{AccessStrategy, SUPER_ROLE};
use prism_core::error::{Error, Result};
use prism_core::id::{Address, RoleId};
use serde::{Deserialize, Serialize};

/// File name searched for by [`DeploymentConfig::from_project_root`].
pub const CONFIG_FILE_NAME: &str = "Prism.toml";

pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1000;
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Committed events kept before the oldest are dropped.
    pub event_log_capacity: usize,
    /// Deepest nesting of message calls a transaction may reach.
    pub max_call_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

fn default_access() -> AccessStrategy {
    AccessStrategy::Local
}

fn default_gate() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiamondConfig {
    pub owner: Address,
    #[serde(default = "default_access")]
    pub access: AccessStrategy,
    #[serde(default = "default_gate")]
    pub gate: bool,
}

/// A role, written either as a name (`"MINTER"`), as `"SUPER_ROLE"`, or as
/// a `0x`-prefixed 32-byte id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleRef(pub String);

impl RoleRef {
    pub fn resolve(&self) -> Result<RoleId> {
        let name = self.0.trim();
        if name.is_empty() {
            return Err(Error::Config("role name can't be empty".to_string()));
        }
        if name == "SUPER_ROLE" {
            return Ok(SUPER_ROLE);
        }
        if name.starts_with("0x") {
            return name
                .parse()
                .map_err(|e| Error::Config(format!("Invalid role id {}: {}", name, e)));
        }
        Ok(RoleId::from_name(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: RoleRef,
    pub account: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAdmin {
    pub role: RoleRef,
    pub admin: RoleRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    pub diamond: DiamondConfig,
    #[serde(default)]
    pub roles: Vec<RoleGrant>,
    #[serde(default)]
    pub admins: Vec<RoleAdmin>,
}

impl DeploymentConfig {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Find `Prism.toml` in the current directory or any parent.
    pub fn from_project_root() -> Result<Self> {
        let current_dir = std::env::current_dir()
            .map_err(|e| Error::Config(format!("Failed to get current directory: {}", e)))?;
        Self::find_from(current_dir)
    }

    /// Find `Prism.toml` in `start` or any of its parents.
    pub fn find_from(start: impl Into<PathBuf>) -> Result<Self> {
        let mut current_dir = start.into();
        loop {
            let config_path = current_dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(config_path);
            }
            if !current_dir.pop() {
                break;
            }
        }
        Err(Error::Config(format!("Could not find {}", CONFIG_FILE_NAME)))
    }

    fn validate(&self) -> Result<()> {
        if self.diamond.owner.is_zero() {
            return Err(Error::Config("diamond owner can't be address(0)".to_string()));
        }
        if self.runtime.max_call_depth == 0 {
            return Err(Error::Config("max_call_depth must be positive".to_string()));
        }
        for grant in &self.roles {
            grant.role.resolve()?;
            if grant.account.is_zero() {
                return Err(Error::Config(format!(
                    "role {} can't be granted to address(0)",
                    grant.role.0
                )));
            }
        }
        for admin in &self.admins {
            admin.role.resolve()?;
            admin.admin.resolve()?;
        }
        Ok(())
    }

    /// Role grants with every role resolved.
    pub fn resolved_grants(&self) -> Result<Vec<(RoleId, Address)>> {
        self.roles
            .iter()
            .map(|g| Ok((g.role.resolve()?, g.account)))
            .collect()
    }

    /// Admin assignments with every role resolved.
    pub fn resolved_admins(&self) -> Result<Vec<(RoleId, RoleId)>> {
        self.admins
            .iter()
            .map(|a| Ok((a.role.resolve()?, a.admin.resolve()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_access::DISABLER_ROLE;
    use std::fs;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
[runtime]
event_log_capacity = 50

[diamond]
owner = "0x00000000000000000000000000000000000000aa"
access = "combined"

[[roles]]
role = "DISABLER_ROLE"
account = "0x00000000000000000000000000000000000000bb"

[[admins]]
role = "MINTER"
admin = "SUPER_ROLE"
"#;

    #[test]
    fn test_load_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, CONFIG).unwrap();

        let config = DeploymentConfig::load(config_path).unwrap();
        assert_eq!(config.runtime.event_log_capacity, 50);
        assert_eq!(config.runtime.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(config.diamond.owner, Address::from_low_u64(0xaa));
        assert_eq!(config.diamond.access, AccessStrategy::Combined);
        assert!(config.diamond.gate);

        let grants = config.resolved_grants().unwrap();
        assert_eq!(grants, vec![(*DISABLER_ROLE, Address::from_low_u64(0xbb))]);
        let admins = config.resolved_admins().unwrap();
        assert_eq!(admins, vec![(RoleId::from_name("MINTER"), SUPER_ROLE)]);
    }

    #[test]
    fn test_find_from_nested_directory() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), CONFIG).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = DeploymentConfig::find_from(&nested).unwrap();
        assert_eq!(config.diamond.access, AccessStrategy::Combined);
    }

    #[test]
    fn test_invalid_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[diamond]\ninvalid = true\n").unwrap();

        let result = DeploymentConfig::load(config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_owner_is_rejected() {
        let content = r#"
[diamond]
owner = "0x0000000000000000000000000000000000000000"
"#;
        assert!(matches!(DeploymentConfig::parse(content), Err(Error::Config(_))));
    }

    #[test]
    fn test_role_refs() {
        assert_eq!(RoleRef("SUPER_ROLE".into()).resolve().unwrap(), SUPER_ROLE);
        assert_eq!(
            RoleRef("MINTER".into()).resolve().unwrap(),
            RoleId::from_name("MINTER")
        );
        let hex = format!("0x{}", "11".repeat(32));
        assert_eq!(RoleRef(hex).resolve().unwrap(), RoleId::from([0x11; 32]));
        assert!(RoleRef("0x12".into()).resolve().is_err());
        assert!(RoleRef("".into()).resolve().is_err());
    }
}
