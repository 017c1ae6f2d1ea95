//! Strongly-typed identifiers for the Prism dispatch core.
//!
//! Every identifier is a fixed-width byte string that displays, parses and
//! serializes as `0x`-prefixed lowercase hex.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Error returned when parsing a hex identifier fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdError {
    #[error("identifier must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("invalid hex in identifier: {0}")]
    InvalidHex(String),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Width of this identifier in bytes.
            pub const LEN: usize = $len;

            /// Get the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Whether every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Lowercase hex without the `0x` prefix, used in storage keys.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s
                    .strip_prefix("0x")
                    .ok_or_else(|| ParseIdError::MissingPrefix(s.to_string()))?;
                let bytes =
                    hex::decode(digits).map_err(|_| ParseIdError::InvalidHex(s.to_string()))?;
                let actual = bytes.len();
                let array: [u8; $len] = bytes.try_into().map_err(|_| {
                    ParseIdError::InvalidLength {
                        expected: $len,
                        actual,
                    }
                })?;
                Ok(Self(array))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// Address of an account: a deployed module, a diamond, or a principal.
    Address,
    20
);

fixed_bytes!(
    /// Operation identifier; the key of a diamond's dispatch table.
    Selector,
    4
);

fixed_bytes!(
    /// Capability-interface identifier, the XOR of the selectors it groups.
    InterfaceId,
    4
);

fixed_bytes!(
    /// Identifier of a role in the role store.
    RoleId,
    32
);

fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

impl Address {
    /// The null address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Build an address whose low 8 bytes hold `n`.
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Derive an address from a deployer and a nonce.
    pub fn derive(deployer: &Address, nonce: u64) -> Self {
        let mut preimage = Vec::with_capacity(28);
        preimage.extend_from_slice(&deployer.0);
        preimage.extend_from_slice(&nonce.to_be_bytes());
        let digest = sha256(&preimage);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }
}

impl Selector {
    /// Selector of a human-readable operation signature, e.g.
    /// `"grantRole(bytes32,address)"`.
    pub fn from_signature(signature: &str) -> Self {
        let digest = sha256(signature.as_bytes());
        Self([digest[0], digest[1], digest[2], digest[3]])
    }

    pub fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }
}

impl InterfaceId {
    /// The capability id of zero selectors; never toggles a flag.
    pub const NONE: InterfaceId = InterfaceId([0u8; 4]);

    /// XOR of the given selectors.
    pub fn from_selectors(selectors: &[Selector]) -> Self {
        let mut acc = [0u8; 4];
        for selector in selectors {
            for (a, b) in acc.iter_mut().zip(selector.0.iter()) {
                *a ^= b;
            }
        }
        Self(acc)
    }

    pub fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }
}

impl RoleId {
    /// The super-role. It administers every role without an explicit admin,
    /// itself included.
    pub const SUPER: RoleId = RoleId([0u8; 32]);

    /// Role id derived from a role name.
    pub fn from_name(name: &str) -> Self {
        Self(sha256(name.as_bytes()))
    }
}

/// Identifier of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub Uuid);

impl TxId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
