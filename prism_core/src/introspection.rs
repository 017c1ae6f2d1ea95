//! Capability-support flags.
//!
//! The registry mutator writes these when a cut declares a capability; any
//! module reads them before trusting that a collaborator is installed.

use lazy_static::lazy_static;

use crate::error::Result;
use crate::id::InterfaceId;
use crate::storage::{Namespace, Storage};

lazy_static! {
    pub static ref NAMESPACE: Namespace = Namespace::new("prism.introspection");
}

fn key(interface_id: &InterfaceId) -> String {
    NAMESPACE.key([interface_id.to_hex()])
}

/// Whether `interface_id` is flagged as supported.
pub fn supports_interface(storage: &Storage, interface_id: &InterfaceId) -> Result<bool> {
    if interface_id.is_zero() {
        return Ok(false);
    }
    storage.get_or_default(&key(interface_id))
}

/// Set or clear the flag of `interface_id`. The zero id is never recorded.
pub fn set_supports_interface(
    storage: &mut Storage,
    interface_id: &InterfaceId,
    supported: bool,
) -> Result<()> {
    if interface_id.is_zero() {
        return Ok(());
    }
    if supported {
        storage.set(key(interface_id), &true)
    } else {
        storage.remove(&key(interface_id));
        Ok(())
    }
}

/// Every interface currently flagged as supported.
pub fn supported_interfaces(storage: &Storage) -> Vec<InterfaceId> {
    let prefix = format!("{}.", NAMESPACE.as_str());
    storage
        .keys_with_prefix(&prefix)
        .filter_map(|key| format!("0x{}", &key[prefix.len()..]).parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut storage = Storage::new();
        let id = InterfaceId::from_u32(0x01ffc9a7);

        assert!(!supports_interface(&storage, &id).unwrap());
        set_supports_interface(&mut storage, &id, true).unwrap();
        assert!(supports_interface(&storage, &id).unwrap());
        assert_eq!(supported_interfaces(&storage), vec![id]);

        set_supports_interface(&mut storage, &id, false).unwrap();
        assert!(!supports_interface(&storage, &id).unwrap());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_zero_interface_never_toggles() {
        let mut storage = Storage::new();
        set_supports_interface(&mut storage, &InterfaceId::NONE, true).unwrap();
        assert!(storage.is_empty());
        assert!(!supports_interface(&storage, &InterfaceId::NONE).unwrap());
    }
}
