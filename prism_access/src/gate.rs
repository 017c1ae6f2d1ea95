//! Disable gate.
//!
//! One enabled/disabled flag, toggled by holders of the disabler role. The
//! gate is advisory: the dispatcher keeps routing calls while disabled, and
//! each consuming module calls [`require_enabled`] before applying effects.

use lazy_static::lazy_static;
use prism_core::error::{Error, Result};
use prism_core::event::Event;
use prism_core::host::CallContext;
use prism_core::interfaces::IDISABLEABLE;
use prism_core::introspection;
use prism_core::storage::{Namespace, Storage};
use tracing::info;

use crate::control;
use crate::roles::DISABLER_ROLE;

lazy_static! {
    pub static ref NAMESPACE: Namespace = Namespace::new("prism.gate");
    static ref DISABLED_KEY: String = NAMESPACE.key(["disabled"]);
}

/// Whether the flag reads enabled. A diamond starts enabled.
pub fn is_enabled(storage: &Storage) -> bool {
    !is_disabled(storage)
}

pub fn is_disabled(storage: &Storage) -> bool {
    storage.contains(&DISABLED_KEY)
}

/// Reject with [`Error::Disabled`] if the gate is installed and disabled.
/// Without the gate's capability flag the stored value is not trusted.
pub fn require_enabled(ctx: &CallContext<'_>) -> Result<()> {
    let storage = ctx.storage()?;
    if introspection::supports_interface(storage, &IDISABLEABLE)? && is_disabled(storage) {
        return Err(Error::Disabled);
    }
    Ok(())
}

/// Enable the diamond. Requires the disabler role. Returns whether the
/// state changed.
pub fn enable(ctx: &mut CallContext<'_>) -> Result<bool> {
    control::check_role(ctx, &DISABLER_ROLE)?;
    if is_enabled(ctx.storage()?) {
        return Ok(false);
    }
    ctx.storage_mut()?.remove(&DISABLED_KEY);
    let account = ctx.caller();
    info!("Diamond {} enabled by {}", ctx.this(), account);
    ctx.emit(Event::Enabled { account })?;
    Ok(true)
}

/// Disable the diamond. Requires the disabler role. Returns whether the
/// state changed.
pub fn disable(ctx: &mut CallContext<'_>) -> Result<bool> {
    control::check_role(ctx, &DISABLER_ROLE)?;
    if is_disabled(ctx.storage()?) {
        return Ok(false);
    }
    ctx.storage_mut()?.set(DISABLED_KEY.as_str(), &true)?;
    let account = ctx.caller();
    info!("Diamond {} disabled by {}", ctx.this(), account);
    ctx.emit(Event::Disabled { account })?;
    Ok(true)
}
