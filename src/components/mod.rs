//! Built-in components.
//!
//! Each component lives in its own module and exposes a `definition()`
//! plus a loader. [`register_all`] is the single place the built-in set
//! is assembled; embedders call it before opening the session and may
//! register their own components alongside.

pub mod bot_core;
pub mod dice;
pub mod meme;
pub mod ping;

use crate::error::RegistryError;
use crate::registry::Registry;
use std::sync::Arc;

/// Register every built-in component.
pub fn register_all(registry: &Registry) -> Result<(), RegistryError> {
    registry.register(bot_core::definition(), Arc::new(bot_core::Loader))?;
    registry.register(dice::definition(), Arc::new(dice::Loader))?;
    registry.register(meme::definition(), Arc::new(meme::Loader))?;
    registry.register(ping::definition(), Arc::new(ping::Loader))?;
    Ok(())
}
