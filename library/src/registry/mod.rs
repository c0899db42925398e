//! Emulator registry for the launcher binary.
//!
//! # Architecture
//!
//! 1. `EmulatorId` (from emulauncher_shared) names the emulators we know
//! 2. `AdapterRegistry` (from emulauncher_core) maps frontend names to adapters
//! 3. [`create_adapter_registry()`] registers every adapter in this crate
//!
//! # Adding a New Emulator
//!
//! 1. Add an `EmulatorId` variant in emulauncher_shared
//! 2. Implement `Adapter` under `emulators/`
//! 3. Return it from `adapter_for()`

mod helpers;

use emulauncher_core::adapter::AdapterRegistry;
use emulauncher_shared::EmulatorId;

pub use helpers::adapter_for;

/// Create a registry with an adapter for every supported emulator.
pub fn create_adapter_registry() -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    for id in EmulatorId::ALL {
        registry.register(adapter_for(id));
    }
    registry
}
