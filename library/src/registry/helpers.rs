//! Adapter construction.

use emulauncher_core::adapter::Adapter;
use emulauncher_shared::EmulatorId;

use crate::emulators::{RedreamAdapter, Rpcs3Adapter};

/// The adapter implementing an emulator.
pub fn adapter_for(id: EmulatorId) -> Box<dyn Adapter> {
    match id {
        EmulatorId::Redream => Box::new(RedreamAdapter),
        EmulatorId::Rpcs3 => Box::new(Rpcs3Adapter),
    }
}
