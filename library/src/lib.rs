//! Emulauncher adapters
//!
//! Emulator-specific adapters on top of `emulauncher_core`, and the registry
//! the `emulauncher` binary resolves frontend emulator names against.

pub mod emulators;
pub mod registry;
