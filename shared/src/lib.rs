//! Shared types for the emulator launcher.
//!
//! Identifiers and file-format constants used by both the configuration
//! engine (`emulauncher-core`) and the launcher binary.

pub mod emulator;
pub mod fs;
pub mod rom_format;

pub use emulator::{EmulatorId, UnknownEmulator};
pub use rom_format::{
    COMPRESSED_EXTENSIONS, DREAMCAST_DISC_PRIORITY, PLAYLIST_EXTENSION, PS3_BOOT_FILE,
    extension_of, is_compressed, is_playlist,
};
