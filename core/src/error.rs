//! Launch error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentError;

/// Fatal launch errors.
///
/// Anything recoverable (process kills, save-directory creation, partial
/// extraction) is reported through [`crate::BestEffort`] instead.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The emulator executable could not be found.
    #[error("{emulator} is not installed")]
    NotInstalled { emulator: String },

    /// A directory ROM holds no boot file anywhere beneath it.
    #[error("Unable to find any game in the provided folder")]
    NoGameInFolder { folder: PathBuf },

    /// An extracted archive holds no file with an allow-listed extension.
    #[error("No playable file found in {}", .folder.display())]
    NoPlayableFile { folder: PathBuf },

    /// Firmware is neither installed nor available as a package.
    #[error(
        "{firmware} is not installed in {emulator}, either place it in {}, or launch the emulator and install the firmware.",
        .bios.display()
    )]
    FirmwareMissing {
        firmware: String,
        emulator: String,
        bios: PathBuf,
    },

    /// A firmware install was requested from an emulator that has no install flag.
    #[error("{emulator} cannot install firmware from the command line")]
    FirmwareInstallUnsupported { emulator: String },

    /// No adapter is registered for the requested emulator.
    #[error("Unknown emulator '{name}'. Supported emulators: {supported}")]
    UnknownEmulator { name: String, supported: String },

    /// Reading the ROM or a playlist failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Loading or saving a config document failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl LaunchError {
    /// True for ROM resolution failures (no synthesis happens after these).
    pub fn is_rom_resolution_failure(&self) -> bool {
        matches!(
            self,
            LaunchError::NoGameInFolder { .. } | LaunchError::NoPlayableFile { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_game_in_folder_message() {
        let err = LaunchError::NoGameInFolder {
            folder: PathBuf::from("/roms/ps3/game"),
        };
        assert_eq!(err.to_string(), "Unable to find any game in the provided folder");
        assert!(err.is_rom_resolution_failure());
    }

    #[test]
    fn test_firmware_missing_message() {
        let err = LaunchError::FirmwareMissing {
            firmware: "PS3 firmware".to_string(),
            emulator: "rpcs3".to_string(),
            bios: PathBuf::from("bios"),
        };
        assert_eq!(
            err.to_string(),
            "PS3 firmware is not installed in rpcs3, either place it in bios, or launch the emulator and install the firmware."
        );
        assert!(!err.is_rom_resolution_failure());
    }
}
