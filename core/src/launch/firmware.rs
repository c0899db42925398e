use std::path::PathBuf;

use crate::error::LaunchError;
use crate::rom::{ResolvedKind, ResolvedRom};

/// Firmware an emulator needs before it can boot games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareRequirement {
    /// Human name used in the error message.
    pub name: String,
    pub emulator: String,
    /// File whose presence means the firmware is installed.
    pub marker: PathBuf,
    /// Installable package in the bios directory.
    pub package: PathBuf,
    pub bios_dir: PathBuf,
}

/// Result of a firmware check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareStatus {
    Installed,
    /// Not installed, but the package can be installed from this path.
    Installable(PathBuf),
}

impl FirmwareRequirement {
    pub fn check(&self) -> Result<FirmwareStatus, LaunchError> {
        if self.marker.is_file() {
            return Ok(FirmwareStatus::Installed);
        }
        if self.package.is_file() {
            return Ok(FirmwareStatus::Installable(self.package.clone()));
        }
        Err(LaunchError::FirmwareMissing {
            firmware: self.name.clone(),
            emulator: self.emulator.clone(),
            bios: self.bios_dir.clone(),
        })
    }

    /// The ROM to launch instead of the game, if the firmware must be installed first.
    pub fn install_request(&self) -> Result<Option<ResolvedRom>, LaunchError> {
        Ok(match self.check()? {
            FirmwareStatus::Installed => None,
            FirmwareStatus::Installable(package) => {
                tracing::info!(
                    "{} not installed, launching {} to install {}",
                    self.name,
                    self.emulator,
                    package.display()
                );
                Some(ResolvedRom::new(package, ResolvedKind::FirmwareInstallRequest))
            }
        })
    }
}
