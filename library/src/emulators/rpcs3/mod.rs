//! RPCS3 (Sony PlayStation 3).
//!
//! Three documents are synthesized per launch: the GUI settings (INI), the
//! emulation settings and the virtual file system map (both YML). Games are
//! directories holding an `EBOOT.BIN`, archives of such a directory, or `.m3u`
//! playlists pointing at one.

mod config;
mod gui;
mod language;
mod vfs;

use std::path::{Path, PathBuf};

use anyhow::Result;
use emulauncher_core::adapter::{Adapter, Installation, LaunchContext, Services};
use emulauncher_core::launch::{ArgumentStyle, FirmwareRequirement};
use emulauncher_core::rom::{ResolvedRom, RomPlan};
use emulauncher_core::LaunchError;
use emulauncher_shared::{EmulatorId, PS3_BOOT_FILE};

pub use config::{config_path, config_rules};
pub use gui::{gui_rules, gui_settings_path};
pub use language::{FRONTEND_LANGUAGE, default_ps3_language};
pub use vfs::vfs_path;

/// Firmware package expected in the bios directory.
pub const FIRMWARE_PACKAGE: &str = "PS3UPDAT.PUP";

const STYLE: ArgumentStyle = ArgumentStyle {
    fullscreen_flags: &["--no-gui", "--fullscreen"],
    windowed_flags: &[],
    firmware_install_flag: Some("--installfw"),
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Rpcs3Adapter;

/// File installed with the firmware.
pub fn firmware_marker(install_dir: &Path) -> PathBuf {
    install_dir
        .join("dev_flash")
        .join("vsh")
        .join("etc")
        .join("version.txt")
}

/// `<saves>/ps3/rpcs3`, or the install directory when that does not exist.
pub fn saves_path(ctx: &LaunchContext<'_>, install: &Installation) -> PathBuf {
    let saves = ctx.settings.paths.saves.join("ps3").join("rpcs3");
    if saves.is_dir() {
        saves
    } else {
        install.directory.clone()
    }
}

fn process_name(install: &Installation) -> String {
    install
        .executable
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| EmulatorId::Rpcs3.executable_name())
}

impl Adapter for Rpcs3Adapter {
    fn id(&self) -> EmulatorId {
        EmulatorId::Rpcs3
    }

    fn rom_plan(&self, ctx: &LaunchContext<'_>, install: &Installation) -> RomPlan {
        RomPlan {
            disc_priority: &[],
            boot_file: Some(PS3_BOOT_FILE),
            playlist_root: Some(saves_path(ctx, install)),
        }
    }

    fn firmware_install(
        &self,
        ctx: &LaunchContext<'_>,
        install: &Installation,
    ) -> Result<Option<ResolvedRom>, LaunchError> {
        let bios = ctx.settings.paths.bios.clone();
        FirmwareRequirement {
            name: "PS3 firmware".to_string(),
            emulator: self.id().to_string(),
            marker: firmware_marker(&install.directory),
            package: bios.join(FIRMWARE_PACKAGE),
            bios_dir: bios,
        }
        .install_request()
    }

    fn synthesize_config(
        &self,
        ctx: &LaunchContext<'_>,
        install: &Installation,
        _rom: &ResolvedRom,
    ) -> Result<()> {
        let bindings = ctx.binding_context();
        let language = default_ps3_language(ctx.options.get(FRONTEND_LANGUAGE));

        gui::write_gui_settings(&install.directory, bindings)?;
        config::write_config(&install.directory, ctx.fullscreen(), language, bindings)?;
        vfs::write_vfs(&install.directory, &saves_path(ctx, install), bindings)?;
        Ok(())
    }

    fn argument_style(&self) -> ArgumentStyle {
        STYLE
    }

    fn before_run(&self, install: &Installation, services: &Services) {
        // Only one instance can run at a time.
        services.processes.kill_by_name(&process_name(install));
    }

    fn post_run(&self, _exit_code: i32, install: &Installation, services: &Services) -> i32 {
        // The first process may relaunch itself; wait for that one too.
        services.processes.wait_for_name(&process_name(install));
        0
    }
}
