//! Launch spec assembly.

mod firmware;

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::LaunchError;
use crate::rom::ResolvedRom;

pub use firmware::{FirmwareRequirement, FirmwareStatus};

/// Executable, working directory and argument vector for one emulator run.
///
/// Built once per launch and consumed by the process runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub executable: PathBuf,
    pub working_dir: PathBuf,
    pub args: Vec<String>,
}

impl LaunchSpec {
    /// The command line as it would be typed, with non-flag arguments quoted.
    pub fn command_line(&self) -> String {
        let mut line = format!("\"{}\"", self.executable.display());
        for arg in &self.args {
            line.push(' ');
            if arg.starts_with('-') {
                line.push_str(arg);
            } else {
                line.push_str(&format!("\"{}\"", arg));
            }
        }
        line
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        command.args(&self.args).current_dir(&self.working_dir);
        command
    }
}

/// Fluent builder for [`LaunchSpec`].
#[derive(Debug, Clone)]
pub struct LaunchSpecBuilder {
    spec: LaunchSpec,
}

impl LaunchSpecBuilder {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let working_dir = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            spec: LaunchSpec {
                executable,
                working_dir,
                args: Vec::new(),
            },
        }
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spec.working_dir = dir.into();
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.spec.args.push(arg.into());
        self
    }

    /// Append a path as a single argument.
    pub fn path_arg(self, path: &Path) -> Self {
        let arg = path.to_string_lossy().into_owned();
        self.arg(arg)
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> LaunchSpec {
        self.spec
    }
}

/// Per-emulator argument conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgumentStyle {
    /// Appended after the ROM in fullscreen mode.
    pub fullscreen_flags: &'static [&'static str],
    /// Appended after the ROM in windowed mode.
    pub windowed_flags: &'static [&'static str],
    /// Flag that installs a firmware package, if the emulator has one.
    pub firmware_install_flag: Option<&'static str>,
}

/// Build the launch spec for `rom`.
///
/// A game launches as `[rom, flags...]`. A firmware install request launches
/// the same executable with `[install flag, package]` instead.
pub fn build_launch_spec(
    executable: &Path,
    working_dir: &Path,
    rom: &ResolvedRom,
    fullscreen: bool,
    style: &ArgumentStyle,
    emulator: &str,
) -> Result<LaunchSpec, LaunchError> {
    let builder = LaunchSpecBuilder::new(executable).working_dir(working_dir);

    if rom.is_firmware_install() {
        let flag = style
            .firmware_install_flag
            .ok_or_else(|| LaunchError::FirmwareInstallUnsupported {
                emulator: emulator.to_string(),
            })?;
        return Ok(builder.arg(flag).path_arg(&rom.path).build());
    }

    let flags = if fullscreen {
        style.fullscreen_flags
    } else {
        style.windowed_flags
    };
    Ok(builder.path_arg(&rom.path).args(flags.iter().copied()).build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::ResolvedKind;

    const STYLE: ArgumentStyle = ArgumentStyle {
        fullscreen_flags: &["--no-gui", "--fullscreen"],
        windowed_flags: &[],
        firmware_install_flag: Some("--installfw"),
    };

    #[test]
    fn test_game_args_follow_rom() {
        let rom = ResolvedRom::direct("/roms/ps3/Game/PS3_GAME/USRDIR/EBOOT.BIN");
        let spec = build_launch_spec(Path::new("/emu/rpcs3"), Path::new("/emu"), &rom, true, &STYLE, "rpcs3").unwrap();

        assert_eq!(
            spec.args,
            vec!["/roms/ps3/Game/PS3_GAME/USRDIR/EBOOT.BIN", "--no-gui", "--fullscreen"]
        );
        assert_eq!(spec.working_dir, PathBuf::from("/emu"));
    }

    #[test]
    fn test_windowed_has_no_flags() {
        let rom = ResolvedRom::direct("/roms/game.cue");
        let spec = build_launch_spec(Path::new("/emu/rpcs3"), Path::new("/emu"), &rom, false, &STYLE, "rpcs3").unwrap();
        assert_eq!(spec.args, vec!["/roms/game.cue"]);
    }

    #[test]
    fn test_firmware_branch_replaces_game_args() {
        let rom = ResolvedRom::new("/bios/PS3UPDAT.PUP", ResolvedKind::FirmwareInstallRequest);
        let spec = build_launch_spec(Path::new("/emu/rpcs3"), Path::new("/emu"), &rom, true, &STYLE, "rpcs3").unwrap();
        assert_eq!(spec.args, vec!["--installfw", "/bios/PS3UPDAT.PUP"]);
        assert_eq!(spec.executable, PathBuf::from("/emu/rpcs3"));
    }

    #[test]
    fn test_firmware_branch_needs_flag() {
        let rom = ResolvedRom::new("/bios/fw.bin", ResolvedKind::FirmwareInstallRequest);
        let err = build_launch_spec(
            Path::new("/emu/redream"),
            Path::new("/emu"),
            &rom,
            true,
            &ArgumentStyle::default(),
            "redream",
        )
        .unwrap_err();
        assert!(matches!(err, LaunchError::FirmwareInstallUnsupported { .. }));
    }

    #[test]
    fn test_command_line_quotes_paths() {
        let spec = LaunchSpecBuilder::new("/emu/redream")
            .arg("/roms/Crazy Taxi.gdi")
            .arg("--fullscreen")
            .build();
        assert_eq!(spec.working_dir, PathBuf::from("/emu"));
        assert_eq!(spec.command_line(), "\"/emu/redream\" \"/roms/Crazy Taxi.gdi\" --fullscreen");
    }
}
