//! Per-emulator adapters.
//!
//! # Architecture
//!
//! 1. `EmulatorId` (from emulauncher_shared) names the emulators we know
//! 2. An [`Adapter`] implements the per-emulator capabilities (locate,
//!    preprocess, synthesize, build, post-run)
//! 3. [`AdapterRegistry`] maps frontend emulator names onto adapters
//! 4. [`prepare_launch`] / [`run_prepared`] drive an adapter in a fixed order
//!
//! # Adding an Emulator
//!
//! 1. Add an `EmulatorId` variant in emulauncher_shared
//! 2. Implement [`Adapter`] for it
//! 3. Register it in the launcher's registry

mod orchestrate;
mod registry;

use std::path::{Path, PathBuf};

use emulauncher_shared::EmulatorId;

use crate::binding::BindingContext;
use crate::config::{Resolution, Settings};
use crate::error::LaunchError;
use crate::features::FeatureGate;
use crate::hooks::{
    NoOverlay, NoShaderInjection, OverlayProvider, OverlayRequest, ShaderInjector, ShaderRequest,
};
use crate::launch::{ArgumentStyle, LaunchSpec, build_launch_spec};
use crate::options::OptionsSource;
use crate::process::{CommandRunner, ProcessRunner, ProcessTable, SystemProcessTable};
use crate::rom::{
    ArchiveExtractor, ExtractionTracker, InUseMarker, ResolvedRom, RomPlan, RomServices,
    ZipExtractor, preprocess,
};

pub use orchestrate::{PreparedLaunch, launch, prepare_launch, run_prepared};
pub use registry::AdapterRegistry;

/// Option that skips config synthesis and the firmware check.
pub const DISABLE_AUTOCONFIG: &str = "disableautoconfig";
/// Option that forces fullscreen even when the frontend runs windowed.
pub const FORCE_FULLSCREEN: &str = "forcefullscreen";

/// A located emulator install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub emulator: EmulatorId,
    /// Install directory; also the working directory of the launch.
    pub directory: PathBuf,
    pub executable: PathBuf,
}

/// What the frontend asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Frontend emulator name, possibly a variant such as `rpcs3-nightly`.
    pub emulator: String,
    pub system: String,
    pub rom: PathBuf,
    /// Explicit resolution; the desktop resolution is used when absent.
    pub resolution: Option<Resolution>,
    /// The frontend itself runs windowed.
    pub windowed: bool,
}

/// Read-only inputs of one launch.
#[derive(Clone, Copy)]
pub struct LaunchContext<'a> {
    pub request: &'a LaunchRequest,
    pub options: &'a dyn OptionsSource,
    pub features: &'a dyn FeatureGate,
    pub settings: &'a Settings,
}

impl<'a> LaunchContext<'a> {
    pub fn fullscreen(&self) -> bool {
        !self.request.windowed || self.options.get_bool(FORCE_FULLSCREEN)
    }

    pub fn resolution(&self) -> Resolution {
        self.request
            .resolution
            .unwrap_or(self.settings.display.desktop_resolution)
    }

    pub fn auto_config(&self) -> bool {
        !self.options.get_bool(DISABLE_AUTOCONFIG)
    }

    pub fn binding_context(&self) -> BindingContext<'a> {
        BindingContext::new(self.options, self.features)
    }
}

/// Pre-run side effects an adapter asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Shader injection to install before the run and remove after it.
    pub shader: Option<ShaderRequest>,
    /// Bezel overlay, shown only if shader injection did not take over.
    pub overlay: Option<OverlayRequest>,
}

/// External collaborators used during a launch.
pub struct Services {
    pub extractor: Box<dyn ArchiveExtractor>,
    pub tracker: Box<dyn ExtractionTracker>,
    pub runner: Box<dyn ProcessRunner>,
    pub processes: Box<dyn ProcessTable>,
    pub overlay: Box<dyn OverlayProvider>,
    pub shaders: Box<dyn ShaderInjector>,
}

impl Services {
    /// Real process and filesystem collaborators; no overlays or shader injection.
    pub fn system(settings: &Settings) -> Self {
        Self {
            extractor: Box::new(ZipExtractor::new(settings.paths.extract.clone())),
            tracker: Box::new(InUseMarker),
            runner: Box::new(CommandRunner),
            processes: Box::new(SystemProcessTable),
            overlay: Box::new(NoOverlay),
            shaders: Box::new(NoShaderInjection),
        }
    }

    pub fn rom_services(&self) -> RomServices<'_> {
        RomServices {
            extractor: self.extractor.as_ref(),
            tracker: self.tracker.as_ref(),
        }
    }
}

/// Find the install of `id` for this launch.
///
/// Searches in order:
/// 1. The configured directory of the requested name
/// 2. For a variant name (`rpcs3-nightly`), the directory of the base emulator
/// 3. System PATH
pub fn locate_installation(ctx: &LaunchContext<'_>, id: EmulatorId) -> Option<Installation> {
    let paths = &ctx.settings.paths;
    let requested = ctx.request.emulator.as_str();
    let exe_name = id.executable_name();

    let dir = paths.emulator_dir(requested).or_else(|| {
        if requested != id.as_str() {
            paths.emulator_dir(id.as_str())
        } else {
            None
        }
    });

    if let Some(dir) = dir {
        let executable = dir.join(&exe_name);
        if executable.is_file() {
            return Some(Installation {
                emulator: id,
                directory: dir,
                executable,
            });
        }
        tracing::debug!("{} not found in {}", exe_name, dir.display());
    }

    // Fall back to PATH
    let executable = which::which(&exe_name).ok()?;
    let directory = executable.parent().map(Path::to_path_buf)?;
    Some(Installation {
        emulator: id,
        directory,
        executable,
    })
}

/// Per-emulator capabilities, driven by [`prepare_launch`] and [`run_prepared`].
pub trait Adapter {
    fn id(&self) -> EmulatorId;

    fn locate_executable(&self, ctx: &LaunchContext<'_>) -> Option<Installation> {
        locate_installation(ctx, self.id())
    }

    /// What this emulator accepts as a ROM.
    fn rom_plan(&self, ctx: &LaunchContext<'_>, install: &Installation) -> RomPlan;

    fn preprocess_rom(
        &self,
        ctx: &LaunchContext<'_>,
        install: &Installation,
        services: &Services,
    ) -> Result<ResolvedRom, LaunchError> {
        let plan = self.rom_plan(ctx, install);
        preprocess(&ctx.request.rom, &ctx.request.system, &plan, services.rom_services())
    }

    /// A firmware package to install instead of launching the game.
    fn firmware_install(
        &self,
        _ctx: &LaunchContext<'_>,
        _install: &Installation,
    ) -> Result<Option<ResolvedRom>, LaunchError> {
        Ok(None)
    }

    /// Rewrite the emulator's own config files.
    fn synthesize_config(
        &self,
        ctx: &LaunchContext<'_>,
        install: &Installation,
        rom: &ResolvedRom,
    ) -> anyhow::Result<()>;

    fn argument_style(&self) -> ArgumentStyle;

    fn build_launch_spec(
        &self,
        ctx: &LaunchContext<'_>,
        install: &Installation,
        rom: &ResolvedRom,
    ) -> Result<LaunchSpec, LaunchError> {
        build_launch_spec(
            &install.executable,
            &install.directory,
            rom,
            ctx.fullscreen(),
            &self.argument_style(),
            self.id().as_str(),
        )
    }

    /// Overlay and shader injection for the run.
    fn prepare_session(
        &self,
        _ctx: &LaunchContext<'_>,
        _install: &Installation,
        _rom: &ResolvedRom,
    ) -> Session {
        Session::default()
    }

    /// Called right before the emulator is spawned.
    fn before_run(&self, _install: &Installation, _services: &Services) {}

    /// Map the raw exit code to the one reported upward.
    fn post_run(&self, exit_code: i32, _install: &Installation, _services: &Services) -> i32 {
        exit_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;
    use crate::options::Options;
    use std::fs;
    use tempfile::TempDir;

    fn request(emulator: &str) -> LaunchRequest {
        LaunchRequest {
            emulator: emulator.to_string(),
            system: "ps3".to_string(),
            rom: PathBuf::from("/roms/game"),
            resolution: None,
            windowed: true,
        }
    }

    fn settings_with_root(root: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.paths.emulators = root.to_path_buf();
        settings
    }

    #[test]
    fn test_fullscreen_and_resolution() {
        let settings = Settings::default();
        let req = request("rpcs3");
        let gate = FeatureSet::All;

        let plain = Options::new();
        let ctx = LaunchContext { request: &req, options: &plain, features: &gate, settings: &settings };
        assert!(!ctx.fullscreen());
        assert!(ctx.auto_config());
        assert_eq!(ctx.resolution(), Resolution::new(1920, 1080));

        let forced = Options::new().with(FORCE_FULLSCREEN, "1").with(DISABLE_AUTOCONFIG, "true");
        let ctx = LaunchContext { options: &forced, ..ctx };
        assert!(ctx.fullscreen());
        assert!(!ctx.auto_config());
    }

    #[test]
    fn test_locate_variant_falls_back_to_base_dir() {
        let dir = TempDir::new().unwrap();
        let install = dir.path().join("rpcs3");
        fs::create_dir_all(&install).unwrap();
        let exe = install.join(EmulatorId::Rpcs3.executable_name());
        fs::write(&exe, b"").unwrap();

        let settings = settings_with_root(dir.path());
        let req = request("rpcs3-nightly");
        let options = Options::new();
        let gate = FeatureSet::All;
        let ctx = LaunchContext { request: &req, options: &options, features: &gate, settings: &settings };

        let found = locate_installation(&ctx, EmulatorId::Rpcs3).unwrap();
        assert_eq!(found.directory, install);
        assert_eq!(found.executable, exe);
    }

    #[test]
    fn test_locate_missing_executable() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("redream")).unwrap();

        let settings = settings_with_root(dir.path());
        let req = request("redream");
        let options = Options::new();
        let gate = FeatureSet::All;
        let ctx = LaunchContext { request: &req, options: &options, features: &gate, settings: &settings };

        // Not in the configured dir; only found if some PATH entry has it.
        if which::which(EmulatorId::Redream.executable_name()).is_err() {
            assert_eq!(locate_installation(&ctx, EmulatorId::Redream), None);
        }
    }
}
