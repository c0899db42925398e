use anyhow::{Context, Result};
use emulauncher_shared::EmulatorId;

use crate::error::LaunchError;
use crate::launch::LaunchSpec;
use crate::rom::ResolvedRom;

use super::{Adapter, Installation, LaunchContext, Services, Session};

/// Everything decided before the emulator is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedLaunch {
    pub emulator: EmulatorId,
    pub installation: Installation,
    pub rom: ResolvedRom,
    pub spec: LaunchSpec,
    pub session: Session,
}

/// Locate, preprocess, synthesize and build, in that order.
///
/// Any error aborts before the emulator runs. ROM resolution happens before
/// any config file is touched, and a firmware install request skips config
/// synthesis entirely.
pub fn prepare_launch(
    adapter: &dyn Adapter,
    ctx: &LaunchContext<'_>,
    services: &Services,
) -> Result<PreparedLaunch> {
    let id = adapter.id();

    let installation = adapter
        .locate_executable(ctx)
        .ok_or_else(|| LaunchError::NotInstalled {
            emulator: ctx.request.emulator.clone(),
        })?;
    tracing::info!("Using {} at {}", id, installation.executable.display());

    let rom = adapter.preprocess_rom(ctx, &installation, services)?;
    tracing::info!("ROM resolved to {} ({:?})", rom.path.display(), rom.kind);

    let rom = if ctx.auto_config() {
        match adapter.firmware_install(ctx, &installation)? {
            Some(firmware) => {
                tracing::info!("Firmware install requested, skipping configuration");
                firmware
            }
            None => {
                adapter
                    .synthesize_config(ctx, &installation, &rom)
                    .with_context(|| format!("Failed to configure {}", id))?;
                rom
            }
        }
    } else {
        tracing::info!("Automatic configuration disabled");
        rom
    };

    let spec = adapter.build_launch_spec(ctx, &installation, &rom)?;
    let session = adapter.prepare_session(ctx, &installation, &rom);

    Ok(PreparedLaunch {
        emulator: id,
        installation,
        rom,
        spec,
        session,
    })
}

/// Run a prepared launch and clean up after it.
///
/// The overlay is released and shader injection removed whatever the exit
/// code, and even if the process could not be started.
pub fn run_prepared(
    adapter: &dyn Adapter,
    prepared: &PreparedLaunch,
    services: &Services,
) -> Result<i32> {
    adapter.before_run(&prepared.installation, services);

    let injected = prepared
        .session
        .shader
        .as_ref()
        .is_some_and(|request| services.shaders.install(request));
    let overlay = if injected {
        None
    } else {
        prepared
            .session
            .overlay
            .as_ref()
            .and_then(|request| services.overlay.show(request))
    };

    let result = services.runner.run_and_wait(&prepared.spec);

    if let Some(handle) = overlay {
        handle.release();
    }
    if let Some(shader) = &prepared.session.shader {
        services
            .shaders
            .uninstall(shader.backend, &prepared.spec.working_dir);
    }

    let exit_code = result?;
    let reported = adapter.post_run(exit_code, &prepared.installation, services);
    tracing::info!("{} exited with {} (reported {})", prepared.emulator, exit_code, reported);
    Ok(reported)
}

/// [`prepare_launch`] followed by [`run_prepared`].
pub fn launch(adapter: &dyn Adapter, ctx: &LaunchContext<'_>, services: &Services) -> Result<i32> {
    let prepared = prepare_launch(adapter, ctx, services)?;
    run_prepared(adapter, &prepared, services)
}
