//! Overlay and shader-injection collaborators.
//!
//! The launcher only decides when these run; rendering a bezel or installing
//! an injection layer is left to implementations of these traits. The
//! defaults here log and do nothing.

use std::path::{Path, PathBuf};

use crate::config::Resolution;

/// Graphics API the injection layer hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderBackend {
    OpenGl,
}

/// Shader-injection install request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderRequest {
    pub backend: ShaderBackend,
    /// Install the 64-bit layer.
    pub x64: bool,
    pub system: String,
    pub rom: PathBuf,
    pub working_dir: PathBuf,
    pub resolution: Resolution,
    pub emulator: String,
    /// Whether the injection layer may draw a bezel.
    pub bezel: bool,
}

pub trait ShaderInjector {
    /// Install the injection layer; true if it now handles the bezel.
    fn install(&self, request: &ShaderRequest) -> bool;

    /// Remove whatever `install` put into `working_dir`.
    fn uninstall(&self, backend: ShaderBackend, working_dir: &Path);
}

/// Bezel overlay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    pub system: String,
    pub rom: PathBuf,
    pub resolution: Resolution,
    pub emulator: String,
}

pub trait OverlayProvider {
    /// Show an overlay for the duration of the run, if one is available.
    fn show(&self, request: &OverlayRequest) -> Option<Box<dyn OverlayHandle>>;
}

/// A visible overlay; released after the emulator exits.
pub trait OverlayHandle {
    fn release(self: Box<Self>);
}

/// Shader injector that never installs anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShaderInjection;

impl ShaderInjector for NoShaderInjection {
    fn install(&self, request: &ShaderRequest) -> bool {
        tracing::debug!("Shader injection unavailable for {}", request.emulator);
        false
    }

    fn uninstall(&self, _backend: ShaderBackend, _working_dir: &Path) {}
}

/// Overlay provider with no overlays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverlay;

impl OverlayProvider for NoOverlay {
    fn show(&self, request: &OverlayRequest) -> Option<Box<dyn OverlayHandle>> {
        tracing::debug!("No overlay for {} on {}", request.rom.display(), request.system);
        None
    }
}
