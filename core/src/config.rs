//! Launcher settings (`settings.toml`).
//!
//! Paths, display defaults, per-emulator feature lists and baseline generic
//! options. Stored as TOML in the platform config directory; every field has
//! a default so a missing or partial file still loads.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use emulauncher_shared::EmulatorId;

use crate::features::FeatureSet;

const SETTINGS_FILE: &str = "settings.toml";

/// Launcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Supported option names per emulator. No entry means everything is supported.
    #[serde(default)]
    pub features: HashMap<String, Vec<String>>,
    /// Baseline generic options, overridden per launch from the command line.
    #[serde(default)]
    pub options: IndexMap<String, String>,
}

impl Settings {
    /// Feature list for `emulator`; a variant such as `rpcs3-nightly` without
    /// its own entry uses its base emulator's list.
    pub fn features_for(&self, emulator: &str) -> FeatureSet {
        let names = self.features.get(emulator).or_else(|| {
            EmulatorId::from_emulator_name(emulator).and_then(|id| self.features.get(id.as_str()))
        });
        match names {
            Some(names) => FeatureSet::only(names.iter().cloned()),
            None => FeatureSet::All,
        }
    }
}

/// Filesystem layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root holding one directory per emulator.
    #[serde(default = "default_emulators_dir")]
    pub emulators: PathBuf,
    /// Explicit install directory per emulator name.
    #[serde(default)]
    pub emulator_overrides: HashMap<String, PathBuf>,
    #[serde(default = "default_bios_dir")]
    pub bios: PathBuf,
    #[serde(default = "default_saves_dir")]
    pub saves: PathBuf,
    /// Base for relative ROM arguments that don't exist from the working directory.
    #[serde(default = "default_roms_dir")]
    pub roms: PathBuf,
    /// Where compressed ROMs are extracted.
    #[serde(default = "default_extract_dir")]
    pub extract: PathBuf,
}

impl PathsConfig {
    /// Configured install directory of `emulator`, if any.
    pub fn emulator_dir(&self, emulator: &str) -> Option<PathBuf> {
        if let Some(dir) = self.emulator_overrides.get(emulator) {
            return Some(dir.clone());
        }
        let dir = self.emulators.join(emulator);
        dir.is_dir().then_some(dir)
    }

    /// Resolves a ROM argument; a relative path missing from the working
    /// directory is taken relative to `roms`.
    pub fn resolve_rom(&self, rom: &Path) -> PathBuf {
        if rom.is_relative() && !rom.exists() {
            self.roms.join(rom)
        } else {
            rom.to_path_buf()
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            emulators: default_emulators_dir(),
            emulator_overrides: HashMap::new(),
            bios: default_bios_dir(),
            saves: default_saves_dir(),
            roms: default_roms_dir(),
            extract: default_extract_dir(),
        }
    }
}

/// Display defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Launch windowed unless `forcefullscreen` is set (default: false)
    #[serde(default)]
    pub windowed: bool,
    /// Used when a launch gives no resolution (default: 1920x1080)
    #[serde(default = "default_desktop_resolution")]
    pub desktop_resolution: Resolution,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            windowed: false,
            desktop_resolution: default_desktop_resolution(),
        }
    }
}

/// Screen resolution, written as `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = w.trim().parse().map_err(|_| format!("invalid width in '{}'", s))?;
        let height = h.trim().parse().map_err(|_| format!("invalid height in '{}'", s))?;
        if width == 0 || height == 0 {
            return Err(format!("resolution must be non-zero, got '{}'", s));
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn default_root() -> PathBuf {
    data_dir().unwrap_or_else(|| PathBuf::from("."))
}
fn default_emulators_dir() -> PathBuf {
    default_root().join("emulators")
}
fn default_bios_dir() -> PathBuf {
    default_root().join("bios")
}
fn default_saves_dir() -> PathBuf {
    default_root().join("saves")
}
fn default_roms_dir() -> PathBuf {
    default_root().join("roms")
}
fn default_extract_dir() -> PathBuf {
    std::env::temp_dir().join("emulauncher")
}
fn default_desktop_resolution() -> Resolution {
    Resolution::new(1920, 1080)
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/emulauncher`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.emulauncher", "", "emulauncher")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the platform-specific data directory (emulators, bios, saves).
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.emulauncher", "", "emulauncher")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Default settings file location.
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// Loads settings from the platform config directory.
///
/// Returns defaults if the file doesn't exist or cannot be parsed.
pub fn load() -> Settings {
    let Some(path) = settings_path() else {
        return Settings::default();
    };
    load_from(&path).unwrap_or_else(|e| {
        tracing::warn!("Using default settings: {:#}", e);
        Settings::default()
    })
}

/// Loads settings from `path`. A missing file yields defaults.
pub fn load_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse settings: {}", path.display()))
}

/// Saves settings to `path`, creating its directory.
pub fn save_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write settings: {}", path.display()))
}
