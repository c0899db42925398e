//! ROM preprocessing.
//!
//! Turns the raw ROM argument into the path the emulator is launched with:
//! archives are extracted, disc images are picked by priority, directory
//! games are resolved to their boot file and playlists to their entry.

mod extract;
mod playlist;
mod select;

use std::path::{Path, PathBuf};

use emulauncher_shared::rom_format::{extension_of, is_compressed, is_playlist};

use crate::error::LaunchError;

pub use extract::{ArchiveExtractor, ExtractionTracker, InUseMarker, ZipExtractor};
pub use playlist::{read_playlist_entry, resolve_playlist_line};
pub use select::{find_boot_file, scan_files, select_by_priority};

/// Coarse classification of a raw ROM path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomClass {
    CompressedArchive,
    DirectDiscImage,
    Playlist,
    Directory,
    Other,
}

impl RomClass {
    /// Classify `path`; directories win over any extension.
    pub fn of(path: &Path, disc_priority: &[&str]) -> Self {
        if path.is_dir() {
            return RomClass::Directory;
        }
        if is_compressed(path) {
            return RomClass::CompressedArchive;
        }
        if is_playlist(path) {
            return RomClass::Playlist;
        }
        match extension_of(path) {
            Some(ext) if disc_priority.contains(&ext.as_str()) => RomClass::DirectDiscImage,
            _ => RomClass::Other,
        }
    }
}

/// How a [`ResolvedRom`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedKind {
    /// The raw argument, unchanged.
    Direct,
    /// A file (or directory) inside an extraction.
    ExtractedDirectory,
    /// The boot file found inside a directory game.
    DirectoryBoot,
    /// The entry a playlist points at.
    PlaylistEntry,
    /// A firmware package to install instead of a game.
    FirmwareInstallRequest,
}

/// The launchable path for one launch. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRom {
    pub path: PathBuf,
    pub kind: ResolvedKind,
}

impl ResolvedRom {
    pub fn new(path: impl Into<PathBuf>, kind: ResolvedKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn direct(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ResolvedKind::Direct)
    }

    pub fn is_firmware_install(&self) -> bool {
        self.kind == ResolvedKind::FirmwareInstallRequest
    }
}

/// What an emulator accepts as a ROM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomPlan {
    /// Disc-image extensions, best first. Used to pick a file after extraction.
    pub disc_priority: &'static [&'static str],
    /// Fixed file name searched for in directory games.
    pub boot_file: Option<&'static str>,
    /// Root for `/`-style playlist entries; `None` leaves playlists untouched.
    pub playlist_root: Option<PathBuf>,
}

/// Extraction and in-use signalling used by [`preprocess`].
#[derive(Clone, Copy)]
pub struct RomServices<'a> {
    pub extractor: &'a dyn ArchiveExtractor,
    pub tracker: &'a dyn ExtractionTracker,
}

/// Resolve the raw ROM argument for `system` according to `plan`.
pub fn preprocess(
    rom: &Path,
    system: &str,
    plan: &RomPlan,
    services: RomServices<'_>,
) -> Result<ResolvedRom, LaunchError> {
    let class = RomClass::of(rom, plan.disc_priority);
    tracing::debug!("{} classified as {:?}", rom.display(), class);

    let (path, extracted) = match class {
        RomClass::CompressedArchive => match services.extractor.extract(rom, system) {
            Ok(dir) => {
                tracing::info!("Extracted {} to {}", rom.display(), dir.display());
                services.tracker.mark_in_use(&dir);
                (dir, true)
            }
            Err(e) => {
                tracing::warn!("Extraction of {} failed, launching as-is: {:#}", rom.display(), e);
                return Ok(ResolvedRom::direct(rom));
            }
        },
        _ => (rom.to_path_buf(), false),
    };

    if !path.is_dir() {
        return match class {
            RomClass::Playlist => match &plan.playlist_root {
                Some(root) => {
                    let entry = read_playlist_entry(&path, root)?;
                    tracing::info!("Playlist {} points at {}", path.display(), entry.display());
                    Ok(ResolvedRom::new(entry, ResolvedKind::PlaylistEntry))
                }
                None => Ok(ResolvedRom::direct(path)),
            },
            _ => Ok(ResolvedRom::direct(path)),
        };
    }

    if let Some(boot) = plan.boot_file {
        let file = find_boot_file(&path, boot)?.ok_or_else(|| LaunchError::NoGameInFolder {
            folder: path.clone(),
        })?;
        tracing::info!("Boot file: {}", file.display());
        return Ok(ResolvedRom::new(file, ResolvedKind::DirectoryBoot));
    }

    if extracted {
        if plan.disc_priority.is_empty() {
            return Ok(ResolvedRom::new(path, ResolvedKind::ExtractedDirectory));
        }
        let files = scan_files(&path)?;
        let file = select_by_priority(&files, plan.disc_priority)
            .ok_or_else(|| LaunchError::NoPlayableFile {
                folder: path.clone(),
            })?;
        tracing::info!("Selected {}", file.display());
        return Ok(ResolvedRom::new(file, ResolvedKind::ExtractedDirectory));
    }

    Ok(ResolvedRom::direct(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::best_effort::BestEffort;
    use emulauncher_shared::{DREAMCAST_DISC_PRIORITY, PS3_BOOT_FILE};
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Extractor that copies a prepared directory instead of unpacking.
    struct FakeExtractor {
        output: Option<PathBuf>,
    }

    impl ArchiveExtractor for FakeExtractor {
        fn extract(&self, archive: &Path, _system: &str) -> anyhow::Result<PathBuf> {
            self.output
                .clone()
                .ok_or_else(|| anyhow::anyhow!("cannot extract {}", archive.display()))
        }
    }

    #[derive(Default)]
    struct RecordingTracker {
        marked: RefCell<Vec<PathBuf>>,
    }

    impl ExtractionTracker for RecordingTracker {
        fn mark_in_use(&self, dir: &Path) -> BestEffort {
            self.marked.borrow_mut().push(dir.to_path_buf());
            BestEffort::Done
        }
    }

    fn dreamcast() -> RomPlan {
        RomPlan {
            disc_priority: DREAMCAST_DISC_PRIORITY,
            ..RomPlan::default()
        }
    }

    fn ps3(root: &Path) -> RomPlan {
        RomPlan {
            disc_priority: &[],
            boot_file: Some(PS3_BOOT_FILE),
            playlist_root: Some(root.to_path_buf()),
        }
    }

    // ============================================================================
    // Classification
    // ============================================================================

    #[test]
    fn test_classify() {
        let dir = TempDir::new().unwrap();
        let p = DREAMCAST_DISC_PRIORITY;
        assert_eq!(RomClass::of(dir.path(), p), RomClass::Directory);
        assert_eq!(RomClass::of(Path::new("a.ZIP"), p), RomClass::CompressedArchive);
        assert_eq!(RomClass::of(Path::new("a.m3u"), p), RomClass::Playlist);
        assert_eq!(RomClass::of(Path::new("a.gdi"), p), RomClass::DirectDiscImage);
        assert_eq!(RomClass::of(Path::new("a.iso"), p), RomClass::Other);
    }

    // ============================================================================
    // Archives
    // ============================================================================

    #[test]
    fn test_extracted_archive_selects_by_priority_and_marks_in_use() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("extracted");
        fs::create_dir_all(&out).unwrap();
        for name in ["game.txt", "track.bin", "disc.cue", "disc.gdi"] {
            fs::write(out.join(name), b"x").unwrap();
        }
        let extractor = FakeExtractor { output: Some(out.clone()) };
        let tracker = RecordingTracker::default();
        let services = RomServices { extractor: &extractor, tracker: &tracker };

        let rom = preprocess(Path::new("/roms/game.zip"), "dreamcast", &dreamcast(), services).unwrap();

        assert_eq!(rom, ResolvedRom::new(out.join("disc.cue"), ResolvedKind::ExtractedDirectory));
        assert_eq!(*tracker.marked.borrow(), vec![out]);
    }

    #[test]
    fn test_extracted_archive_without_disc_image_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.txt"), b"x").unwrap();
        let extractor = FakeExtractor { output: Some(dir.path().to_path_buf()) };
        let tracker = RecordingTracker::default();
        let services = RomServices { extractor: &extractor, tracker: &tracker };

        let err = preprocess(Path::new("game.zip"), "dreamcast", &dreamcast(), services).unwrap_err();
        assert!(matches!(err, LaunchError::NoPlayableFile { .. }));
    }

    #[test]
    fn test_failed_extraction_passes_through() {
        let extractor = FakeExtractor { output: None };
        let tracker = RecordingTracker::default();
        let services = RomServices { extractor: &extractor, tracker: &tracker };

        let rom = preprocess(Path::new("game.7z"), "dreamcast", &dreamcast(), services).unwrap();
        assert_eq!(rom, ResolvedRom::direct("game.7z"));
        assert!(tracker.marked.borrow().is_empty());
    }

    #[test]
    fn test_extracted_directory_game_uses_boot_file() {
        let dir = TempDir::new().unwrap();
        let boot = dir.path().join("BLES00001").join("PS3_GAME").join("USRDIR");
        fs::create_dir_all(&boot).unwrap();
        fs::write(boot.join("EBOOT.BIN"), b"x").unwrap();
        let extractor = FakeExtractor { output: Some(dir.path().to_path_buf()) };
        let tracker = RecordingTracker::default();
        let services = RomServices { extractor: &extractor, tracker: &tracker };

        let rom = preprocess(Path::new("game.zip"), "ps3", &ps3(dir.path()), services).unwrap();
        assert_eq!(rom, ResolvedRom::new(boot.join("EBOOT.BIN"), ResolvedKind::DirectoryBoot));
        assert_eq!(tracker.marked.borrow().len(), 1);
    }

    // ============================================================================
    // Directories and playlists
    // ============================================================================

    #[test]
    fn test_directory_without_boot_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("PARAM.SFO"), b"x").unwrap();
        let extractor = FakeExtractor { output: None };
        let tracker = RecordingTracker::default();
        let services = RomServices { extractor: &extractor, tracker: &tracker };

        let err = preprocess(dir.path(), "ps3", &ps3(dir.path()), services).unwrap_err();
        assert_eq!(err.to_string(), "Unable to find any game in the provided folder");
    }

    #[test]
    fn test_playlist_resolves_against_its_directory() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("list.m3u");
        fs::write(&list, "./disc1.cue\n").unwrap();
        let extractor = FakeExtractor { output: None };
        let tracker = RecordingTracker::default();
        let services = RomServices { extractor: &extractor, tracker: &tracker };

        let rom = preprocess(&list, "ps3", &ps3(Path::new("/saves")), services).unwrap();
        assert_eq!(rom.kind, ResolvedKind::PlaylistEntry);
        assert_eq!(rom.path, dir.path().join("disc1.cue"));
    }

    #[test]
    fn test_playlist_untouched_without_root() {
        let extractor = FakeExtractor { output: None };
        let tracker = RecordingTracker::default();
        let services = RomServices { extractor: &extractor, tracker: &tracker };

        let rom = preprocess(Path::new("list.m3u"), "dreamcast", &dreamcast(), services).unwrap();
        assert_eq!(rom, ResolvedRom::direct("list.m3u"));
    }
}
