use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use emulauncher_shared::rom_format::extension_of;
use zip::ZipArchive;

use crate::best_effort::BestEffort;

/// Unpacks a compressed ROM into a working directory.
pub trait ArchiveExtractor {
    /// Extract `archive` and return the directory holding its contents.
    fn extract(&self, archive: &Path, system: &str) -> Result<PathBuf>;
}

/// Tells the frontend an extracted copy is being launched, so deferred
/// cleanup does not remove it under the emulator. Idempotent.
pub trait ExtractionTracker {
    fn mark_in_use(&self, dir: &Path) -> BestEffort;
}

/// Extracts `.zip` archives to `<root>/<system>/<archive stem>`.
///
/// Entries are unpacked into `<dest>.partial` and renamed into place once every
/// entry is written, then `<dest>.extracted` is created. A destination is reused
/// only when that marker exists; anything else is stale and extracted again.
#[derive(Debug, Clone)]
pub struct ZipExtractor {
    root: PathBuf,
}

impl ZipExtractor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn destination(&self, archive: &Path, system: &str) -> PathBuf {
        let stem = archive
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rom".to_string());
        self.root.join(system).join(stem)
    }

    /// Marker written next to `dest` once an extraction completed.
    pub fn completion_marker(dest: &Path) -> PathBuf {
        sibling(dest, ".extracted")
    }

    fn staging(dest: &Path) -> PathBuf {
        sibling(dest, ".partial")
    }
}

fn sibling(dir: &Path, suffix: &str) -> PathBuf {
    let mut name = dir.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_dir_if_present(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn unpack(zip: &mut ZipArchive<BufReader<File>>, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        // Entries escaping the destination are skipped.
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!("Skipping unsafe archive entry {}", entry.name());
            continue;
        };
        let out = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer =
            File::create(&out).with_context(|| format!("Failed to create {}", out.display()))?;
        io::copy(&mut entry, &mut writer)
            .with_context(|| format!("Failed to extract {}", out.display()))?;
    }
    Ok(())
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, system: &str) -> Result<PathBuf> {
        if extension_of(archive).as_deref() != Some(".zip") {
            bail!("{} is not a zip archive", archive.display());
        }

        let dest = self.destination(archive, system);
        let marker = Self::completion_marker(&dest);
        if marker.is_file() && dest.is_dir() {
            tracing::debug!("Reusing extraction at {}", dest.display());
            return Ok(dest);
        }

        let file = File::open(archive)
            .with_context(|| format!("Failed to open archive: {}", archive.display()))?;
        let mut zip = ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("Failed to read archive: {}", archive.display()))?;

        let staging = Self::staging(&dest);
        remove_dir_if_present(&staging)
            .with_context(|| format!("Failed to clear {}", staging.display()))?;
        if let Err(e) = unpack(&mut zip, &staging) {
            BestEffort::attempt(
                &format!("remove {}", staging.display()),
                remove_dir_if_present(&staging),
            );
            return Err(e);
        }

        if dest.exists() {
            tracing::info!("Replacing incomplete extraction at {}", dest.display());
        }
        remove_dir_if_present(&dest)
            .with_context(|| format!("Failed to clear {}", dest.display()))?;
        fs::rename(&staging, &dest)
            .with_context(|| format!("Failed to move extraction to {}", dest.display()))?;
        fs::write(&marker, b"")
            .with_context(|| format!("Failed to write {}", marker.display()))?;

        tracing::info!("Extracted {} to {}", archive.display(), dest.display());
        Ok(dest)
    }
}

/// Marks an extraction in use by writing `<dir>.in-use` next to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InUseMarker;

impl InUseMarker {
    pub fn marker_path(dir: &Path) -> PathBuf {
        sibling(dir, ".in-use")
    }
}

impl ExtractionTracker for InUseMarker {
    fn mark_in_use(&self, dir: &Path) -> BestEffort {
        let marker = Self::marker_path(dir);
        BestEffort::attempt(
            &format!("mark {} in use", dir.display()),
            fs::write(&marker, b""),
        )
    }
}
