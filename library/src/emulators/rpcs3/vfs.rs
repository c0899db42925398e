//! `config/vfs.yml`: point the emulated HDD at the saves directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use emulauncher_core::BestEffort;
use emulauncher_core::binding::{BindingContext, Rule, apply_rules};
use emulauncher_core::document::{KeyPath, YmlDocument, with_document};

pub fn vfs_path(install_dir: &Path) -> PathBuf {
    install_dir.join("config").join("vfs.yml")
}

/// Path with `/` separators, as RPCS3 expects in `vfs.yml`.
fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub fn write_vfs(install_dir: &Path, saves_path: &Path, ctx: BindingContext<'_>) -> Result<BestEffort> {
    let hdd0 = saves_path.join("dev_hdd0");
    let created = if hdd0.is_dir() {
        BestEffort::Done
    } else {
        BestEffort::attempt(
            &format!("create {}", hdd0.display()),
            fs::create_dir_all(&hdd0),
        )
    };

    let path = vfs_path(install_dir);
    tracing::info!("Writing {}", path.display());
    tracing::info!("Setting '{}' as content path for the emulator", hdd0.display());

    let rules = [Rule::set(KeyPath::root("/dev_hdd0/"), forward_slashes(&hdd0))];
    with_document::<YmlDocument, _, _>(&path, |doc| {
        apply_rules(doc, &rules, ctx);
        Ok(())
    })?;

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emulauncher_core::{FeatureSet, Options};
    use tempfile::TempDir;

    #[test]
    fn test_forward_slashes() {
        assert_eq!(
            forward_slashes(Path::new(r"C:\saves\ps3\rpcs3\dev_hdd0")),
            "C:/saves/ps3/rpcs3/dev_hdd0"
        );
    }

    #[test]
    fn test_points_hdd0_at_saves_and_keeps_other_mounts() {
        let dir = TempDir::new().unwrap();
        let install = dir.path().join("rpcs3");
        let saves = dir.path().join("saves");
        let path = vfs_path(&install);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "$(EmulatorDir): \"\"\n/dev_hdd0/: $(EmulatorDir)dev_hdd0/\n/dev_usb000/: $(EmulatorDir)dev_usb000/\n").unwrap();

        let options = Options::new();
        let gate = FeatureSet::All;
        let created = write_vfs(&install, &saves, BindingContext::new(&options, &gate)).unwrap();

        assert!(created.is_done());
        assert!(saves.join("dev_hdd0").is_dir());
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            format!(
                "$(EmulatorDir): \"\"\n/dev_hdd0/: {}\n/dev_usb000/: $(EmulatorDir)dev_usb000/\n",
                forward_slashes(&saves.join("dev_hdd0"))
            )
        );
    }

    #[test]
    fn test_uncreatable_hdd0_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let install = dir.path().join("rpcs3");
        // A file where the saves directory should be.
        let saves = dir.path().join("saves");
        fs::write(&saves, b"").unwrap();

        let options = Options::new();
        let gate = FeatureSet::All;
        let created = write_vfs(&install, &saves, BindingContext::new(&options, &gate)).unwrap();

        assert!(!created.is_done());
        assert!(vfs_path(&install).is_file());
    }
}
