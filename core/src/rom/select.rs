use std::path::{Path, PathBuf};

use emulauncher_shared::rom_format::extension_of;
use walkdir::WalkDir;

use crate::error::LaunchError;

/// All files under `root`, recursively, in a stable (name-sorted) order.
pub fn scan_files(root: &Path) -> Result<Vec<PathBuf>, LaunchError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Pick the file whose extension ranks best in `priority`.
///
/// Files with the same rank keep their listing order, so the first one wins.
/// Files with no allow-listed extension are never selected.
pub fn select_by_priority(files: &[PathBuf], priority: &[&str]) -> Option<PathBuf> {
    files
        .iter()
        .filter_map(|file| {
            let ext = extension_of(file)?;
            let rank = priority.iter().position(|p| *p == ext)?;
            Some((rank, file))
        })
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, file)| file.clone())
}

/// First file named `boot_name` (case-insensitive) anywhere under `root`.
pub fn find_boot_file(root: &Path, boot_name: &str) -> Result<Option<PathBuf>, LaunchError> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(boot_name))
        {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

fn walk_error(root: &Path, e: walkdir::Error) -> LaunchError {
    let path = e.path().unwrap_or(root).to_path_buf();
    let source = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    LaunchError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emulauncher_shared::DREAMCAST_DISC_PRIORITY;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_priority_by_rank_not_listing_order() {
        let files: Vec<PathBuf> = ["game.txt", "track.bin", "disc.gdi", "disc.cue"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(
            select_by_priority(&files, DREAMCAST_DISC_PRIORITY),
            Some(PathBuf::from("disc.cue"))
        );
    }

    #[test]
    fn test_priority_first_of_equal_rank() {
        let files: Vec<PathBuf> = ["b/disc2.chd", "a/disc1.CHD"].iter().map(PathBuf::from).collect();
        assert_eq!(
            select_by_priority(&files, DREAMCAST_DISC_PRIORITY),
            Some(PathBuf::from("b/disc2.chd"))
        );
    }

    #[test]
    fn test_priority_none_allowed() {
        let files = vec![PathBuf::from("readme.txt")];
        assert_eq!(select_by_priority(&files, DREAMCAST_DISC_PRIORITY), None);
    }

    #[test]
    fn test_scan_is_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("z.cue"), b"").unwrap();
        fs::write(dir.path().join("sub").join("a.gdi"), b"").unwrap();

        let files = scan_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("sub").join("a.gdi"), dir.path().join("z.cue")]);
    }

    #[test]
    fn test_find_boot_file_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let usrdir = dir.path().join("PS3_GAME").join("USRDIR");
        fs::create_dir_all(&usrdir).unwrap();
        fs::write(usrdir.join("eboot.bin"), b"").unwrap();

        let found = find_boot_file(dir.path(), "EBOOT.BIN").unwrap();
        assert_eq!(found, Some(usrdir.join("eboot.bin")));
        assert_eq!(find_boot_file(dir.path(), "MISSING.BIN").unwrap(), None);
    }
}
