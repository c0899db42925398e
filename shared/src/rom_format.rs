//! ROM and disc-image format tables.
//!
//! Single source of truth for the file extensions the ROM preprocessor
//! classifies on. Extensions are stored lowercase with the leading dot.
//!
//! # Example
//!
//! ```
//! use emulauncher_shared::{DREAMCAST_DISC_PRIORITY, extension_of};
//! use std::path::Path;
//!
//! assert_eq!(extension_of(Path::new("Game.CUE")).as_deref(), Some(".cue"));
//! assert_eq!(DREAMCAST_DISC_PRIORITY[2], ".cue");
//! ```

use std::path::Path;

/// Archive formats that are extracted before launch.
pub const COMPRESSED_EXTENSIONS: &[&str] = &[".zip", ".7z", ".squashfs"];

/// Dreamcast disc-image formats, highest priority first.
pub const DREAMCAST_DISC_PRIORITY: &[&str] = &[".mds", ".mdf", ".cue", ".cdi", ".gdi", ".chd"];

/// Playlist extension (a text file holding a single path).
pub const PLAYLIST_EXTENSION: &str = ".m3u";

/// Boot executable searched for in PS3 game folders.
pub const PS3_BOOT_FILE: &str = "EBOOT.BIN";

/// Lowercased extension of `path`, including the leading dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}

/// Whether `path` names an archive that must be extracted.
pub fn is_compressed(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| COMPRESSED_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether `path` names a playlist file.
pub fn is_playlist(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| ext == PLAYLIST_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased_with_dot() {
        assert_eq!(extension_of(Path::new("a/b/DISC.GDI")).as_deref(), Some(".gdi"));
        assert_eq!(extension_of(Path::new("noext")), None);
    }

    #[test]
    fn test_compressed_detection() {
        assert!(is_compressed(Path::new("game.zip")));
        assert!(is_compressed(Path::new("game.7Z")));
        assert!(is_compressed(Path::new("game.squashfs")));
        assert!(!is_compressed(Path::new("game.cue")));
    }

    #[test]
    fn test_playlist_detection() {
        assert!(is_playlist(Path::new("set/list.m3u")));
        assert!(is_playlist(Path::new("set/LIST.M3U")));
        assert!(!is_playlist(Path::new("set/list.m3u8")));
    }

    #[test]
    fn test_dreamcast_priority_order() {
        assert_eq!(
            DREAMCAST_DISC_PRIORITY,
            &[".mds", ".mdf", ".cue", ".cdi", ".gdi", ".chd"]
        );
    }
}
