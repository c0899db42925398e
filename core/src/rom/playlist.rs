use std::path::{Path, PathBuf};

use emulauncher_shared::fs::{MAX_PLAYLIST_BYTES, read_text_with_limit};

use crate::error::LaunchError;

/// Read the entry `playlist` points at and resolve it.
///
/// Only the first non-empty line is used; the result is not resolved again
/// even if it is itself a playlist.
pub fn read_playlist_entry(playlist: &Path, fallback_root: &Path) -> Result<PathBuf, LaunchError> {
    let text = read_text_with_limit(playlist, MAX_PLAYLIST_BYTES).map_err(|e| LaunchError::Io {
        path: playlist.to_path_buf(),
        source: e.into_io(),
    })?;
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    let resolved = resolve_playlist_line(
        line,
        parent_str(&playlist.to_string_lossy()),
        &fallback_root.to_string_lossy(),
    );
    Ok(PathBuf::from(resolved))
}

/// Resolve one playlist line.
///
/// `./x` and `.\x` are relative to the playlist's directory, `/x` and `\x` to
/// `fallback_root`; anything else is used verbatim. Works on path strings so
/// that either separator style resolves the same on every host.
///
/// ```
/// use emulauncher_core::rom::resolve_playlist_line;
///
/// assert_eq!(
///     resolve_playlist_line("./disc1.cue", r"C:\games\set", "/saves"),
///     r"C:\games\set\disc1.cue"
/// );
/// assert_eq!(resolve_playlist_line("/disc1.cue", r"C:\games\set", "/saves"), "/saves/disc1.cue");
/// ```
pub fn resolve_playlist_line(line: &str, playlist_dir: &str, fallback_root: &str) -> String {
    if let Some(rest) = line.strip_prefix("./").or_else(|| line.strip_prefix(".\\")) {
        return join(playlist_dir, rest);
    }
    if let Some(rest) = line.strip_prefix('/').or_else(|| line.strip_prefix('\\')) {
        return join(fallback_root, rest);
    }
    line.to_string()
}

fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        return rest.to_string();
    }
    let separator = if base.contains('\\') && !base.contains('/') {
        '\\'
    } else {
        '/'
    };
    let base = base.trim_end_matches(['/', '\\']);
    format!("{base}{separator}{rest}")
}

fn parent_str(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(0) => &path[..1],
        Some(index) => &path[..index],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_windows_playlist_relative_entry() {
        let playlist = r"C:\games\set\list.m3u";
        assert_eq!(
            resolve_playlist_line("./disc1.cue", parent_str(playlist), r"D:\saves"),
            r"C:\games\set\disc1.cue"
        );
        assert_eq!(
            resolve_playlist_line(r".\disc1.cue", parent_str(playlist), r"D:\saves"),
            r"C:\games\set\disc1.cue"
        );
    }

    #[test]
    fn test_absolute_marker_uses_fallback_root() {
        assert_eq!(
            resolve_playlist_line("/disc1.cue", r"C:\games\set", r"D:\saves\ps3\rpcs3"),
            r"D:\saves\ps3\rpcs3\disc1.cue"
        );
        assert_eq!(
            resolve_playlist_line(r"\dev_hdd0\game\EBOOT.BIN", "/roms", "/saves/ps3/rpcs3/"),
            r"/saves/ps3/rpcs3/dev_hdd0\game\EBOOT.BIN"
        );
    }

    #[test]
    fn test_other_lines_verbatim() {
        assert_eq!(resolve_playlist_line("disc1.cue", "/roms", "/saves"), "disc1.cue");
        assert_eq!(resolve_playlist_line("", "/roms", "/saves"), "");
    }

    #[test]
    fn test_parent_str() {
        assert_eq!(parent_str("/list.m3u"), "/");
        assert_eq!(parent_str("list.m3u"), "");
        assert_eq!(parent_str("/a/b/list.m3u"), "/a/b");
    }

    #[test]
    fn test_read_uses_first_non_empty_line() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("list.m3u");
        std::fs::write(&list, "\n  /disc2.cue  \n./disc1.cue\n").unwrap();

        let entry = read_playlist_entry(&list, Path::new("/saves")).unwrap();
        assert_eq!(entry, PathBuf::from("/saves/disc2.cue"));
    }

    #[test]
    fn test_read_missing_playlist_is_io_error() {
        let err = read_playlist_entry(Path::new("/nonexistent/list.m3u"), Path::new("/saves")).unwrap_err();
        assert!(matches!(err, LaunchError::Io { .. }));
    }

    #[test]
    fn test_read_oversized_playlist_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("list.m3u");
        std::fs::write(&list, vec![b'a'; MAX_PLAYLIST_BYTES as usize + 1]).unwrap();

        match read_playlist_entry(&list, Path::new("/saves")).unwrap_err() {
            LaunchError::Io { path, source } => {
                assert_eq!(path, list);
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
