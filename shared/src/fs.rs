//! Size-capped reads of small text files (playlists, emulator configs).

use std::io;
use std::path::{Path, PathBuf};

/// Maximum allowed size for a playlist (`.m3u`) file.
pub const MAX_PLAYLIST_BYTES: u64 = 64 * 1024; // 64 KiB
/// Maximum allowed size for an emulator configuration document.
pub const MAX_CONFIG_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

#[derive(Debug, thiserror::Error)]
pub enum LimitedReadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("File too large: {} ({len} bytes, max {max} bytes)", .path.display())]
    TooLarge { path: PathBuf, len: u64, max: u64 },
}

impl LimitedReadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Flatten into an `io::Error`; oversized files become `InvalidData`.
    pub fn into_io(self) -> io::Error {
        match self {
            Self::Io { source, .. } => source,
            too_large @ Self::TooLarge { .. } => {
                io::Error::new(io::ErrorKind::InvalidData, too_large.to_string())
            }
        }
    }
}

/// Read a file into memory with a size cap.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>, LimitedReadError> {
    let io_err = |source| LimitedReadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let len = std::fs::metadata(path).map_err(io_err)?.len();
    if len > max_bytes {
        return Err(LimitedReadError::TooLarge {
            path: path.to_path_buf(),
            len,
            max: max_bytes,
        });
    }
    std::fs::read(path).map_err(io_err)
}

/// Read a text file with a size cap, replacing invalid UTF-8 and stripping a BOM.
pub fn read_text_with_limit(path: &Path, max_bytes: u64) -> Result<String, LimitedReadError> {
    let bytes = read_file_with_limit(path, max_bytes)?;
    Ok(decode_text(&bytes))
}

/// Decode bytes as UTF-8 (lossy), dropping a leading byte order mark.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_start_matches('\u{feff}').to_string()
}
