//! Config document backends.
//!
//! Two shapes are supported: a flat sectioned key/value file ([`IniDocument`])
//! and a nested container tree ([`YmlDocument`]). Both load leniently (a
//! missing file is an empty document), keep unrelated entries intact and
//! write back deterministically.

mod ini;
mod scoped;
mod yml;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use emulauncher_shared::fs::{LimitedReadError, MAX_CONFIG_BYTES, read_text_with_limit};
use thiserror::Error;

pub use ini::IniDocument;
pub use scoped::{ScopedDocument, with_document};
pub use yml::{YmlContainer, YmlDocument, YmlEntry};

/// Errors from loading or saving a config document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is too large ({len} bytes)", .path.display())]
    TooLarge { path: PathBuf, len: u64 },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Address of one key: a chain of container (or section) names plus the key.
///
/// For flat documents the scope is joined with `/` into a section name and the
/// empty scope is the root section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    pub scope: Vec<String>,
    pub key: String,
}

impl KeyPath {
    pub fn new<I, S>(scope: I, key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope: scope.into_iter().map(Into::into).collect(),
            key: key.into(),
        }
    }

    /// A key in the root section / root container.
    pub fn root(key: impl Into<String>) -> Self {
        Self {
            scope: Vec::new(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in &self.scope {
            write!(f, "{}/", part)?;
        }
        f.write_str(&self.key)
    }
}

/// Helper for declaring many keys under the same scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope(Vec<String>);

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Single section (flat documents) or top-level container.
    pub fn section(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut names = self.0.clone();
        names.push(name.into());
        Self(names)
    }

    pub fn key(&self, key: impl Into<String>) -> KeyPath {
        KeyPath {
            scope: self.0.clone(),
            key: key.into(),
        }
    }
}

/// In-memory key/value access shared by both document shapes.
pub trait ConfigDocument {
    fn value(&self, path: &KeyPath) -> Option<&str>;

    /// Write one key, creating intermediate sections or containers as needed.
    fn set_value(&mut self, path: &KeyPath, value: &str);
}

/// A config document bound to a file on disk.
pub trait DocumentFile: ConfigDocument + Sized {
    /// Parse `text` as a document that will be saved to `path`.
    fn parse(path: PathBuf, text: &str) -> Self;

    /// Path the document saves to.
    fn path(&self) -> &Path;

    /// Serialize the whole document.
    fn to_text(&self) -> String;

    /// Load `path`; a missing file yields an empty document.
    fn load(path: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let path = path.into();
        let text = match read_document_text(&path)? {
            Some(text) => text,
            None => String::new(),
        };
        Ok(Self::parse(path, &text))
    }

    /// Write the document, creating parent directories.
    ///
    /// The file is left untouched when its content would not change.
    fn save(&self) -> Result<(), DocumentError> {
        let path = self.path();
        let text = self.to_text();

        if let Some(existing) = read_document_text(path)?
            && existing == text
        {
            tracing::debug!("{} unchanged", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| DocumentError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Wrote {}", path.display());
        Ok(())
    }
}

fn read_document_text(path: &Path) -> Result<Option<String>, DocumentError> {
    match read_text_with_limit(path, MAX_CONFIG_BYTES) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(LimitedReadError::TooLarge { path, len, .. }) => Err(DocumentError::TooLarge { path, len }),
        Err(LimitedReadError::Io { path, source }) => Err(DocumentError::Read { path, source }),
    }
}
