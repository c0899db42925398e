use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use super::{DocumentError, DocumentFile};

/// A loaded document that is saved when it goes out of scope.
///
/// [`commit`](ScopedDocument::commit) saves explicitly and reports the error.
/// If the guard is dropped without a commit (an early return or `?` inside
/// synthesis), the document is still flushed and a failure is only logged.
pub struct ScopedDocument<D: DocumentFile> {
    document: D,
    committed: bool,
}

impl<D: DocumentFile> ScopedDocument<D> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        Ok(Self {
            document: D::load(path)?,
            committed: false,
        })
    }

    /// Save now and disarm the drop-time save.
    pub fn commit(mut self) -> Result<(), DocumentError> {
        self.committed = true;
        self.document.save()
    }
}

impl<D: DocumentFile> Deref for ScopedDocument<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.document
    }
}

impl<D: DocumentFile> DerefMut for ScopedDocument<D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.document
    }
}

impl<D: DocumentFile> Drop for ScopedDocument<D> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = self.document.save() {
            tracing::warn!("Failed to save {}: {}", self.document.path().display(), e);
        }
    }
}

/// Load `path`, run `edit` on it and save it on every exit path.
///
/// Errors from `edit` are returned after the save; a save error is returned
/// only when `edit` succeeded.
pub fn with_document<D, T, F>(path: impl Into<PathBuf>, edit: F) -> anyhow::Result<T>
where
    D: DocumentFile,
    F: FnOnce(&mut D) -> anyhow::Result<T>,
{
    let mut scoped = ScopedDocument::<D>::open(path)?;
    let value = edit(&mut *scoped)?;
    scoped.commit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ConfigDocument, IniDocument, KeyPath};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_commit_saves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("redream.cfg");

        let mut doc = ScopedDocument::<IniDocument>::open(&path).unwrap();
        doc.set_value(&KeyPath::root("vsync"), "1");
        doc.commit().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "vsync=1\n");
    }

    #[test]
    fn test_drop_saves_on_early_exit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("redream.cfg");

        let result: anyhow::Result<()> = with_document::<IniDocument, _, _>(&path, |doc| {
            doc.set_value(&KeyPath::root("fullmode"), "windowed");
            anyhow::bail!("binding failed");
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "fullmode=windowed\n");
    }
}
