//! Path ↔ FileId bookkeeping and file contents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::base::FileId;

/// Assigns stable [`FileId`]s to paths and stores the latest text of each file.
///
/// A path keeps its `FileId` for the lifetime of the set, even across
/// [`FileSet::remove`], so cache keys built from an old id never alias a
/// different file.
#[derive(Debug, Default)]
pub struct FileSet {
    inner: RwLock<FileSetInner>,
}

#[derive(Debug, Default)]
struct FileSetInner {
    ids: IndexMap<PathBuf, FileId>,
    paths: IndexMap<FileId, PathBuf>,
    contents: IndexMap<FileId, Arc<str>>,
    next_id: u32,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id of `path`, assigning a fresh one on first sight.
    pub fn file_id(&self, path: &Path) -> FileId {
        if let Some(id) = self.lookup(path) {
            return id;
        }

        let mut inner = self.inner.write();
        if let Some(&id) = inner.ids.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.ids.insert(path.to_owned(), id);
        inner.paths.insert(id, path.to_owned());
        id
    }

    /// Get the id of `path` without assigning one.
    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.inner.read().ids.get(path).copied()
    }

    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().paths.get(&file).cloned()
    }

    /// Store new text for `file`, returning the previous text.
    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) -> Option<Arc<str>> {
        self.inner.write().contents.insert(file, contents.into())
    }

    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().contents.get(&file).cloned()
    }

    /// Drop the contents of `file`. Its id stays reserved for its path.
    pub fn remove(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.write().contents.shift_remove(&file)
    }

    /// Number of files that currently have contents.
    pub fn len(&self) -> usize {
        self.inner.read().contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all files that currently have contents, in insertion order.
    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().contents.keys().copied().collect()
    }
}
