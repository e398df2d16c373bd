//! Identifiers for syntax elements that own references or declare modules.

use std::fmt;

use crate::base::FileId;

/// A globally unique identifier for an element of a descriptor file.
///
/// Combines the file with a file-local index. Cache entries and module
/// declarations are keyed by `ElementId`, so two declarations of the same
/// module name in different files stay distinct.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId {
    pub file: FileId,
    pub local: LocalElementId,
}

impl ElementId {
    #[inline]
    pub const fn new(file: FileId, local: LocalElementId) -> Self {
        Self { file, local }
    }

    /// The element holding the file's module name.
    #[inline]
    pub const fn module_name(file: FileId) -> Self {
        Self::new(file, LocalElementId::MODULE_NAME)
    }

    /// The element of the `ordinal`-th module reference of a file.
    #[inline]
    pub const fn reference(file: FileId, ordinal: u32) -> Self {
        Self::new(file, LocalElementId(ordinal + 1))
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({:?}:{})", self.file, self.local.0)
    }
}

/// A file-local element index.
///
/// Index 0 is the module name; references are numbered from 1 in source
/// order. Indices are stable across re-parses as long as the reference order
/// does not change.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LocalElementId(pub u32);

impl LocalElementId {
    pub const MODULE_NAME: LocalElementId = LocalElementId(0);

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LocalElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalElementId({})", self.0)
    }
}
