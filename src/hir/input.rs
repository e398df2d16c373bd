//! Project structure: source roots, their kinds, and their dependencies.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;

use super::scope::SearchScope;
use crate::base::FileId;

/// Identifier of a [`SourceRoot`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RootId(pub u32);

impl fmt::Debug for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RootId({})", self.0)
    }
}

/// Where the files of a root come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SourceKind {
    /// Editable project sources.
    #[default]
    Source,
    /// Library sources attached to the project.
    Library,
    /// Descriptors recovered from compiled artifacts. Read-only.
    Compiled,
}

impl SourceKind {
    pub fn is_read_only(self) -> bool {
        self == SourceKind::Compiled
    }
}

/// A group of files of one kind, plus the roots it can see.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceRoot {
    kind: SourceKind,
    /// FileId → path, for display and error messages.
    files: IndexMap<FileId, Arc<str>>,
    dependencies: IndexSet<RootId>,
}

impl SourceRoot {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn insert(&mut self, file: FileId, path: impl Into<Arc<str>>) {
        self.files.insert(file, path.into());
    }

    pub fn remove(&mut self, file: FileId) -> Option<Arc<str>> {
        self.files.shift_remove(&file)
    }

    pub fn path(&self, file: FileId) -> Option<&str> {
        self.files.get(&file).map(|s| s.as_ref())
    }

    pub fn contains(&self, file: FileId) -> bool {
        self.files.contains_key(&file)
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &str)> + '_ {
        self.files.iter().map(|(&id, path)| (id, path.as_ref()))
    }

    pub fn dependencies(&self) -> impl Iterator<Item = RootId> + '_ {
        self.dependencies.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// All roots of the project.
#[derive(Clone, Debug, Default)]
pub struct ProjectRoots {
    roots: IndexMap<RootId, SourceRoot>,
    file_roots: IndexMap<FileId, RootId>,
    next_id: u32,
}

impl ProjectRoots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, kind: SourceKind) -> RootId {
        let id = RootId(self.next_id);
        self.next_id += 1;
        self.roots.insert(id, SourceRoot::new(kind));
        id
    }

    /// Let `root` see the declarations of `dependency`.
    ///
    /// Returns `false` if either root is unknown or the edge already existed.
    pub fn add_dependency(&mut self, root: RootId, dependency: RootId) -> bool {
        if root == dependency || !self.roots.contains_key(&dependency) {
            return false;
        }
        match self.roots.get_mut(&root) {
            Some(source_root) => source_root.dependencies.insert(dependency),
            None => false,
        }
    }

    pub fn root(&self, id: RootId) -> Option<&SourceRoot> {
        self.roots.get(&id)
    }

    /// Place `file` in `root`, moving it out of any root it was in.
    ///
    /// Returns `false` if `root` does not exist.
    pub fn insert_file(&mut self, root: RootId, file: FileId, path: impl Into<Arc<str>>) -> bool {
        if !self.roots.contains_key(&root) {
            return false;
        }
        if let Some(previous) = self.file_roots.insert(file, root) {
            if previous != root {
                if let Some(old) = self.roots.get_mut(&previous) {
                    old.remove(file);
                }
            }
        }
        if let Some(source_root) = self.roots.get_mut(&root) {
            source_root.insert(file, path);
        }
        true
    }

    pub fn remove_file(&mut self, file: FileId) -> Option<RootId> {
        let root = self.file_roots.shift_remove(&file)?;
        if let Some(source_root) = self.roots.get_mut(&root) {
            source_root.remove(file);
        }
        Some(root)
    }

    pub fn root_of(&self, file: FileId) -> Option<RootId> {
        self.file_roots.get(&file).copied()
    }

    pub fn kind_of(&self, file: FileId) -> Option<SourceKind> {
        self.root_of(file)
            .and_then(|root| self.roots.get(&root))
            .map(SourceRoot::kind)
    }

    pub fn path(&self, file: FileId) -> Option<&str> {
        let root = self.root_of(file)?;
        self.roots.get(&root)?.path(file)
    }

    pub fn roots(&self) -> impl Iterator<Item = (RootId, &SourceRoot)> + '_ {
        self.roots.iter().map(|(&id, root)| (id, root))
    }

    /// The scope used when code is known to be incomplete.
    pub fn project_scope(&self) -> SearchScope {
        SearchScope::Project
    }

    /// The roots visible from `file`: its own root and everything reachable
    /// through dependency edges.
    pub fn resolve_scope(&self, file: FileId) -> SearchScope {
        let mut visible = FxHashSet::default();
        let mut queue: VecDeque<RootId> = self.root_of(file).into_iter().collect();

        while let Some(root) = queue.pop_front() {
            if !visible.insert(root) {
                continue;
            }
            if let Some(source_root) = self.roots.get(&root) {
                queue.extend(source_root.dependencies());
            }
        }

        SearchScope::roots(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_root_basic() {
        let mut root = SourceRoot::new(SourceKind::Library);
        let file = FileId::new(0);

        root.insert(file, "/lib/module-info.java");
        assert_eq!(root.kind(), SourceKind::Library);
        assert_eq!(root.path(file), Some("/lib/module-info.java"));

        root.remove(file);
        assert!(root.is_empty());
    }

    #[test]
    fn test_insert_file_moves_between_roots() {
        let mut roots = ProjectRoots::new();
        let a = roots.add_root(SourceKind::Source);
        let b = roots.add_root(SourceKind::Compiled);
        let file = FileId::new(0);

        assert!(roots.insert_file(a, file, "/a/module-info.java"));
        assert!(roots.insert_file(b, file, "/b/module-info.java"));

        assert_eq!(roots.root_of(file), Some(b));
        assert_eq!(roots.kind_of(file), Some(SourceKind::Compiled));
        assert!(!roots.root(a).unwrap().contains(file));
        assert!(!roots.insert_file(RootId(99), file, "/x"));
    }

    #[test]
    fn test_resolve_scope_follows_dependencies_transitively() {
        let mut roots = ProjectRoots::new();
        let app = roots.add_root(SourceKind::Source);
        let lib = roots.add_root(SourceKind::Library);
        let jdk = roots.add_root(SourceKind::Compiled);
        let other = roots.add_root(SourceKind::Source);
        assert!(roots.add_dependency(app, lib));
        assert!(roots.add_dependency(lib, jdk));
        assert!(roots.add_dependency(jdk, app)); // cycles are fine

        let file = FileId::new(0);
        roots.insert_file(app, file, "/app/module-info.java");

        let scope = roots.resolve_scope(file);
        assert!(scope.contains_root(app));
        assert!(scope.contains_root(lib));
        assert!(scope.contains_root(jdk));
        assert!(!scope.contains_root(other));
    }

    #[test]
    fn test_add_dependency_rejects_unknown_and_self() {
        let mut roots = ProjectRoots::new();
        let a = roots.add_root(SourceKind::Source);
        assert!(!roots.add_dependency(a, a));
        assert!(!roots.add_dependency(a, RootId(7)));
        assert!(!roots.add_dependency(RootId(7), a));
    }

    #[test]
    fn test_unknown_file_has_empty_scope() {
        let roots = ProjectRoots::new();
        assert!(roots.resolve_scope(FileId::new(5)).is_empty());
    }
}
