//! Name-indexed lookup of module declarations.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::cancel::{Cancelled, check_cancelled};
use super::ids::ElementId;
use super::input::RootId;
use super::scope::SearchScope;
use crate::base::{FileId, Interner, Name, TextRange};

/// A module declared somewhere in the project.
///
/// Identity is the declaring element, not the name: two files declaring
/// `com.foo` yield two distinct declarations.
#[derive(Clone, Debug)]
pub struct ModuleDeclaration {
    pub id: ElementId,
    pub name: SmolStr,
    pub name_range: TextRange,
    pub root: RootId,
    pub is_open: bool,
}

impl ModuleDeclaration {
    pub fn file(&self) -> FileId {
        self.id.file
    }
}

impl PartialEq for ModuleDeclaration {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModuleDeclaration {}

impl Hash for ModuleDeclaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Finds module declarations by name within a scope.
///
/// This is the seam between the resolver and whatever indexes the project.
pub trait ModuleFinder: Send + Sync {
    fn find_modules(
        &self,
        name: &str,
        scope: &SearchScope,
        cancel: &CancellationToken,
    ) -> Result<Vec<ModuleDeclaration>, Cancelled>;
}

/// Index of every module declaration in the project, keyed by name.
#[derive(Debug, Default)]
pub struct ModuleIndex {
    names: Interner,
    by_name: FxHashMap<Name, IndexMap<ElementId, ModuleDeclaration>>,
    by_file: FxHashMap<FileId, Vec<(Name, ElementId)>>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the declarations of `file`.
    pub fn set_file(&mut self, file: FileId, declarations: Vec<ModuleDeclaration>) {
        self.remove_file(file);

        let mut entries = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            debug_assert_eq!(declaration.file(), file);
            let name = self.names.intern(&declaration.name);
            entries.push((name, declaration.id));
            self.by_name
                .entry(name)
                .or_default()
                .insert(declaration.id, declaration);
        }
        if !entries.is_empty() {
            self.by_file.insert(file, entries);
        }
    }

    pub fn remove_file(&mut self, file: FileId) {
        let Some(entries) = self.by_file.remove(&file) else {
            return;
        };
        for (name, id) in entries {
            if let Some(declarations) = self.by_name.get_mut(&name) {
                declarations.shift_remove(&id);
                if declarations.is_empty() {
                    self.by_name.remove(&name);
                }
            }
        }
    }

    /// Declarations of `name` anywhere in the project.
    pub fn declarations(&self, name: &str) -> Vec<&ModuleDeclaration> {
        self.names
            .get_existing(name)
            .and_then(|name| self.by_name.get(&name))
            .map(|declarations| declarations.values().collect())
            .unwrap_or_default()
    }

    /// Declarations in `file`.
    pub fn declarations_in_file(&self, file: FileId) -> Vec<&ModuleDeclaration> {
        self.by_file
            .get(&file)
            .into_iter()
            .flatten()
            .filter_map(|(name, id)| self.by_name.get(name)?.get(id))
            .collect()
    }

    /// Number of distinct declared names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl ModuleFinder for ModuleIndex {
    fn find_modules(
        &self,
        name: &str,
        scope: &SearchScope,
        cancel: &CancellationToken,
    ) -> Result<Vec<ModuleDeclaration>, Cancelled> {
        check_cancelled(cancel)?;
        if scope.is_empty() {
            return Ok(Vec::new());
        }
        let Some(candidates) = self
            .names
            .get_existing(name)
            .and_then(|n| self.by_name.get(&n))
        else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for declaration in candidates.values() {
            check_cancelled(cancel)?;
            if scope.contains_root(declaration.root) {
                found.push(declaration.clone());
            }
        }
        found.sort_by_key(|d| (d.id.file, d.name_range.start()));

        debug!(
            name,
            candidates = candidates.len(),
            found = found.len(),
            "module lookup"
        );
        Ok(found)
    }
}
