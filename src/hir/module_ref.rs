//! Module references and their cached resolution.
//!
//! A module reference is the name in `requires m;` or in the `to` list of an
//! `exports`/`opens` directive. Resolving it means finding the module
//! declarations with that name that are visible from the referencing file:
//!
//! - complete code looks in the file's resolve scope only,
//! - incomplete code (a descriptor with syntax errors) looks in the whole
//!   project, so that half-typed files still navigate somewhere useful.
//!
//! Results are memoized per owning element in two slots, one per
//! completeness flag, and dropped whenever the structural modification stamp
//! advances.

use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::cache::{CacheKey, CachedValues};
use super::cancel::Cancelled;
use super::ids::ElementId;
use super::input::ProjectRoots;
use super::modification::ModificationTracker;
use super::module_index::{ModuleDeclaration, ModuleFinder};
use crate::base::{FileId, TextRange};
use crate::syntax::{ModuleRefKind, module_from_text};

pub const RESOLVE_COMPLETE: CacheKey = CacheKey::new("module.ref.resolve.complete");
pub const RESOLVE_INCOMPLETE: CacheKey = CacheKey::new("module.ref.resolve.incomplete");

/// Cached lookup result, tagged with the text it was computed for.
#[derive(Clone, Debug)]
pub struct ResolvedModules {
    text: SmolStr,
    modules: Arc<[ModuleDeclaration]>,
}

pub type ResolveCache = CachedValues<ResolvedModules>;

// ============================================================================
// RESOLVE RESULT
// ============================================================================

/// Outcome of resolving one reference, with ambiguity kept visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    Found(ModuleDeclaration),
    Ambiguous(Vec<ModuleDeclaration>),
    NotFound,
}

impl ResolveResult {
    fn from_candidates(candidates: &[ModuleDeclaration]) -> Self {
        match candidates {
            [] => ResolveResult::NotFound,
            [single] => ResolveResult::Found(single.clone()),
            many => ResolveResult::Ambiguous(many.to_vec()),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolveResult::Ambiguous(_))
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves module names for reference owners, memoizing per owner.
///
/// Borrowing everything keeps the resolver cheap to create per request; the
/// cache and tracker outlive it.
#[derive(Clone, Copy)]
pub struct ModuleResolver<'a> {
    finder: &'a dyn ModuleFinder,
    roots: &'a ProjectRoots,
    cache: &'a ResolveCache,
    tracker: &'a ModificationTracker,
    cancel: &'a CancellationToken,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(
        finder: &'a dyn ModuleFinder,
        roots: &'a ProjectRoots,
        cache: &'a ResolveCache,
        tracker: &'a ModificationTracker,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            finder,
            roots,
            cache,
            tracker,
            cancel,
        }
    }

    /// The unique declaration `ref_text` resolves to.
    ///
    /// Zero matches and several matches both give `None`; use
    /// [`resolve_result`](Self::resolve_result) to tell them apart.
    pub fn resolve(
        &self,
        owner: ElementId,
        ref_text: &str,
        incomplete_code: bool,
    ) -> Result<Option<ModuleDeclaration>, Cancelled> {
        let modules = self.multi_resolve(owner, ref_text, incomplete_code)?;
        Ok(match &*modules {
            [single] => Some(single.clone()),
            _ => None,
        })
    }

    pub fn resolve_result(
        &self,
        owner: ElementId,
        ref_text: &str,
        incomplete_code: bool,
    ) -> Result<ResolveResult, Cancelled> {
        let modules = self.multi_resolve(owner, ref_text, incomplete_code)?;
        Ok(ResolveResult::from_candidates(&modules))
    }

    /// Every declaration `ref_text` may refer to, seen from `owner`'s file.
    ///
    /// Blank text resolves to nothing without consulting the cache.
    pub fn multi_resolve(
        &self,
        owner: ElementId,
        ref_text: &str,
        incomplete_code: bool,
    ) -> Result<Arc<[ModuleDeclaration]>, Cancelled> {
        if ref_text.trim().is_empty() {
            return Ok(Arc::from([]));
        }

        let key = if incomplete_code {
            RESOLVE_INCOMPLETE
        } else {
            RESOLVE_COMPLETE
        };

        let resolved = self.cache.get_or_compute_matching(
            owner,
            key,
            self.tracker,
            |cached| cached.text == ref_text,
            || {
                let modules = self.find_modules(owner.file, ref_text, incomplete_code)?;
                Ok(ResolvedModules {
                    text: SmolStr::new(ref_text),
                    modules: modules.into(),
                })
            },
        )?;
        Ok(Arc::clone(&resolved.modules))
    }

    fn find_modules(
        &self,
        file: FileId,
        name: &str,
        incomplete_code: bool,
    ) -> Result<Vec<ModuleDeclaration>, Cancelled> {
        let scope = if incomplete_code {
            self.roots.project_scope()
        } else {
            self.roots.resolve_scope(file)
        };
        debug!(?file, name, incomplete_code, "resolving module reference");
        self.finder.find_modules(name, &scope, self.cancel)
    }
}

// ============================================================================
// MODULE REFERENCE
// ============================================================================

/// A module name used inside a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleReference {
    pub owner: ElementId,
    pub text: SmolStr,
    pub range: TextRange,
    pub kind: ModuleRefKind,
}

impl ModuleReference {
    pub fn file(&self) -> FileId {
        self.owner.file
    }

    pub fn canonical_text(&self) -> &str {
        &self.text
    }

    /// Completion variants. Module references offer none.
    pub fn variants(&self) -> Vec<SmolStr> {
        Vec::new()
    }

    pub fn multi_resolve(
        &self,
        resolver: &ModuleResolver<'_>,
        incomplete_code: bool,
    ) -> Result<Arc<[ModuleDeclaration]>, Cancelled> {
        resolver.multi_resolve(self.owner, &self.text, incomplete_code)
    }

    pub fn resolve(
        &self,
        resolver: &ModuleResolver<'_>,
        incomplete_code: bool,
    ) -> Result<Option<ModuleDeclaration>, Cancelled> {
        resolver.resolve(self.owner, &self.text, incomplete_code)
    }

    /// Build the edit that renames this reference to `new_name`.
    ///
    /// The new name must parse as the name of `module <new_name> {}`.
    pub fn handle_rename(
        &self,
        new_name: &str,
        roots: &ProjectRoots,
    ) -> Result<TextEdit, EditError> {
        let file = self.file();
        if roots.kind_of(file).is_some_and(|kind| kind.is_read_only()) {
            let path = roots
                .path(file)
                .map_or_else(|| file.to_string(), str::to_owned);
            return Err(EditError::ReadOnly { path });
        }

        match module_from_text(&format!("module {new_name} {{}}")) {
            Some(parsed) if parsed == new_name => Ok(TextEdit {
                file,
                range: self.range,
                new_text: parsed,
            }),
            _ => Err(EditError::InvalidName {
                name: new_name.to_owned(),
            }),
        }
    }
}

/// A replacement of one range of one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub file: FileId,
    pub range: TextRange,
    pub new_text: SmolStr,
}

/// Why an edit of a module reference was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("cannot edit read-only source unit '{path}'")]
    ReadOnly { path: String },
    #[error("'{name}' is not a valid module name")]
    InvalidName { name: String },
    #[error("no module reference at the given position")]
    NoReference,
}
