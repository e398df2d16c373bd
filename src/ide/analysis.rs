//! `AnalysisHost`: owns the project state and answers IDE queries.
//!
//! Mutations go through `&mut self` and decide whether an edit is
//! *structural*. Only structural edits advance the stamp that invalidates
//! cached module resolution; an edit that only moves comments or whitespace
//! around inside a module body keeps every cache entry alive.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::base::{FileId, TextRange, TextSize};
use crate::hir::{
    CacheStats, Cancelled, Diagnostic, FileSet, ModificationTracker, ModuleDeclaration, ModuleIndex,
    ModuleReference, ModuleResolver, ProjectRoots, ResolveCache, RootId, SourceKind,
    diagnostics::ModuleChecker, module_declaration, module_references,
};
use crate::syntax::{ModuleRefKind, Parse, parse};

/// Options for an [`AnalysisHost`].
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Report modules declared more than once in the project.
    pub report_duplicates: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            report_duplicates: true,
        }
    }
}

/// The part of a parse that decides what module references resolve to.
#[derive(Clone, Debug, PartialEq, Eq)]
struct StructuralShape {
    is_open: bool,
    name: Option<(SmolStr, TextRange)>,
    references: Vec<(ModuleRefKind, SmolStr)>,
    incomplete: bool,
}

impl StructuralShape {
    fn of(parse: &Parse) -> Option<Self> {
        let descriptor = parse.descriptor.as_ref()?;
        Some(Self {
            is_open: descriptor.is_open,
            name: descriptor
                .name
                .as_ref()
                .map(|name| (name.text.clone(), name.range)),
            references: descriptor
                .module_refs()
                .map(|(kind, name)| (kind, name.text.clone()))
                .collect(),
            incomplete: parse.has_errors(),
        })
    }
}

/// Project state plus the caches derived from it.
#[derive(Debug, Default)]
pub struct AnalysisHost {
    config: AnalysisConfig,
    files: FileSet,
    roots: ProjectRoots,
    index: ModuleIndex,
    parses: FxHashMap<FileId, Arc<Parse>>,
    tracker: Arc<ModificationTracker>,
    cache: ResolveCache,
}

impl AnalysisHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn add_root(&mut self, kind: SourceKind) -> RootId {
        let root = self.roots.add_root(kind);
        self.structural_change();
        root
    }

    /// Make the declarations of `dependency` visible from `root`.
    pub fn add_root_dependency(&mut self, root: RootId, dependency: RootId) -> bool {
        let added = self.roots.add_dependency(root, dependency);
        if added {
            self.structural_change();
        }
        added
    }

    /// Add or update a file. Returns `None` if `root` does not exist.
    pub fn set_file_content(
        &mut self,
        root: RootId,
        path: impl AsRef<Path>,
        text: impl Into<Arc<str>>,
    ) -> Option<FileId> {
        let path = path.as_ref();
        self.roots.root(root)?;

        let file = self.files.file_id(path);
        let text: Arc<str> = text.into();
        let previous_root = self.roots.root_of(file);
        self.roots
            .insert_file(root, file, path.to_string_lossy().into_owned());

        let new_parse = Arc::new(parse(&text));
        let new_shape = StructuralShape::of(&new_parse);
        let structural = previous_root != Some(root)
            || self
                .parses
                .get(&file)
                .is_none_or(|old| StructuralShape::of(old) != new_shape);

        let declarations = new_parse
            .descriptor
            .as_ref()
            .and_then(|descriptor| module_declaration(file, root, descriptor))
            .into_iter()
            .collect();
        self.index.set_file(file, declarations);
        self.files.set_contents(file, text);
        self.parses.insert(file, new_parse);

        if structural {
            self.structural_change();
        } else {
            self.tracker.inc_modification();
        }
        debug!(?file, structural, "file updated");
        Some(file)
    }

    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> Option<FileId> {
        let file = self.files.lookup(path.as_ref())?;
        self.files.remove(file)?;
        self.roots.remove_file(file);
        self.index.remove_file(file);
        self.parses.remove(&file);
        self.structural_change();
        info!(path = %path.as_ref().display(), "file removed");
        Some(file)
    }

    fn structural_change(&self) {
        self.tracker.inc_structural();
        self.cache.retain_valid(&self.tracker);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn file_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.files.lookup(path.as_ref())
    }

    pub fn file_text(&self, file: FileId) -> Option<Arc<str>> {
        self.files.contents(file)
    }

    pub fn files(&self) -> Vec<FileId> {
        self.files.files()
    }

    pub fn file_set(&self) -> &FileSet {
        &self.files
    }

    pub fn parse(&self, file: FileId) -> Option<Arc<Parse>> {
        self.parses.get(&file).cloned()
    }

    pub fn roots(&self) -> &ProjectRoots {
        &self.roots
    }

    pub fn module_index(&self) -> &ModuleIndex {
        &self.index
    }

    pub fn tracker(&self) -> &Arc<ModificationTracker> {
        &self.tracker
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// A resolver over the current state that observes `cancel`.
    pub fn resolver<'a>(&'a self, cancel: &'a CancellationToken) -> ModuleResolver<'a> {
        ModuleResolver::new(&self.index, &self.roots, &self.cache, &self.tracker, cancel)
    }

    /// Is the file's descriptor known to be incomplete (has syntax errors)?
    pub fn is_incomplete(&self, file: FileId) -> bool {
        self.parses
            .get(&file)
            .is_some_and(|parse| parse.has_errors())
    }

    pub fn module_declaration(&self, file: FileId) -> Option<ModuleDeclaration> {
        let declarations = self.index.declarations_in_file(file);
        declarations.first().copied().cloned()
    }

    pub fn module_references(&self, file: FileId) -> Vec<ModuleReference> {
        self.parses
            .get(&file)
            .and_then(|parse| parse.descriptor.as_ref())
            .map(|descriptor| module_references(file, descriptor))
            .unwrap_or_default()
    }

    /// The reference whose range contains `offset` (end inclusive, so a
    /// cursor just after the name still hits it).
    pub fn reference_at(&self, file: FileId, offset: TextSize) -> Option<ModuleReference> {
        self.module_references(file)
            .into_iter()
            .find(|reference| reference.range.contains_inclusive(offset))
    }

    pub fn diagnostics(
        &self,
        file: FileId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, Cancelled> {
        let (Some(text), Some(parse)) = (self.files.contents(file), self.parses.get(&file)) else {
            return Ok(Vec::new());
        };
        let resolver = self.resolver(cancel);
        let mut checker = ModuleChecker::new(&resolver, &self.index)
            .report_duplicates(self.config.report_duplicates);
        checker.check_file(file, &text, parse)?;
        Ok(checker.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with_root() -> (AnalysisHost, RootId) {
        let mut host = AnalysisHost::new();
        let root = host.add_root(SourceKind::Source);
        (host, root)
    }

    #[test]
    fn test_set_file_content_indexes_declaration() {
        let (mut host, root) = host_with_root();
        let file = host
            .set_file_content(root, "/a/module-info.java", "module com.a {}")
            .unwrap();

        assert_eq!(host.module_declaration(file).unwrap().name, "com.a");
        assert_eq!(host.file_id("/a/module-info.java"), Some(file));
        assert_eq!(host.file_text(file).as_deref(), Some("module com.a {}"));
    }

    #[test]
    fn test_unknown_root_is_rejected() {
        let mut host = AnalysisHost::new();
        let file = host.set_file_content(RootId(3), "/x", "module x {}");
        assert!(file.is_none());
    }

    #[test]
    fn test_comment_edit_is_not_structural() {
        let (mut host, root) = host_with_root();
        host.set_file_content(root, "/a", "module a { requires b; }");
        let stamp = host.tracker().structural_modification_count();

        host.set_file_content(root, "/a", "module a { requires b; // note\n }");
        assert_eq!(host.tracker().structural_modification_count(), stamp);
        assert_eq!(host.tracker().modification_count(), 3);
    }

    #[test]
    fn test_block_comment_edit_is_not_structural() {
        let (mut host, root) = host_with_root();
        host.set_file_content(root, "/a", "module a { requires lib; }");
        let stamp = host.tracker().structural_modification_count();

        let file = host
            .set_file_content(root, "/a", "module a { /* x */ requires lib; }")
            .unwrap();
        assert_eq!(host.tracker().structural_modification_count(), stamp);
        assert!(!host.is_incomplete(file));
    }

    #[test]
    fn test_reference_edit_is_structural() {
        let (mut host, root) = host_with_root();
        host.set_file_content(root, "/a", "module a { requires b; }");
        let stamp = host.tracker().structural_modification_count();

        host.set_file_content(root, "/a", "module a { requires c; }");
        assert_eq!(host.tracker().structural_modification_count(), stamp + 1);
    }

    #[test]
    fn test_remove_file() {
        let (mut host, root) = host_with_root();
        let file = host.set_file_content(root, "/a", "module a {}").unwrap();

        assert_eq!(host.remove_file("/a"), Some(file));
        assert!(host.module_index().is_empty());
        assert!(host.parse(file).is_none());
        assert!(host.remove_file("/a").is_none());
    }

    #[test]
    fn test_reference_at_offset() {
        let (mut host, root) = host_with_root();
        let text = "module a { requires b.c; }";
        let file = host.set_file_content(root, "/a", text).unwrap();

        let start = text.find("b.c").unwrap() as u32;
        let reference = host.reference_at(file, TextSize::from(start + 3)).unwrap();
        assert_eq!(reference.canonical_text(), "b.c");
        assert!(host.reference_at(file, TextSize::from(0)).is_none());
    }

    #[test]
    fn test_diagnostics_respect_config() {
        let mut host = AnalysisHost::with_config(AnalysisConfig {
            report_duplicates: false,
        });
        let root = host.add_root(SourceKind::Source);
        host.set_file_content(root, "/a", "module dup {}");
        let file = host.set_file_content(root, "/b", "module dup {}").unwrap();

        let cancel = CancellationToken::new();
        assert!(host.diagnostics(file, &cancel).unwrap().is_empty());
    }
}
