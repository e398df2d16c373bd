//! High-level semantic model for module descriptors.
//!
//! ## Layers
//!
//! - [`ProjectRoots`], [`FileSet`] - what files exist and who sees whom
//! - [`ModuleIndex`] - name → module declarations
//! - [`ModuleResolver`] - cached resolution of module references
//! - [`diagnostics`] - unresolved, ambiguous, and duplicate modules

mod cache;
mod cancel;
pub mod diagnostics;
mod ids;
mod input;
mod lower;
mod modification;
mod module_index;
mod module_ref;
mod scope;
mod source;

pub use cache::{CacheKey, CacheStats, CachedValues};
pub use cancel::{Cancelled, check_cancelled};
pub use diagnostics::{Diagnostic, RelatedInfo, Severity, check_file};
pub use ids::{ElementId, LocalElementId};
pub use input::{ProjectRoots, RootId, SourceKind, SourceRoot};
pub use lower::{module_declaration, module_references};
pub use modification::ModificationTracker;
pub use module_index::{ModuleDeclaration, ModuleFinder, ModuleIndex};
pub use module_ref::{
    EditError, ModuleReference, ModuleResolver, RESOLVE_COMPLETE, RESOLVE_INCOMPLETE, ResolveCache,
    ResolveResult, ResolvedModules, TextEdit,
};
pub use scope::SearchScope;
pub use source::FileSet;
