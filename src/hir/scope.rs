//! Visibility scopes for module lookup.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::input::RootId;

/// The set of roots a lookup may return declarations from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchScope {
    /// Every root of the project.
    Project,
    /// Only the listed roots.
    Roots(Arc<FxHashSet<RootId>>),
}

impl SearchScope {
    pub fn roots(roots: impl IntoIterator<Item = RootId>) -> Self {
        SearchScope::Roots(Arc::new(roots.into_iter().collect()))
    }

    pub fn contains_root(&self, root: RootId) -> bool {
        match self {
            SearchScope::Project => true,
            SearchScope::Roots(roots) => roots.contains(&root),
        }
    }

    /// A scope that can never match anything.
    pub fn is_empty(&self) -> bool {
        matches!(self, SearchScope::Roots(roots) if roots.is_empty())
    }
}
