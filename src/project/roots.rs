//! Library root detection.
//!
//! When the user attaches files or directories to a library, a detector
//! proposes the roots inside them. Candidates that are themselves roots are
//! accepted as-is; roots found *inside* a candidate are only suggestions and
//! go through a [`RootChooser`]. If nothing at all is detected, the chooser
//! picks one category and every candidate is attached with it.
//!
//! The chooser stands in for whatever UI the embedding application has; it
//! never blocks on anything in this crate.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use walkdir::WalkDir;

use super::workspace_loader::LoaderConfig;
use crate::hir::{Cancelled, check_cancelled};

/// Category of a library root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OrderRootType {
    Classes,
    Sources,
    Documentation,
}

impl fmt::Display for OrderRootType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderRootType::Classes => "classes",
            OrderRootType::Sources => "sources",
            OrderRootType::Documentation => "documentation",
        };
        f.write_str(name)
    }
}

/// A root to attach.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderRoot {
    pub file: PathBuf,
    pub root_type: OrderRootType,
    /// The root is a directory whose archives are each a root.
    pub jar_directory: bool,
}

impl OrderRoot {
    pub fn new(file: impl Into<PathBuf>, root_type: OrderRootType) -> Self {
        Self {
            file: file.into(),
            root_type,
            jar_directory: false,
        }
    }
}

/// A root found inside a candidate, awaiting the user's decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestedChildRoot {
    pub root_candidate: PathBuf,
    pub suggested_root: OrderRoot,
    pub root_type_name: SmolStr,
}

pub trait RootsDetector {
    /// Roots found in or at `candidate`.
    fn detect_roots(
        &self,
        candidate: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<OrderRoot>, Cancelled>;

    /// Display name for a root category, or `None` if this detector never
    /// produces it.
    fn root_type_name(&self, root_type: OrderRootType, jar_directory: bool) -> Option<SmolStr>;
}

pub trait RootChooser {
    /// Pick which suggestions to keep, by index. `None` aborts the whole
    /// detection.
    fn choose_suggested(&mut self, suggestions: &[SuggestedChildRoot]) -> Option<Vec<usize>>;

    /// Pick a category for all candidates. `names` is sorted
    /// case-insensitively; `default` is the preselected index.
    fn choose_category(&mut self, names: &[SmolStr], default: usize) -> Option<usize>;
}

/// Detect roots in `candidates`, asking `chooser` where a decision is needed.
///
/// Cancelling stops scanning but keeps the roots detected so far.
pub fn detect_roots(
    candidates: &[PathBuf],
    detector: &dyn RootsDetector,
    chooser: &mut dyn RootChooser,
    allowed_types: &[OrderRootType],
    cancel: &CancellationToken,
) -> Vec<OrderRoot> {
    let mut result = Vec::new();
    let mut suggested = Vec::new();

    for candidate in candidates {
        let roots = match detector.detect_roots(candidate, cancel) {
            Ok(roots) => roots,
            Err(Cancelled) => {
                debug!(candidate = %candidate.display(), "root scan cancelled");
                break;
            }
        };

        if !roots.is_empty() && roots.iter().all(|root| root.file == *candidate) {
            result.extend(roots);
            continue;
        }

        for root in roots {
            let Some(type_name) = detector.root_type_name(root.root_type, root.jar_directory) else {
                error!(
                    root_type = %root.root_type,
                    jar_directory = root.jar_directory,
                    "detector returned a root type it has no name for"
                );
                continue;
            };
            suggested.push(SuggestedChildRoot {
                root_candidate: candidate.clone(),
                suggested_root: root,
                root_type_name: type_name,
            });
        }
    }

    if !suggested.is_empty() {
        let Some(chosen) = chooser.choose_suggested(&suggested) else {
            return Vec::new();
        };
        result.extend(
            chosen
                .into_iter()
                .filter_map(|index| suggested.get(index))
                .map(|info| info.suggested_root.clone()),
        );
    }

    if result.is_empty() && !allowed_types.is_empty() {
        let mut types: IndexMap<SmolStr, (OrderRootType, bool)> = IndexMap::new();
        for &root_type in allowed_types {
            for jar_directory in [false, true] {
                if let Some(name) = detector.root_type_name(root_type, jar_directory) {
                    types.insert(name, (root_type, jar_directory));
                }
            }
        }
        if types.is_empty() {
            error!(?allowed_types, "no allowed root type has a name");
            return result;
        }

        let mut names: Vec<SmolStr> = types.keys().cloned().collect();
        names.sort_by_key(|name| name.to_lowercase());

        let chosen = chooser
            .choose_category(&names, 0)
            .and_then(|index| names.get(index))
            .and_then(|name| types.get(name));
        if let Some(&(root_type, jar_directory)) = chosen {
            result.extend(candidates.iter().map(|candidate| OrderRoot {
                file: candidate.clone(),
                root_type,
                jar_directory,
            }));
        }
    }

    result
}

/// Detects directories holding module descriptors as source roots.
#[derive(Debug, Default)]
pub struct DescriptorRootsDetector {
    config: LoaderConfig,
}

impl DescriptorRootsDetector {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }
}

impl RootsDetector for DescriptorRootsDetector {
    fn detect_roots(
        &self,
        candidate: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<OrderRoot>, Cancelled> {
        let mut dirs = IndexSet::new();
        for entry in WalkDir::new(candidate)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
        {
            check_cancelled(cancel)?;
            let Ok(entry) = entry else { continue };
            if entry.file_type().is_file() && self.config.is_descriptor(entry.path()) {
                if let Some(parent) = entry.path().parent() {
                    dirs.insert(parent.to_path_buf());
                }
            }
        }
        Ok(dirs
            .into_iter()
            .map(|dir| OrderRoot::new(dir, OrderRootType::Sources))
            .collect())
    }

    fn root_type_name(&self, root_type: OrderRootType, jar_directory: bool) -> Option<SmolStr> {
        match (root_type, jar_directory) {
            (OrderRootType::Sources, false) => Some(SmolStr::new_static("Module Sources")),
            (OrderRootType::Classes, false) => Some(SmolStr::new_static("Compiled Modules")),
            (OrderRootType::Classes, true) => {
                Some(SmolStr::new_static("Module Archives Directory"))
            }
            _ => None,
        }
    }
}
