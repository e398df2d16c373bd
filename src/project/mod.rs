//! Workspace management: loading descriptor files from disk and detecting
//! library roots.

pub mod roots;
mod workspace_loader;

use std::path::PathBuf;

use thiserror::Error;

pub use roots::{
    DescriptorRootsDetector, OrderRoot, OrderRootType, RootChooser, RootsDetector,
    SuggestedChildRoot, detect_roots,
};
pub use workspace_loader::{LoaderConfig, WorkspaceLoader};

use crate::base::FileId;
use crate::hir::RootId;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("unknown root {0:?}")]
    UnknownRoot(RootId),
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load {} file(s)", errors.len())]
    Partial {
        /// Files that did load.
        loaded: Vec<FileId>,
        errors: Vec<LoadError>,
    },
}
