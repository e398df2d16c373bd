//! IDE features: high-level APIs for editor integrations.
//!
//! Each function corresponds to one editor request and is built on the
//! cached resolution in [`crate::hir`].
//!
//! ```ignore
//! use modref::ide::{AnalysisHost, goto_definition};
//! use modref::hir::SourceKind;
//!
//! let mut host = AnalysisHost::new();
//! let root = host.add_root(SourceKind::Source);
//! let file = host.set_file_content(root, "app/module-info.java", "module app { requires core; }").unwrap();
//! let target = goto_definition(&host, file, offset, &cancel)?;
//! ```

mod analysis;
mod document_links;
mod goto;
mod rename;

pub use analysis::{AnalysisConfig, AnalysisHost};
pub use document_links::{DocumentLink, document_links};
pub use goto::{GotoResult, NavigationTarget, goto_definition};
pub use rename::rename;
