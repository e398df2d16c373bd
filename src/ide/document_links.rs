//! Document links: clickable module references.

use std::borrow::Cow;

use tokio_util::sync::CancellationToken;

use super::AnalysisHost;
use crate::base::{FileId, TextRange};
use crate::hir::Cancelled;

#[derive(Debug, Clone)]
pub struct DocumentLink {
    /// The span of the link in the source file.
    pub range: TextRange,
    pub target_file: FileId,
    /// Range of the declared module name in the target file.
    pub target_range: TextRange,
    pub tooltip: Cow<'static, str>,
}

/// Links for every module reference of `file` that resolves to exactly one
/// declaration. Ambiguous and unresolved references get no link.
pub fn document_links(
    host: &AnalysisHost,
    file: FileId,
    cancel: &CancellationToken,
) -> Result<Vec<DocumentLink>, Cancelled> {
    let resolver = host.resolver(cancel);
    let incomplete = host.is_incomplete(file);

    let mut links = Vec::new();
    for reference in host.module_references(file) {
        if let Some(target) = reference.resolve(&resolver, incomplete)? {
            links.push(DocumentLink {
                range: reference.range,
                target_file: target.file(),
                target_range: target.name_range,
                tooltip: Cow::Owned(format!("Go to module {}", target.name)),
            });
        }
    }
    Ok(links)
}
