//! Rename of a module reference.

use super::AnalysisHost;
use crate::base::{FileId, TextSize};
use crate::hir::{EditError, TextEdit};

/// Rename the module reference at `offset` to `new_name`.
pub fn rename(
    host: &AnalysisHost,
    file: FileId,
    offset: TextSize,
    new_name: &str,
) -> Result<TextEdit, EditError> {
    let reference = host
        .reference_at(file, offset)
        .ok_or(EditError::NoReference)?;
    reference.handle_rename(new_name, host.roots())
}
