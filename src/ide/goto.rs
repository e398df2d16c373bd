//! Goto definition for module references.

use std::path::PathBuf;

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use super::AnalysisHost;
use crate::base::{FileId, TextRange, TextSize};
use crate::hir::Cancelled;

/// A place the editor can jump to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationTarget {
    pub file: FileId,
    pub path: Option<PathBuf>,
    /// Range of the declared module name.
    pub range: TextRange,
    pub name: SmolStr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoResult {
    /// Range of the reference under the cursor.
    pub origin: TextRange,
    /// Every candidate declaration; more than one when the name is ambiguous.
    pub targets: Vec<NavigationTarget>,
}

/// Resolve the module reference at `offset`.
///
/// Returns `Ok(None)` when the offset is not on a module reference.
pub fn goto_definition(
    host: &AnalysisHost,
    file: FileId,
    offset: TextSize,
    cancel: &CancellationToken,
) -> Result<Option<GotoResult>, Cancelled> {
    let Some(reference) = host.reference_at(file, offset) else {
        return Ok(None);
    };

    let resolver = host.resolver(cancel);
    let declarations = reference.multi_resolve(&resolver, host.is_incomplete(file))?;
    let targets = declarations
        .iter()
        .map(|declaration| NavigationTarget {
            file: declaration.file(),
            path: host.file_set().path(declaration.file()),
            range: declaration.name_range,
            name: declaration.name.clone(),
        })
        .collect();

    Ok(Some(GotoResult {
        origin: reference.range,
        targets,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::SourceKind;
    use std::path::Path;

    #[test]
    fn test_goto_requires_target() {
        let mut host = AnalysisHost::new();
        let root = host.add_root(SourceKind::Source);
        let core = host
            .set_file_content(root, "/core/module-info.java", "module core {}")
            .unwrap();
        let text = "module app { requires core; }";
        let app = host
            .set_file_content(root, "/app/module-info.java", text)
            .unwrap();

        let offset = TextSize::from(text.find("core").unwrap() as u32);
        let cancel = CancellationToken::new();
        let result = goto_definition(&host, app, offset, &cancel)
            .unwrap()
            .unwrap();

        assert_eq!(result.targets.len(), 1);
        assert_eq!(result.targets[0].file, core);
        assert_eq!(
            result.targets[0].path.as_deref(),
            Some(Path::new("/core/module-info.java"))
        );
        assert_eq!(result.targets[0].range, TextRange::new(7.into(), 11.into()));
    }

    #[test]
    fn test_goto_off_reference() {
        let mut host = AnalysisHost::new();
        let root = host.add_root(SourceKind::Source);
        let app = host
            .set_file_content(root, "/app", "module app {}")
            .unwrap();

        let cancel = CancellationToken::new();
        assert_eq!(goto_definition(&host, app, 0.into(), &cancel), Ok(None));
    }
}
