//! Diagnostics: semantic error reporting for module descriptors.
//!
//! Reports syntax errors, module references that resolve to nothing or to
//! several declarations, modules declared more than once in the project, and
//! modules that require themselves.

use std::sync::Arc;

use super::cancel::Cancelled;
use super::lower::module_references;
use super::module_index::{ModuleDeclaration, ModuleIndex};
use super::module_ref::{ModuleReference, ModuleResolver, ResolveResult};
use crate::base::{FileId, LineIndex, TextRange};
use crate::syntax::{ModuleRefKind, Parse};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub file: FileId,
    pub range: TextRange,
    /// Start line (0-indexed).
    pub start_line: u32,
    /// Start column (0-indexed).
    pub start_col: u32,
    /// End line (0-indexed).
    pub end_line: u32,
    /// End column (0-indexed).
    pub end_col: u32,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Points at another place relevant to a diagnostic, such as a candidate
/// declaration of an ambiguous module.
#[derive(Clone, Debug)]
pub struct RelatedInfo {
    pub file: FileId,
    pub range: TextRange,
    pub message: Arc<str>,
}

impl Diagnostic {
    fn new(
        file: FileId,
        line_index: &LineIndex,
        range: TextRange,
        severity: Severity,
        message: impl Into<Arc<str>>,
    ) -> Self {
        let (start, end) = line_index.range(range);
        Self {
            file,
            range,
            start_line: start.line,
            start_col: start.col,
            end_line: end.line,
            end_col: end.col,
            severity,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn error(
        file: FileId,
        line_index: &LineIndex,
        range: TextRange,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(file, line_index, range, Severity::Error, message)
    }

    pub fn warning(
        file: FileId,
        line_index: &LineIndex,
        range: TextRange,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(file, line_index, range, Severity::Warning, message)
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

pub mod codes {
    /// Descriptor does not parse.
    pub const SYNTAX_ERROR: &str = "E0000";
    /// Module reference resolves to nothing.
    pub const UNRESOLVED_MODULE: &str = "E0001";
    /// Module reference resolves to several declarations.
    pub const AMBIGUOUS_MODULE: &str = "E0002";
    /// The same module name is declared more than once.
    pub const DUPLICATE_MODULE: &str = "E0004";

    /// A module lists itself in `requires`.
    pub const SELF_REQUIRES: &str = "W0001";
}

// ============================================================================
// MODULE CHECKER
// ============================================================================

/// Runs every check over one descriptor file.
pub struct ModuleChecker<'a> {
    resolver: &'a ModuleResolver<'a>,
    index: &'a ModuleIndex,
    report_duplicates: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ModuleChecker<'a> {
    pub fn new(resolver: &'a ModuleResolver<'a>, index: &'a ModuleIndex) -> Self {
        Self {
            resolver,
            index,
            report_duplicates: true,
            diagnostics: Vec::new(),
        }
    }

    pub fn report_duplicates(mut self, enabled: bool) -> Self {
        self.report_duplicates = enabled;
        self
    }

    pub fn check_file(&mut self, file: FileId, text: &str, parse: &Parse) -> Result<(), Cancelled> {
        let line_index = LineIndex::new(text);

        for error in &parse.errors {
            self.diagnostics.push(
                Diagnostic::error(file, &line_index, error.range, error.message.as_str())
                    .with_code(codes::SYNTAX_ERROR),
            );
        }

        let Some(descriptor) = &parse.descriptor else {
            return Ok(());
        };

        let own_name = descriptor.name.as_ref();
        if let Some(name) = own_name {
            if self.report_duplicates {
                self.check_duplicates(file, &line_index, &name.text, name.range);
            }
        }

        let incomplete_code = parse.has_errors();
        for reference in module_references(file, descriptor) {
            if reference.kind == ModuleRefKind::Requires
                && own_name.is_some_and(|name| name.text == reference.text)
            {
                self.diagnostics.push(
                    Diagnostic::warning(
                        file,
                        &line_index,
                        reference.range,
                        format!("module '{}' requires itself", reference.text),
                    )
                    .with_code(codes::SELF_REQUIRES),
                );
                continue;
            }
            self.check_reference(&line_index, &reference, incomplete_code)?;
        }

        Ok(())
    }

    fn check_reference(
        &mut self,
        line_index: &LineIndex,
        reference: &ModuleReference,
        incomplete_code: bool,
    ) -> Result<(), Cancelled> {
        let result =
            self.resolver
                .resolve_result(reference.owner, &reference.text, incomplete_code)?;

        match result {
            ResolveResult::Found(_) => {}
            ResolveResult::NotFound => {
                self.diagnostics.push(
                    Diagnostic::error(
                        reference.file(),
                        line_index,
                        reference.range,
                        format!("module not found: '{}'", reference.text),
                    )
                    .with_code(codes::UNRESOLVED_MODULE),
                );
            }
            ResolveResult::Ambiguous(candidates) => {
                let diagnostic = Diagnostic::error(
                    reference.file(),
                    line_index,
                    reference.range,
                    format!(
                        "ambiguous module reference: '{}' is declared {} times",
                        reference.text,
                        candidates.len()
                    ),
                )
                .with_code(codes::AMBIGUOUS_MODULE);
                self.diagnostics
                    .push(with_candidates(diagnostic, &candidates, "candidate"));
            }
        }
        Ok(())
    }

    fn check_duplicates(
        &mut self,
        file: FileId,
        line_index: &LineIndex,
        name: &str,
        range: TextRange,
    ) {
        let others: Vec<ModuleDeclaration> = self
            .index
            .declarations(name)
            .into_iter()
            .filter(|declaration| declaration.file() != file)
            .cloned()
            .collect();
        if others.is_empty() {
            return;
        }

        let diagnostic = Diagnostic::error(
            file,
            line_index,
            range,
            format!("duplicate module: '{name}' is also declared elsewhere"),
        )
        .with_code(codes::DUPLICATE_MODULE);
        self.diagnostics
            .push(with_candidates(diagnostic, &others, "other declaration"));
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

fn with_candidates(
    mut diagnostic: Diagnostic,
    declarations: &[ModuleDeclaration],
    label: &str,
) -> Diagnostic {
    for declaration in declarations {
        diagnostic = diagnostic.with_related(RelatedInfo {
            file: declaration.file(),
            range: declaration.name_range,
            message: Arc::from(format!("{label}: {}", declaration.name)),
        });
    }
    diagnostic
}

/// Check a file and return its diagnostics.
pub fn check_file(
    resolver: &ModuleResolver<'_>,
    index: &ModuleIndex,
    file: FileId,
    text: &str,
    parse: &Parse,
) -> Result<Vec<Diagnostic>, Cancelled> {
    let mut checker = ModuleChecker::new(resolver, index);
    checker.check_file(file, text, parse)?;
    Ok(checker.finish())
}
