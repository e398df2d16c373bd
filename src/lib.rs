//! # modref-base
//!
//! Core library for module descriptor parsing, module reference resolution,
//! and semantic analysis.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project → Workspace loading, library root detection
//!   ↓
//! ide     → IDE features (diagnostics, goto-def, rename, links)
//!   ↓
//! hir     → Semantic model: module index, scopes, cached resolution
//!   ↓
//! syntax  → Lexer + recovering parser for module descriptors
//!   ↓
//! base    → Primitives (FileId, Span, Name interning)
//! ```

/// Foundation types: FileId, Span, Name interning
pub mod base;

/// Module descriptor lexer and parser
pub mod syntax;

/// High-level IR: module index and cached reference resolution
pub mod hir;

/// IDE features: diagnostics, goto-definition, rename, document links
pub mod ide;

/// Workspace management and library root detection
pub mod project;

// Re-export new foundation types
pub use base::{FileId, Interner, LineCol, LineIndex, Name, TextRange, TextSize};
