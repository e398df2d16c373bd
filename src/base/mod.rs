//! Foundation types shared by every layer.
//!
//! - [`FileId`] - Interned descriptor file identifiers
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`LineCol`], [`LineIndex`] - Line/column conversion for diagnostics
//! - [`Name`], [`Interner`] - Module name interning
//!
//! This module has NO dependencies on other modref modules.

mod file_id;
mod intern;
mod span;

pub use file_id::FileId;
pub use intern::{Interner, Name};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
