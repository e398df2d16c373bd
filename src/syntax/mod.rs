//! Module descriptor syntax.
//!
//! A descriptor declares one module and the modules it refers to:
//!
//! ```text
//! @Deprecated
//! open module com.example.app {
//!     requires transitive com.example.core;
//!     exports com.example.app.api to com.example.web, com.example.cli;
//!     uses com.example.spi.Plugin;
//! }
//! ```

pub mod descriptor;
pub mod error;
pub mod lexer;

pub use descriptor::{
    Directive, ModuleDescriptor, ModuleRefKind, Parse, QualifiedName, module_from_text, parse,
};
pub use error::ParseError;
pub use lexer::{SyntaxKind, Token, lex};
