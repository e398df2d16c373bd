//! Parse errors.

use thiserror::Error;

use crate::base::TextRange;

/// A syntax error with the range it was reported at.
///
/// Errors never abort parsing; the parser records them and recovers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

impl ParseError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}
