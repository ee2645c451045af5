//! Interchange errors.

use thiserror::Error;

/// Errors raised while reading s-expressions.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LangError {
    /// The text is not a well-formed formula.
    #[error("parse error: {0}")]
    Parse(String),

    /// The expression has no nodes.
    #[error("empty expression")]
    Empty,
}
