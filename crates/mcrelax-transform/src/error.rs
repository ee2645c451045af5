//! Errors raised while rewriting, assembling or evaluating.

use mcrelax_rules::{NamingError, RuleError};
use thiserror::Error;

/// Errors that can occur while turning an expression into evaluators.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RelaxError {
    /// A rule rejected a sub-expression.
    #[error("cannot relax `{expr}`: {source}")]
    Rule {
        /// The offending sub-expression, rendered as text.
        expr: String,
        /// What the rule reported.
        #[source]
        source: RuleError,
    },

    /// A symbol name clashes with the derived-name pattern.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// An evaluator was called with the wrong number of arguments.
    #[error("evaluator takes {expected} arguments, got {got}")]
    Arity {
        /// Length of the calling convention.
        expected: usize,
        /// Number of arguments supplied.
        got: usize,
    },

    /// A formula refers to a symbol outside the calling convention.
    #[error("symbol `{name}` is not an evaluator argument")]
    UnknownSymbol {
        /// The symbol's name.
        name: String,
    },
}
