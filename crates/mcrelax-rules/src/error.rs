//! Errors raised by rules and by the namer.

use mcrelax_core::{Interval, Op};
use thiserror::Error;

use crate::rule::DomainRequirement;

/// Errors that can occur while applying a relaxation rule.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuleError {
    /// The operator has no entry in the rule table.
    #[error("no relaxation rule for operator `{op}`")]
    UnsupportedOperator {
        /// The offending operator.
        op: Op,
    },

    /// An operand's static interval violates the rule's precondition.
    #[error("`{op}` requires operand {index} to be {requirement}, but its range is {interval}")]
    DomainViolation {
        /// The operator being relaxed.
        op: Op,
        /// Zero-based operand position.
        index: usize,
        /// What the rule needs.
        requirement: DomainRequirement,
        /// What the operand's range actually is.
        interval: Interval,
    },

    /// Generic composition was asked to relax an operator whose shape it
    /// cannot handle.
    #[error("`{op}` has no convexity/monotonicity classification usable for composition")]
    Unclassified {
        /// The offending operator.
        op: Op,
    },
}

/// Errors raised when deriving companion names.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    /// The base name already looks like a derived name.
    #[error("symbol `{name}` ends in the reserved suffix `_{suffix}`")]
    Collision {
        /// The offending symbol name.
        name: String,
        /// The reserved suffix it ends with.
        suffix: &'static str,
    },

    /// The symbol id does not belong to the arena.
    #[error("symbol {0} is not interned in this arena")]
    UnknownSymbol(u32),
}
