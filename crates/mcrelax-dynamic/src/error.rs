//! Errors for ODE systems and their expansion.

use mcrelax_core::Interval;
use mcrelax_transform::RelaxError;
use thiserror::Error;

/// Errors raised while building or expanding an ODE system.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DynamicError {
    /// A name is declared twice.
    #[error("`{name}` is already declared")]
    Duplicate {
        /// The repeated name.
        name: String,
    },

    /// An equation is given for something that is not a state.
    #[error("`{name}` is not a state")]
    UnknownState {
        /// The equation's target.
        name: String,
    },

    /// A state has two equations.
    #[error("state `{name}` already has an equation")]
    DuplicateEquation {
        /// The state.
        name: String,
    },

    /// A state has no equation.
    #[error("state `{name}` has no equation")]
    MissingEquation {
        /// The state.
        name: String,
    },

    /// A right-hand side mentions a symbol that is neither a state nor a
    /// parameter.
    #[error("equation for `{state}` refers to undeclared symbol `{name}`")]
    UnknownSymbol {
        /// The undeclared symbol.
        name: String,
        /// The equation it occurs in.
        state: String,
    },

    /// A supplied value lies outside its declared bounds.
    #[error("value {value} of `{name}` lies outside {bounds}")]
    OutOfBounds {
        /// The state or parameter.
        name: String,
        /// The supplied value.
        value: f64,
        /// Its declared bounds.
        bounds: Interval,
    },

    /// A vector field was called with the wrong number of values.
    #[error("expected {expected} values, got {got}")]
    Arity {
        /// Number of states or parameters.
        expected: usize,
        /// Number supplied.
        got: usize,
    },

    /// Compiling or calling a vector field failed.
    #[error(transparent)]
    Evaluate(#[from] RelaxError),

    /// Relaxing a right-hand side failed.
    #[error("equation for `{state}`: {source}")]
    Relax {
        /// The equation's state.
        state: String,
        /// The underlying failure.
        #[source]
        source: RelaxError,
    },
}
