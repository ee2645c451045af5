//! # mcrelax-transform
//!
//! Turns an expression into evaluators for its McCormick bounds.
//!
//! The pipeline has three stages:
//!
//! 1. [`Rewriter::rewrite`] walks the expression DAG and replaces every
//!    operator node by an auxiliary symbol with four defining equations.
//! 2. [`assemble`] fixes the calling convention (`cc, cv, hi, lo` per input)
//!    and inlines the definitions into four root formulas.
//! 3. [`EvaluatorSpec::compile`] lowers the roots to flat tapes that can be
//!    called on single points or on batches in parallel.
//!
//! ## Example
//!
//! ```
//! use mcrelax_core::{ExprArena, Interval};
//! use mcrelax_transform::{relax, Domain};
//!
//! let mut arena = ExprArena::new();
//! let mut domain = Domain::new();
//! domain.declare_named(&mut arena, "x", Interval::new(-1.0, 4.0));
//! domain.declare_named(&mut arena, "y", Interval::new(0.5, 3.0));
//!
//! let x = arena.symbol("x");
//! let y = arena.symbol("y");
//! let xy = arena.mul(x, y);
//!
//! let spec = relax(&mut arena, xy, domain).unwrap();
//! let bounds = spec.compile(&arena).unwrap();
//! // x_cc, x_cv, x_hi, x_lo, y_cc, y_cv, y_hi, y_lo
//! let b = bounds.call_all(&[2.5, 2.5, 4.0, -1.0, 1.5, 1.5, 3.0, 0.5]).unwrap();
//! assert_eq!((b.lo, b.hi), (-3.0, 12.0));
//! assert!(b.cv <= 3.75 && 3.75 <= b.cc);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assemble;
pub mod compile;
pub mod config;
pub mod domain;
pub mod error;
pub mod rewrite;

#[cfg(test)]
mod testing;

mod proptests;

pub use assemble::{assemble, EvaluatorSpec, SpecStats};
pub use compile::{CompiledEvaluator, EvaluatorSet, FusedEvaluator, Tape};
pub use config::RewriteConfig;
pub use domain::Domain;
pub use error::RelaxError;
pub use rewrite::{Definition, Input, Rewriter, Rewritten};

use mcrelax_core::{ExprArena, ExprHandle};

/// Rewrites and assembles `root` with the standard rules.
///
/// # Errors
///
/// Fails like [`Rewriter::rewrite`].
pub fn relax(arena: &mut ExprArena, root: ExprHandle, domain: Domain) -> Result<EvaluatorSpec, RelaxError> {
    let rewritten = Rewriter::new(domain).rewrite(arena, root)?;
    Ok(assemble(arena, &rewritten))
}
