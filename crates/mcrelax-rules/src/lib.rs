//! # mcrelax-rules
//!
//! McCormick relaxation rules for the primitive operators.
//!
//! For an operator applied to operands whose bounds are known as formulas
//! (`lo`, `hi`, `cv`, `cc`), a rule builds the formulas for the result:
//! natural interval bounds plus a convex underestimator and a concave
//! overestimator. Every rule keeps `lo <= cv <= cc <= hi` whenever its
//! operands do.
//!
//! ## Extending
//!
//! Rules are plain records in a [`RuleTable`]. A monotone convex or concave
//! function only needs an entry with its [`Shape`] and
//! [`univariate::compose`]; anything else brings its own `apply` function.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arithmetic;
pub mod error;
pub mod names;
pub mod product;
pub mod rule;
pub mod table;
pub mod univariate;

#[cfg(test)]
mod testing;

mod proptests;

pub use error::{NamingError, RuleError};
pub use names::{derive_bounds, derive_for_symbol, BoundedSymbolSet};
pub use rule::{
    ApplyFn, Curvature, DomainRequirement, Monotonicity, Operand, Relaxation, RelaxationRule,
    RuleContext, RuleOptions, Shape,
};
pub use table::{standard_rules, RuleTable};
