//! # mcrelax
//!
//! Compiles arithmetic expressions into evaluators for their natural
//! interval bounds and McCormick relaxations.
//!
//! For an expression `f` over leaves `x, y, ...` with declared ranges, the
//! pipeline produces four functions `lo, hi, cv, cc` of the leaves' own
//! bounds and relaxation values such that, on any box inside the declared
//! ranges, `lo <= cv <= f <= cc <= hi`, with `cv` convex and `cc` concave.
//! These are the building blocks of deterministic global optimization.
//!
//! ## Features
//!
//! - **Hash-consed expressions**: shared sub-expressions are relaxed once
//! - **Table-driven rules**: one record per operator, extensible without
//!   touching the rewriter
//! - **Fixed calling convention**: `cc, cv, hi, lo` for each leaf in
//!   first-seen order
//! - **Batch evaluation**: compiled tapes evaluate rows in parallel
//! - **ODE systems**: expansion into a four-fold system tracking the bounds
//!
//! ## Quick Start
//!
//! ```rust
//! use mcrelax::prelude::*;
//!
//! let mut arena = ExprArena::new();
//! let x = parse(&mut arena, "(* x (exp x))").unwrap();
//!
//! let mut domain = Domain::new();
//! domain.declare_named(&mut arena, "x", Interval::new(-1.0, 1.0));
//!
//! let spec = relax(&mut arena, x, domain).unwrap();
//! let eval = spec.compile_fused(&arena).unwrap();
//! let b = eval.call(&spec.arguments(&[Bounds::new(-1.0, 1.0, 0.5, 0.5)]).unwrap()).unwrap();
//!
//! let f = 0.5 * 0.5f64.exp();
//! assert!(b.lo <= b.cv && b.cv <= f && f <= b.cc && b.cc <= b.hi);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use mcrelax_core as core;
pub use mcrelax_dynamic as dynamic;
pub use mcrelax_lang as lang;
pub use mcrelax_rules as rules;
pub use mcrelax_transform as transform;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use mcrelax_core::{Bounds, Component, ExprArena, ExprHandle, ExprNode, Interval, Op};
    pub use mcrelax_dynamic::{expand, DynamicError, OdeSystem, Parameter, StateVar};
    pub use mcrelax_lang::{export, parse};
    pub use mcrelax_rules::{standard_rules, RelaxationRule, RuleError, RuleTable};
    pub use mcrelax_transform::{relax, Domain, EvaluatorSpec, RelaxError, RewriteConfig, Rewriter};
}
