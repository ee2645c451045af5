//! # mcrelax-lang
//!
//! S-expression interchange for mcrelax formulas, built on `egg`.
//!
//! - [`RelaxLang`]: the formula language, spelled like `(* x (exp y))`
//! - [`export`] / [`import`]: conversion to and from the hash-consed arena
//! - [`EvalCost`]: evaluation-cost model, usable directly or as an egg
//!   `CostFunction` for extraction

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod cost;
pub mod error;
pub mod language;

mod proptests;

pub use convert::{export, import, parse};
pub use cost::EvalCost;
pub use error::LangError;
pub use language::{Parts, RelaxLang};
