//! # mcrelax-dynamic
//!
//! McCormick relaxations of ODE systems.
//!
//! An [`OdeSystem`] holds states with initial bounds, parameters with
//! bounds, and one equation per state. [`expand`] turns it into a system
//! four times the size whose states track `lo`, `hi`, `cv` and `cc` of the
//! original states, ready for an external solver. [`OdeSystem::vector_field`]
//! compiles the right-hand sides of either system for numeric use.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod expand;
pub mod system;

mod proptests;

pub use error::DynamicError;
pub use expand::{expand, ExpandConfig, Expander};
pub use system::{Equation, OdeSystem, Parameter, StateVar, VectorField};
