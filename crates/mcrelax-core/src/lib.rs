//! # mcrelax-core
//!
//! Core expression engine for the mcrelax relaxation compiler.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Type-safe expression and symbol handles
//! - The `{lo, hi, cv, cc}` bound tuple shared by every later stage
//! - Static intervals used as side information while rewriting
//!
//! ## Design Principles
//!
//! - **Hash-Consing**: Every structurally unique expression is stored exactly
//!   once, so a handle doubles as a structural-identity memo key
//! - **Zero-Cost Handles**: 32-bit indices instead of pointers
//! - **Acyclic by construction**: a node can only refer to nodes interned
//!   before it

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod bounds;
pub mod display;
pub mod expr;
pub mod handle;
pub mod intern;
pub mod interval;

pub use arena::ExprArena;
pub use bounds::{Bounds, Component};
pub use display::DisplayExpr;
pub use expr::{Constant, ExprNode, Op};
pub use handle::{ExprHandle, SymbolId};
pub use interval::{Interval, Sign};

/// Map type taken by [`ExprArena::substitute`] and [`ExprArena::evaluate`].
pub use hashbrown::HashMap;

mod proptests;
