//! Expression node types.
//!
//! This module defines the nodes stored in the arena: numeric constants,
//! symbols, and applications of a closed set of primitive operators.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use smallvec::SmallVec;

use crate::handle::{ExprHandle, SymbolId};

/// A real-valued literal with structural identity.
///
/// Equality and hashing are bitwise so that literals can be hash-consed.
/// `-0.0` is normalized to `0.0` and NaN is not representable.
#[derive(Clone, Copy)]
pub struct Constant(f64);

impl Constant {
    /// Creates a constant, returning `None` for NaN.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        // Adding 0.0 maps -0.0 to 0.0 and leaves everything else unchanged.
        Some(Self(value + 0.0))
    }

    /// Returns the literal value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Constant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Constant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Debug for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Constant {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.parse().map_err(|_| "not a number")?;
        Self::new(value).ok_or("NaN is not a valid constant")
    }
}

/// The primitive operators an expression may apply.
///
/// `Min` and `Max` exist so relaxation formulas can be expressed without
/// branches; they have no relaxation rule of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    /// Unary negation.
    Neg,
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Square, `x^2`.
    Sqr,
    /// Natural exponential.
    Exp,
    /// Reciprocal, `1/x`.
    Inv,
    /// Natural logarithm.
    Log,
    /// Square root.
    Sqrt,
    /// Pointwise minimum.
    Min,
    /// Pointwise maximum.
    Max,
}

impl Op {
    /// All operators, in declaration order.
    pub const ALL: [Op; 12] = [
        Op::Neg,
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Div,
        Op::Sqr,
        Op::Exp,
        Op::Inv,
        Op::Log,
        Op::Sqrt,
        Op::Min,
        Op::Max,
    ];

    /// Number of operands this operator takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Op::Neg | Op::Sqr | Op::Exp | Op::Inv | Op::Log | Op::Sqrt => 1,
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Min | Op::Max => 2,
        }
    }

    /// The operator's textual name, as used in s-expressions and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Op::Neg => "neg",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Sqr => "sqr",
            Op::Exp => "exp",
            Op::Inv => "inv",
            Op::Log => "log",
            Op::Sqrt => "sqrt",
            Op::Min => "min",
            Op::Max => "max",
        }
    }

    /// Evaluates a unary operator.
    ///
    /// Binary operators return NaN.
    #[must_use]
    pub fn apply_unary(self, x: f64) -> f64 {
        match self {
            Op::Neg => -x,
            Op::Sqr => x * x,
            Op::Exp => x.exp(),
            Op::Inv => x.recip(),
            Op::Log => x.ln(),
            Op::Sqrt => x.sqrt(),
            _ => f64::NAN,
        }
    }

    /// Evaluates a binary operator.
    ///
    /// Unary operators return NaN.
    #[must_use]
    pub fn apply_binary(self, a: f64, b: f64) -> f64 {
        match self {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
            Op::Div => a / b,
            Op::Min => a.min(b),
            Op::Max => a.max(b),
            _ => f64::NAN,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An expression node stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Atoms ===
    /// A real literal.
    Constant(Constant),

    /// A symbolic variable.
    Symbol(SymbolId),

    // === Operator applications ===
    /// A unary operator applied to one operand.
    ///
    /// Invariant: `op.arity() == 1`.
    Unary {
        /// The operator.
        op: Op,
        /// The operand.
        arg: ExprHandle,
    },

    /// A binary operator applied to two operands.
    ///
    /// Invariant: `op.arity() == 2`.
    Binary {
        /// The operator.
        op: Op,
        /// The left operand.
        lhs: ExprHandle,
        /// The right operand.
        rhs: ExprHandle,
    },
}

impl ExprNode {
    /// Returns true if this node is an atom (no children).
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(self, ExprNode::Constant(_) | ExprNode::Symbol(_))
    }

    /// Returns the literal value if this is a constant.
    #[must_use]
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            ExprNode::Constant(c) => Some(c.value()),
            _ => None,
        }
    }

    /// Returns the symbol if this is a symbol leaf.
    #[must_use]
    pub fn as_symbol(&self) -> Option<SymbolId> {
        match self {
            ExprNode::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the operator of an application node.
    #[must_use]
    pub fn op(&self) -> Option<Op> {
        match self {
            ExprNode::Unary { op, .. } | ExprNode::Binary { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Returns the children of this node, left to right.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 2]> {
        match self {
            ExprNode::Constant(_) | ExprNode::Symbol(_) => SmallVec::new(),
            ExprNode::Unary { arg, .. } => smallvec::smallvec![*arg],
            ExprNode::Binary { lhs, rhs, .. } => smallvec::smallvec![*lhs, *rhs],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_atom() {
        let c = Constant::new(2.5).unwrap();
        assert!(ExprNode::Constant(c).is_atom());
        assert!(ExprNode::Symbol(SymbolId::new(0)).is_atom());
        assert!(!ExprNode::Unary {
            op: Op::Neg,
            arg: ExprHandle::new(0)
        }
        .is_atom());
    }

    #[test]
    fn test_constant_identity() {
        assert_eq!(Constant::new(-0.0), Constant::new(0.0));
        assert_ne!(Constant::new(1.0), Constant::new(1.0 + f64::EPSILON));
        assert!(Constant::new(f64::NAN).is_none());
        assert_eq!("0.5".parse::<Constant>().map(Constant::value), Ok(0.5));
        assert!("x".parse::<Constant>().is_err());
    }

    #[test]
    fn test_arity_matches_evaluation() {
        for op in Op::ALL {
            match op.arity() {
                1 => assert!(op.apply_binary(1.0, 2.0).is_nan(), "{op}"),
                2 => assert!(op.apply_unary(1.0).is_nan(), "{op}"),
                _ => unreachable!(),
            }
        }
        assert_eq!(Op::Min.apply_binary(-1.0, 3.0), -1.0);
        assert_eq!(Op::Sqr.apply_unary(-3.0), 9.0);
    }
}
