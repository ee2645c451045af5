//! The s-expression language shared with egg.
//!
//! Operator spellings match [`Op::name`], so `(* x (exp y))` reads the same
//! in both worlds.

use egg::{define_language, Id, Symbol};
use mcrelax_core::{Constant, Op};

define_language! {
    /// Formula language understood by the e-graph.
    pub enum RelaxLang {
        "+" = Add([Id; 2]),
        "-" = Sub([Id; 2]),
        "*" = Mul([Id; 2]),
        "/" = Div([Id; 2]),
        "min" = Min([Id; 2]),
        "max" = Max([Id; 2]),
        "neg" = Neg(Id),
        "sqr" = Sqr(Id),
        "exp" = Exp(Id),
        "inv" = Inv(Id),
        "log" = Log(Id),
        "sqrt" = Sqrt(Id),

        Num(Constant),
        Symbol(Symbol),
    }
}

/// A node taken apart into operator and children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Parts {
    /// A numeric literal.
    Num(f64),
    /// A named variable.
    Symbol(Symbol),
    /// A unary operator and its argument.
    Unary(Op, Id),
    /// A binary operator and its arguments.
    Binary(Op, Id, Id),
}

impl RelaxLang {
    /// Builds the node applying `op`.
    ///
    /// Unary operators take `lhs` and ignore `rhs`.
    #[must_use]
    pub fn from_op(op: Op, lhs: Id, rhs: Id) -> Self {
        match op {
            Op::Add => Self::Add([lhs, rhs]),
            Op::Sub => Self::Sub([lhs, rhs]),
            Op::Mul => Self::Mul([lhs, rhs]),
            Op::Div => Self::Div([lhs, rhs]),
            Op::Min => Self::Min([lhs, rhs]),
            Op::Max => Self::Max([lhs, rhs]),
            Op::Neg => Self::Neg(lhs),
            Op::Sqr => Self::Sqr(lhs),
            Op::Exp => Self::Exp(lhs),
            Op::Inv => Self::Inv(lhs),
            Op::Log => Self::Log(lhs),
            Op::Sqrt => Self::Sqrt(lhs),
        }
    }

    /// Takes the node apart.
    #[must_use]
    pub fn parts(&self) -> Parts {
        match *self {
            Self::Num(c) => Parts::Num(c.value()),
            Self::Symbol(s) => Parts::Symbol(s),
            Self::Neg(a) => Parts::Unary(Op::Neg, a),
            Self::Sqr(a) => Parts::Unary(Op::Sqr, a),
            Self::Exp(a) => Parts::Unary(Op::Exp, a),
            Self::Inv(a) => Parts::Unary(Op::Inv, a),
            Self::Log(a) => Parts::Unary(Op::Log, a),
            Self::Sqrt(a) => Parts::Unary(Op::Sqrt, a),
            Self::Add([a, b]) => Parts::Binary(Op::Add, a, b),
            Self::Sub([a, b]) => Parts::Binary(Op::Sub, a, b),
            Self::Mul([a, b]) => Parts::Binary(Op::Mul, a, b),
            Self::Div([a, b]) => Parts::Binary(Op::Div, a, b),
            Self::Min([a, b]) => Parts::Binary(Op::Min, a, b),
            Self::Max([a, b]) => Parts::Binary(Op::Max, a, b),
        }
    }

    /// The operator of this node, if it is not an atom.
    #[must_use]
    pub fn op(&self) -> Option<Op> {
        match self.parts() {
            Parts::Unary(op, _) | Parts::Binary(op, _, _) => Some(op),
            Parts::Num(_) | Parts::Symbol(_) => None,
        }
    }

    /// Extracts the numeric value if this is a number.
    #[must_use]
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(c) => Some(c.value()),
            _ => None,
        }
    }
}
