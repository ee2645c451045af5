//! Human-readable rendering of arena expressions.

use std::fmt;

use crate::arena::ExprArena;
use crate::expr::{ExprNode, Op};
use crate::handle::ExprHandle;

/// Infix rendering of an expression, borrowed from its arena.
///
/// Shared sub-expressions are printed at every occurrence.
pub struct DisplayExpr<'a> {
    arena: &'a ExprArena,
    root: ExprHandle,
}

impl ExprArena {
    /// Returns a displayable view of `root`.
    #[must_use]
    pub fn display(&self, root: ExprHandle) -> DisplayExpr<'_> {
        DisplayExpr { arena: self, root }
    }
}

impl DisplayExpr<'_> {
    fn write(&self, f: &mut fmt::Formatter<'_>, handle: ExprHandle) -> fmt::Result {
        match self.arena.get(handle) {
            ExprNode::Constant(c) => write!(f, "{c}"),
            ExprNode::Symbol(id) => match self.arena.symbol_name(*id) {
                Some(name) => f.write_str(name),
                None => write!(f, "{id:?}"),
            },
            ExprNode::Unary { op: Op::Neg, arg } => {
                f.write_str("-")?;
                self.write(f, *arg)
            }
            ExprNode::Unary { op: Op::Sqr, arg } => {
                self.write(f, *arg)?;
                f.write_str("^2")
            }
            ExprNode::Unary { op, arg } => {
                write!(f, "{op}(")?;
                self.write(f, *arg)?;
                f.write_str(")")
            }
            ExprNode::Binary { op: op @ (Op::Min | Op::Max), lhs, rhs } => {
                write!(f, "{op}(")?;
                self.write(f, *lhs)?;
                f.write_str(", ")?;
                self.write(f, *rhs)?;
                f.write_str(")")
            }
            ExprNode::Binary { op, lhs, rhs } => {
                f.write_str("(")?;
                self.write(f, *lhs)?;
                write!(f, " {op} ")?;
                self.write(f, *rhs)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.root)
    }
}

#[cfg(test)]
mod tests {
    use crate::ExprArena;

    #[test]
    fn test_display() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let sq = arena.sqr(x);
        let e = arena.exp(y);
        let q = arena.div(sq, e);
        let n = arena.neg(q);
        let m = arena.max(n, x);

        assert_eq!(arena.display(m).to_string(), "max(-(x^2 / exp(y)), x)");
    }
}
