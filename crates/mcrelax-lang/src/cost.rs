//! Cost functions for extraction.
//!
//! Generated bound formulas are evaluated millions of times inside a
//! branch-and-bound loop, so "best" means cheapest to evaluate.

use egg::{CostFunction, Id, Language, RecExpr};

use crate::language::RelaxLang;

/// Estimated floating-point cost of evaluating a formula.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvalCost;

impl EvalCost {
    /// Cost of a single node, excluding its children.
    #[must_use]
    pub fn node_cost(node: &RelaxLang) -> usize {
        match node {
            RelaxLang::Num(_) | RelaxLang::Symbol(_) => 0,
            RelaxLang::Neg(_) => 1,
            RelaxLang::Add(_) | RelaxLang::Sub(_) | RelaxLang::Mul(_) | RelaxLang::Sqr(_) => 2,
            RelaxLang::Min(_) | RelaxLang::Max(_) => 3,
            RelaxLang::Div(_) | RelaxLang::Inv(_) => 10,
            RelaxLang::Sqrt(_) => 12,
            RelaxLang::Exp(_) | RelaxLang::Log(_) => 20,
        }
    }

    /// Total cost of a formula, counting shared nodes once per use.
    #[must_use]
    pub fn of(expr: &RecExpr<RelaxLang>) -> usize {
        Self.cost_rec(expr)
    }
}

impl CostFunction<RelaxLang> for EvalCost {
    type Cost = usize;

    fn cost<C>(&mut self, enode: &RelaxLang, mut costs: C) -> Self::Cost
    where
        C: FnMut(Id) -> Self::Cost,
    {
        enode.fold(Self::node_cost(enode), |sum, id| sum.saturating_add(costs(id)))
    }
}
