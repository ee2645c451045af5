//! The operator → rule table.
//!
//! Dispatch is a lookup keyed by the operator tag. The standard table is
//! built once on first use and never mutated; callers that need other
//! operators derive their own table from it.

use std::collections::BTreeMap;

use mcrelax_core::Op;
use once_cell::sync::Lazy;

use crate::arithmetic;
use crate::error::RuleError;
use crate::product;
use crate::rule::{DomainRequirement, Monotonicity, Operand, Relaxation, RelaxationRule, RuleContext, Shape};
use crate::univariate;

static STANDARD: Lazy<RuleTable> = Lazy::new(RuleTable::standard);

/// The process-wide standard rule table.
#[must_use]
pub fn standard_rules() -> &'static RuleTable {
    &STANDARD
}

/// A table of relaxation rules.
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: BTreeMap<Op, RelaxationRule>,
}

impl RuleTable {
    /// Creates a table without any rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard rule set: `neg + - * / sqr exp inv log sqrt`.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(RelaxationRule::new(Op::Neg, arithmetic::negate))
            .with_rule(RelaxationRule::new(Op::Add, arithmetic::add))
            .with_rule(RelaxationRule::new(Op::Sub, arithmetic::subtract))
            .with_rule(RelaxationRule::new(Op::Mul, product::multiply))
            .with_rule(
                RelaxationRule::new(Op::Div, product::divide).requiring(1, DomainRequirement::NonZero),
            )
            .with_rule(
                RelaxationRule::new(Op::Inv, product::reciprocal).requiring(0, DomainRequirement::NonZero),
            )
            .with_rule(
                RelaxationRule::new(Op::Sqr, univariate::square)
                    .with_shape(Shape::convex(Monotonicity::Unimodal)),
            )
            .with_rule(
                RelaxationRule::new(Op::Exp, univariate::compose)
                    .with_shape(Shape::convex(Monotonicity::Increasing)),
            )
            .with_rule(
                RelaxationRule::new(Op::Log, univariate::compose)
                    .with_shape(Shape::concave(Monotonicity::Increasing))
                    .requiring(0, DomainRequirement::Positive),
            )
            .with_rule(
                RelaxationRule::new(Op::Sqrt, univariate::compose)
                    .with_shape(Shape::concave(Monotonicity::Increasing))
                    .requiring(0, DomainRequirement::NonNegative),
            )
    }

    /// Adds or replaces the rule for `rule.op`.
    #[must_use]
    pub fn with_rule(mut self, rule: RelaxationRule) -> Self {
        self.rules.insert(rule.op, rule);
        self
    }

    /// Removes the rule for `op`.
    #[must_use]
    pub fn without(mut self, op: Op) -> Self {
        self.rules.remove(&op);
        self
    }

    /// Looks up the rule for `op`.
    #[must_use]
    pub fn get(&self, op: Op) -> Option<&RelaxationRule> {
        self.rules.get(&op)
    }

    /// Returns true if `op` has a rule.
    #[must_use]
    pub fn supports(&self, op: Op) -> bool {
        self.rules.contains_key(&op)
    }

    /// Operators with a rule, in tag order.
    pub fn operators(&self) -> impl Iterator<Item = Op> + '_ {
        self.rules.keys().copied()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up and applies the rule for `op`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnsupportedOperator`] if `op` has no rule, or any
    /// error the rule reports.
    pub fn relax(
        &self,
        ctx: &mut RuleContext<'_>,
        op: Op,
        operands: &[Operand],
    ) -> Result<Relaxation, RuleError> {
        let rule = self.get(op).ok_or(RuleError::UnsupportedOperator { op })?;
        tracing::trace!(%op, "applying relaxation rule");
        rule.relax(ctx, operands)
    }
}

#[cfg(test)]
mod tests {
    use mcrelax_core::{Bounds, ExprArena, Interval, Op};

    use super::*;
    use crate::testing::{evaluate, symbolic_operand};
    use crate::{Curvature, RuleOptions};

    #[test]
    fn test_standard_table_contents() {
        let table = standard_rules();
        for op in [Op::Neg, Op::Add, Op::Sub, Op::Mul, Op::Div, Op::Sqr, Op::Exp] {
            assert!(table.supports(op), "{op}");
        }
        assert!(!table.supports(Op::Min));
        assert!(!table.supports(Op::Max));
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn test_min_is_unsupported() {
        let mut arena = ExprArena::new();
        let (x, _) = symbolic_operand(&mut arena, "x", Interval::new(0.0, 1.0), Bounds::splat(0.5));
        let mut ctx = RuleContext::new(&mut arena, RuleOptions::default());
        let err = standard_rules().relax(&mut ctx, Op::Min, &[x, x]).unwrap_err();
        assert_eq!(err, RuleError::UnsupportedOperator { op: Op::Min });
    }

    #[test]
    fn test_extending_with_generic_composition() {
        // Re-register the reciprocal on the positive axis as a plain convex
        // decreasing function, handled by the generic composition rule.
        let table = RuleTable::standard().with_rule(
            RelaxationRule::new(Op::Inv, univariate::compose)
                .with_shape(Shape::convex(Monotonicity::Decreasing))
                .requiring(0, DomainRequirement::Positive),
        );
        let rule = table.get(Op::Inv).unwrap();
        assert_eq!(rule.shape.map(|s| s.curvature), Some(Curvature::Convex));

        let mut arena = ExprArena::new();
        let (x, xv) = symbolic_operand(&mut arena, "x", Interval::new(1.0, 4.0), Bounds::new(1.0, 4.0, 2.0, 2.0));
        let values = xv.into_iter().collect();
        let mut ctx = RuleContext::new(&mut arena, RuleOptions::default());
        let r = table.relax(&mut ctx, Op::Inv, &[x]).unwrap();
        let b = evaluate(&arena, &r.bounds, &values);

        assert_eq!(b.lo, 0.25);
        assert_eq!(b.hi, 1.0);
        assert_eq!(b.cv, 0.5);
        // secant through (1, 1) and (4, 0.25) at 2
        assert!((b.cc - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_removed_rule_is_unsupported() {
        let table = RuleTable::standard().without(Op::Exp);
        assert!(!table.supports(Op::Exp));
        assert!(standard_rules().supports(Op::Exp));
    }
}
