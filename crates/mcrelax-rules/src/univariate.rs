//! Composition with univariate functions.
//!
//! For a monotone `f` that is convex or concave on its domain, the McCormick
//! composition rule needs only the operand's relaxations and the secant of
//! `f` over the operand's interval. [`compose`] implements it for any table
//! entry carrying a [`Shape`]; the square, whose minimum lies inside the
//! domain, has its own rule.

use mcrelax_core::{Bounds, ExprHandle, Sign};

use crate::error::RuleError;
use crate::rule::{Curvature, Monotonicity, Operand, Relaxation, RelaxationRule, RuleContext};

/// Relaxation of `f(x)` for a monotone convex or concave `f`.
///
/// | shape               | `cv`            | `cc`            |
/// |---------------------|-----------------|-----------------|
/// | convex, increasing  | `f(xv)`         | secant at `xc`  |
/// | convex, decreasing  | `f(xc)`         | secant at `xv`  |
/// | concave, increasing | secant at `xv`  | `f(xc)`         |
/// | concave, decreasing | secant at `xc`  | `f(xv)`         |
///
/// # Errors
///
/// Returns [`RuleError::Unclassified`] if the rule has no shape or is not
/// monotone.
pub fn compose(
    ctx: &mut RuleContext<'_>,
    rule: &RelaxationRule,
    operands: &[Operand],
) -> Result<Relaxation, RuleError> {
    let op = rule.op;
    let shape = rule.shape.ok_or(RuleError::Unclassified { op })?;
    let x = &operands[0];
    let b = &x.bounds;

    let f_lo = ctx.arena.unary(op, b.lo);
    let f_hi = ctx.arena.unary(op, b.hi);

    let (lo, hi, interval) = match shape.monotonicity {
        Monotonicity::Increasing => (f_lo, f_hi, x.interval.map_increasing(|v| op.apply_unary(v))),
        Monotonicity::Decreasing => (f_hi, f_lo, x.interval.map_decreasing(|v| op.apply_unary(v))),
        Monotonicity::Unimodal => return Err(RuleError::Unclassified { op }),
    };

    // Point where f attains the bound, and point where the secant does.
    let increasing = shape.monotonicity == Monotonicity::Increasing;
    let (at_f, at_secant) = match (shape.curvature, increasing) {
        (Curvature::Convex, true) | (Curvature::Concave, false) => (b.cv, b.cc),
        (Curvature::Convex, false) | (Curvature::Concave, true) => (b.cc, b.cv),
    };
    let direct = ctx.arena.unary(op, at_f);
    let secant = ctx.secant(b.lo, b.hi, f_lo, f_hi, at_secant);

    let (cv, cc) = match shape.curvature {
        Curvature::Convex => (direct, secant),
        Curvature::Concave => (secant, direct),
    };
    Ok(Relaxation {
        bounds: Bounds { lo, hi, cv, cc },
        interval,
    })
}

/// `x^2`.
///
/// Convex with its minimum at zero. The secant through the endpoints is
/// `(L + U) z - L U`, which needs no division.
pub fn square(
    ctx: &mut RuleContext<'_>,
    _rule: &RelaxationRule,
    operands: &[Operand],
) -> Result<Relaxation, RuleError> {
    let x = &operands[0];
    let b = &x.bounds;
    let interval = x.interval.sqr();
    let arena = &mut *ctx.arena;

    let slope = arena.add(b.lo, b.hi);
    let offset = arena.mul(b.lo, b.hi);
    let mut secant_at = |z: ExprHandle| {
        let rise = arena.mul(slope, z);
        arena.sub(rise, offset)
    };

    let bounds = match x.sign() {
        Sign::NonNegative => {
            let cc = secant_at(b.cc);
            Bounds {
                lo: arena.sqr(b.lo),
                hi: arena.sqr(b.hi),
                cv: arena.sqr(b.cv),
                cc,
            }
        }
        Sign::NonPositive => {
            let cc = secant_at(b.cv);
            Bounds {
                lo: arena.sqr(b.hi),
                hi: arena.sqr(b.lo),
                cv: arena.sqr(b.cc),
                cc,
            }
        }
        Sign::Unknown => {
            let at_cv = secant_at(b.cv);
            let at_cc = secant_at(b.cc);
            let cc = arena.max(at_cv, at_cc);

            // lo = max(L, -U, 0)^2
            let zero = arena.constant(0.0);
            let neg_hi = arena.neg(b.hi);
            let nearest = arena.max(b.lo, neg_hi);
            let nearest = arena.max(nearest, zero);
            let lo = arena.sqr(nearest);

            let sq_lo = arena.sqr(b.lo);
            let sq_hi = arena.sqr(b.hi);
            let hi = arena.max(sq_lo, sq_hi);

            // cv = f(mid(xv, xc, 0))
            let floor = arena.max(zero, b.cv);
            let argmin = arena.min(floor, b.cc);
            let cv = arena.sqr(argmin);
            Bounds { lo, hi, cv, cc }
        }
    };
    Ok(Relaxation { bounds, interval })
}

#[cfg(test)]
mod tests {
    use mcrelax_core::{Bounds, ExprArena, Interval, Op};

    use crate::testing::{evaluate, symbolic_operand};
    use crate::{standard_rules, RuleContext, RuleError, RuleOptions};

    fn relax_at(op: Op, range: Interval, cv: f64, cc: f64) -> Result<(Bounds<f64>, Interval), RuleError> {
        let mut arena = ExprArena::new();
        let (x, xv) = symbolic_operand(
            &mut arena,
            "x",
            range,
            Bounds::new(range.lo(), range.hi(), cv, cc),
        );
        let values = xv.into_iter().collect();
        let mut ctx = RuleContext::new(&mut arena, RuleOptions::default());
        let r = standard_rules().relax(&mut ctx, op, &[x])?;
        Ok((evaluate(&arena, &r.bounds, &values), r.interval))
    }

    #[test]
    fn test_square_mixed_sign() {
        let (b, interval) = relax_at(Op::Sqr, Interval::new(-1.0, 4.0), -0.5, 2.0).unwrap();
        assert_eq!(b.lo, 0.0);
        assert_eq!(b.hi, 16.0);
        // mid(-0.5, 2, 0) = 0
        assert_eq!(b.cv, 0.0);
        // max(3 * -0.5, 3 * 2) + 4
        assert_eq!(b.cc, 10.0);
        assert_eq!(interval, Interval::new(0.0, 16.0));
    }

    #[test]
    fn test_square_sign_definite() {
        let (b, _) = relax_at(Op::Sqr, Interval::new(1.0, 3.0), 2.0, 2.0).unwrap();
        assert_eq!(b, Bounds::new(1.0, 9.0, 4.0, 5.0));

        let (b, _) = relax_at(Op::Sqr, Interval::new(-3.0, -1.0), -2.0, -2.0).unwrap();
        assert_eq!(b, Bounds::new(1.0, 9.0, 4.0, 5.0));
    }

    #[test]
    fn test_exp_secant() {
        let (b, interval) = relax_at(Op::Exp, Interval::new(0.0, 1.0), 0.5, 0.5).unwrap();
        let e = 1f64.exp();
        assert_eq!(b.lo, 1.0);
        assert_eq!(b.hi, e);
        assert!((b.cv - 0.5f64.exp()).abs() < 1e-15);
        assert!((b.cc - (1.0 + (e - 1.0) * 0.5)).abs() < 1e-15);
        assert_eq!(interval, Interval::new(1.0, e));
    }

    #[test]
    fn test_exp_degenerate_interval() {
        let (b, _) = relax_at(Op::Exp, Interval::point(2.0), 2.0, 2.0).unwrap();
        let e2 = 2f64.exp();
        assert_eq!(b, Bounds::splat(e2));
    }

    #[test]
    fn test_concave_log_and_sqrt() {
        let (b, _) = relax_at(Op::Log, Interval::new(1.0, 4.0), 2.0, 3.0).unwrap();
        assert!(b.is_ordered(1e-12));
        assert!((b.cc - 3f64.ln()).abs() < 1e-15);
        assert!(b.cv <= 2f64.ln());

        let (b, _) = relax_at(Op::Sqrt, Interval::new(0.0, 4.0), 1.0, 1.0).unwrap();
        // secant through (0, 0) and (4, 2) at 1
        assert!((b.cv - 0.5).abs() < 1e-15);
        assert_eq!(b.cc, 1.0);
    }

    #[test]
    fn test_log_requires_positive_range() {
        let err = relax_at(Op::Log, Interval::new(0.0, 4.0), 1.0, 1.0).unwrap_err();
        assert!(matches!(err, RuleError::DomainViolation { op: Op::Log, index: 0, .. }));

        let err = relax_at(Op::Sqrt, Interval::new(-1.0, 4.0), 1.0, 1.0).unwrap_err();
        assert!(matches!(err, RuleError::DomainViolation { op: Op::Sqrt, .. }));
    }
}
