//! Property-based tests for the relaxation rules.
//!
//! Each operand is sampled as `lo <= cv <= x <= cc <= hi`, where `x` is the
//! true value. Every rule must then produce ordered bounds that enclose
//! `f(x)`, both at runtime and in its static range.

#[cfg(test)]
mod tests {
    use mcrelax_core::{Bounds, ExprArena, HashMap, Interval, Op};
    use proptest::prelude::*;

    use crate::testing::{evaluate, symbolic_operand};
    use crate::{standard_rules, Operand, RuleContext, RuleOptions};

    /// A relaxed operand value together with the declared range it lives in.
    #[derive(Clone, Copy, Debug)]
    struct Sample {
        declared: Interval,
        bounds: Bounds<f64>,
        x: f64,
    }

    fn unit() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), Just(1.0), 0.0f64..=1.0]
    }

    fn width() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), 0.0f64..8.0]
    }

    // Runtime bounds inside [lo_min, lo_min + span]; the declared range
    // either equals them or is wider.
    fn sample(lo_min: f64, span: f64) -> impl Strategy<Value = Sample> {
        (0.0f64..=1.0, width(), unit(), unit(), unit(), prop::bool::ANY, 0.0f64..2.0).prop_map(
            move |(start, w, t1, t2, t3, widen, pad)| {
                let lo = lo_min + start * span;
                let hi = lo + w;
                let mut ts = [t1, t2, t3];
                ts.sort_by(f64::total_cmp);
                let at = |t: f64| (lo + t * w).clamp(lo, hi);
                let declared = if widen {
                    // Widen without crossing the lower end of the sample space,
                    // so positive-only samples stay positive.
                    Interval::new((lo - pad).max(lo_min), hi + pad)
                } else {
                    Interval::new(lo, hi)
                };
                Sample {
                    declared,
                    bounds: Bounds::new(lo, hi, at(ts[0]), at(ts[2])),
                    x: at(ts[1]),
                }
            },
        )
    }

    fn tolerance(values: &[f64]) -> f64 {
        1e-9 * (1.0 + values.iter().fold(0.0f64, |m, v| m.max(v.abs())))
    }

    fn relax(op: Op, samples: &[Sample]) -> (Bounds<f64>, Interval) {
        let mut arena = ExprArena::new();
        let mut values = HashMap::new();
        let mut operands: Vec<Operand> = Vec::new();
        for (i, s) in samples.iter().enumerate() {
            let (operand, bindings) = symbolic_operand(&mut arena, &format!("v{i}"), s.declared, s.bounds);
            values.extend(bindings);
            operands.push(operand);
        }
        let mut ctx = RuleContext::new(&mut arena, RuleOptions::default());
        let r = standard_rules()
            .relax(&mut ctx, op, &operands)
            .expect("samples satisfy the rule's domain");
        (evaluate(&arena, &r.bounds, &values), r.interval)
    }

    fn check(op: Op, samples: &[Sample], truth: f64) -> Result<(), TestCaseError> {
        let (b, interval) = relax(op, samples);
        let tol = tolerance(&[b.lo, b.hi, b.cv, b.cc, truth]);
        prop_assert!(b.is_ordered(tol), "{op}: unordered {b:?}");
        prop_assert!(b.lo - tol <= truth && truth <= b.hi + tol, "{op}: {truth} outside [{}, {}]", b.lo, b.hi);
        prop_assert!(b.cv - tol <= truth, "{op}: cv {} above {truth}", b.cv);
        prop_assert!(truth <= b.cc + tol, "{op}: cc {} below {truth}", b.cc);
        prop_assert!(
            interval.lo() - tol <= truth && truth <= interval.hi() + tol,
            "{op}: {truth} outside static range {interval}"
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn neg_is_sound(x in sample(-10.0, 20.0)) {
            check(Op::Neg, &[x], -x.x)?;
        }

        #[test]
        fn add_is_sound(x in sample(-10.0, 20.0), y in sample(-10.0, 20.0)) {
            check(Op::Add, &[x, y], x.x + y.x)?;
        }

        #[test]
        fn sub_is_sound(x in sample(-10.0, 20.0), y in sample(-10.0, 20.0)) {
            check(Op::Sub, &[x, y], x.x - y.x)?;
        }

        #[test]
        fn mul_is_sound(x in sample(-10.0, 20.0), y in sample(-10.0, 20.0)) {
            check(Op::Mul, &[x, y], x.x * y.x)?;
        }

        #[test]
        fn div_positive_is_sound(x in sample(-10.0, 20.0), y in sample(0.25, 10.0)) {
            check(Op::Div, &[x, y], x.x / y.x)?;
        }

        #[test]
        fn inv_is_sound(y in sample(0.25, 10.0), negative in prop::bool::ANY) {
            let y = if negative {
                Sample {
                    declared: y.declared.neg(),
                    bounds: Bounds::new(-y.bounds.hi, -y.bounds.lo, -y.bounds.cc, -y.bounds.cv),
                    x: -y.x,
                }
            } else {
                y
            };
            check(Op::Inv, &[y], y.x.recip())?;
        }

        #[test]
        fn sqr_is_sound(x in sample(-10.0, 20.0)) {
            check(Op::Sqr, &[x], x.x * x.x)?;
        }

        #[test]
        fn exp_is_sound(x in sample(-5.0, 10.0)) {
            check(Op::Exp, &[x], x.x.exp())?;
        }

        #[test]
        fn log_is_sound(x in sample(0.25, 10.0)) {
            check(Op::Log, &[x], x.x.ln())?;
        }

        #[test]
        fn sqrt_is_sound(x in sample(0.0, 10.0)) {
            check(Op::Sqrt, &[x], x.x.sqrt())?;
        }
    }
}
