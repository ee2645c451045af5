//! Affine rules: negation, addition, subtraction.
//!
//! Affine maps preserve convexity, so relaxations pass straight through;
//! negation and the subtrahend swap `cv` with `cc`.

use mcrelax_core::Bounds;

use crate::error::RuleError;
use crate::rule::{Operand, Relaxation, RelaxationRule, RuleContext};

/// `-x`.
pub fn negate(
    ctx: &mut RuleContext<'_>,
    _rule: &RelaxationRule,
    operands: &[Operand],
) -> Result<Relaxation, RuleError> {
    let x = &operands[0].bounds;
    let arena = &mut *ctx.arena;
    Ok(Relaxation {
        bounds: Bounds {
            lo: arena.neg(x.hi),
            hi: arena.neg(x.lo),
            cv: arena.neg(x.cc),
            cc: arena.neg(x.cv),
        },
        interval: operands[0].interval.neg(),
    })
}

/// `x + y`.
pub fn add(
    ctx: &mut RuleContext<'_>,
    _rule: &RelaxationRule,
    operands: &[Operand],
) -> Result<Relaxation, RuleError> {
    let (x, y) = (&operands[0], &operands[1]);
    let arena = &mut *ctx.arena;
    Ok(Relaxation {
        bounds: Bounds {
            lo: arena.add(x.bounds.lo, y.bounds.lo),
            hi: arena.add(x.bounds.hi, y.bounds.hi),
            cv: arena.add(x.bounds.cv, y.bounds.cv),
            cc: arena.add(x.bounds.cc, y.bounds.cc),
        },
        interval: x.interval.add(&y.interval),
    })
}

/// `x - y`.
pub fn subtract(
    ctx: &mut RuleContext<'_>,
    _rule: &RelaxationRule,
    operands: &[Operand],
) -> Result<Relaxation, RuleError> {
    let (x, y) = (&operands[0], &operands[1]);
    let arena = &mut *ctx.arena;
    Ok(Relaxation {
        bounds: Bounds {
            lo: arena.sub(x.bounds.lo, y.bounds.hi),
            hi: arena.sub(x.bounds.hi, y.bounds.lo),
            cv: arena.sub(x.bounds.cv, y.bounds.cc),
            cc: arena.sub(x.bounds.cc, y.bounds.cv),
        },
        interval: x.interval.sub(&y.interval),
    })
}
