//! Bilinear rules: multiplication, reciprocal and division.
//!
//! The product relaxation is McCormick's rule for `x*y` over relaxed
//! operands (McCormick 1976, in the form of Mitsos, Chachuat & Barton 2009):
//!
//! ```text
//! cv = max( min(yL*xv, yL*xc) + min(xL*yv, xL*yc) - xL*yL,
//!           min(yU*xv, yU*xc) + min(xU*yv, xU*yc) - xU*yU )
//! cc = min( max(yL*xv, yL*xc) + max(xU*yv, xU*yc) - xU*yL,
//!           max(yU*xv, yU*xc) + max(xL*yv, xL*yc) - xL*yU )
//! ```
//!
//! Each inner `min`/`max` picks the relaxation by the sign of its
//! coefficient. When an operand's static range is sign-definite that choice
//! is made here, at rewrite time, and no `min`/`max` is emitted for it.

use mcrelax_core::{Bounds, ExprHandle, Interval, Sign};

use crate::error::RuleError;
use crate::rule::{Operand, Relaxation, RelaxationRule, RuleContext};

/// `x * y`.
pub fn multiply(
    ctx: &mut RuleContext<'_>,
    _rule: &RelaxationRule,
    operands: &[Operand],
) -> Result<Relaxation, RuleError> {
    Ok(product(ctx, &operands[0], &operands[1]))
}

/// `x / y`, relaxed as `x * (1/y)`.
///
/// The table entry requires `y` to be bounded away from zero.
pub fn divide(
    ctx: &mut RuleContext<'_>,
    _rule: &RelaxationRule,
    operands: &[Operand],
) -> Result<Relaxation, RuleError> {
    let (x, y) = (&operands[0], &operands[1]);
    let inverse = reciprocal_of(ctx, y);
    let inverse = Operand {
        bounds: inverse.bounds,
        interval: inverse.interval,
        constant: y.constant.map(f64::recip),
    };
    Ok(product(ctx, x, &inverse))
}

/// `1 / x`.
///
/// The table entry requires `x` to be bounded away from zero.
pub fn reciprocal(
    ctx: &mut RuleContext<'_>,
    _rule: &RelaxationRule,
    operands: &[Operand],
) -> Result<Relaxation, RuleError> {
    Ok(reciprocal_of(ctx, &operands[0]))
}

/// Relaxation of `x * y`.
pub(crate) fn product(ctx: &mut RuleContext<'_>, x: &Operand, y: &Operand) -> Relaxation {
    match (x.constant, y.constant) {
        (Some(c), _) => return scale(ctx, c, y),
        (None, Some(c)) => return scale(ctx, c, x),
        (None, None) => {}
    }

    let interval = x.interval.mul(&y.interval);
    let (xb, yb) = (&x.bounds, &y.bounds);
    let (sx, sy) = (x.sign(), y.sign());
    let (lo, hi) = endpoint_products(ctx, x, y);

    // An operand's endpoints carry its sign; both endpoints of a
    // sign-definite operand share it.
    let cv = {
        let a1 = ctx.scaled_min(yb.lo, sy, xb.cv, xb.cc);
        let a2 = ctx.scaled_min(xb.lo, sx, yb.cv, yb.cc);
        let b1 = ctx.scaled_min(yb.hi, sy, xb.cv, xb.cc);
        let b2 = ctx.scaled_min(xb.hi, sx, yb.cv, yb.cc);
        let ll = ctx.arena.mul(xb.lo, yb.lo);
        let uu = ctx.arena.mul(xb.hi, yb.hi);
        let first = affine(ctx, a1, a2, ll);
        let second = affine(ctx, b1, b2, uu);
        ctx.arena.max(first, second)
    };
    let cc = {
        let g1 = ctx.scaled_max(yb.lo, sy, xb.cv, xb.cc);
        let g2 = ctx.scaled_max(xb.hi, sx, yb.cv, yb.cc);
        let d1 = ctx.scaled_max(yb.hi, sy, xb.cv, xb.cc);
        let d2 = ctx.scaled_max(xb.lo, sx, yb.cv, yb.cc);
        let ul = ctx.arena.mul(xb.hi, yb.lo);
        let lu = ctx.arena.mul(xb.lo, yb.hi);
        let first = affine(ctx, g1, g2, ul);
        let second = affine(ctx, d1, d2, lu);
        ctx.arena.min(first, second)
    };

    Relaxation {
        bounds: ctx.cut(Bounds { lo, hi, cv, cc }),
        interval,
    }
}

/// `p + q - r`.
fn affine(ctx: &mut RuleContext<'_>, p: ExprHandle, q: ExprHandle, r: ExprHandle) -> ExprHandle {
    let sum = ctx.arena.add(p, q);
    ctx.arena.sub(sum, r)
}

/// Interval bounds of `x * y`, keeping only the endpoint products that can
/// be extremal given the static signs.
fn endpoint_products(ctx: &mut RuleContext<'_>, x: &Operand, y: &Operand) -> (ExprHandle, ExprHandle) {
    let (xl, xu) = (x.bounds.lo, x.bounds.hi);
    let (yl, yu) = (y.bounds.lo, y.bounds.hi);
    let arena = &mut *ctx.arena;
    let ll = arena.mul(xl, yl);
    let lu = arena.mul(xl, yu);
    let ul = arena.mul(xu, yl);
    let uu = arena.mul(xu, yu);

    match (x.sign(), y.sign()) {
        (Sign::NonNegative, Sign::NonNegative) => (ll, uu),
        (Sign::NonNegative, Sign::NonPositive) => (ul, lu),
        (Sign::NonPositive, Sign::NonNegative) => (lu, ul),
        (Sign::NonPositive, Sign::NonPositive) => (uu, ll),
        (Sign::NonNegative, Sign::Unknown) => (arena.min(ll, ul), arena.max(lu, uu)),
        (Sign::NonPositive, Sign::Unknown) => (arena.min(lu, uu), arena.max(ll, ul)),
        (Sign::Unknown, Sign::NonNegative) => (arena.min(ll, lu), arena.max(ul, uu)),
        (Sign::Unknown, Sign::NonPositive) => (arena.min(ul, uu), arena.max(ll, lu)),
        (Sign::Unknown, Sign::Unknown) => {
            let lo_a = arena.min(ll, lu);
            let lo_b = arena.min(ul, uu);
            let hi_a = arena.max(ll, lu);
            let hi_b = arena.max(ul, uu);
            (arena.min(lo_a, lo_b), arena.max(hi_a, hi_b))
        }
    }
}

/// `c * x` for a literal `c`.
fn scale(ctx: &mut RuleContext<'_>, c: f64, x: &Operand) -> Relaxation {
    let k = ctx.arena.constant(c);
    let b = &x.bounds;
    let arena = &mut *ctx.arena;
    let bounds = if c >= 0.0 {
        Bounds {
            lo: arena.mul(k, b.lo),
            hi: arena.mul(k, b.hi),
            cv: arena.mul(k, b.cv),
            cc: arena.mul(k, b.cc),
        }
    } else {
        Bounds {
            lo: arena.mul(k, b.hi),
            hi: arena.mul(k, b.lo),
            cv: arena.mul(k, b.cc),
            cc: arena.mul(k, b.cv),
        }
    };
    Relaxation {
        bounds,
        interval: Interval::point(c).mul(&x.interval),
    }
}

/// Relaxation of `1/x` for sign-definite `x`.
///
/// On `x > 0` the reciprocal is convex and decreasing, on `x < 0` concave
/// and decreasing. The secant through the endpoints is `(L + U - z)/(L*U)`.
fn reciprocal_of(ctx: &mut RuleContext<'_>, x: &Operand) -> Relaxation {
    let interval = x.interval.recip().unwrap_or_else(Interval::entire);
    if let Some(c) = x.constant {
        let k = ctx.arena.constant(c.recip());
        return Relaxation {
            bounds: Bounds::splat(k),
            interval,
        };
    }

    let b = &x.bounds;
    let arena = &mut *ctx.arena;
    let lo = arena.inv(b.hi);
    let hi = arena.inv(b.lo);
    let span = arena.add(b.lo, b.hi);
    let denom = arena.mul(b.lo, b.hi);
    let mut secant_at = |z: ExprHandle| {
        let num = arena.sub(span, z);
        arena.div(num, denom)
    };

    let bounds = if x.interval.lo() > 0.0 {
        let cc = secant_at(b.cv);
        Bounds {
            lo,
            hi,
            cv: arena.inv(b.cc),
            cc,
        }
    } else {
        let cv = secant_at(b.cc);
        Bounds {
            lo,
            hi,
            cv,
            cc: arena.inv(b.cv),
        }
    };
    Relaxation { bounds, interval }
}
