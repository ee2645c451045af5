//! The rule record and the context rules build formulas in.

use std::fmt;

use mcrelax_core::{Bounds, ExprArena, ExprHandle, Interval, Op, Sign};

use crate::error::RuleError;

/// Bound formulas and static range of one operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Operand {
    /// Formulas (usually companion symbols) for the four bounds.
    pub bounds: Bounds<ExprHandle>,
    /// Static enclosure of the operand over the declared domain.
    pub interval: Interval,
    /// The literal value, if the operand is a numeric constant.
    pub constant: Option<f64>,
}

impl Operand {
    /// An operand whose bounds are the given formulas.
    #[must_use]
    pub fn new(bounds: Bounds<ExprHandle>, interval: Interval) -> Self {
        Self {
            bounds,
            interval,
            constant: None,
        }
    }

    /// A literal operand: all four bounds are the literal itself.
    pub fn literal(arena: &mut ExprArena, value: f64) -> Self {
        Self {
            bounds: Bounds::splat(arena.constant(value)),
            interval: Interval::point(value),
            constant: Some(value),
        }
    }

    /// Static sign of the operand.
    #[must_use]
    pub fn sign(&self) -> Sign {
        self.interval.sign()
    }
}

/// What a rule produces for one operator application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Relaxation {
    /// Formulas for the four bounds of the result.
    pub bounds: Bounds<ExprHandle>,
    /// Static enclosure of the result.
    pub interval: Interval,
}

/// Curvature of a univariate operator over its domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Curvature {
    /// Convex everywhere on the domain.
    Convex,
    /// Concave everywhere on the domain.
    Concave,
}

/// Monotonicity of a univariate operator over its domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Monotonicity {
    /// Non-decreasing.
    Increasing,
    /// Non-increasing.
    Decreasing,
    /// Single interior extremum; needs a dedicated rule.
    Unimodal,
}

/// Convexity/monotonicity classification of a univariate operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    /// Curvature.
    pub curvature: Curvature,
    /// Monotonicity.
    pub monotonicity: Monotonicity,
}

impl Shape {
    /// Convex with the given monotonicity.
    #[must_use]
    pub const fn convex(monotonicity: Monotonicity) -> Self {
        Self {
            curvature: Curvature::Convex,
            monotonicity,
        }
    }

    /// Concave with the given monotonicity.
    #[must_use]
    pub const fn concave(monotonicity: Monotonicity) -> Self {
        Self {
            curvature: Curvature::Concave,
            monotonicity,
        }
    }
}

/// Structural precondition on an operand's static range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainRequirement {
    /// No restriction.
    Any,
    /// Strictly positive.
    Positive,
    /// Non-negative.
    NonNegative,
    /// Sign-definite and excluding zero.
    NonZero,
}

impl DomainRequirement {
    /// Returns true if every point of `interval` satisfies the requirement.
    #[must_use]
    pub fn is_met_by(self, interval: &Interval) -> bool {
        match self {
            DomainRequirement::Any => true,
            DomainRequirement::Positive => interval.lo() > 0.0,
            DomainRequirement::NonNegative => interval.lo() >= 0.0,
            DomainRequirement::NonZero => !interval.contains_zero(),
        }
    }
}

impl fmt::Display for DomainRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DomainRequirement::Any => "unrestricted",
            DomainRequirement::Positive => "strictly positive",
            DomainRequirement::NonNegative => "non-negative",
            DomainRequirement::NonZero => "bounded away from zero",
        })
    }
}

/// Tunables shared by all rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleOptions {
    /// Intersect relaxations with the interval bounds where a rule can
    /// produce `cv < lo` or `cc > hi`.
    pub cut_to_interval: bool,
    /// Lower bound on the interval width used as a secant denominator.
    pub min_width: f64,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            cut_to_interval: true,
            min_width: f64::MIN_POSITIVE,
        }
    }
}

/// Builds a rule's output formulas.
pub type ApplyFn = fn(&mut RuleContext<'_>, &RelaxationRule, &[Operand]) -> Result<Relaxation, RuleError>;

/// The McCormick rule for one operator.
#[derive(Clone, Copy, Debug)]
pub struct RelaxationRule {
    /// The operator this rule relaxes.
    pub op: Op,
    /// Classification, for univariate operators that have one.
    pub shape: Option<Shape>,
    /// Precondition per operand position.
    pub domains: [DomainRequirement; 2],
    apply: ApplyFn,
}

impl RelaxationRule {
    /// Creates a rule with no shape and no domain restriction.
    #[must_use]
    pub fn new(op: Op, apply: ApplyFn) -> Self {
        Self {
            op,
            shape: None,
            domains: [DomainRequirement::Any; 2],
            apply,
        }
    }

    /// Attaches a convexity/monotonicity classification.
    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Restricts the static range of operand `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid operand position.
    #[must_use]
    pub fn requiring(mut self, index: usize, requirement: DomainRequirement) -> Self {
        assert!(index < self.op.arity(), "`{}` has no operand {index}", self.op);
        self.domains[index] = requirement;
        self
    }

    /// Number of operands.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.op.arity()
    }

    /// Checks the domain preconditions and builds the four result formulas.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DomainViolation`] when an operand's static range
    /// does not meet the rule's requirement, or whatever the rule itself
    /// reports.
    pub fn relax(&self, ctx: &mut RuleContext<'_>, operands: &[Operand]) -> Result<Relaxation, RuleError> {
        debug_assert_eq!(operands.len(), self.arity(), "arity mismatch for `{}`", self.op);
        for (index, operand) in operands.iter().enumerate() {
            let requirement = self.domains[index];
            if !requirement.is_met_by(&operand.interval) {
                return Err(RuleError::DomainViolation {
                    op: self.op,
                    index,
                    requirement,
                    interval: operand.interval,
                });
            }
        }
        (self.apply)(ctx, self, operands)
    }
}

/// Mutable state rules build formulas in.
pub struct RuleContext<'a> {
    /// The arena receiving the formulas.
    pub arena: &'a mut ExprArena,
    /// Rule tunables.
    pub options: RuleOptions,
}

impl<'a> RuleContext<'a> {
    /// Creates a context writing into `arena`.
    pub fn new(arena: &'a mut ExprArena, options: RuleOptions) -> Self {
        Self { arena, options }
    }

    /// `min(k*v, k*c)`, collapsed to one product when the sign of `k` is
    /// known.
    pub fn scaled_min(&mut self, k: ExprHandle, sign: Sign, v: ExprHandle, c: ExprHandle) -> ExprHandle {
        match sign {
            Sign::NonNegative => self.arena.mul(k, v),
            Sign::NonPositive => self.arena.mul(k, c),
            Sign::Unknown => {
                let kv = self.arena.mul(k, v);
                let kc = self.arena.mul(k, c);
                self.arena.min(kv, kc)
            }
        }
    }

    /// `max(k*v, k*c)`, collapsed to one product when the sign of `k` is
    /// known.
    pub fn scaled_max(&mut self, k: ExprHandle, sign: Sign, v: ExprHandle, c: ExprHandle) -> ExprHandle {
        match sign {
            Sign::NonNegative => self.arena.mul(k, c),
            Sign::NonPositive => self.arena.mul(k, v),
            Sign::Unknown => {
                let kv = self.arena.mul(k, v);
                let kc = self.arena.mul(k, c);
                self.arena.max(kv, kc)
            }
        }
    }

    /// `min(max(z, lo), hi)`.
    pub fn clamp(&mut self, z: ExprHandle, lo: ExprHandle, hi: ExprHandle) -> ExprHandle {
        let floor = self.arena.max(z, lo);
        self.arena.min(floor, hi)
    }

    /// Secant of a function through `(l, fl)` and `(u, fu)`, evaluated at `z`.
    ///
    /// The width is floored at [`RuleOptions::min_width`]; on a degenerate
    /// interval `fu - fl` is zero and the secant reduces to `fl`.
    pub fn secant(
        &mut self,
        l: ExprHandle,
        u: ExprHandle,
        fl: ExprHandle,
        fu: ExprHandle,
        z: ExprHandle,
    ) -> ExprHandle {
        let width = self.arena.sub(u, l);
        let floor = self.arena.constant(self.options.min_width);
        let width = self.arena.max(width, floor);
        let rise = self.arena.sub(fu, fl);
        let slope = self.arena.div(rise, width);
        let offset = self.arena.sub(z, l);
        let step = self.arena.mul(slope, offset);
        self.arena.add(fl, step)
    }

    /// Intersects the relaxations with the interval bounds, if enabled.
    pub fn cut(&mut self, bounds: Bounds<ExprHandle>) -> Bounds<ExprHandle> {
        if !self.options.cut_to_interval {
            return bounds;
        }
        Bounds {
            cv: self.arena.max(bounds.cv, bounds.lo),
            cc: self.arena.min(bounds.cc, bounds.hi),
            ..bounds
        }
    }
}
