//! Numeric intervals used as static side information.
//!
//! While rewriting, every sub-expression carries an enclosure of its range
//! over the declared domain of its leaves. Rules consult it to pick
//! sign-specific formulas and to reject undefined operations (division by an
//! interval containing zero). These intervals are computed once at rewrite
//! time; the generated formulas compute the runtime bounds.
//!
//! Endpoint arithmetic uses round-to-nearest. `0 * inf` is taken as `0`.

use std::fmt;

/// A closed interval `[lo, hi]` with `lo <= hi`, possibly unbounded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

/// Sign information derived from an interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Every point is `>= 0`.
    NonNegative,
    /// Every point is `<= 0`.
    NonPositive,
    /// The interval straddles zero, or nothing is known.
    Unknown,
}

impl Interval {
    /// Creates an interval.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or either endpoint is NaN.
    #[must_use]
    pub fn new(lo: f64, hi: f64) -> Self {
        match Self::try_new(lo, hi) {
            Some(interval) => interval,
            None => panic!("invalid interval [{lo}, {hi}]"),
        }
    }

    /// Creates an interval, returning `None` if `lo > hi` or an endpoint is NaN.
    #[must_use]
    pub fn try_new(lo: f64, hi: f64) -> Option<Self> {
        (lo <= hi).then_some(Self { lo, hi })
    }

    /// The degenerate interval `[value, value]`.
    #[must_use]
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    /// The whole real line.
    #[must_use]
    pub const fn entire() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }

    /// Lower endpoint.
    #[must_use]
    pub const fn lo(&self) -> f64 {
        self.lo
    }

    /// Upper endpoint.
    #[must_use]
    pub const fn hi(&self) -> f64 {
        self.hi
    }

    /// Returns true if both endpoints are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    /// Returns true if `x` lies in the interval.
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x <= self.hi
    }

    /// Returns true if `other` lies in the interval.
    #[must_use]
    pub fn encloses(&self, other: &Interval) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    /// Returns true if zero lies in the interval.
    #[must_use]
    pub fn contains_zero(&self) -> bool {
        self.contains(0.0)
    }

    /// The midpoint of a bounded interval.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * self.lo + 0.5 * self.hi
    }

    /// Sign classification.
    #[must_use]
    pub fn sign(&self) -> Sign {
        if self.lo >= 0.0 {
            Sign::NonNegative
        } else if self.hi <= 0.0 {
            Sign::NonPositive
        } else {
            Sign::Unknown
        }
    }

    /// `-x`.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            lo: -self.hi,
            hi: -self.lo,
        }
    }

    /// `x + y`.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            lo: self.lo + other.lo,
            hi: self.hi + other.hi,
        }
    }

    /// `x - y`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            lo: self.lo - other.hi,
            hi: self.hi - other.lo,
        }
    }

    /// `x * y`.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let products = [
            product(self.lo, other.lo),
            product(self.lo, other.hi),
            product(self.hi, other.lo),
            product(self.hi, other.hi),
        ];
        Self {
            lo: products.into_iter().fold(f64::INFINITY, f64::min),
            hi: products.into_iter().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// `1 / x`, or `None` if the interval contains zero.
    #[must_use]
    pub fn recip(&self) -> Option<Self> {
        if self.contains_zero() {
            return None;
        }
        Some(Self {
            lo: self.hi.recip(),
            hi: self.lo.recip(),
        })
    }

    /// `x^2`.
    #[must_use]
    pub fn sqr(&self) -> Self {
        let lo = match self.sign() {
            Sign::NonNegative => self.lo * self.lo,
            Sign::NonPositive => self.hi * self.hi,
            Sign::Unknown => 0.0,
        };
        Self {
            lo,
            hi: (self.lo * self.lo).max(self.hi * self.hi),
        }
    }

    /// Image under a non-decreasing function.
    #[must_use]
    pub fn map_increasing(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            lo: f(self.lo),
            hi: f(self.hi),
        }
    }

    /// Image under a non-increasing function.
    #[must_use]
    pub fn map_decreasing(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            lo: f(self.hi),
            hi: f(self.lo),
        }
    }

    /// Smallest interval containing both.
    #[must_use]
    pub fn hull(&self, other: &Self) -> Self {
        Self {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    /// Intersection, or `None` if disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        Self::try_new(self.lo.max(other.lo), self.hi.min(other.hi))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::entire()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

fn product(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}
