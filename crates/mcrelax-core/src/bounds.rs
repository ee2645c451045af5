//! The four-component bound tuple.
//!
//! Every quantity the rewriter tracks comes as a lower bound, an upper
//! bound, a convex underestimator and a concave overestimator. [`Bounds`]
//! keeps the four together regardless of what they are: symbol ids, formula
//! handles, or evaluated numbers.

use std::fmt;

/// One of the four tracked components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    /// Concave overestimator.
    Cc,
    /// Convex underestimator.
    Cv,
    /// Interval upper bound.
    Hi,
    /// Interval lower bound.
    Lo,
}

impl Component {
    /// Positional order used by generated evaluators: `cc, cv, hi, lo`.
    pub const CANONICAL: [Component; 4] = [Component::Cc, Component::Cv, Component::Hi, Component::Lo];

    /// Order in which definitions and derivative equations are emitted.
    pub const DEFINITION: [Component; 4] = [Component::Lo, Component::Hi, Component::Cv, Component::Cc];

    /// Name suffix, without the separating underscore.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Component::Cc => "cc",
            Component::Cv => "cv",
            Component::Hi => "hi",
            Component::Lo => "lo",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A `{lo, hi, cv, cc}` tuple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bounds<T> {
    /// Interval lower bound.
    pub lo: T,
    /// Interval upper bound.
    pub hi: T,
    /// Convex underestimator.
    pub cv: T,
    /// Concave overestimator.
    pub cc: T,
}

impl<T> Bounds<T> {
    /// Creates a tuple from its components.
    pub const fn new(lo: T, hi: T, cv: T, cc: T) -> Self {
        Self { lo, hi, cv, cc }
    }

    /// A tuple whose four components are equal.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            lo: value.clone(),
            hi: value.clone(),
            cv: value.clone(),
            cc: value,
        }
    }

    /// Builds a tuple by calling `f` for each component, in definition order.
    pub fn try_from_fn<E>(mut f: impl FnMut(Component) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            lo: f(Component::Lo)?,
            hi: f(Component::Hi)?,
            cv: f(Component::Cv)?,
            cc: f(Component::Cc)?,
        })
    }

    /// Builds a tuple by calling `f` for each component, in definition order.
    pub fn from_fn(mut f: impl FnMut(Component) -> T) -> Self {
        Self {
            lo: f(Component::Lo),
            hi: f(Component::Hi),
            cv: f(Component::Cv),
            cc: f(Component::Cc),
        }
    }

    /// Returns one component.
    pub fn get(&self, component: Component) -> &T {
        match component {
            Component::Cc => &self.cc,
            Component::Cv => &self.cv,
            Component::Hi => &self.hi,
            Component::Lo => &self.lo,
        }
    }

    /// Applies `f` to each component.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Bounds<U> {
        Bounds {
            lo: f(self.lo),
            hi: f(self.hi),
            cv: f(self.cv),
            cc: f(self.cc),
        }
    }

    /// Borrows each component.
    pub fn by_ref(&self) -> Bounds<&T> {
        Bounds {
            lo: &self.lo,
            hi: &self.hi,
            cv: &self.cv,
            cc: &self.cc,
        }
    }

    /// Components in canonical `cc, cv, hi, lo` order.
    pub fn canonical(&self) -> [&T; 4] {
        [&self.cc, &self.cv, &self.hi, &self.lo]
    }
}

impl Bounds<f64> {
    /// Checks `lo <= cv <= cc <= hi`, allowing `tol` of slack at each step.
    #[must_use]
    pub fn is_ordered(&self, tol: f64) -> bool {
        self.lo <= self.cv + tol && self.cv <= self.cc + tol && self.cc <= self.hi + tol
    }
}
