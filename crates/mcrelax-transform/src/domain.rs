//! Declared ranges of leaf symbols.

use hashbrown::HashMap;
use mcrelax_core::{ExprArena, Interval, SymbolId};

/// Declared ranges of the leaf symbols of an expression.
///
/// A symbol without a declaration ranges over the whole real line. The
/// declared range must contain every box the generated evaluators are later
/// called on; rules derive sign facts from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Domain {
    ranges: HashMap<SymbolId, Interval>,
}

impl Domain {
    /// Creates a domain with no declarations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the range of `symbol`, returning the previous declaration.
    pub fn declare(&mut self, symbol: SymbolId, range: Interval) -> Option<Interval> {
        self.ranges.insert(symbol, range)
    }

    /// Declares the range of the symbol called `name`, interning it.
    pub fn declare_named(&mut self, arena: &mut ExprArena, name: &str, range: Interval) -> SymbolId {
        let symbol = arena.intern_symbol(name);
        self.declare(symbol, range);
        symbol
    }

    /// Builder form of [`Domain::declare`].
    #[must_use]
    pub fn with(mut self, symbol: SymbolId, range: Interval) -> Self {
        self.declare(symbol, range);
        self
    }

    /// The declared range, if any.
    #[must_use]
    pub fn get(&self, symbol: SymbolId) -> Option<Interval> {
        self.ranges.get(&symbol).copied()
    }

    /// The declared range, or the whole real line.
    #[must_use]
    pub fn range(&self, symbol: SymbolId) -> Interval {
        self.get(symbol).unwrap_or_else(Interval::entire)
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
