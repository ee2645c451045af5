//! Index handles into the arena.
//!
//! Both handles are 32-bit indices. An [`ExprHandle`] names a node, a
//! [`SymbolId`] names an interned symbol string.

use std::fmt;

/// A handle to an expression in the arena.
///
/// Two handles are equal if and only if they point to the same
/// (structurally identical) expression, thanks to hash-consing. This makes
/// the handle itself a valid memoization key for rewriting.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a new handle from an index.
    ///
    /// This is primarily for internal use by the arena.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

impl fmt::Display for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an interned symbol name.
///
/// Identity of a symbol is its name: interning the same string twice yields
/// the same id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this symbol.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sym({})", self.0)
    }
}
