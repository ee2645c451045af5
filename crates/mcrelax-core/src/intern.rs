//! Symbol interning.
//!
//! Names are stored once and referred to by [`SymbolId`] everywhere else,
//! so symbol comparison inside the rewriter is an integer comparison.

use hashbrown::HashMap;

use crate::handle::SymbolId;

/// An interning table for symbol names.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    /// Maps names to their IDs.
    ids: HashMap<Box<str>, SymbolId>,
    /// Stores names by ID for reverse lookup.
    names: Vec<Box<str>>,
}

impl SymbolTable {
    /// Creates a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a name, returning its unique ID.
    ///
    /// Does not allocate when the name is already present.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }

        let index = self.names.len();
        assert!(index < u32::MAX as usize, "symbol table capacity exceeded");

        let id = SymbolId::new(index as u32);
        self.ids.insert(name.into(), id);
        self.names.push(name.into());
        id
    }

    /// Looks up a name without interning it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    /// Returns the name of a symbol.
    #[must_use]
    pub fn name(&self, id: SymbolId) -> Option<&str> {
        self.names.get(id.index() as usize).map(AsRef::as_ref)
    }

    /// Returns the number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no names have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
