//! Companion-name derivation.
//!
//! A base symbol `x` is tracked through four companions `x_lo`, `x_hi`,
//! `x_cv` and `x_cc`. Base names that already end in one of these suffixes
//! are rejected, which keeps derived names collision-free.

use mcrelax_core::{Bounds, Component, ExprArena, SymbolId};

use crate::error::NamingError;

/// The four companion symbols of one base symbol.
pub type BoundedSymbolSet = Bounds<SymbolId>;

/// Separator between a base name and its suffix.
pub const SEPARATOR: char = '_';

/// Returns the reserved suffix `name` ends with, if any.
#[must_use]
pub fn reserved_suffix(name: &str) -> Option<&'static str> {
    Component::CANONICAL.into_iter().map(Component::suffix).find(|suffix| {
        name.strip_suffix(suffix)
            .is_some_and(|stem| stem.ends_with(SEPARATOR))
    })
}

/// Derives the companion name of `name` for one component.
#[must_use]
pub fn companion_name(name: &str, component: Component) -> String {
    format!("{name}{SEPARATOR}{}", component.suffix())
}

/// Derives and interns the four companions of `name`.
///
/// # Errors
///
/// Returns [`NamingError::Collision`] if `name` ends in `_lo`, `_hi`, `_cv`
/// or `_cc`.
pub fn derive_bounds(arena: &mut ExprArena, name: &str) -> Result<BoundedSymbolSet, NamingError> {
    if let Some(suffix) = reserved_suffix(name) {
        return Err(NamingError::Collision {
            name: name.to_string(),
            suffix,
        });
    }
    Ok(Bounds::from_fn(|component| {
        arena.intern_symbol(&companion_name(name, component))
    }))
}

/// Derives the companions of an already interned symbol.
///
/// # Errors
///
/// Fails like [`derive_bounds`], or if `symbol` is not from this arena.
pub fn derive_for_symbol(
    arena: &mut ExprArena,
    symbol: SymbolId,
) -> Result<BoundedSymbolSet, NamingError> {
    let name = arena
        .symbol_name(symbol)
        .ok_or(NamingError::UnknownSymbol(symbol.index()))?
        .to_string();
    derive_bounds(arena, &name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_bounds() {
        let mut arena = ExprArena::new();
        let set = derive_bounds(&mut arena, "x").unwrap();

        assert_eq!(arena.symbol_name(set.lo), Some("x_lo"));
        assert_eq!(arena.symbol_name(set.hi), Some("x_hi"));
        assert_eq!(arena.symbol_name(set.cv), Some("x_cv"));
        assert_eq!(arena.symbol_name(set.cc), Some("x_cc"));

        // Deterministic
        assert_eq!(derive_bounds(&mut arena, "x").unwrap(), set);
    }

    #[test]
    fn test_collision_is_rejected() {
        let mut arena = ExprArena::new();
        let err = derive_bounds(&mut arena, "speed_cv").unwrap_err();
        assert_eq!(
            err,
            NamingError::Collision {
                name: "speed_cv".to_string(),
                suffix: "cv",
            }
        );

        // Only the full `_suffix` pattern is reserved.
        assert!(derive_bounds(&mut arena, "halo").is_ok());
        assert!(derive_bounds(&mut arena, "lo").is_ok());
        assert!(derive_bounds(&mut arena, "x_low").is_ok());
    }

    #[test]
    fn test_derive_for_symbol() {
        let mut arena = ExprArena::new();
        let k = arena.intern_symbol("k");
        let set = derive_for_symbol(&mut arena, k).unwrap();
        assert_eq!(arena.symbol_name(set.cc), Some("k_cc"));
    }
}
