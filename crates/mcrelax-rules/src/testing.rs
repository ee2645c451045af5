//! Helpers shared by the rule tests.

use mcrelax_core::{Bounds, ExprArena, ExprHandle, HashMap, Interval, SymbolId};

use crate::names::derive_bounds;
use crate::rule::Operand;

/// Creates the companions of `name` as an operand, together with the values
/// to bind them to.
pub(crate) fn symbolic_operand(
    arena: &mut ExprArena,
    name: &str,
    interval: Interval,
    values: Bounds<f64>,
) -> (Operand, Vec<(SymbolId, f64)>) {
    let set = derive_bounds(arena, name).expect("test names are valid");
    let bounds = set.map(|id| arena.symbol_expr(id));
    let bindings = vec![
        (set.lo, values.lo),
        (set.hi, values.hi),
        (set.cv, values.cv),
        (set.cc, values.cc),
    ];
    (Operand::new(bounds, interval), bindings)
}

/// Evaluates the four formulas.
pub(crate) fn evaluate(
    arena: &ExprArena,
    bounds: &Bounds<ExprHandle>,
    values: &HashMap<SymbolId, f64>,
) -> Bounds<f64> {
    bounds.map(|h| arena.evaluate(h, values).expect("all companions are bound"))
}
