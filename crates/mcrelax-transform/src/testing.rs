//! Helpers shared by the transform tests.

use mcrelax_core::{Bounds, ExprArena, HashMap};

use crate::assemble::assemble;
use crate::domain::Domain;
use crate::rewrite::Rewritten;

/// Installs a fmt subscriber once; later calls are no-ops.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Assembles `rewritten` and evaluates its four roots at a point.
///
/// Each input gets `lo`/`hi` from its declared range and `cv = cc` from
/// `point`.
pub(crate) fn eval_roots(
    arena: &mut ExprArena,
    rewritten: &Rewritten,
    domain: &Domain,
    point: &[(&str, f64)],
) -> Bounds<f64> {
    let spec = assemble(arena, rewritten);
    let mut values = HashMap::new();
    for input in &spec.inputs {
        let name = arena.symbol_name(input.symbol).expect("inputs are named");
        let (_, x) = point
            .iter()
            .find(|(n, _)| *n == name)
            .expect("point covers every input");
        let range = domain.range(input.symbol);
        values.insert(input.bounds.lo, range.lo());
        values.insert(input.bounds.hi, range.hi());
        values.insert(input.bounds.cv, *x);
        values.insert(input.bounds.cc, *x);
    }
    spec.roots
        .map(|root| arena.evaluate(root, &values).expect("all inputs are bound"))
}
