//! Evaluator assembly: calling convention plus inlined root formulas.

use hashbrown::HashMap;
use mcrelax_core::{Bounds, ExprArena, ExprHandle, Interval, SymbolId};
use tracing::debug;

use crate::compile::{EvaluatorSet, FusedEvaluator, Tape};
use crate::error::RelaxError;
use crate::rewrite::{Input, Rewritten};

/// Everything needed to build the four evaluators of one expression.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluatorSpec {
    /// Root formulas over input companions only.
    pub roots: Bounds<ExprHandle>,
    /// Leaf symbols in first-seen order.
    pub inputs: Vec<Input>,
    /// Positional argument list: `cc, cv, hi, lo` of each input in turn.
    pub ordering: Vec<SymbolId>,
    /// Static enclosure of the expression over its domain.
    pub interval: Interval,
}

/// Size figures of an assembled spec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpecStats {
    /// Number of leaf symbols.
    pub inputs: usize,
    /// Evaluator arity, four per input.
    pub arguments: usize,
    /// Distinct nodes shared by the four root formulas.
    pub nodes: usize,
}

/// Inlines the definitions of `rewritten` into its root formulas.
///
/// Definitions are substituted in emission order, so each one only sees
/// targets that are already resolved. Substitution runs on the hash-consed
/// arena, so sub-formulas shared between definitions stay shared.
pub fn assemble(arena: &mut ExprArena, rewritten: &Rewritten) -> EvaluatorSpec {
    let mut resolved: HashMap<SymbolId, ExprHandle> = HashMap::with_capacity(rewritten.definitions.len());
    for definition in &rewritten.definitions {
        let value = arena.substitute(definition.value, &resolved);
        resolved.insert(definition.target, value);
    }
    let roots = rewritten.root.map(|root| arena.substitute(root, &resolved));

    let ordering = rewritten
        .inputs
        .iter()
        .flat_map(|input| input.bounds.canonical().map(|&s| s))
        .collect();

    let spec = EvaluatorSpec {
        roots,
        inputs: rewritten.inputs.clone(),
        ordering,
        interval: rewritten.interval,
    };
    debug!(arguments = spec.arity(), "assembled evaluator spec");
    spec
}

impl EvaluatorSpec {
    /// Number of positional arguments of each evaluator.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.ordering.len()
    }

    /// Names of the positional arguments.
    #[must_use]
    pub fn argument_names(&self, arena: &ExprArena) -> Vec<String> {
        self.ordering
            .iter()
            .map(|&s| arena.symbol_name(s).unwrap_or_default().to_string())
            .collect()
    }

    /// Size figures.
    #[must_use]
    pub fn stats(&self, arena: &ExprArena) -> SpecStats {
        let roots = self.roots.canonical().map(|&h| h);
        SpecStats {
            inputs: self.inputs.len(),
            arguments: self.arity(),
            nodes: arena.postorder(&roots).len(),
        }
    }

    /// Packs a point and its bounds into the positional argument list.
    ///
    /// `values` holds one `Bounds` per input, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if `values` does not have one entry per
    /// input.
    pub fn arguments(&self, values: &[Bounds<f64>]) -> Result<Vec<f64>, RelaxError> {
        if values.len() != self.inputs.len() {
            return Err(RelaxError::Arity {
                expected: self.inputs.len(),
                got: values.len(),
            });
        }
        Ok(values.iter().flat_map(|b| b.canonical().map(|&v| v)).collect())
    }

    /// Compiles the four roots into separate evaluators.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::UnknownSymbol`] if a root refers to a symbol
    /// outside the calling convention.
    pub fn compile(&self, arena: &ExprArena) -> Result<EvaluatorSet, RelaxError> {
        EvaluatorSet::compile(arena, &self.roots, &self.ordering)
    }

    /// Compiles the four roots into one evaluator with shared work.
    ///
    /// # Errors
    ///
    /// Fails like [`EvaluatorSpec::compile`].
    pub fn compile_fused(&self, arena: &ExprArena) -> Result<FusedEvaluator, RelaxError> {
        let b = &self.roots;
        let roots = [b.lo, b.hi, b.cv, b.cc];
        let tape = Tape::compile(arena, &roots, &self.ordering)?;
        Ok(FusedEvaluator::new(tape))
    }
}

#[cfg(test)]
mod tests {
    use mcrelax_core::Interval;

    use super::*;
    use crate::domain::Domain;
    use crate::rewrite::Rewriter;

    #[test]
    fn test_ordering_is_cc_cv_hi_lo_per_input() {
        let mut arena = ExprArena::new();
        let (x, y) = (arena.symbol("x"), arena.symbol("y"));
        let e = arena.exp(y);
        let root = arena.add(x, e);

        let rewritten = Rewriter::new(Domain::new()).rewrite(&mut arena, root).unwrap();
        let spec = assemble(&mut arena, &rewritten);
        assert_eq!(
            spec.argument_names(&arena),
            ["x_cc", "x_cv", "x_hi", "x_lo", "y_cc", "y_cv", "y_hi", "y_lo"]
        );
        assert_eq!(spec.arity(), 8);
    }

    #[test]
    fn test_roots_mention_inputs_only() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let s = arena.sqr(x);
        let n = arena.neg(s);
        let root = arena.exp(n);

        let domain = Domain::new().with(arena.find_symbol("x").unwrap(), Interval::new(-1.0, 1.0));
        let rewritten = Rewriter::new(domain).rewrite(&mut arena, root).unwrap();
        assert_eq!(rewritten.aux_count(), 3);
        let spec = assemble(&mut arena, &rewritten);

        for root in spec.roots.canonical() {
            for symbol in arena.free_symbols(*root) {
                assert!(spec.ordering.contains(&symbol), "{}", arena.display(*root));
            }
        }
        let stats = spec.stats(&arena);
        assert_eq!(stats.inputs, 1);
        assert_eq!(stats.arguments, 4);
        assert!(stats.nodes > 4);
    }

    #[test]
    fn test_leaf_root_is_identity() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let rewritten = Rewriter::new(Domain::new()).rewrite(&mut arena, x).unwrap();
        let spec = assemble(&mut arena, &rewritten);
        let names: Vec<_> = spec
            .roots
            .canonical()
            .iter()
            .map(|&&h| arena.display(h).to_string())
            .collect();
        assert_eq!(names, ["x_cc", "x_cv", "x_hi", "x_lo"]);
    }

    #[test]
    fn test_arguments_packing() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let root = arena.neg(x);
        let rewritten = Rewriter::new(Domain::new()).rewrite(&mut arena, root).unwrap();
        let spec = assemble(&mut arena, &rewritten);

        let args = spec.arguments(&[Bounds::new(1.0, 2.0, 3.0, 4.0)]).unwrap();
        assert_eq!(args, [4.0, 3.0, 2.0, 1.0]);
        assert_eq!(
            spec.arguments(&[]).unwrap_err(),
            RelaxError::Arity { expected: 1, got: 0 }
        );
    }
}
