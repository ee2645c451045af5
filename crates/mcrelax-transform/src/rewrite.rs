//! The expression graph rewriter.
//!
//! Walks the expression DAG children-first and replaces every operator node
//! by an auxiliary symbol whose four companions are defined by the operator's
//! rule in terms of the companions of its operands. Each distinct node is
//! visited once: hash-consing makes the handle a structural-identity key.

use hashbrown::{HashMap, HashSet};
use mcrelax_core::{Bounds, Component, ExprArena, ExprHandle, ExprNode, Interval, Op, SymbolId};
use mcrelax_rules::{
    derive_bounds, derive_for_symbol, standard_rules, BoundedSymbolSet, Operand, RuleContext,
    RuleTable,
};
use tracing::{debug, trace};

use crate::config::RewriteConfig;
use crate::domain::Domain;
use crate::error::RelaxError;

/// One defining equation `target = value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Definition {
    /// The auxiliary companion being defined.
    pub target: SymbolId,
    /// Which of the four companions `target` is.
    pub component: Component,
    /// Its formula, over input and earlier auxiliary companions.
    pub value: ExprHandle,
}

/// A free input of the rewritten expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Input {
    /// The leaf symbol.
    pub symbol: SymbolId,
    /// Its four companions.
    pub bounds: BoundedSymbolSet,
}

/// Output of a rewrite.
#[derive(Clone, Debug, PartialEq)]
pub struct Rewritten {
    /// Formulas of the four root bounds; companion symbols unless the root
    /// is a leaf.
    pub root: Bounds<ExprHandle>,
    /// Static enclosure of the root over the domain.
    pub interval: Interval,
    /// Defining equations, each referring only to inputs and earlier targets.
    pub definitions: Vec<Definition>,
    /// Leaf symbols in first-seen order.
    pub inputs: Vec<Input>,
}

impl Rewritten {
    /// Number of auxiliary symbols introduced.
    #[must_use]
    pub fn aux_count(&self) -> usize {
        self.definitions.len() / 4
    }
}

/// Rewrites expressions into bound formulas.
#[derive(Clone, Debug)]
pub struct Rewriter<'t> {
    rules: &'t RuleTable,
    domain: Domain,
    config: RewriteConfig,
}

impl Rewriter<'static> {
    /// Creates a rewriter over the standard rule table.
    #[must_use]
    pub fn new(domain: Domain) -> Self {
        Self::with_rules(standard_rules(), domain)
    }
}

impl<'t> Rewriter<'t> {
    /// Creates a rewriter over a custom rule table.
    #[must_use]
    pub fn with_rules(rules: &'t RuleTable, domain: Domain) -> Self {
        Self {
            rules,
            domain,
            config: RewriteConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: RewriteConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// The declared symbol ranges.
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The rule table in use.
    #[must_use]
    pub fn rules(&self) -> &'t RuleTable {
        self.rules
    }

    /// Rewrites `root`.
    ///
    /// # Errors
    ///
    /// Fails if an operator has no rule, an operand's declared range violates
    /// a rule's domain, or a leaf name collides with the companion naming
    /// pattern. Nothing is returned on failure.
    pub fn rewrite(&self, arena: &mut ExprArena, root: ExprHandle) -> Result<Rewritten, RelaxError> {
        let order = arena.postorder(&[root]);
        debug!(nodes = order.len(), "rewriting expression");

        let leaves = order.iter().filter_map(|&h| arena.get(h).as_symbol()).collect();
        let mut state = RewriteState::new(leaves, order.len());

        for handle in order {
            let operand = match arena.get(handle).clone() {
                ExprNode::Constant(c) => Operand::literal(arena, c.value()),
                ExprNode::Symbol(symbol) => {
                    let bounds = derive_for_symbol(arena, symbol)?;
                    state.inputs.push(Input { symbol, bounds });
                    Operand::new(bounds.map(|s| arena.symbol_expr(s)), self.domain.range(symbol))
                }
                ExprNode::Unary { op, arg } => {
                    let operands = [state.memo[&arg]];
                    self.relax_node(arena, &mut state, handle, op, &operands)?
                }
                ExprNode::Binary { op, lhs, rhs } => {
                    let operands = [state.memo[&lhs], state.memo[&rhs]];
                    self.relax_node(arena, &mut state, handle, op, &operands)?
                }
            };
            state.memo.insert(handle, operand);
        }

        let top = state.memo[&root];
        debug!(
            inputs = state.inputs.len(),
            aux = state.definitions.len() / 4,
            interval = %top.interval,
            "rewrite finished"
        );
        Ok(Rewritten {
            root: top.bounds,
            interval: top.interval,
            definitions: state.definitions,
            inputs: state.inputs,
        })
    }

    fn relax_node(
        &self,
        arena: &mut ExprArena,
        state: &mut RewriteState,
        handle: ExprHandle,
        op: Op,
        operands: &[Operand],
    ) -> Result<Operand, RelaxError> {
        let relaxed = {
            let mut ctx = RuleContext::new(arena, self.config.rule_options());
            self.rules.relax(&mut ctx, op, operands)
        };
        let relaxation = relaxed.map_err(|source| RelaxError::Rule {
            expr: arena.display(handle).to_string(),
            source,
        })?;

        let name = state.next_aux_name(arena, &self.config.aux_prefix);
        let set = derive_bounds(arena, &name)?;
        trace!(%op, aux = %name, "introduced auxiliary");
        for component in Component::DEFINITION {
            state.definitions.push(Definition {
                target: *set.get(component),
                component,
                value: *relaxation.bounds.get(component),
            });
        }
        Ok(Operand::new(set.map(|s| arena.symbol_expr(s)), relaxation.interval))
    }
}

/// Per-call state of one rewrite.
struct RewriteState {
    memo: HashMap<ExprHandle, Operand>,
    definitions: Vec<Definition>,
    inputs: Vec<Input>,
    leaves: HashSet<SymbolId>,
    next_aux: usize,
}

impl RewriteState {
    fn new(leaves: HashSet<SymbolId>, nodes: usize) -> Self {
        Self {
            memo: HashMap::with_capacity(nodes),
            definitions: Vec::new(),
            inputs: Vec::new(),
            leaves,
            next_aux: 0,
        }
    }

    /// Next `<prefix><n>` that is not a leaf of the expression.
    fn next_aux_name(&mut self, arena: &ExprArena, prefix: &str) -> String {
        loop {
            self.next_aux += 1;
            let name = format!("{prefix}{}", self.next_aux);
            let taken = arena
                .find_symbol(&name)
                .is_some_and(|id| self.leaves.contains(&id));
            if !taken {
                return name;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mcrelax_core::{Op, Sign};
    use mcrelax_rules::{NamingError, RuleError};

    use super::*;
    use crate::testing::{eval_roots, init_tracing};

    fn scenario_domain(arena: &mut ExprArena, y: Interval) -> Domain {
        let mut domain = Domain::new();
        domain.declare_named(arena, "x", Interval::new(-1.0, 4.0));
        domain.declare_named(arena, "y", y);
        domain
    }

    const POINT: [(&str, f64); 2] = [("x", 2.5), ("y", 1.5)];

    #[test]
    fn test_sum_scenario() {
        init_tracing();
        let mut arena = ExprArena::new();
        let domain = scenario_domain(&mut arena, Interval::new(0.5, 3.0));
        let (x, y) = (arena.symbol("x"), arena.symbol("y"));
        let sum = arena.add(x, y);

        let rewritten = Rewriter::new(domain.clone()).rewrite(&mut arena, sum).unwrap();
        assert_eq!(rewritten.aux_count(), 1);
        assert_eq!(rewritten.interval, Interval::new(-0.5, 7.0));

        let b = eval_roots(&mut arena, &rewritten, &domain, &POINT);
        assert_eq!(b, Bounds::new(-0.5, 7.0, 4.0, 4.0));
    }

    #[test]
    fn test_product_scenario() {
        let mut arena = ExprArena::new();
        let domain = scenario_domain(&mut arena, Interval::new(0.5, 3.0));
        let (x, y) = (arena.symbol("x"), arena.symbol("y"));
        let product = arena.mul(x, y);

        let rewritten = Rewriter::new(domain.clone()).rewrite(&mut arena, product).unwrap();
        let b = eval_roots(&mut arena, &rewritten, &domain, &POINT);
        assert_eq!(b.lo, -3.0);
        assert_eq!(b.hi, 12.0);
        assert_eq!(b.cv, 1.5);
        assert_eq!(b.cc, 5.25);
    }

    #[test]
    fn test_quotient_scenario() {
        let mut arena = ExprArena::new();
        let domain = scenario_domain(&mut arena, Interval::new(0.5, 3.0));
        let (x, y) = (arena.symbol("x"), arena.symbol("y"));
        let quotient = arena.div(x, y);

        let rewritten = Rewriter::new(domain).rewrite(&mut arena, quotient).unwrap();
        assert_eq!(rewritten.interval, Interval::new(-2.0, 8.0));

        let domain = scenario_domain(&mut arena, Interval::new(-1.0, 3.0));
        let err = Rewriter::new(domain).rewrite(&mut arena, quotient).unwrap_err();
        match err {
            RelaxError::Rule { expr, source } => {
                assert_eq!(expr, "(x / y)");
                assert!(matches!(source, RuleError::DomainViolation { op: Op::Div, index: 1, .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_divisor_fails() {
        let mut arena = ExprArena::new();
        let (x, y) = (arena.symbol("x"), arena.symbol("y"));
        let quotient = arena.div(x, y);
        assert!(Rewriter::new(Domain::new()).rewrite(&mut arena, quotient).is_err());
    }

    #[test]
    fn test_shared_subexpression_is_rewritten_once() {
        let mut arena = ExprArena::new();
        let a = arena.symbol("a");
        let square = arena.mul(a, a);
        let twice = arena.add(square, square);

        let rewriter = Rewriter::new(Domain::new());
        let rewritten = rewriter.rewrite(&mut arena, twice).unwrap();
        // one for a*a, one for the sum
        assert_eq!(rewritten.aux_count(), 2);
        assert_eq!(rewritten.definitions.len(), 8);
        assert_eq!(rewritten.inputs.len(), 1);

        let single = rewriter.rewrite(&mut arena, square).unwrap();
        assert_eq!(single.aux_count(), 1);
    }

    #[test]
    fn test_rewrite_is_deterministic() {
        let mut arena = ExprArena::new();
        let domain = scenario_domain(&mut arena, Interval::new(0.5, 3.0));
        let (x, y) = (arena.symbol("x"), arena.symbol("y"));
        let e = arena.exp(y);
        let p = arena.mul(x, e);
        let root = arena.sub(p, x);

        let rewriter = Rewriter::new(domain);
        let first = rewriter.rewrite(&mut arena, root).unwrap();
        let second = rewriter.rewrite(&mut arena, root).unwrap();
        assert_eq!(first, second);

        let names: Vec<_> = first
            .inputs
            .iter()
            .map(|input| arena.symbol_name(input.symbol).unwrap())
            .collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn test_definitions_follow_lo_hi_cv_cc() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let root = arena.neg(x);
        let rewritten = Rewriter::new(Domain::new()).rewrite(&mut arena, root).unwrap();

        let components: Vec<_> = rewritten.definitions.iter().map(|d| d.component).collect();
        assert_eq!(components, Component::DEFINITION);
        let targets: Vec<_> = rewritten
            .definitions
            .iter()
            .map(|d| arena.symbol_name(d.target).unwrap())
            .collect();
        assert_eq!(targets, ["aux1_lo", "aux1_hi", "aux1_cv", "aux1_cc"]);
    }

    #[test]
    fn test_aux_names_avoid_leaves() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let taken = arena.symbol("aux1");
        let root = arena.add(x, taken);

        let rewritten = Rewriter::new(Domain::new()).rewrite(&mut arena, root).unwrap();
        let target = rewritten.definitions[0].target;
        assert_eq!(arena.symbol_name(target), Some("aux2_lo"));
    }

    #[test]
    fn test_custom_prefix() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let root = arena.neg(x);
        let rewriter = Rewriter::new(Domain::new()).with_config(RewriteConfig::default().with_aux_prefix("t"));
        let rewritten = rewriter.rewrite(&mut arena, root).unwrap();
        assert_eq!(arena.symbol_name(rewritten.definitions[3].target), Some("t1_cc"));
    }

    #[test]
    fn test_min_is_unsupported() {
        let mut arena = ExprArena::new();
        let (x, y) = (arena.symbol("x"), arena.symbol("y"));
        let m = arena.min(x, y);
        let root = arena.add(m, x);

        let err = Rewriter::new(Domain::new()).rewrite(&mut arena, root).unwrap_err();
        assert_eq!(
            err,
            RelaxError::Rule {
                expr: "min(x, y)".to_string(),
                source: RuleError::UnsupportedOperator { op: Op::Min },
            }
        );
    }

    #[test]
    fn test_reserved_leaf_name_fails() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x_cv");
        let root = arena.exp(x);
        let err = Rewriter::new(Domain::new()).rewrite(&mut arena, root).unwrap_err();
        assert!(matches!(err, RelaxError::Naming(NamingError::Collision { suffix: "cv", .. })));
    }

    #[test]
    fn test_constant_root_and_literals() {
        let mut arena = ExprArena::new();
        let three = arena.constant(3.0);
        let rewritten = Rewriter::new(Domain::new()).rewrite(&mut arena, three).unwrap();
        assert_eq!(rewritten.root, Bounds::splat(three));
        assert!(rewritten.definitions.is_empty());
        assert!(rewritten.inputs.is_empty());

        let x = arena.symbol("x");
        let scaled = arena.mul(three, x);
        let mut domain = Domain::new();
        domain.declare(arena.find_symbol("x").unwrap(), Interval::new(-1.0, 2.0));
        let rewritten = Rewriter::new(domain).rewrite(&mut arena, scaled).unwrap();
        assert_eq!(rewritten.interval, Interval::new(-3.0, 6.0));
        assert_eq!(rewritten.interval.sign(), Sign::Unknown);
    }

    #[test]
    fn test_deep_chain() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let mut root = x;
        for _ in 0..20_000 {
            root = arena.add(root, x);
        }
        let domain = Domain::new().with(arena.find_symbol("x").unwrap(), Interval::new(0.0, 2.0));
        let rewritten = Rewriter::new(domain.clone()).rewrite(&mut arena, root).unwrap();
        assert_eq!(rewritten.aux_count(), 20_000);

        let b = eval_roots(&mut arena, &rewritten, &domain, &[("x", 1.0)]);
        assert_eq!(b, Bounds::new(0.0, 40_002.0, 20_001.0, 20_001.0));
    }
}
