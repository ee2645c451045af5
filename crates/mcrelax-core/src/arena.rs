//! Arena allocator for expression storage.
//!
//! All nodes live contiguously in one `Vec` and are hash-consed, so an
//! expression graph is a DAG in which every structurally distinct
//! sub-expression exists exactly once.

use hashbrown::{HashMap, HashSet};

use crate::expr::{Constant, ExprNode, Op};
use crate::handle::{ExprHandle, SymbolId};
use crate::intern::SymbolTable;

/// The main arena for storing expressions.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol names.
    symbols: SymbolTable,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            intern_map: HashMap::with_capacity(capacity),
            symbols: SymbolTable::new(),
        }
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Arena capacity exceeded");

        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this arena.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.slot()]
    }

    /// Interns a symbol name, returning its unique ID.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        self.symbols.intern(name)
    }

    /// Looks up a symbol by name without interning it.
    #[must_use]
    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name)
    }

    /// Gets the name of a symbol by its ID.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.symbols.name(id)
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Convenience constructors ===

    /// Creates a constant expression.
    ///
    /// # Panics
    ///
    /// Panics if `value` is NaN.
    pub fn constant(&mut self, value: f64) -> ExprHandle {
        let Some(c) = Constant::new(value) else {
            panic!("NaN cannot be used as an expression constant");
        };
        self.intern(ExprNode::Constant(c))
    }

    /// Creates a symbol expression from a name.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// Creates a symbol expression from an already interned ID.
    pub fn symbol_expr(&mut self, id: SymbolId) -> ExprHandle {
        self.intern(ExprNode::Symbol(id))
    }

    /// Applies a unary operator.
    pub fn unary(&mut self, op: Op, arg: ExprHandle) -> ExprHandle {
        debug_assert_eq!(op.arity(), 1, "`{op}` is not unary");
        self.intern(ExprNode::Unary { op, arg })
    }

    /// Applies a binary operator.
    pub fn binary(&mut self, op: Op, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        debug_assert_eq!(op.arity(), 2, "`{op}` is not binary");
        self.intern(ExprNode::Binary { op, lhs, rhs })
    }

    /// Creates a negation expression.
    pub fn neg(&mut self, arg: ExprHandle) -> ExprHandle {
        self.unary(Op::Neg, arg)
    }

    /// Creates an addition expression.
    pub fn add(&mut self, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.binary(Op::Add, lhs, rhs)
    }

    /// Creates a subtraction expression.
    pub fn sub(&mut self, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.binary(Op::Sub, lhs, rhs)
    }

    /// Creates a multiplication expression.
    pub fn mul(&mut self, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.binary(Op::Mul, lhs, rhs)
    }

    /// Creates a division expression.
    pub fn div(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        self.binary(Op::Div, num, den)
    }

    /// Creates a square expression.
    pub fn sqr(&mut self, arg: ExprHandle) -> ExprHandle {
        self.unary(Op::Sqr, arg)
    }

    /// Creates an exponential expression.
    pub fn exp(&mut self, arg: ExprHandle) -> ExprHandle {
        self.unary(Op::Exp, arg)
    }

    /// Creates a reciprocal expression.
    pub fn inv(&mut self, arg: ExprHandle) -> ExprHandle {
        self.unary(Op::Inv, arg)
    }

    /// Creates a natural logarithm expression.
    pub fn log(&mut self, arg: ExprHandle) -> ExprHandle {
        self.unary(Op::Log, arg)
    }

    /// Creates a square root expression.
    pub fn sqrt(&mut self, arg: ExprHandle) -> ExprHandle {
        self.unary(Op::Sqrt, arg)
    }

    /// Creates a pointwise minimum.
    pub fn min(&mut self, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.binary(Op::Min, lhs, rhs)
    }

    /// Creates a pointwise maximum.
    pub fn max(&mut self, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.binary(Op::Max, lhs, rhs)
    }

    // === Traversal ===

    /// Returns every distinct node reachable from `roots` in post-order
    /// (children before parents), each exactly once.
    ///
    /// Iterative, so arbitrarily deep expressions do not exhaust the stack.
    #[must_use]
    pub fn postorder(&self, roots: &[ExprHandle]) -> Vec<ExprHandle> {
        let mut order = Vec::new();
        let mut done: HashSet<ExprHandle> = HashSet::new();
        let mut stack: Vec<(ExprHandle, bool)> = Vec::new();

        for &root in roots.iter().rev() {
            stack.push((root, false));
        }
        while let Some((handle, expanded)) = stack.pop() {
            if done.contains(&handle) {
                continue;
            }
            if expanded {
                done.insert(handle);
                order.push(handle);
                continue;
            }
            stack.push((handle, true));
            for child in self.get(handle).children().into_iter().rev() {
                if !done.contains(&child) {
                    stack.push((child, false));
                }
            }
        }
        order
    }

    /// Returns the symbols occurring in `root`, in order of first appearance
    /// during a left-to-right post-order walk.
    #[must_use]
    pub fn free_symbols(&self, root: ExprHandle) -> Vec<SymbolId> {
        self.postorder(&[root])
            .into_iter()
            .filter_map(|h| self.get(h).as_symbol())
            .collect()
    }

    /// Replaces symbols by expressions throughout `root`.
    ///
    /// Shared sub-expressions are rebuilt once, so the result stays a DAG of
    /// the same shape.
    pub fn substitute(
        &mut self,
        root: ExprHandle,
        replacements: &HashMap<SymbolId, ExprHandle>,
    ) -> ExprHandle {
        if replacements.is_empty() {
            return root;
        }
        let mut rebuilt: HashMap<ExprHandle, ExprHandle> = HashMap::new();
        for handle in self.postorder(&[root]) {
            let new = match self.get(handle).clone() {
                ExprNode::Constant(_) => handle,
                ExprNode::Symbol(id) => replacements.get(&id).copied().unwrap_or(handle),
                ExprNode::Unary { op, arg } => {
                    let arg = rebuilt[&arg];
                    self.unary(op, arg)
                }
                ExprNode::Binary { op, lhs, rhs } => {
                    let (lhs, rhs) = (rebuilt[&lhs], rebuilt[&rhs]);
                    self.binary(op, lhs, rhs)
                }
            };
            rebuilt.insert(handle, new);
        }
        rebuilt[&root]
    }

    /// Evaluates `root` numerically.
    ///
    /// Returns `None` if a symbol in the expression has no value.
    #[must_use]
    pub fn evaluate(&self, root: ExprHandle, values: &HashMap<SymbolId, f64>) -> Option<f64> {
        let mut computed: HashMap<ExprHandle, f64> = HashMap::new();
        for handle in self.postorder(&[root]) {
            let value = match self.get(handle) {
                ExprNode::Constant(c) => c.value(),
                ExprNode::Symbol(id) => *values.get(id)?,
                ExprNode::Unary { op, arg } => op.apply_unary(computed[arg]),
                ExprNode::Binary { op, lhs, rhs } => op.apply_binary(computed[lhs], computed[rhs]),
            };
            computed.insert(handle, value);
        }
        computed.get(&root).copied()
    }
}
