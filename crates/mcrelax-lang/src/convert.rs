//! Conversion between arena expressions and egg's `RecExpr`.

use egg::{Id, RecExpr, Symbol};
use mcrelax_core::{ExprArena, ExprHandle, ExprNode, HashMap};

use crate::error::LangError;
use crate::language::{Parts, RelaxLang};

/// Writes the expression at `root` as a `RecExpr`.
///
/// Shared sub-expressions are emitted once.
#[must_use]
pub fn export(arena: &ExprArena, root: ExprHandle) -> RecExpr<RelaxLang> {
    let mut expr = RecExpr::default();
    let mut ids: HashMap<ExprHandle, Id> = HashMap::new();
    for handle in arena.postorder(&[root]) {
        let node = match arena.get(handle) {
            ExprNode::Constant(c) => RelaxLang::Num(*c),
            ExprNode::Symbol(id) => {
                let name = arena.symbol_name(*id).unwrap_or_default();
                RelaxLang::Symbol(Symbol::from(name))
            }
            ExprNode::Unary { op, arg } => RelaxLang::from_op(*op, ids[arg], ids[arg]),
            ExprNode::Binary { op, lhs, rhs } => RelaxLang::from_op(*op, ids[lhs], ids[rhs]),
        };
        ids.insert(handle, expr.add(node));
    }
    expr
}

/// Reads a `RecExpr` into the arena; its last node is the root.
///
/// # Errors
///
/// Returns [`LangError::Empty`] for an empty expression.
pub fn import(arena: &mut ExprArena, expr: &RecExpr<RelaxLang>) -> Result<ExprHandle, LangError> {
    let nodes = expr.as_ref();
    let mut handles: Vec<ExprHandle> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let handle = match node.parts() {
            Parts::Num(v) => arena.constant(v),
            Parts::Symbol(s) => arena.symbol(s.as_str()),
            Parts::Unary(op, arg) => {
                let arg = handles[usize::from(arg)];
                arena.unary(op, arg)
            }
            Parts::Binary(op, lhs, rhs) => {
                let (lhs, rhs) = (handles[usize::from(lhs)], handles[usize::from(rhs)]);
                arena.binary(op, lhs, rhs)
            }
        };
        handles.push(handle);
    }
    handles.last().copied().ok_or(LangError::Empty)
}

/// Parses an s-expression straight into the arena.
///
/// # Errors
///
/// Returns [`LangError::Parse`] for malformed text.
pub fn parse(arena: &mut ExprArena, text: &str) -> Result<ExprHandle, LangError> {
    let expr: RecExpr<RelaxLang> = text.parse().map_err(|e| LangError::Parse(format!("{e}")))?;
    import(arena, &expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_shares_nodes() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let sq = arena.sqr(x);
        let root = arena.add(sq, sq);

        let expr = export(&arena, root);
        assert_eq!(expr.as_ref().len(), 3);
        assert_eq!(expr.to_string(), "(+ (sqr x) (sqr x))");
    }

    #[test]
    fn test_parse_builds_arena_nodes() {
        let mut arena = ExprArena::new();
        let parsed = parse(&mut arena, "(* x (exp (neg y)))").unwrap();

        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let ny = arena.neg(y);
        let e = arena.exp(ny);
        let built = arena.mul(x, e);
        assert_eq!(parsed, built);
    }

    #[test]
    fn test_constants_survive() {
        let mut arena = ExprArena::new();
        let root = parse(&mut arena, "(max 0.25 (inv x))").unwrap();
        let expr = export(&arena, root);
        assert_eq!(expr.to_string(), "(max 0.25 (inv x))");
    }

    #[test]
    fn test_parse_error() {
        let mut arena = ExprArena::new();
        assert!(matches!(parse(&mut arena, "(* x"), Err(LangError::Parse(_))));
        assert!(matches!(parse(&mut arena, "(exp x y)"), Err(LangError::Parse(_))));
    }

    #[test]
    fn test_empty_import() {
        let mut arena = ExprArena::new();
        let expr = RecExpr::<RelaxLang>::default();
        assert_eq!(import(&mut arena, &expr), Err(LangError::Empty));
    }
}
