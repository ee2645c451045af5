//! Compiled numeric evaluators.
//!
//! Root formulas are lowered to a flat instruction tape, one slot per
//! distinct node, evaluated front to back. A tape can carry several outputs,
//! which lets the four bounds of one expression share their common work.

use hashbrown::HashMap;
use mcrelax_core::{Bounds, ExprArena, ExprHandle, ExprNode, Op, SymbolId};
use rayon::prelude::*;

use crate::error::RelaxError;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Instr {
    Const(f64),
    Arg(u32),
    Unary(Op, u32),
    Binary(Op, u32, u32),
}

/// A flat, straight-line program over positional arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Tape {
    instrs: Vec<Instr>,
    outputs: Vec<u32>,
    arity: usize,
}

fn slot(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

impl Tape {
    /// Lowers `roots` over the arguments named by `ordering`.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::UnknownSymbol`] if a root mentions a symbol not
    /// in `ordering`.
    pub fn compile(
        arena: &ExprArena,
        roots: &[ExprHandle],
        ordering: &[SymbolId],
    ) -> Result<Self, RelaxError> {
        let positions: HashMap<SymbolId, u32> = ordering
            .iter()
            .enumerate()
            .map(|(i, &s)| (s, slot(i)))
            .collect();

        let order = arena.postorder(roots);
        let mut slots: HashMap<ExprHandle, u32> = HashMap::with_capacity(order.len());
        let mut instrs = Vec::with_capacity(order.len());
        for handle in order {
            let instr = match arena.get(handle) {
                ExprNode::Constant(c) => Instr::Const(c.value()),
                ExprNode::Symbol(id) => {
                    let position = positions.get(id).ok_or_else(|| RelaxError::UnknownSymbol {
                        name: arena.symbol_name(*id).unwrap_or_default().to_string(),
                    })?;
                    Instr::Arg(*position)
                }
                ExprNode::Unary { op, arg } => Instr::Unary(*op, slots[arg]),
                ExprNode::Binary { op, lhs, rhs } => Instr::Binary(*op, slots[lhs], slots[rhs]),
            };
            slots.insert(handle, slot(instrs.len()));
            instrs.push(instr);
        }

        let outputs = roots.iter().map(|root| slots[root]).collect();
        Ok(Self {
            instrs,
            outputs,
            arity: ordering.len(),
        })
    }

    /// Number of positional arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// Returns true if the tape has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Number of outputs.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Runs the tape, writing one value per output into `out`.
    ///
    /// `scratch` is reused between calls to avoid reallocating.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if `args` has the wrong length.
    pub fn eval_into(&self, args: &[f64], scratch: &mut Vec<f64>, out: &mut [f64]) -> Result<(), RelaxError> {
        if args.len() != self.arity {
            return Err(RelaxError::Arity {
                expected: self.arity,
                got: args.len(),
            });
        }
        scratch.clear();
        scratch.reserve(self.instrs.len());
        for instr in &self.instrs {
            let value = match *instr {
                Instr::Const(c) => c,
                Instr::Arg(i) => args[i as usize],
                Instr::Unary(op, a) => op.apply_unary(scratch[a as usize]),
                Instr::Binary(op, a, b) => op.apply_binary(scratch[a as usize], scratch[b as usize]),
            };
            scratch.push(value);
        }
        for (value, &output) in out.iter_mut().zip(&self.outputs) {
            *value = scratch[output as usize];
        }
        Ok(())
    }

    /// Runs the tape once.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if `args` has the wrong length.
    pub fn eval(&self, args: &[f64]) -> Result<Vec<f64>, RelaxError> {
        let mut out = vec![0.0; self.outputs.len()];
        self.eval_into(args, &mut Vec::new(), &mut out)?;
        Ok(out)
    }

    /// Runs the tape on every row, in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if any row has the wrong length.
    pub fn eval_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, RelaxError> {
        rows.par_iter()
            .map_init(Vec::new, |scratch, row| {
                let mut out = vec![0.0; self.outputs.len()];
                self.eval_into(row, scratch, &mut out)?;
                Ok(out)
            })
            .collect()
    }
}

/// Evaluator for one bound.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledEvaluator {
    tape: Tape,
}

impl CompiledEvaluator {
    /// Number of positional arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.tape.arity()
    }

    /// The underlying tape.
    #[must_use]
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Evaluates at one argument vector.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if `args` has the wrong length.
    pub fn call(&self, args: &[f64]) -> Result<f64, RelaxError> {
        let mut out = [0.0];
        self.tape.eval_into(args, &mut Vec::new(), &mut out)?;
        Ok(out[0])
    }

    /// Evaluates every row, in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if any row has the wrong length.
    pub fn call_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, RelaxError> {
        rows.par_iter()
            .map_init(Vec::new, |scratch, row| {
                let mut out = [0.0];
                self.tape.eval_into(row, scratch, &mut out)?;
                Ok(out[0])
            })
            .collect()
    }
}

/// The four evaluators `lo, hi, cv, cc` of one expression.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluatorSet {
    /// One evaluator per bound.
    pub bounds: Bounds<CompiledEvaluator>,
}

impl EvaluatorSet {
    pub(crate) fn compile(
        arena: &ExprArena,
        roots: &Bounds<ExprHandle>,
        ordering: &[SymbolId],
    ) -> Result<Self, RelaxError> {
        let bounds = Bounds::try_from_fn(|component| {
            let tape = Tape::compile(arena, &[*roots.get(component)], ordering)?;
            Ok::<_, RelaxError>(CompiledEvaluator { tape })
        })?;
        Ok(Self { bounds })
    }

    /// Evaluates all four bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if `args` has the wrong length.
    pub fn call_all(&self, args: &[f64]) -> Result<Bounds<f64>, RelaxError> {
        Bounds::try_from_fn(|component| self.bounds.get(component).call(args))
    }
}

/// One tape computing all four bounds with shared sub-formulas.
#[derive(Clone, Debug, PartialEq)]
pub struct FusedEvaluator {
    tape: Tape,
}

impl FusedEvaluator {
    pub(crate) fn new(tape: Tape) -> Self {
        Self { tape }
    }

    /// Number of positional arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.tape.arity()
    }

    /// The underlying tape.
    #[must_use]
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Evaluates all four bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if `args` has the wrong length.
    pub fn call(&self, args: &[f64]) -> Result<Bounds<f64>, RelaxError> {
        let mut out = [0.0; 4];
        self.tape.eval_into(args, &mut Vec::new(), &mut out)?;
        Ok(Bounds::new(out[0], out[1], out[2], out[3]))
    }

    /// Evaluates every row, in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`RelaxError::Arity`] if any row has the wrong length.
    pub fn call_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<Bounds<f64>>, RelaxError> {
        rows.par_iter()
            .map_init(Vec::new, |scratch, row| {
                let mut out = [0.0; 4];
                self.tape.eval_into(row, scratch, &mut out)?;
                Ok(Bounds::new(out[0], out[1], out[2], out[3]))
            })
            .collect()
    }
}
