//! The ODE system container.
//!
//! A system is a list of states, a list of parameters and one equation
//! `d/dt state = rhs` per state. Right-hand sides live in an [`ExprArena`]
//! owned by the caller; the system only stores handles into it.

use mcrelax_core::{ExprArena, ExprHandle, Interval, SymbolId};
use mcrelax_transform::{Domain, Tape};

use crate::error::DynamicError;

fn name_of(arena: &ExprArena, symbol: SymbolId) -> String {
    arena.symbol_name(symbol).unwrap_or_default().to_string()
}

/// A time-varying state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateVar {
    /// The state's symbol.
    pub symbol: SymbolId,
    /// Bounds on the initial value.
    pub bounds: Interval,
    /// Initial value; the midpoint of `bounds` when absent.
    pub initial: Option<f64>,
    /// An enclosure valid over the whole horizon, if one is known.
    pub domain: Option<Interval>,
}

impl StateVar {
    /// A state with initial bounds.
    #[must_use]
    pub fn new(symbol: SymbolId, bounds: Interval) -> Self {
        Self {
            symbol,
            bounds,
            initial: None,
            domain: None,
        }
    }

    /// Sets the initial value.
    #[must_use]
    pub fn with_initial(mut self, value: f64) -> Self {
        self.initial = Some(value);
        self
    }

    /// Sets the a-priori enclosure over the horizon.
    #[must_use]
    pub fn with_domain(mut self, domain: Interval) -> Self {
        self.domain = Some(domain);
        self
    }

    /// The initial value, defaulting to the midpoint of the bounds.
    #[must_use]
    pub fn initial_value(&self) -> f64 {
        self.initial.unwrap_or_else(|| self.bounds.midpoint())
    }
}

/// A constant parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameter {
    /// The parameter's symbol.
    pub symbol: SymbolId,
    /// Bounds on the parameter.
    pub bounds: Interval,
    /// Nominal value; the midpoint of `bounds` when absent.
    pub nominal: Option<f64>,
}

impl Parameter {
    /// A parameter with bounds.
    #[must_use]
    pub fn new(symbol: SymbolId, bounds: Interval) -> Self {
        Self {
            symbol,
            bounds,
            nominal: None,
        }
    }

    /// Sets the nominal value.
    #[must_use]
    pub fn with_nominal(mut self, value: f64) -> Self {
        self.nominal = Some(value);
        self
    }

    /// The nominal value, defaulting to the midpoint of the bounds.
    #[must_use]
    pub fn nominal_value(&self) -> f64 {
        self.nominal.unwrap_or_else(|| self.bounds.midpoint())
    }
}

/// `d/dt state = rhs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Equation {
    /// The differentiated state.
    pub state: SymbolId,
    /// Right-hand side.
    pub rhs: ExprHandle,
}

/// A system of first-order ODEs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OdeSystem {
    states: Vec<StateVar>,
    parameters: Vec<Parameter>,
    equations: Vec<Equation>,
}

impl OdeSystem {
    /// Creates an empty system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// States in declaration order.
    #[must_use]
    pub fn states(&self) -> &[StateVar] {
        &self.states
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Equations in declaration order.
    #[must_use]
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Looks up a state.
    #[must_use]
    pub fn state(&self, symbol: SymbolId) -> Option<&StateVar> {
        self.states.iter().find(|s| s.symbol == symbol)
    }

    /// Looks up a parameter.
    #[must_use]
    pub fn parameter(&self, symbol: SymbolId) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.symbol == symbol)
    }

    /// Looks up the equation of a state.
    #[must_use]
    pub fn equation(&self, state: SymbolId) -> Option<&Equation> {
        self.equations.iter().find(|e| e.state == state)
    }

    fn is_declared(&self, symbol: SymbolId) -> bool {
        self.state(symbol).is_some() || self.parameter(symbol).is_some()
    }

    /// Declares a state.
    ///
    /// # Errors
    ///
    /// Fails if the symbol is already declared or the initial value lies
    /// outside the bounds.
    pub fn add_state(&mut self, arena: &ExprArena, state: StateVar) -> Result<(), DynamicError> {
        if self.is_declared(state.symbol) {
            return Err(DynamicError::Duplicate {
                name: name_of(arena, state.symbol),
            });
        }
        if let Some(value) = state.initial {
            if !state.bounds.contains(value) {
                return Err(DynamicError::OutOfBounds {
                    name: name_of(arena, state.symbol),
                    value,
                    bounds: state.bounds,
                });
            }
        }
        self.states.push(state);
        Ok(())
    }

    /// Declares a parameter.
    ///
    /// # Errors
    ///
    /// Fails if the symbol is already declared or the nominal value lies
    /// outside the bounds.
    pub fn add_parameter(&mut self, arena: &ExprArena, parameter: Parameter) -> Result<(), DynamicError> {
        if self.is_declared(parameter.symbol) {
            return Err(DynamicError::Duplicate {
                name: name_of(arena, parameter.symbol),
            });
        }
        if let Some(value) = parameter.nominal {
            if !parameter.bounds.contains(value) {
                return Err(DynamicError::OutOfBounds {
                    name: name_of(arena, parameter.symbol),
                    value,
                    bounds: parameter.bounds,
                });
            }
        }
        self.parameters.push(parameter);
        Ok(())
    }

    /// Adds `d/dt state = rhs`.
    ///
    /// # Errors
    ///
    /// Fails if `state` is not a declared state, already has an equation, or
    /// `rhs` mentions an undeclared symbol.
    pub fn add_equation(&mut self, arena: &ExprArena, state: SymbolId, rhs: ExprHandle) -> Result<(), DynamicError> {
        if self.state(state).is_none() {
            return Err(DynamicError::UnknownState {
                name: name_of(arena, state),
            });
        }
        if self.equation(state).is_some() {
            return Err(DynamicError::DuplicateEquation {
                name: name_of(arena, state),
            });
        }
        if let Some(unknown) = arena.free_symbols(rhs).into_iter().find(|&s| !self.is_declared(s)) {
            return Err(DynamicError::UnknownSymbol {
                name: name_of(arena, unknown),
                state: name_of(arena, state),
            });
        }
        self.equations.push(Equation { state, rhs });
        Ok(())
    }

    /// Checks that every state has an equation.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicError::MissingEquation`] for the first state without
    /// one.
    pub fn validate(&self, arena: &ExprArena) -> Result<(), DynamicError> {
        match self.states.iter().find(|s| self.equation(s.symbol).is_none()) {
            Some(missing) => Err(DynamicError::MissingEquation {
                name: name_of(arena, missing.symbol),
            }),
            None => Ok(()),
        }
    }

    /// Static ranges for relaxing the right-hand sides.
    ///
    /// States contribute their a-priori enclosure only: initial bounds do
    /// not hold over the horizon. Parameters contribute their bounds.
    #[must_use]
    pub fn domain(&self) -> Domain {
        let mut domain = Domain::new();
        for state in &self.states {
            if let Some(range) = state.domain {
                domain.declare(state.symbol, range);
            }
        }
        for parameter in &self.parameters {
            domain.declare(parameter.symbol, parameter.bounds);
        }
        domain
    }

    /// Initial values of the states, in declaration order.
    #[must_use]
    pub fn initial_values(&self) -> Vec<f64> {
        self.states.iter().map(StateVar::initial_value).collect()
    }

    /// Nominal values of the parameters, in declaration order.
    #[must_use]
    pub fn nominal_values(&self) -> Vec<f64> {
        self.parameters.iter().map(Parameter::nominal_value).collect()
    }

    /// Compiles the right-hand sides into a numeric vector field.
    ///
    /// # Errors
    ///
    /// Fails if a state has no equation, or a right-hand side mentions a
    /// symbol that is neither a state nor a parameter.
    pub fn vector_field(&self, arena: &ExprArena) -> Result<VectorField, DynamicError> {
        self.validate(arena)?;
        let roots: Vec<ExprHandle> = self
            .states
            .iter()
            .filter_map(|s| self.equation(s.symbol).map(|e| e.rhs))
            .collect();
        let ordering: Vec<SymbolId> = self
            .states
            .iter()
            .map(|s| s.symbol)
            .chain(self.parameters.iter().map(|p| p.symbol))
            .collect();
        let tape = Tape::compile(arena, &roots, &ordering)?;
        Ok(VectorField {
            tape,
            states: self.states.len(),
            parameters: self.parameters.len(),
        })
    }
}

/// Numeric right-hand side of an [`OdeSystem`].
///
/// Takes state values in declaration order and parameter values in
/// declaration order; returns one derivative per state.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorField {
    tape: Tape,
    states: usize,
    parameters: usize,
}

impl VectorField {
    /// Evaluates the derivatives into `out`.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicError::Arity`] if a slice has the wrong length.
    pub fn eval_into(&self, states: &[f64], parameters: &[f64], out: &mut [f64]) -> Result<(), DynamicError> {
        if states.len() != self.states || out.len() != self.states {
            return Err(DynamicError::Arity {
                expected: self.states,
                got: if states.len() == self.states { out.len() } else { states.len() },
            });
        }
        if parameters.len() != self.parameters {
            return Err(DynamicError::Arity {
                expected: self.parameters,
                got: parameters.len(),
            });
        }
        let args: Vec<f64> = states.iter().chain(parameters).copied().collect();
        self.tape.eval_into(&args, &mut Vec::new(), out)?;
        Ok(())
    }

    /// Evaluates the derivatives.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicError::Arity`] if a slice has the wrong length.
    pub fn eval(&self, states: &[f64], parameters: &[f64]) -> Result<Vec<f64>, DynamicError> {
        let mut out = vec![0.0; self.states];
        self.eval_into(states, parameters, &mut out)?;
        Ok(out)
    }
}
