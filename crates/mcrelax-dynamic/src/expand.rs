//! Relaxation of ODE systems.
//!
//! Every state and parameter is replaced by its four companions, and every
//! equation `d/dt x = f` by four equations whose right-hand sides are the
//! bound formulas of `f`. The expanded system is an ordinary [`OdeSystem`].
//!
//! That its solution keeps `lo <= cv <= cc <= hi` around every trajectory
//! started inside the initial bounds is assumed, not checked: it depends on
//! the solver and on the a-priori state enclosures being valid.

use mcrelax_core::{Bounds, Component, ExprArena, SymbolId};
use mcrelax_rules::{derive_for_symbol, standard_rules, BoundedSymbolSet, RuleTable};
use mcrelax_transform::{assemble, RewriteConfig, Rewriter};
use tracing::debug;

use crate::error::DynamicError;
use crate::system::{OdeSystem, Parameter, StateVar};

/// Configuration for expansion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpandConfig {
    /// Configuration of the right-hand side rewriter.
    pub rewrite: RewriteConfig,
}

/// Expands ODE systems into their relaxations.
#[derive(Clone, Debug)]
pub struct Expander<'t> {
    rules: &'t RuleTable,
    config: ExpandConfig,
}

impl Default for Expander<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Expander<'static> {
    /// Creates an expander over the standard rule table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(standard_rules())
    }
}

impl<'t> Expander<'t> {
    /// Creates an expander over a custom rule table.
    #[must_use]
    pub fn with_rules(rules: &'t RuleTable) -> Self {
        Self {
            rules,
            config: ExpandConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExpandConfig) -> Self {
        self.config = config;
        self
    }

    /// Expands `system`.
    ///
    /// Companion states and parameters are declared in `lo, hi, cv, cc`
    /// order; `lo`/`hi` start at the declared bounds and `cv`/`cc` at the
    /// initial or nominal value.
    ///
    /// # Errors
    ///
    /// Fails if a state has no equation, a name collides with the companion
    /// pattern, or a right-hand side cannot be relaxed.
    pub fn expand(&self, arena: &mut ExprArena, system: &OdeSystem) -> Result<OdeSystem, DynamicError> {
        system.validate(arena)?;
        debug!(
            states = system.states().len(),
            parameters = system.parameters().len(),
            "expanding ODE system"
        );

        let mut expanded = OdeSystem::new();
        for state in system.states() {
            let set = companions(arena, state.symbol)?;
            let value = state.initial_value();
            let start = Bounds::new(state.bounds.lo(), state.bounds.hi(), value, value);
            for component in Component::DEFINITION {
                let companion = StateVar {
                    symbol: *set.get(component),
                    bounds: state.bounds,
                    initial: Some(*start.get(component)),
                    domain: state.domain,
                };
                expanded.add_state(arena, companion)?;
            }
        }
        for parameter in system.parameters() {
            let set = companions(arena, parameter.symbol)?;
            let value = parameter.nominal_value();
            let start = Bounds::new(parameter.bounds.lo(), parameter.bounds.hi(), value, value);
            for component in Component::DEFINITION {
                let companion = Parameter {
                    symbol: *set.get(component),
                    bounds: parameter.bounds,
                    nominal: Some(*start.get(component)),
                };
                expanded.add_parameter(arena, companion)?;
            }
        }

        let rewriter = Rewriter::with_rules(self.rules, system.domain()).with_config(self.config.rewrite.clone());
        for equation in system.equations() {
            let state = arena.symbol_name(equation.state).unwrap_or_default().to_string();
            let rewritten = rewriter
                .rewrite(arena, equation.rhs)
                .map_err(|source| DynamicError::Relax { state, source })?;
            let spec = assemble(arena, &rewritten);
            let set = companions(arena, equation.state)?;
            for component in Component::DEFINITION {
                expanded.add_equation(arena, *set.get(component), *spec.roots.get(component))?;
            }
        }

        debug!(equations = expanded.equations().len(), "expansion finished");
        Ok(expanded)
    }
}

fn companions(arena: &mut ExprArena, symbol: SymbolId) -> Result<BoundedSymbolSet, DynamicError> {
    derive_for_symbol(arena, symbol).map_err(|e| DynamicError::Relax {
        state: arena.symbol_name(symbol).unwrap_or_default().to_string(),
        source: e.into(),
    })
}

/// Expands `system` with the standard rules.
///
/// # Errors
///
/// Fails like [`Expander::expand`].
pub fn expand(arena: &mut ExprArena, system: &OdeSystem) -> Result<OdeSystem, DynamicError> {
    Expander::new().expand(arena, system)
}
