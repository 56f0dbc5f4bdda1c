//! Sequential execution of ground action instances

use crate::error::{SimError, SimResult};
use crate::ground::Binding;
use crate::state::State;
use soclaw_model::{ActionInstance, ClassicalProblem, Literal, SequentialPlan};

/// Applies ground action instances to states of a classical problem
pub struct SequentialSimulator<'a> {
    problem: &'a ClassicalProblem,
}

impl<'a> SequentialSimulator<'a> {
    /// Create a simulator over `problem`
    #[must_use]
    pub fn new(problem: &'a ClassicalProblem) -> Self {
        Self { problem }
    }

    /// The problem's initial state
    #[must_use]
    pub fn initial_state(&self) -> State {
        State::initial(self.problem)
    }

    /// Whether `instance` is applicable in `state`
    pub fn is_applicable(&self, state: &State, instance: &ActionInstance) -> SimResult<bool> {
        let action = self.problem.action(&instance.action)?;
        let binding = Binding::for_action(action, &instance.parameters)?;
        for pre in &action.preconditions {
            if !state.holds(&binding.ground_literal(pre)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Apply `instance` without checking its precondition, returning the
    /// successor state
    pub fn apply_unchecked(&self, state: &State, instance: &ActionInstance) -> SimResult<State> {
        let action = self.problem.action(&instance.action)?;
        let binding = Binding::for_action(action, &instance.parameters)?;
        let mut next = state.clone();
        for effect in &action.effects {
            next.set(binding.ground_atom(&effect.atom)?, effect.value.clone());
        }
        Ok(next)
    }

    /// Apply `instance`, failing if its precondition does not hold
    pub fn apply(&self, state: &State, instance: &ActionInstance) -> SimResult<State> {
        if !self.is_applicable(state, instance)? {
            return Err(SimError::NotApplicable(instance.to_string()));
        }
        self.apply_unchecked(state, instance)
    }

    /// Run a whole plan from the initial state
    pub fn run(&self, plan: &SequentialPlan) -> SimResult<State> {
        let mut state = self.initial_state();
        for instance in &plan.actions {
            state = self.apply(&state, instance)?;
        }
        Ok(state)
    }

    /// The goal conjuncts of the problem not satisfied by `state`
    #[must_use]
    pub fn unsatisfied_goals(&self, state: &State) -> Vec<&Literal> {
        self.problem
            .goals()
            .filter(|goal| !state.holds(goal))
            .collect()
    }
}
