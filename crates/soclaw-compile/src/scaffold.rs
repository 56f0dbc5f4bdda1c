//! Shared construction scaffold for the two reductions
//!
//! Both reductions start the same way: copy types and objects, add an agent
//! marker type with one object per agent, duplicate every fluent into the
//! global shadow map and one local shadow map per agent, and finish by
//! copying the source's explicit initial values onto every shadow. The
//! per-variant action synthesis is what differs, and stays in the concrete
//! verifiers.

use crate::error::CompileError;
use crate::fluent_map::FluentMap;
use crate::verifier::{ActionOrigin, CompilerResult, VerifierId};
use indexmap::IndexMap;
use soclaw_model::{
    Action, Agent, Atom, ClassicalProblem, Feature, Literal, MaProblemWithWaitfor, ModelError,
    Object, UserType,
};

/// Marker type added to the compiled problem, with one object per agent
pub const AGENT_TYPE: &str = "agent";

/// In-progress compilation state shared by the reductions
#[derive(Debug)]
pub struct Scaffold<'a> {
    /// The problem being compiled
    pub input: &'a MaProblemWithWaitfor,
    /// The compiled problem under construction
    pub target: ClassicalProblem,
    /// Authoritative shared shadow of every fluent
    pub global: FluentMap,
    /// Per-agent private shadows, keyed by agent name
    pub local: IndexMap<String, FluentMap>,
    origins: IndexMap<String, ActionOrigin>,
    verifier: VerifierId,
}

impl<'a> Scaffold<'a> {
    /// Initialize the compiled problem: types, objects, agent markers and
    /// the global/local shadow maps
    ///
    /// Rejects inputs containing goal conjuncts with no owning agent or
    /// negated wait-for literals; the encodings have no sound reading for
    /// either. Both wait variants mark a satisfied wait by the shadow fact
    /// turning true, so waiting on an absent fact would report a deadlock
    /// even when another agent later removes the fact.
    pub fn new(verifier: VerifierId, input: &'a MaProblemWithWaitfor) -> Result<Self, CompileError> {
        let source = &input.problem;
        for goal in source.goals() {
            if goal.agent.is_none() {
                return Err(ModelError::UntaggedGoal(goal.literal.to_string()).into());
            }
        }
        for ((agent, action), literals) in input.waitfor.iter() {
            if let Some(negated) = literals.iter().find(|lit| lit.negated) {
                return Err(ModelError::NegatedWaitfor {
                    agent: agent.clone(),
                    action: action.clone(),
                    literal: negated.atom.to_string(),
                }
                .into());
            }
        }

        let mut kind = source.kind();
        kind.set(Feature::ActionBased);
        kind.unset(Feature::ActionBasedMultiAgent);
        // both encodings introduce negated preconditions regardless of the
        // source problem
        kind.set(Feature::NegativeConditions);
        let mut target =
            ClassicalProblem::new(format!("{}_{}", verifier.name(), source.name), kind);

        for ty in source.user_types() {
            target.add_user_type(ty.clone())?;
        }
        target.add_user_type(UserType::new(AGENT_TYPE))?;
        for object in source.objects() {
            target.add_object(object.clone())?;
        }
        for agent in source.agents() {
            target.add_object(Object::new(agent.name.clone(), AGENT_TYPE))?;
        }

        let mut global = FluentMap::new("g");
        global.add_facts(source, &mut target)?;
        let mut local = IndexMap::new();
        for agent in source.agents() {
            let mut map = FluentMap::new(format!("l-{}", agent.name));
            map.add_facts(source, &mut target)?;
            local.insert(agent.name.clone(), map);
        }

        Ok(Self {
            input,
            target,
            global,
            local,
            origins: IndexMap::new(),
            verifier,
        })
    }

    /// The local shadow map of `agent`
    ///
    /// Panics are avoided by construction: a map exists for every agent of
    /// the input problem.
    #[must_use]
    pub fn local_map(&self, agent: &str) -> &FluentMap {
        &self.local[agent]
    }

    /// A ground atom over an agent-marker fluent such as `fin` or `waiting`
    #[must_use]
    pub fn agent_marker(fluent: &str, agent: &str) -> Atom {
        Atom::ground(fluent, &[agent])
    }

    /// The precondition literals of `agent`'s `action`, filtered by class:
    /// `fail` selects critical literals, `wait` selects waitable ones
    #[must_use]
    pub fn action_preconditions(
        &self,
        agent: &Agent,
        action: &Action,
        fail: bool,
        wait: bool,
    ) -> Vec<Literal> {
        let waitable = self.input.waitfor.preconditions_wait(&agent.name, &action.name);
        if wait && !fail {
            return waitable.to_vec();
        }
        action
            .preconditions
            .iter()
            .filter(|lit| wait || !waitable.contains(lit))
            .cloned()
            .collect()
    }

    /// A copy of `action` under `name` carrying the local-shadow rendition
    /// of all its preconditions and effects
    ///
    /// Every variant builds on this copy, so each agent's private view
    /// advances as if the action had run in isolation.
    #[must_use]
    pub fn create_action_copy(&self, agent: &Agent, action: &Action, name: String) -> Action {
        let map = self.local_map(&agent.name);
        let mut copy = Action::with_parameters(name, action.parameters.clone());
        for lit in self.action_preconditions(agent, action, true, true) {
            copy.add_precondition(map.correct_literal(agent, &lit));
        }
        for effect in &action.effects {
            copy.add_effect(map.correct_atom(agent, &effect.atom), effect.value.clone());
        }
        copy
    }

    /// The goal literals owned by `agent`, in declaration order
    #[must_use]
    pub fn agent_goals(&self, agent: &str) -> Vec<&Literal> {
        self.input
            .problem
            .goals()
            .filter(|g| g.agent.as_deref() == Some(agent))
            .map(|g| &g.literal)
            .collect()
    }

    /// Add a synthesized action and record its origin
    pub fn add_action(&mut self, action: Action, origin: ActionOrigin) -> Result<(), CompileError> {
        self.origins.insert(action.name.clone(), origin);
        self.target.add_action(action)?;
        Ok(())
    }

    /// Copy every explicit initial value of the source onto the global
    /// shadow and onto every agent's local shadow
    pub fn copy_initial_state(&mut self) -> Result<(), CompileError> {
        let source = &self.input.problem;
        for (atom, value) in source.env_initial_values() {
            self.target
                .set_initial_value(self.global.environment_atom(atom), value.clone())?;
            for map in self.local.values() {
                self.target
                    .set_initial_value(map.environment_atom(atom), value.clone())?;
            }
        }
        for (owner, atom, value) in source.agent_initial_values() {
            let owner_agent = source.agent(owner)?;
            self.target.set_initial_value(
                self.global.correct_atom(owner_agent, atom),
                value.clone(),
            )?;
            for map in self.local.values() {
                self.target
                    .set_initial_value(map.correct_atom(owner_agent, atom), value.clone())?;
            }
        }
        Ok(())
    }

    /// Consume the scaffold into the compilation artifact
    #[must_use]
    pub fn finish(self) -> CompilerResult {
        CompilerResult::new(self.target, self.verifier, self.origins)
    }
}
