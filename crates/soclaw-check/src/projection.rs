//! Single-agent projection
//!
//! Projects a multi-agent problem onto one agent: the shared environment,
//! the agent's own fluents and actions, and only its goal conjuncts. The
//! projection over-approximates what the agent can achieve alone, so an
//! unsolvable projection means the agent cannot reach its goals even with
//! every other agent absent.

use crate::error::CheckResult;
use soclaw_model::{ClassicalProblem, Feature, MultiAgentProblem};

/// Compiles the classical projection of one agent
#[derive(Debug, Clone)]
pub struct SingleAgentProjection {
    agent: String,
}

impl SingleAgentProjection {
    /// Project onto `agent`
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
        }
    }

    /// The projected agent's name
    #[must_use]
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Build the projection
    pub fn compile(&self, source: &MultiAgentProblem) -> CheckResult<ClassicalProblem> {
        let agent = source.agent(&self.agent)?;

        let mut kind = source.kind();
        kind.set(Feature::ActionBased);
        kind.unset(Feature::ActionBasedMultiAgent);
        let mut target =
            ClassicalProblem::new(format!("sap_{}_{}", self.agent, source.name), kind);

        for ty in source.user_types() {
            target.add_user_type(ty.clone())?;
        }
        for object in source.objects() {
            target.add_object(object.clone())?;
        }
        for fluent in source.env_fluents() {
            target.add_fluent(fluent.clone())?;
        }
        for fluent in agent.fluents() {
            target.add_fluent(fluent.clone())?;
        }
        for action in agent.actions() {
            target.add_action(action.clone())?;
        }

        for (atom, value) in source.env_initial_values() {
            target.set_initial_value(atom.clone(), value.clone())?;
        }
        for (owner, atom, value) in source.agent_initial_values() {
            if owner == &self.agent {
                target.set_initial_value(atom.clone(), value.clone())?;
            }
        }

        for goal in source.goals() {
            if goal.agent.as_deref() == Some(self.agent.as_str()) {
                target.add_goal(goal.literal.clone());
            }
        }
        Ok(target)
    }
}
