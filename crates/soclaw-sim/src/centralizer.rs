//! Centralization of a multi-agent problem
//!
//! Flattens agents into one classical problem: agent-scoped fluents are
//! renamed `{agent}-{fluent}`, actions `{agent}__{action}`. The merged plan
//! simulator executes per-agent plan steps against this problem.

use crate::error::SimResult;
use soclaw_model::{
    Action, Agent, Atom, ClassicalProblem, Feature, Fluent, Literal, MultiAgentProblem,
};

/// Separator between agent and action in centralized action names
pub const ACTION_SEPARATOR: &str = "__";

/// The centralized name of `agent`'s `action`
#[must_use]
pub fn centralized_action_name(agent: &str, action: &str) -> String {
    format!("{agent}{ACTION_SEPARATOR}{action}")
}

fn local_fluent_name(agent: &str, fluent: &str) -> String {
    format!("{agent}-{fluent}")
}

fn centralize_atom(agent: &Agent, atom: &Atom) -> Atom {
    if agent.has_fluent(&atom.fluent) {
        atom.renamed(local_fluent_name(&agent.name, &atom.fluent))
    } else {
        atom.clone()
    }
}

fn centralize_literal(agent: &Agent, literal: &Literal) -> Literal {
    Literal {
        atom: centralize_atom(agent, &literal.atom),
        negated: literal.negated,
    }
}

/// Compiles a multi-agent problem into its centralized classical form
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiAgentProblemCentralizer;

impl MultiAgentProblemCentralizer {
    /// Build the centralized problem
    pub fn compile(&self, source: &MultiAgentProblem) -> SimResult<ClassicalProblem> {
        let mut kind = source.kind();
        kind.set(Feature::ActionBased);
        kind.unset(Feature::ActionBasedMultiAgent);
        let mut target = ClassicalProblem::new(format!("centralized_{}", source.name), kind);

        for ty in source.user_types() {
            target.add_user_type(ty.clone())?;
        }
        for object in source.objects() {
            target.add_object(object.clone())?;
        }
        for fluent in source.env_fluents() {
            target.add_fluent(fluent.clone())?;
        }
        for agent in source.agents() {
            for fluent in agent.fluents() {
                target.add_fluent(
                    Fluent::new(
                        local_fluent_name(&agent.name, &fluent.name),
                        fluent.signature.clone(),
                    )
                    .with_default(fluent.default.clone()),
                )?;
            }
        }

        for agent in source.agents() {
            for action in agent.actions() {
                let mut centralized = Action::with_parameters(
                    centralized_action_name(&agent.name, &action.name),
                    action.parameters.clone(),
                );
                for pre in &action.preconditions {
                    centralized.add_precondition(centralize_literal(agent, pre));
                }
                for effect in &action.effects {
                    centralized.add_effect(centralize_atom(agent, &effect.atom), effect.value.clone());
                }
                target.add_action(centralized)?;
            }
        }

        for (atom, value) in source.env_initial_values() {
            target.set_initial_value(atom.clone(), value.clone())?;
        }
        for (owner, atom, value) in source.agent_initial_values() {
            let owner_agent = source.agent(owner)?;
            target.set_initial_value(centralize_atom(owner_agent, atom), value.clone())?;
        }

        for goal in source.goals() {
            match &goal.agent {
                Some(name) => {
                    let agent = source.agent(name)?;
                    target.add_goal(centralize_literal(agent, &goal.literal));
                }
                None => target.add_goal(goal.literal.clone()),
            }
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soclaw_model::Value;

    fn source() -> MultiAgentProblem {
        let mut p = MultiAgentProblem::new("pair");
        p.add_env_fluent(Fluent::bool("r").with_default(Value::Bool(true)))
            .unwrap();
        for name in ["a1", "a2"] {
            let mut agent = Agent::new(name);
            agent.add_fluent(Fluent::bool("done")).unwrap();
            let mut take = Action::new("take");
            take.add_precondition(Literal::positive(Atom::propositional("r")));
            take.add_effect(Atom::propositional("done"), true);
            agent.add_action(take).unwrap();
            p.add_agent(agent).unwrap();
            p.add_agent_goal(name, Literal::positive(Atom::propositional("done")))
                .unwrap();
        }
        p
    }

    #[test]
    fn actions_and_local_fluents_are_namespaced() {
        let central = MultiAgentProblemCentralizer.compile(&source()).unwrap();
        assert!(central.action("a1__take").is_ok());
        assert!(central.action("a2__take").is_ok());
        assert!(central.fluent("a1-done").is_some());
        // shared fluent keeps its name
        assert!(central.fluent("r").is_some());
    }

    #[test]
    fn goals_are_rewritten_per_owner() {
        let central = MultiAgentProblemCentralizer.compile(&source()).unwrap();
        let goals: Vec<_> = central.goals().map(ToString::to_string).collect();
        assert_eq!(goals, vec!["a1-done", "a2-done"]);
    }

    #[test]
    fn shared_preconditions_stay_shared() {
        let central = MultiAgentProblemCentralizer.compile(&source()).unwrap();
        let take = central.action("a1__take").unwrap();
        assert_eq!(take.preconditions[0].atom.fluent, "r");
        assert_eq!(take.effects[0].atom.fluent, "a1-done");
    }
}
