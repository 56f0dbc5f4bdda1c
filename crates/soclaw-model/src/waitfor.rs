//! Wait-for specifications
//!
//! A wait-for annotation marks a precondition literal of an agent's action as
//! *waitable*: at execution time the agent blocks until the literal holds
//! instead of failing when it does not. Unannotated preconditions are
//! *critical*; violating one crashes the whole system.

use crate::error::{ModelError, ModelResult};
use crate::fluent::Literal;
use crate::problem::MultiAgentProblem;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The set of wait-for annotations of a problem, keyed by (agent, action)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitforSpecification {
    annotations: IndexMap<(String, String), Vec<Literal>>,
}

impl WaitforSpecification {
    /// An empty specification; every precondition is critical
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `literal` as waitable for `agent`'s `action`
    pub fn annotate(&mut self, agent: &str, action: &str, literal: Literal) {
        self.annotations
            .entry((agent.to_string(), action.to_string()))
            .or_default()
            .push(literal);
    }

    /// The waitable precondition literals of `agent`'s `action`
    #[must_use]
    pub fn preconditions_wait(&self, agent: &str, action: &str) -> &[Literal] {
        self.annotations
            .get(&(agent.to_string(), action.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    /// Iterate all annotations as ((agent, action), literals)
    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &Vec<Literal>)> {
        self.annotations.iter()
    }

    /// Whether any annotation exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// A multi-agent problem paired with its wait-for specification
///
/// This is the input type of the robustness reductions and the checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaProblemWithWaitfor {
    /// The underlying multi-agent problem
    pub problem: MultiAgentProblem,
    /// Wait-for annotations over the problem's actions
    pub waitfor: WaitforSpecification,
}

impl MaProblemWithWaitfor {
    /// Wrap a problem with no annotations
    #[must_use]
    pub fn new(problem: MultiAgentProblem) -> Self {
        Self {
            problem,
            waitfor: WaitforSpecification::new(),
        }
    }

    /// Annotate a precondition literal of `agent`'s `action` as waitable
    ///
    /// The literal must be positive and one of the action's declared
    /// preconditions. Waiting on the absence of a fact is not expressible:
    /// the wait encodings track a satisfied wait by the fact turning true,
    /// which has no counterpart for a negated literal.
    pub fn add_waitfor_annotation(
        &mut self,
        agent: &str,
        action: &str,
        literal: Literal,
    ) -> ModelResult<()> {
        if literal.negated {
            return Err(ModelError::NegatedWaitfor {
                agent: agent.to_string(),
                action: action.to_string(),
                literal: literal.atom.to_string(),
            });
        }
        let act = self.problem.agent(agent)?.action(action)?;
        if !act.preconditions.contains(&literal) {
            return Err(ModelError::WaitforNotPrecondition {
                agent: agent.to_string(),
                action: action.to_string(),
                literal: literal.to_string(),
            });
        }
        self.waitfor.annotate(agent, action, literal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::agent::Agent;
    use crate::fluent::{Atom, Fluent, Literal};

    fn one_agent_problem() -> MultiAgentProblem {
        let mut p = MultiAgentProblem::new("test");
        p.add_env_fluent(Fluent::bool("free")).unwrap();
        p.add_env_fluent(Fluent::bool("busy")).unwrap();
        let mut agent = Agent::new("a1");
        let mut take = Action::new("take");
        take.add_precondition(Literal::positive(Atom::propositional("free")));
        take.add_precondition(Literal::negative(Atom::propositional("busy")));
        agent.add_action(take).unwrap();
        p.add_agent(agent).unwrap();
        p
    }

    #[test]
    fn annotation_must_be_a_precondition() {
        let mut p = MaProblemWithWaitfor::new(one_agent_problem());
        let bogus = Literal::positive(Atom::propositional("busy"));
        let err = p.add_waitfor_annotation("a1", "take", bogus).unwrap_err();
        assert!(matches!(err, ModelError::WaitforNotPrecondition { .. }));
    }

    #[test]
    fn negated_annotation_is_rejected() {
        let mut p = MaProblemWithWaitfor::new(one_agent_problem());
        let negated = Literal::negative(Atom::propositional("busy"));
        let err = p.add_waitfor_annotation("a1", "take", negated).unwrap_err();
        assert!(matches!(err, ModelError::NegatedWaitfor { .. }));
        assert!(p.waitfor.is_empty());
    }

    #[test]
    fn annotation_is_retrievable() {
        let mut p = MaProblemWithWaitfor::new(one_agent_problem());
        let lit = Literal::positive(Atom::propositional("free"));
        p.add_waitfor_annotation("a1", "take", lit.clone()).unwrap();
        assert_eq!(p.waitfor.preconditions_wait("a1", "take"), &[lit]);
        assert!(p.waitfor.preconditions_wait("a1", "drop").is_empty());
    }

    #[test]
    fn unannotated_spec_is_empty() {
        let p = MaProblemWithWaitfor::new(one_agent_problem());
        assert!(p.waitfor.is_empty());
    }
}
