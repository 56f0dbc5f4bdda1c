//! Social laws as problem transformations
//!
//! A [`SocialLaw`] is a restriction imposed on a multi-agent problem: extra
//! wait-for annotations and disallowed agent actions. Applying it yields a
//! new problem whose robustness can be checked like any other, which is
//! what the synthesis search iterates on. Laws are value types with set
//! semantics, so a search can keep a closed list of laws already tried.

use crate::error::CompileError;
use soclaw_model::{Literal, MaProblemWithWaitfor};
use std::collections::BTreeSet;

/// A set of restrictions on a multi-agent problem
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SocialLaw {
    waitfor: BTreeSet<(String, String, Literal)>,
    disallowed: BTreeSet<(String, String)>,
}

impl SocialLaw {
    /// The empty law: no restrictions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `agent` to wait on `literal` before executing `action`
    pub fn add_waitfor_annotation(&mut self, agent: &str, action: &str, literal: Literal) {
        self.waitfor
            .insert((agent.to_string(), action.to_string(), literal));
    }

    /// Forbid `agent` from executing `action` at all
    pub fn disallow_action(&mut self, agent: &str, action: &str) {
        self.disallowed
            .insert((agent.to_string(), action.to_string()));
    }

    /// Disallowed (agent, action) pairs in sorted order
    pub fn disallowed(&self) -> impl Iterator<Item = &(String, String)> {
        self.disallowed.iter()
    }

    /// Added wait-for annotations in sorted order
    pub fn waitfor_additions(&self) -> impl Iterator<Item = &(String, String, Literal)> {
        self.waitfor.iter()
    }

    /// Number of restrictions this law carries
    #[must_use]
    pub fn len(&self) -> usize {
        self.waitfor.len() + self.disallowed.len()
    }

    /// Whether this is the empty law
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waitfor.is_empty() && self.disallowed.is_empty()
    }

    /// Apply this law to `input`, producing the restricted problem
    ///
    /// Disallowed actions are removed from their agents outright, so no
    /// reduction or projection ever considers them. Wait-for additions must
    /// name surviving actions and precondition literals.
    pub fn compile(&self, input: &MaProblemWithWaitfor) -> Result<MaProblemWithWaitfor, CompileError> {
        let mut out = input.clone();
        for (agent, action) in &self.disallowed {
            out.problem.agent_mut(agent)?.remove_action(action)?;
        }
        for (agent, action, literal) in &self.waitfor {
            out.add_waitfor_annotation(agent, action, literal.clone())?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soclaw_model::{Action, Agent, Atom, Fluent, ModelError, MultiAgentProblem};

    fn input() -> MaProblemWithWaitfor {
        let mut p = MultiAgentProblem::new("law");
        p.add_env_fluent(Fluent::bool("free")).unwrap();
        let mut agent = Agent::new("a1");
        let mut take = Action::new("take");
        take.add_precondition(Literal::positive(Atom::propositional("free")));
        agent.add_action(take).unwrap();
        agent.add_action(Action::new("rest")).unwrap();
        p.add_agent(agent).unwrap();
        MaProblemWithWaitfor::new(p)
    }

    #[test]
    fn disallowed_actions_are_removed() {
        let mut law = SocialLaw::new();
        law.disallow_action("a1", "take");
        let out = law.compile(&input()).unwrap();
        let agent = out.problem.agent("a1").unwrap();
        assert!(matches!(
            agent.action("take"),
            Err(ModelError::UnknownAction { .. })
        ));
        assert!(agent.action("rest").is_ok());
    }

    #[test]
    fn disallowing_unknown_action_fails() {
        let mut law = SocialLaw::new();
        law.disallow_action("a1", "warp");
        assert!(matches!(
            law.compile(&input()),
            Err(CompileError::Model(ModelError::UnknownAction { .. }))
        ));
    }

    #[test]
    fn laws_have_set_semantics() {
        let mut a = SocialLaw::new();
        a.disallow_action("a1", "take");
        a.disallow_action("a1", "rest");
        let mut b = SocialLaw::new();
        b.disallow_action("a1", "rest");
        b.disallow_action("a1", "take");
        b.disallow_action("a1", "take");
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn waitfor_additions_apply_to_the_copy() {
        let mut law = SocialLaw::new();
        let lit = Literal::positive(Atom::propositional("free"));
        law.add_waitfor_annotation("a1", "take", lit.clone());
        let out = law.compile(&input()).unwrap();
        assert_eq!(out.waitfor.preconditions_wait("a1", "take"), &[lit]);
    }

    #[test]
    fn waitfor_on_a_removed_action_is_rejected() {
        let mut law = SocialLaw::new();
        law.disallow_action("a1", "take");
        law.add_waitfor_annotation(
            "a1",
            "take",
            Literal::positive(Atom::propositional("free")),
        );
        assert!(law.compile(&input()).is_err());
    }
}
