//! Shadow-fact duplication
//!
//! A [`FluentMap`] mirrors every state variable of a multi-agent problem
//! under a namespace prefix. The reductions run three kinds of map at once:
//! the global map ("g", the authoritative shared value), one local map per
//! agent ("l-{agent}", that agent's private view) and the waiting map ("w",
//! markers for literals an agent is blocked on).

use crate::error::CompileError;
use soclaw_model::{Agent, Atom, ClassicalProblem, Fluent, Literal, MultiAgentProblem, Value};
use indexmap::{IndexMap, IndexSet};

/// A namespace of shadow fluents mirroring a source problem's fluents
#[derive(Debug, Clone)]
pub struct FluentMap {
    prefix: String,
    default: Option<Value>,
    env: IndexMap<String, String>,
    agent: IndexMap<(String, String), String>,
}

impl FluentMap {
    /// A map whose shadow fluents inherit the source fluent's default
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            default: None,
            env: IndexMap::new(),
            agent: IndexMap::new(),
        }
    }

    /// A map whose shadow fluents all default to `default`
    pub fn with_default(prefix: impl Into<String>, default: Value) -> Self {
        Self {
            default: Some(default),
            ..Self::new(prefix)
        }
    }

    /// The shadow name of an environment fluent
    #[must_use]
    pub fn env_name(&self, fluent: &str) -> String {
        format!("{}-{}", self.prefix, fluent)
    }

    /// The shadow name of an agent-scoped fluent, keyed by its owning agent
    #[must_use]
    pub fn agent_name(&self, owner: &str, fluent: &str) -> String {
        format!("{}-{}-{}", self.prefix, owner, fluent)
    }

    /// Declare a shadow for every environment and agent-scoped fluent of
    /// `source` into `target`, recording both lookup tables
    ///
    /// Shadow names must stay injective over the source fluents: joining
    /// name segments with `-` can conflate an environment fluent such as
    /// `a1-done` with agent `a1`'s fluent `done`. Such a source is rejected
    /// rather than letting the two share one shadow.
    pub fn add_facts(
        &mut self,
        source: &MultiAgentProblem,
        target: &mut ClassicalProblem,
    ) -> Result<(), CompileError> {
        let mut declared: IndexSet<String> = IndexSet::new();
        for fluent in source.env_fluents() {
            let name = self.env_name(&fluent.name);
            if !declared.insert(name.clone()) {
                return Err(CompileError::ShadowCollision {
                    prefix: self.prefix.clone(),
                    shadow: name,
                });
            }
            let default = self.default.clone().unwrap_or_else(|| fluent.default.clone());
            target.add_fluent(
                Fluent::new(name.clone(), fluent.signature.clone()).with_default(default),
            )?;
            self.env.insert(fluent.name.clone(), name);
        }
        for agent in source.agents() {
            for fluent in agent.fluents() {
                let name = self.agent_name(&agent.name, &fluent.name);
                if !declared.insert(name.clone()) {
                    return Err(CompileError::ShadowCollision {
                        prefix: self.prefix.clone(),
                        shadow: name,
                    });
                }
                let default = self.default.clone().unwrap_or_else(|| fluent.default.clone());
                target.add_fluent(
                    Fluent::new(name.clone(), fluent.signature.clone()).with_default(default),
                )?;
                self.agent
                    .insert((agent.name.clone(), fluent.name.clone()), name);
            }
        }
        Ok(())
    }

    /// Rewrite an atom onto its environment shadow
    #[must_use]
    pub fn environment_atom(&self, atom: &Atom) -> Atom {
        atom.renamed(self.env_name(&atom.fluent))
    }

    /// Rewrite an atom onto the shadow of `owner`'s local fluent
    #[must_use]
    pub fn agent_atom(&self, owner: &str, atom: &Atom) -> Atom {
        atom.renamed(self.agent_name(owner, &atom.fluent))
    }

    /// Rewrite an atom onto its correct shadow: `agent`'s own shadow when the
    /// underlying fluent is locally scoped to `agent`, the shared shadow
    /// otherwise
    ///
    /// Every precondition, effect and goal crossing the reduction boundary
    /// goes through here. Confusing the two scopes would silently make the
    /// encoding unsound.
    #[must_use]
    pub fn correct_atom(&self, agent: &Agent, atom: &Atom) -> Atom {
        if agent.has_fluent(&atom.fluent) {
            self.agent_atom(&agent.name, atom)
        } else {
            self.environment_atom(atom)
        }
    }

    /// Rewrite a literal onto its correct shadow, preserving polarity
    #[must_use]
    pub fn correct_literal(&self, agent: &Agent, literal: &Literal) -> Literal {
        Literal {
            atom: self.correct_atom(agent, &literal.atom),
            negated: literal.negated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soclaw_model::{Feature, ProblemKind};

    fn source() -> MultiAgentProblem {
        let mut p = MultiAgentProblem::new("src");
        p.add_env_fluent(Fluent::bool("free")).unwrap();
        let mut a1 = Agent::new("a1");
        a1.add_fluent(Fluent::bool("done").with_default(Value::Bool(true)))
            .unwrap();
        p.add_agent(a1).unwrap();
        p
    }

    #[test]
    fn shadows_cover_both_scopes() {
        let src = source();
        let mut target = ClassicalProblem::new("t", ProblemKind::with(&[Feature::ActionBased]));
        let mut map = FluentMap::new("g");
        map.add_facts(&src, &mut target).unwrap();
        assert!(target.fluent("g-free").is_some());
        assert!(target.fluent("g-a1-done").is_some());
        // defaults inherited from the source fluent
        assert_eq!(
            target.fluent("g-a1-done").unwrap().default,
            Value::Bool(true)
        );
    }

    #[test]
    fn forced_default_overrides_source_default() {
        let src = source();
        let mut target = ClassicalProblem::new("t", ProblemKind::with(&[Feature::ActionBased]));
        let mut map = FluentMap::with_default("w", Value::Bool(false));
        map.add_facts(&src, &mut target).unwrap();
        assert_eq!(
            target.fluent("w-a1-done").unwrap().default,
            Value::Bool(false)
        );
    }

    #[test]
    fn conflated_shadow_names_are_rejected() {
        // env fluent "a1-done" mangles to the same shadow as agent "a1"'s
        // fluent "done"
        let mut src = MultiAgentProblem::new("src");
        src.add_env_fluent(Fluent::bool("a1-done")).unwrap();
        let mut a1 = Agent::new("a1");
        a1.add_fluent(Fluent::bool("done")).unwrap();
        src.add_agent(a1).unwrap();

        let mut target = ClassicalProblem::new("t", ProblemKind::with(&[Feature::ActionBased]));
        let mut map = FluentMap::new("g");
        let err = map.add_facts(&src, &mut target).unwrap_err();
        assert!(matches!(
            err,
            CompileError::ShadowCollision { ref shadow, .. } if shadow == "g-a1-done"
        ));
    }

    #[test]
    fn correct_version_respects_scope_and_polarity() {
        let src = source();
        let agent = src.agent("a1").unwrap();
        let map = FluentMap::new("l-a1");
        let env = Literal::negative(Atom::propositional("free"));
        let local = Literal::positive(Atom::propositional("done"));
        let env_mapped = map.correct_literal(agent, &env);
        let local_mapped = map.correct_literal(agent, &local);
        assert_eq!(env_mapped.atom.fluent, "l-a1-free");
        assert!(env_mapped.negated);
        assert_eq!(local_mapped.atom.fluent, "l-a1-a1-done");
        assert!(!local_mapped.negated);
    }
}
