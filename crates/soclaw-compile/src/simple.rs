//! The simple reduction ("srbv")
//!
//! One-shot fail/wait/crash encoding. For every agent action the compiled
//! problem carries a success variant that mirrors the original effects onto
//! the global shadow, one fail variant per critical precondition literal,
//! one wait variant per waitable literal, and two phantom variants that
//! consume turns once the system has crashed or the agent is blocked. The
//! compiled goal (`failure` plus every agent's `fin` marker) is reachable
//! iff some interleaving reveals a failure or a deadlock.

use crate::error::CompileError;
use crate::fluent_map::FluentMap;
use crate::scaffold::{Scaffold, AGENT_TYPE};
use crate::verifier::{
    ActionOrigin, CompilerResult, RobustnessVerifier, VariantTag, VerifierId,
};
use soclaw_model::{
    Action, Atom, Feature, Fluent, Literal, MaProblemWithWaitfor, Parameter, ProblemKind, Value,
};
use tracing::debug;

const FAILURE: &str = "failure";
const CRASH: &str = "crash";
const ACT: &str = "act";
const FIN: &str = "fin";
const WAITING: &str = "waiting";

/// The simple instantaneous-action robustness verifier
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleRobustnessVerifier;

impl RobustnessVerifier for SimpleRobustnessVerifier {
    fn id(&self) -> VerifierId {
        VerifierId::Simple
    }

    fn supported_kind(&self) -> ProblemKind {
        ProblemKind::with(&[
            Feature::ActionBasedMultiAgent,
            Feature::FlatTyping,
            Feature::HierarchicalTyping,
            Feature::NegativeConditions,
            Feature::DiscreteTime,
            Feature::SimulatedEffects,
        ])
    }

    fn compile(&self, input: &MaProblemWithWaitfor) -> Result<CompilerResult, CompileError> {
        let kind = input.problem.kind();
        if !self.supports(&kind) {
            return Err(CompileError::UnsupportedProblem {
                verifier: self.id().name(),
                kind: kind.to_string(),
            });
        }

        let mut s = Scaffold::new(self.id(), input)?;

        let mut waiting_map = FluentMap::with_default("w", Value::Bool(false));
        waiting_map.add_facts(&input.problem, &mut s.target)?;

        let agent_sig = vec![Parameter::new("a", AGENT_TYPE)];
        s.target.add_fluent(Fluent::bool(FAILURE))?;
        s.target.add_fluent(Fluent::bool(CRASH))?;
        s.target
            .add_fluent(Fluent::bool(ACT).with_default(Value::Bool(true)))?;
        s.target.add_fluent(Fluent::new(FIN, agent_sig.clone()))?;
        s.target.add_fluent(Fluent::new(WAITING, agent_sig))?;

        let agents: Vec<_> = input.problem.agents().cloned().collect();
        for agent in &agents {
            let fin = Scaffold::agent_marker(FIN, &agent.name);
            let waiting = Scaffold::agent_marker(WAITING, &agent.name);
            let goals = s.agent_goals(&agent.name);
            let goals: Vec<Literal> = goals.into_iter().cloned().collect();

            // end_s: all goals hold in both the global and local view
            let mut end_s = Action::new(format!("end_s_{}", agent.name));
            end_s.add_precondition(Literal::negative(fin.clone()));
            for goal in &goals {
                end_s.add_precondition(s.global.correct_literal(agent, goal));
                end_s.add_precondition(s.local_map(&agent.name).correct_literal(agent, goal));
            }
            end_s.add_effect(fin.clone(), true);
            end_s.add_effect(Atom::propositional(ACT), false);
            s.add_action(end_s, ActionOrigin::of_agent(VariantTag::EndSuccess, &agent.name))?;

            // end_f, one per goal literal that will never hold globally
            for (i, goal) in goals.iter().enumerate() {
                let mut end_f = Action::new(format!("end_f_{}_{}", agent.name, i));
                end_f.add_precondition(Literal::negative(fin.clone()));
                end_f.add_precondition(s.global.correct_literal(agent, goal).negate());
                for g in &goals {
                    end_f.add_precondition(s.local_map(&agent.name).correct_literal(agent, g));
                }
                end_f.add_effect(fin.clone(), true);
                end_f.add_effect(Atom::propositional(ACT), false);
                end_f.add_effect(Atom::propositional(FAILURE), true);
                s.add_action(
                    end_f,
                    ActionOrigin {
                        tag: VariantTag::EndFail,
                        agent: Some(agent.name.clone()),
                        action: None,
                        literal: Some(goal.clone()),
                    },
                )?;
            }

            let actions: Vec<_> = agent.actions().cloned().collect();
            for action in &actions {
                // Success variant: globals advance exactly as the original
                let mut a_s =
                    s.create_action_copy(agent, action, format!("{}_s_{}", action.name, agent.name));
                a_s.add_precondition(Literal::negative(waiting.clone()));
                a_s.add_precondition(Literal::negative(Atom::propositional(CRASH)));
                for effect in &action.effects {
                    if effect.value.is_true() {
                        a_s.add_precondition(Literal::negative(
                            waiting_map.correct_atom(agent, &effect.atom),
                        ));
                    }
                }
                for fact in s.action_preconditions(agent, action, true, true) {
                    a_s.add_precondition(s.global.correct_literal(agent, &fact));
                }
                for effect in &action.effects {
                    a_s.add_effect(s.global.correct_atom(agent, &effect.atom), effect.value.clone());
                }
                s.add_action(
                    a_s,
                    ActionOrigin::of_action(VariantTag::Success, &agent.name, &action.name),
                )?;

                // Fail variants: one per critical precondition literal
                for (i, fact) in s
                    .action_preconditions(agent, action, true, false)
                    .into_iter()
                    .enumerate()
                {
                    let mut a_f = s.create_action_copy(
                        agent,
                        action,
                        format!("{}_f_{}_{}", action.name, agent.name, i),
                    );
                    a_f.add_precondition(Literal::positive(Atom::propositional(ACT)));
                    a_f.add_precondition(Literal::negative(waiting.clone()));
                    a_f.add_precondition(Literal::negative(Atom::propositional(CRASH)));
                    for pre in s.action_preconditions(agent, action, false, true) {
                        a_f.add_precondition(s.global.correct_literal(agent, &pre));
                    }
                    a_f.add_precondition(s.global.correct_literal(agent, &fact).negate());
                    a_f.add_effect(Atom::propositional(FAILURE), true);
                    a_f.add_effect(Atom::propositional(CRASH), true);
                    s.add_action(
                        a_f,
                        ActionOrigin::of_literal(VariantTag::Fail, &agent.name, &action.name, fact),
                    )?;
                }

                // Wait variants: one per waitable precondition literal.
                // Waitable literals are positive, enforced at scaffold
                // construction, so marking the shadow true is what lets
                // other agents' success variants see the blocked fact.
                for (i, fact) in s
                    .action_preconditions(agent, action, false, true)
                    .into_iter()
                    .enumerate()
                {
                    let mut a_w = s.create_action_copy(
                        agent,
                        action,
                        format!("{}_w_{}_{}", action.name, agent.name, i),
                    );
                    a_w.add_precondition(Literal::positive(Atom::propositional(ACT)));
                    a_w.add_precondition(Literal::negative(Atom::propositional(CRASH)));
                    a_w.add_precondition(Literal::negative(waiting.clone()));
                    a_w.add_precondition(s.global.correct_literal(agent, &fact).negate());
                    a_w.add_effect(waiting_map.correct_atom(agent, &fact.atom), true);
                    a_w.add_effect(waiting.clone(), true);
                    a_w.add_effect(Atom::propositional(FAILURE), true);
                    s.add_action(
                        a_w,
                        ActionOrigin::of_literal(VariantTag::Wait, &agent.name, &action.name, fact),
                    )?;
                }

                // Phantom variants consume this agent's turn after a crash
                // or while it is blocked, without touching the state
                let mut a_pc =
                    s.create_action_copy(agent, action, format!("{}_pc_{}", action.name, agent.name));
                a_pc.add_precondition(Literal::positive(Atom::propositional(ACT)));
                a_pc.add_precondition(Literal::positive(Atom::propositional(CRASH)));
                s.add_action(
                    a_pc,
                    ActionOrigin::of_action(VariantTag::PhantomCrash, &agent.name, &action.name),
                )?;

                let mut a_pw =
                    s.create_action_copy(agent, action, format!("{}_pw_{}", action.name, agent.name));
                a_pw.add_precondition(Literal::positive(Atom::propositional(ACT)));
                a_pw.add_precondition(Literal::positive(waiting.clone()));
                s.add_action(
                    a_pw,
                    ActionOrigin::of_action(VariantTag::PhantomWait, &agent.name, &action.name),
                )?;
            }
        }

        s.copy_initial_state()?;

        s.target.add_goal(Literal::positive(Atom::propositional(FAILURE)));
        for agent in &agents {
            s.target
                .add_goal(Literal::positive(Scaffold::agent_marker(FIN, &agent.name)));
        }

        let result = s.finish();
        debug!(
            problem = %result.problem.name,
            actions = result.problem.actions().count(),
            "compiled simple robustness-verification problem"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soclaw_model::{Agent, MultiAgentProblem};

    fn shared_resource_input(waitable: bool) -> MaProblemWithWaitfor {
        let mut p = MultiAgentProblem::new("resource");
        p.add_env_fluent(Fluent::bool("r")).unwrap();
        for name in ["a1", "a2"] {
            let mut agent = Agent::new(name);
            agent.add_fluent(Fluent::bool("done")).unwrap();
            let mut take = Action::new("take");
            take.add_precondition(Literal::positive(Atom::propositional("r")));
            take.add_effect(Atom::propositional("r"), false);
            take.add_effect(Atom::propositional("done"), true);
            agent.add_action(take).unwrap();
            p.add_agent(agent).unwrap();
            p.add_agent_goal(name, Literal::positive(Atom::propositional("done")))
                .unwrap();
        }
        p.set_initial_value(Atom::propositional("r"), Value::Bool(true))
            .unwrap();
        let mut input = MaProblemWithWaitfor::new(p);
        if waitable {
            let lit = Literal::positive(Atom::propositional("r"));
            input.add_waitfor_annotation("a1", "take", lit.clone()).unwrap();
            input.add_waitfor_annotation("a2", "take", lit).unwrap();
        }
        input
    }

    #[test]
    fn critical_preconditions_get_fail_variants() {
        let result = SimpleRobustnessVerifier
            .compile(&shared_resource_input(false))
            .unwrap();
        let origin = result.origin("take_f_a1_0").unwrap();
        assert_eq!(origin.tag, VariantTag::Fail);
        assert_eq!(origin.action.as_deref(), Some("take"));
        // no waitable literals, so no wait variant exists
        assert!(result.origin("take_w_a1_0").is_none());
    }

    #[test]
    fn waitable_preconditions_get_wait_variants_instead() {
        let result = SimpleRobustnessVerifier
            .compile(&shared_resource_input(true))
            .unwrap();
        assert!(result.origin("take_f_a1_0").is_none());
        let origin = result.origin("take_w_a1_0").unwrap();
        assert_eq!(origin.tag, VariantTag::Wait);
    }

    #[test]
    fn success_variant_checks_globals_and_writes_globals() {
        let result = SimpleRobustnessVerifier
            .compile(&shared_resource_input(false))
            .unwrap();
        let a_s = result.problem.action("take_s_a1").unwrap();
        let pre: Vec<_> = a_s.preconditions.iter().map(ToString::to_string).collect();
        assert!(pre.contains(&"l-a1-r".to_string()));
        assert!(pre.contains(&"g-r".to_string()));
        assert!(pre.contains(&"not waiting(a1)".to_string()));
        let eff: Vec<_> = a_s.effects.iter().map(ToString::to_string).collect();
        assert!(eff.contains(&"g-r := false".to_string()));
        assert!(eff.contains(&"l-a1-a1-done := true".to_string()));
    }

    #[test]
    fn goal_is_failure_and_every_fin() {
        let result = SimpleRobustnessVerifier
            .compile(&shared_resource_input(false))
            .unwrap();
        let goals: Vec<_> = result.problem.goals().map(ToString::to_string).collect();
        assert_eq!(goals, vec!["failure", "fin(a1)", "fin(a2)"]);
    }

    #[test]
    fn phantom_variants_cover_crash_and_wait() {
        let result = SimpleRobustnessVerifier
            .compile(&shared_resource_input(false))
            .unwrap();
        assert_eq!(
            result.origin("take_pc_a2").unwrap().tag,
            VariantTag::PhantomCrash
        );
        assert_eq!(
            result.origin("take_pw_a2").unwrap().tag,
            VariantTag::PhantomWait
        );
    }
}
