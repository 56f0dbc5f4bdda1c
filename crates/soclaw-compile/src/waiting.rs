//! The waiting reduction ("wrbv")
//!
//! Two-stage allow-gated encoding. Stage 1 models free concurrent execution
//! gated by a per-(agent, action) allow flag; violating a critical
//! precondition flips the run into stage 2 and marks a precondition
//! violation, while waitable violations only mark the waiting shadow. A
//! `local` variant re-enables all of an agent's allow flags after a
//! successful step, and a `deadlock` variant fires once every one of the
//! agent's actions is disallowed while the blocking literal still fails.
//! Three stage-2 terminal actions each set `conflict`, the sole compiled
//! goal.

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

const STAGE_1: &str = "stage-1";
const STAGE_2: &str = "stage-2";
const PRECONDITION_VIOLATION: &str = "precondition-violation";
const POSSIBLE_DEADLOCK: &str = "possible-deadlock";
const CONFLICT: &str = "conflict";
const FIN: &str = "fin";

fn allow_name(agent: &str, action: &str) -> String {
    format!("allow-{agent}-{action}")
}

/// The waiting (allow-gated) instantaneous-action robustness verifier
#[derive(Debug, Default, Clone, Copy)]
pub struct WaitingRobustnessVerifier;

impl RobustnessVerifier for WaitingRobustnessVerifier {
    fn id(&self) -> VerifierId {
        VerifierId::Waiting
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

        // Stage 1 is where every run starts
        s.target
            .add_fluent(Fluent::bool(STAGE_1).with_default(Value::Bool(true)))?;
        s.target.add_fluent(Fluent::bool(STAGE_2))?;
        s.target.add_fluent(Fluent::bool(PRECONDITION_VIOLATION))?;
        s.target.add_fluent(Fluent::bool(POSSIBLE_DEADLOCK))?;
        s.target.add_fluent(Fluent::bool(CONFLICT))?;
        s.target
            .add_fluent(Fluent::new(FIN, vec![Parameter::new("a", AGENT_TYPE)]))?;

        let agents: Vec<_> = input.problem.agents().cloned().collect();
        for agent in &agents {
            for action in agent.actions() {
                s.target.add_fluent(
                    Fluent::bool(allow_name(&agent.name, &action.name))
                        .with_default(Value::Bool(true)),
                )?;
            }
        }

        for agent in &agents {
            let fin = Scaffold::agent_marker(FIN, &agent.name);
            let agent_allows: Vec<Atom> = agent
                .actions()
                .map(|a| Atom::propositional(allow_name(&agent.name, &a.name)))
                .collect();

            let actions: Vec<_> = agent.actions().cloned().collect();
            for action in &actions {
                let allow = Atom::propositional(allow_name(&agent.name, &action.name));

                // Success variant: globals advance exactly as the original
                let mut a_s =
                    s.create_action_copy(agent, action, format!("{}_s_{}", action.name, agent.name));
                a_s.add_precondition(Literal::positive(Atom::propositional(STAGE_1)));
                a_s.add_precondition(Literal::positive(allow.clone()));
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

                // Fail variants flip the run into stage 2
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
                    a_f.add_precondition(Literal::positive(Atom::propositional(STAGE_1)));
                    a_f.add_precondition(Literal::positive(allow.clone()));
                    for pre in s.action_preconditions(agent, action, false, true) {
                        a_f.add_precondition(s.global.correct_literal(agent, &pre));
                    }
                    a_f.add_precondition(s.global.correct_literal(agent, &fact).negate());
                    a_f.add_effect(Atom::propositional(PRECONDITION_VIOLATION), true);
                    a_f.add_effect(Atom::propositional(STAGE_2), true);
                    a_f.add_effect(Atom::propositional(STAGE_1), false);
                    s.add_action(
                        a_f,
                        ActionOrigin::of_literal(VariantTag::Fail, &agent.name, &action.name, fact),
                    )?;
                }

                for (i, fact) in s
                    .action_preconditions(agent, action, false, true)
                    .into_iter()
                    .enumerate()
                {
                    // Wait variant: record the blocking literal without
                    // leaving stage 1. Waitable literals are positive,
                    // enforced at scaffold construction.
                    let mut a_w = s.create_action_copy(
                        agent,
                        action,
                        format!("{}_w_{}_{}", action.name, agent.name, i),
                    );
                    a_w.add_precondition(Literal::positive(Atom::propositional(STAGE_1)));
                    a_w.add_precondition(Literal::positive(allow.clone()));
                    a_w.add_precondition(s.global.correct_literal(agent, &fact).negate());
                    a_w.add_effect(waiting_map.correct_atom(agent, &fact.atom), true);
                    s.add_action(
                        a_w,
                        ActionOrigin::of_literal(
                            VariantTag::Wait,
                            &agent.name,
                            &action.name,
                            fact.clone(),
                        ),
                    )?;

                    // Deadlock variant: the literal still fails and no
                    // action of this agent is allowed any more
                    let mut a_deadlock = s.create_action_copy(
                        agent,
                        action,
                        format!("{}_deadlock_{}_{}", action.name, agent.name, i),
                    );
                    a_deadlock.add_precondition(s.global.correct_literal(agent, &fact).negate());
                    for other in &agent_allows {
                        a_deadlock.add_precondition(Literal::negative(other.clone()));
                    }
                    a_deadlock.add_effect(fin.clone(), true);
                    a_deadlock.add_effect(Atom::propositional(POSSIBLE_DEADLOCK), true);
                    s.add_action(
                        a_deadlock,
                        ActionOrigin::of_literal(
                            VariantTag::Deadlock,
                            &agent.name,
                            &action.name,
                            fact,
                        ),
                    )?;
                }

                // Local variant: a stage-2 step that re-enables all of this
                // agent's allow flags, not just the one it used
                let mut a_local = s.create_action_copy(
                    agent,
                    action,
                    format!("{}_local_{}", action.name, agent.name),
                );
                a_local.add_precondition(Literal::positive(Atom::propositional(STAGE_2)));
                a_local.add_precondition(Literal::positive(allow));
                for other in &agent_allows {
                    a_local.add_effect(other.clone(), true);
                }
                s.add_action(
                    a_local,
                    ActionOrigin::of_action(VariantTag::Local, &agent.name, &action.name),
                )?;
            }

            // end_s: all goals hold in both the global and local view
            let goals: Vec<Literal> =
                s.agent_goals(&agent.name).into_iter().cloned().collect();
            let mut end_s = Action::new(format!("end_s_{}", agent.name));
            for goal in &goals {
                end_s.add_precondition(s.global.correct_literal(agent, goal));
                end_s.add_precondition(s.local_map(&agent.name).correct_literal(agent, goal));
            }
            end_s.add_effect(fin.clone(), true);
            end_s.add_effect(Atom::propositional(STAGE_1), false);
            s.add_action(end_s, ActionOrigin::of_agent(VariantTag::EndSuccess, &agent.name))?;
        }

        // start_stage_2: every agent finished
        let mut start_stage_2 = Action::new("start_stage_2");
        for agent in &agents {
            start_stage_2
                .add_precondition(Literal::positive(Scaffold::agent_marker(FIN, &agent.name)));
        }
        start_stage_2.add_effect(Atom::propositional(STAGE_2), true);
        start_stage_2.add_effect(Atom::propositional(STAGE_1), false);
        s.add_action(start_stage_2, ActionOrigin::control())?;

        // goals_not_achieved: some agent's goal fails globally although its
        // local view says it finished
        let mut goals_not_achieved = Action::new("goals_not_achieved");
        goals_not_achieved.add_precondition(Literal::positive(Atom::propositional(STAGE_2)));
        for agent in &agents {
            let goals: Vec<Literal> =
                s.agent_goals(&agent.name).into_iter().cloned().collect();
            for goal in &goals {
                goals_not_achieved.add_precondition(s.global.correct_literal(agent, goal).negate());
                for g in &goals {
                    goals_not_achieved
                        .add_precondition(s.local_map(&agent.name).correct_literal(agent, g));
                }
            }
        }
        goals_not_achieved.add_effect(Atom::propositional(CONFLICT), true);
        s.add_action(goals_not_achieved, ActionOrigin::control())?;

        // declare_deadlock / declare_fail: stage 2, the relevant flag, and
        // every agent's local view of its goals
        for (name, flag) in [
            ("declare_deadlock", POSSIBLE_DEADLOCK),
            ("declare_fail", PRECONDITION_VIOLATION),
        ] {
            let mut declare = Action::new(name);
            declare.add_precondition(Literal::positive(Atom::propositional(STAGE_2)));
            declare.add_precondition(Literal::positive(Atom::propositional(flag)));
            for agent in &agents {
                let goals: Vec<Literal> =
                    s.agent_goals(&agent.name).into_iter().cloned().collect();
                for g in &goals {
                    declare.add_precondition(s.local_map(&agent.name).correct_literal(agent, g));
                }
            }
            declare.add_effect(Atom::propositional(CONFLICT), true);
            s.add_action(declare, ActionOrigin::control())?;
        }

        s.copy_initial_state()?;
        s.target.add_goal(Literal::positive(Atom::propositional(CONFLICT)));

        let result = s.finish();
        debug!(
            problem = %result.problem.name,
            actions = result.problem.actions().count(),
            "compiled waiting robustness-verification problem"
        );
        Ok(result)
    }
}
