//! Round-robin merging of per-agent plans
//!
//! Interleaves one plan per agent into a single global plan by visiting the
//! agents in declaration order, executing each agent's next step whenever it
//! is applicable in the centralized state. A full round in which no agent
//! with remaining steps could act is a deadlock.

use crate::centralizer::{centralized_action_name, MultiAgentProblemCentralizer};
use crate::error::SimResult;
use crate::simulator::SequentialSimulator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use soclaw_model::{ActionInstance, MultiAgentProblem, SequentialPlan};
use tracing::debug;

/// How a merge attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStatus {
    /// All steps executed and every goal holds in the final state
    SolvedSatisficing,
    /// Some round made no progress although agents still had steps left
    Deadlock,
    /// All steps executed but some goal conjunct fails in the final state
    UnsatisfiedGoals,
}

/// The result of merging per-agent plans
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Terminal status of the merge
    pub status: MergeStatus,
    /// The merged global plan, present only on success
    pub plan: Option<SequentialPlan>,
}

/// Merges per-agent sequential plans over a multi-agent problem
pub struct PlanMerger<'a> {
    problem: &'a MultiAgentProblem,
}

impl<'a> PlanMerger<'a> {
    /// Create a merger over `problem`
    #[must_use]
    pub fn new(problem: &'a MultiAgentProblem) -> Self {
        Self { problem }
    }

    /// Merge one plan per agent into a global plan
    ///
    /// Agents without an entry in `plans` contribute no steps. Tie-breaking
    /// is the problem's agent declaration order, so the result is
    /// deterministic for fixed inputs.
    pub fn merge(&self, plans: &IndexMap<String, SequentialPlan>) -> SimResult<MergeOutcome> {
        let central = MultiAgentProblemCentralizer.compile(self.problem)?;
        let simulator = SequentialSimulator::new(&central);
        let mut state = simulator.initial_state();

        let empty = SequentialPlan::default();
        let mut current_step: IndexMap<&str, usize> = IndexMap::new();
        let mut active: Vec<&str> = Vec::new();
        for agent in self.problem.agents() {
            current_step.insert(&agent.name, 0);
            active.push(&agent.name);
        }

        let mut merged = SequentialPlan::default();
        while !active.is_empty() {
            let mut action_performed = false;
            let mut active_next = Vec::new();
            for agent in &active {
                let plan = plans.get(*agent).unwrap_or(&empty);
                let step = current_step[agent];
                if step >= plan.actions.len() {
                    continue;
                }
                active_next.push(*agent);
                let ai = &plan.actions[step];
                let centralized = ActionInstance::new(
                    centralized_action_name(agent, &ai.action),
                    ai.parameters.clone(),
                );
                if simulator.is_applicable(&state, &centralized)? {
                    state = simulator.apply_unchecked(&state, &centralized)?;
                    merged.actions.push(ActionInstance::for_agent(
                        ai.action.clone(),
                        ai.parameters.clone(),
                        (*agent).to_string(),
                    ));
                    current_step.insert(*agent, step + 1);
                    action_performed = true;
                }
            }
            if !action_performed && !active_next.is_empty() {
                debug!(remaining = active_next.len(), "plan merge deadlocked");
                return Ok(MergeOutcome {
                    status: MergeStatus::Deadlock,
                    plan: None,
                });
            }
            active = active_next;
        }

        if simulator.unsatisfied_goals(&state).is_empty() {
            Ok(MergeOutcome {
                status: MergeStatus::SolvedSatisficing,
                plan: Some(merged),
            })
        } else {
            Ok(MergeOutcome {
                status: MergeStatus::UnsatisfiedGoals,
                plan: None,
            })
        }
    }
}
