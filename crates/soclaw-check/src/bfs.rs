//! Built-in exhaustive breadth-first planner
//!
//! A complete planner over ground states, suitable as a reference oracle
//! for the reductions on small problems. Exhausting the reachable state
//! space without finding a goal state is a proof of unsolvability, which is
//! exactly what robustness verification needs. The search runs on a
//! blocking thread so callers can await it with a timeout.

use crate::error::{CheckError, CheckResult};
use crate::planner::{ClassicalPlanner, PlanGenerationResult, PlanGenerationStatus};
use async_trait::async_trait;
use soclaw_model::{
    ActionInstance, Atom, ClassicalProblem, Feature, ProblemKind, SequentialPlan, Value,
};
use soclaw_sim::{SequentialSimulator, State};
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_NODE_LIMIT: usize = 1_000_000;

/// Breadth-first search over ground states
#[derive(Debug, Clone, Copy)]
pub struct ExhaustiveSearchPlanner {
    node_limit: usize,
}

impl Default for ExhaustiveSearchPlanner {
    fn default() -> Self {
        Self {
            node_limit: DEFAULT_NODE_LIMIT,
        }
    }
}

impl ExhaustiveSearchPlanner {
    /// A planner with the default node limit
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of stored search nodes; exceeding the cap yields
    /// [`PlanGenerationStatus::UnsolvableIncompletely`]
    #[must_use]
    pub fn with_node_limit(mut self, node_limit: usize) -> Self {
        self.node_limit = node_limit;
        self
    }
}

fn state_key(state: &State) -> Vec<(Atom, Value)> {
    state.iter().map(|(a, v)| (a.clone(), v.clone())).collect()
}

/// All ground instances of the problem's actions
fn ground_instances(problem: &ClassicalProblem) -> Vec<ActionInstance> {
    let mut instances = Vec::new();
    for action in problem.actions() {
        let mut bindings: Vec<Vec<String>> = vec![Vec::new()];
        for param in &action.parameters {
            let objects: Vec<_> = problem.objects_of_type(&param.ty).collect();
            let mut next = Vec::with_capacity(bindings.len() * objects.len());
            for binding in &bindings {
                for object in &objects {
                    let mut b = binding.clone();
                    b.push(object.name.clone());
                    next.push(b);
                }
            }
            bindings = next;
        }
        for binding in bindings {
            instances.push(ActionInstance::new(action.name.clone(), binding));
        }
    }
    instances
}

fn search(
    problem: &ClassicalProblem,
    node_limit: usize,
    timeout: Option<Duration>,
    engine_name: &str,
) -> CheckResult<PlanGenerationResult> {
    let deadline = timeout.map(|t| Instant::now() + t);
    let simulator = SequentialSimulator::new(problem);
    let instances = ground_instances(problem);

    // nodes hold each reached state with a back-pointer for plan extraction
    let mut nodes: Vec<(State, Option<(usize, usize)>)> = Vec::new();
    let mut visited: HashSet<Vec<(Atom, Value)>> = HashSet::new();
    let mut frontier: VecDeque<usize> = VecDeque::new();

    let initial = simulator.initial_state();
    visited.insert(state_key(&initial));
    nodes.push((initial, None));
    frontier.push_back(0);

    while let Some(index) = frontier.pop_front() {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                debug!(expanded = nodes.len(), "search hit the time budget");
                return Ok(PlanGenerationResult::status_only(
                    PlanGenerationStatus::Timeout,
                    engine_name,
                ));
            }
        }

        if simulator.unsatisfied_goals(&nodes[index].0).is_empty() {
            let mut steps = Vec::new();
            let mut cursor = index;
            while let Some((parent, instance)) = nodes[cursor].1 {
                steps.push(instances[instance].clone());
                cursor = parent;
            }
            steps.reverse();
            debug!(expanded = nodes.len(), plan_len = steps.len(), "search found a plan");
            return Ok(PlanGenerationResult::solved(
                SequentialPlan::new(steps),
                engine_name,
            ));
        }

        for (instance_index, instance) in instances.iter().enumerate() {
            if !simulator.is_applicable(&nodes[index].0, instance)? {
                continue;
            }
            let successor = simulator.apply_unchecked(&nodes[index].0, instance)?;
            if !visited.insert(state_key(&successor)) {
                continue;
            }
            if nodes.len() >= node_limit {
                debug!(expanded = nodes.len(), "search hit the node limit");
                return Ok(PlanGenerationResult::status_only(
                    PlanGenerationStatus::UnsolvableIncompletely,
                    engine_name,
                ));
            }
            nodes.push((successor, Some((index, instance_index))));
            frontier.push_back(nodes.len() - 1);
        }
    }

    debug!(expanded = nodes.len(), "search exhausted the state space");
    Ok(PlanGenerationResult::status_only(
        PlanGenerationStatus::UnsolvableProven,
        engine_name,
    ))
}

#[async_trait]
impl ClassicalPlanner for ExhaustiveSearchPlanner {
    fn name(&self) -> &str {
        "exhaustive-bfs"
    }

    fn supported_kind(&self) -> ProblemKind {
        ProblemKind::with(&[
            Feature::ActionBased,
            Feature::FlatTyping,
            Feature::HierarchicalTyping,
            Feature::NegativeConditions,
            Feature::DiscreteTime,
            Feature::SimulatedEffects,
        ])
    }

    async fn solve(
        &self,
        problem: &ClassicalProblem,
        timeout: Option<Duration>,
    ) -> CheckResult<PlanGenerationResult> {
        if !self.supports(&problem.kind) {
            return Err(CheckError::UnsupportedProblem {
                planner: self.name().to_string(),
                kind: problem.kind.to_string(),
            });
        }
        let problem = problem.clone();
        let node_limit = self.node_limit;
        let engine_name = self.name().to_string();
        tokio::task::spawn_blocking(move || search(&problem, node_limit, timeout, &engine_name))
            .await
            .map_err(|e| CheckError::PlannerTask(e.to_string()))?
    }
}
