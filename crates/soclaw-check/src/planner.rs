//! The classical planner interface
//!
//! The checker treats planners as oracles: given a classical problem, a
//! planner reports a plan, a proof of unsolvability, or an inconclusive
//! outcome. Implementations may shell out to external solvers; the built-in
//! [`crate::ExhaustiveSearchPlanner`] runs a breadth-first search in-process.

use crate::error::CheckResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use soclaw_model::{ClassicalProblem, ProblemKind, SequentialPlan};
use std::time::Duration;

/// Terminal status of a plan generation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanGenerationStatus {
    /// A valid (not necessarily optimal) plan was found
    SolvedSatisficing,
    /// A provably optimal plan was found
    SolvedOptimally,
    /// The problem was proven to have no solution
    UnsolvableProven,
    /// No solution was found, but the search was incomplete
    UnsolvableIncompletely,
    /// The time budget ran out before a conclusion
    Timeout,
    /// The memory budget ran out before a conclusion
    Memout,
    /// The planner failed internally
    InternalError,
}

impl PlanGenerationStatus {
    /// Whether this status means a plan was produced
    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(
            self,
            PlanGenerationStatus::SolvedSatisficing | PlanGenerationStatus::SolvedOptimally
        )
    }
}

/// The outcome of one planner invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanGenerationResult {
    /// Terminal status
    pub status: PlanGenerationStatus,
    /// The plan, present exactly when the status is positive
    pub plan: Option<SequentialPlan>,
    /// Name of the engine that produced this result
    pub engine_name: String,
}

impl PlanGenerationResult {
    /// A result carrying a plan
    pub fn solved(plan: SequentialPlan, engine_name: impl Into<String>) -> Self {
        Self {
            status: PlanGenerationStatus::SolvedSatisficing,
            plan: Some(plan),
            engine_name: engine_name.into(),
        }
    }

    /// A planless result with the given status
    pub fn status_only(status: PlanGenerationStatus, engine_name: impl Into<String>) -> Self {
        Self {
            status,
            plan: None,
            engine_name: engine_name.into(),
        }
    }
}

/// A one-shot classical planner
#[async_trait]
pub trait ClassicalPlanner: Send + Sync {
    /// Engine name, used in results and logs
    fn name(&self) -> &str;

    /// The feature set of problems this planner accepts
    fn supported_kind(&self) -> ProblemKind;

    /// Whether a problem of the given kind is supported
    fn supports(&self, kind: &ProblemKind) -> bool {
        kind.is_subset(&self.supported_kind())
    }

    /// Attempt to solve `problem` within the optional time budget
    async fn solve(
        &self,
        problem: &ClassicalProblem,
        timeout: Option<Duration>,
    ) -> CheckResult<PlanGenerationResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positivity_matches_solved_statuses() {
        assert!(PlanGenerationStatus::SolvedSatisficing.is_positive());
        assert!(PlanGenerationStatus::SolvedOptimally.is_positive());
        assert!(!PlanGenerationStatus::UnsolvableProven.is_positive());
        assert!(!PlanGenerationStatus::Timeout.is_positive());
    }
}
