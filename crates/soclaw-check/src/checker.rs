//! The robustness checker
//!
//! Orchestrates a verification call: check each agent's projection is
//! solvable on its own, compile the robustness-verification problem, hand
//! it to the planner, and interpret the outcome. A plan for the compiled
//! problem is a counterexample; its first failure or deadlock witness
//! decides which non-robustness verdict is returned.

use crate::error::{CheckError, CheckResult};
use crate::planner::{ClassicalPlanner, PlanGenerationResult, PlanGenerationStatus};
use crate::projection::SingleAgentProjection;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use soclaw_compile::{registry, PddlWriter, VerifierId};
use soclaw_model::{Feature, MaProblemWithWaitfor, ProblemKind, SequentialPlan};
use soclaw_sim::{MergeStatus, PlanMerger};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Robustness verdict for a multi-agent problem under its wait-for
/// specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialLawRobustnessStatus {
    /// No interleaving of rational agent behavior can fail or deadlock
    RobustRational,
    /// Some agent cannot reach its goals even with all others absent
    NonRobustSingleAgent,
    /// Some interleaving violates a critical precondition
    NonRobustMultiAgentFail,
    /// Some interleaving blocks an agent forever
    NonRobustMultiAgentDeadlock,
    /// The planner could not decide the compiled problem
    Unknown,
}

/// The outcome of a robustness check
#[derive(Debug, Clone, PartialEq)]
pub struct SocialLawRobustnessResult {
    /// Verdict
    pub status: SocialLawRobustnessStatus,
    /// Solution plan of the compiled problem, for non-robust verdicts
    pub counter_example: Option<SequentialPlan>,
    /// The counterexample decoded into original, agent-attributed actions
    pub counter_example_orig_actions: Option<SequentialPlan>,
}

impl SocialLawRobustnessResult {
    fn status_only(status: SocialLawRobustnessStatus) -> Self {
        Self {
            status,
            counter_example: None,
            counter_example_orig_actions: None,
        }
    }
}

/// Checks whether a multi-agent problem is robust under its wait-for
/// specification
pub struct SocialLawRobustnessChecker<P> {
    planner: P,
    verifier: VerifierId,
    timeout: Option<Duration>,
    pddl_dump: Option<PathBuf>,
}

impl<P: ClassicalPlanner> SocialLawRobustnessChecker<P> {
    /// A checker using `planner` and the simple reduction
    pub fn new(planner: P) -> Self {
        Self {
            planner,
            verifier: VerifierId::Simple,
            timeout: None,
            pddl_dump: None,
        }
    }

    /// Select the reduction to verify with
    #[must_use]
    pub fn with_verifier(mut self, verifier: VerifierId) -> Self {
        self.verifier = verifier;
        self
    }

    /// Bound each planner invocation
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Dump every compiled problem as PDDL into `dir`
    #[must_use]
    pub fn with_pddl_dump(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pddl_dump = Some(dir.into());
        self
    }

    /// Engine name, parameterized by the inner planner
    #[must_use]
    pub fn name(&self) -> String {
        format!("SocialLawRobustnessChecker[{}]", self.planner.name())
    }

    /// The input features this checker handles: what the selected reduction
    /// accepts, restricted to what the inner planner can solve
    ///
    /// The planner only ever sees compiled or projected problems, which are
    /// classical, so its `ActionBased` support stands in for the input's
    /// `ActionBasedMultiAgent`.
    #[must_use]
    pub fn supported_kind(&self) -> ProblemKind {
        let mut kind = registry::verifier(self.verifier)
            .supported_kind()
            .intersection(&self.planner.supported_kind());
        if self.planner.supported_kind().has(Feature::ActionBased) {
            kind.set(Feature::ActionBasedMultiAgent);
        }
        kind
    }

    /// Whether a problem of the given kind can be checked
    #[must_use]
    pub fn supports(&self, kind: &ProblemKind) -> bool {
        kind.is_subset(&self.supported_kind())
    }

    fn dump_pddl(&self, problem: &soclaw_model::ClassicalProblem) -> CheckResult<()> {
        if let Some(dir) = &self.pddl_dump {
            PddlWriter::new(problem).write_to_dir(dir)?;
        }
        Ok(())
    }

    /// Whether every agent's projection is solvable in isolation
    pub async fn is_single_agent_solvable(
        &self,
        input: &MaProblemWithWaitfor,
    ) -> CheckResult<bool> {
        for agent in input.problem.agents() {
            let projection = SingleAgentProjection::new(&agent.name).compile(&input.problem)?;
            self.dump_pddl(&projection)?;
            let result = self.planner.solve(&projection, self.timeout).await?;
            if !result.status.is_positive() {
                debug!(agent = %agent.name, status = ?result.status, "projection unsolvable");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Compile the robustness-verification problem and search for a
    /// counterexample interleaving
    pub async fn multi_agent_robustness_counterexample(
        &self,
        input: &MaProblemWithWaitfor,
    ) -> CheckResult<SocialLawRobustnessResult> {
        let compiled = registry::verifier(self.verifier).compile(input)?;
        self.dump_pddl(&compiled.problem)?;

        let result = self.planner.solve(&compiled.problem, self.timeout).await?;
        if result.status.is_positive() {
            let plan = result.plan.ok_or_else(|| {
                CheckError::PlannerTask(format!(
                    "planner '{}' reported success without a plan",
                    result.engine_name
                ))
            })?;

            // the first witness in execution order decides the verdict
            let mut status = None;
            for step in &plan.actions {
                let Some(origin) = compiled.origin(&step.action) else {
                    continue;
                };
                if origin.tag.is_failure_witness() {
                    status = Some(SocialLawRobustnessStatus::NonRobustMultiAgentFail);
                    break;
                }
                if origin.tag.is_deadlock_witness() {
                    status = Some(SocialLawRobustnessStatus::NonRobustMultiAgentDeadlock);
                    break;
                }
            }
            let status = status.ok_or(CheckError::MissingWitness)?;
            let orig = compiled.map_back(&plan);
            return Ok(SocialLawRobustnessResult {
                status,
                counter_example: Some(plan),
                counter_example_orig_actions: Some(orig),
            });
        }

        match result.status {
            PlanGenerationStatus::UnsolvableProven
            | PlanGenerationStatus::UnsolvableIncompletely => Ok(
                SocialLawRobustnessResult::status_only(SocialLawRobustnessStatus::RobustRational),
            ),
            _ => Ok(SocialLawRobustnessResult::status_only(
                SocialLawRobustnessStatus::Unknown,
            )),
        }
    }

    /// Full robustness check
    ///
    /// A counterexample is returned exactly when the verdict is one of the
    /// two multi-agent non-robustness kinds.
    pub async fn is_robust(
        &self,
        input: &MaProblemWithWaitfor,
    ) -> CheckResult<SocialLawRobustnessResult> {
        let kind = input.problem.kind();
        if !self.supports(&kind) {
            return Err(CheckError::UnsupportedProblem {
                planner: self.name(),
                kind: kind.to_string(),
            });
        }
        if !self.is_single_agent_solvable(input).await? {
            info!(problem = %input.problem.name, "some projection is unsolvable");
            return Ok(SocialLawRobustnessResult::status_only(
                SocialLawRobustnessStatus::NonRobustSingleAgent,
            ));
        }
        let result = self.multi_agent_robustness_counterexample(input).await?;
        info!(problem = %input.problem.name, status = ?result.status, "robustness verdict");
        Ok(result)
    }

    /// Plan for the multi-agent problem by planning each projection and
    /// merging the per-agent plans round-robin
    pub async fn solve(&self, input: &MaProblemWithWaitfor) -> CheckResult<PlanGenerationResult> {
        let mut plans: IndexMap<String, SequentialPlan> = IndexMap::new();
        for agent in input.problem.agents() {
            let projection = SingleAgentProjection::new(&agent.name).compile(&input.problem)?;
            let result = self.planner.solve(&projection, self.timeout).await?;
            if !result.status.is_positive() {
                return Ok(PlanGenerationResult::status_only(
                    PlanGenerationStatus::UnsolvableIncompletely,
                    self.name(),
                ));
            }
            let plan = result.plan.ok_or_else(|| {
                CheckError::PlannerTask(format!(
                    "planner '{}' reported success without a plan",
                    result.engine_name
                ))
            })?;
            plans.insert(agent.name.clone(), plan);
        }

        let outcome = PlanMerger::new(&input.problem).merge(&plans)?;
        match outcome.status {
            MergeStatus::SolvedSatisficing => {
                let plan = outcome.plan.unwrap_or_default();
                Ok(PlanGenerationResult::solved(plan, self.name()))
            }
            MergeStatus::Deadlock | MergeStatus::UnsatisfiedGoals => {
                Ok(PlanGenerationResult::status_only(
                    PlanGenerationStatus::UnsolvableIncompletely,
                    self.name(),
                ))
            }
        }
    }
}
