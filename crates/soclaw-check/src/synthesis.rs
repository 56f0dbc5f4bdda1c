//! Social law synthesis
//!
//! Searches the lattice of social laws for one that makes the problem
//! robust. Each counterexample suggests successors: for every original
//! action appearing in it, a successor law additionally disallows that
//! agent's action. Laws already checked are kept in a closed list, which
//! is why [`SocialLaw`] has value semantics.

use crate::checker::{SocialLawRobustnessChecker, SocialLawRobustnessStatus};
use crate::error::CheckResult;
use crate::planner::ClassicalPlanner;
use soclaw_compile::SocialLaw;
use soclaw_model::MaProblemWithWaitfor;
use std::collections::HashSet;
use tracing::{debug, info};

/// Searches for a social law making a problem robust
pub struct SocialLawGenerator<P> {
    checker: SocialLawRobustnessChecker<P>,
}

impl<P: ClassicalPlanner> SocialLawGenerator<P> {
    /// A generator checking candidates with `checker`
    pub fn new(checker: SocialLawRobustnessChecker<P>) -> Self {
        Self { checker }
    }

    /// Search for a robust social law, starting from the unrestricted law
    ///
    /// Returns `None` when the search space is exhausted without finding
    /// one. Candidates that break single-agent solvability are dead ends:
    /// further restrictions can never make a projection solvable again.
    pub async fn generate(
        &self,
        initial: &MaProblemWithWaitfor,
    ) -> CheckResult<Option<SocialLaw>> {
        let mut open = vec![SocialLaw::new()];
        let mut closed: HashSet<SocialLaw> = HashSet::new();

        while let Some(law) = open.pop() {
            if !closed.insert(law.clone()) {
                continue;
            }
            let candidate = law.compile(initial)?;
            let result = self.checker.is_robust(&candidate).await?;
            debug!(restrictions = law.len(), status = ?result.status, "checked candidate law");

            match result.status {
                SocialLawRobustnessStatus::RobustRational => {
                    info!(restrictions = law.len(), "found a robust social law");
                    return Ok(Some(law));
                }
                SocialLawRobustnessStatus::NonRobustSingleAgent
                | SocialLawRobustnessStatus::Unknown => continue,
                SocialLawRobustnessStatus::NonRobustMultiAgentFail
                | SocialLawRobustnessStatus::NonRobustMultiAgentDeadlock => {
                    let Some(counter) = &result.counter_example_orig_actions else {
                        continue;
                    };
                    for step in &counter.actions {
                        let Some(agent) = &step.agent else { continue };
                        let mut successor = law.clone();
                        successor.disallow_action(agent, &step.action);
                        if !closed.contains(&successor) {
                            open.push(successor);
                        }
                    }
                }
            }
        }
        Ok(None)
    }
}
