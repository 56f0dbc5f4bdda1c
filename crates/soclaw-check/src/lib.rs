//! Social-law robustness checking for multi-agent planning
//!
//! The entry point of the workspace: given a multi-agent problem with a
//! wait-for specification, [`SocialLawRobustnessChecker`] decides whether
//! any interleaving of the agents' rational plans can fail or deadlock, by
//! reduction to classical planning (see `soclaw-compile`). Verdicts:
//!
//! - `RobustRational`: the compiled problem is unsolvable, no interleaving
//!   misbehaves
//! - `NonRobustSingleAgent`: some agent cannot reach its goals alone
//! - `NonRobustMultiAgentFail` / `NonRobustMultiAgentDeadlock`: a concrete
//!   counterexample interleaving is returned
//! - `Unknown`: the planner gave up
//!
//! Planning is abstracted behind the async [`ClassicalPlanner`] trait; the
//! built-in [`ExhaustiveSearchPlanner`] decides small problems exactly,
//! which robustness verification relies on for its unsolvability proofs.
//! [`SocialLawGenerator`] searches for restrictions that make a non-robust
//! problem robust.

pub mod bfs;
pub mod checker;
pub mod error;
pub mod planner;
pub mod projection;
pub mod synthesis;

pub use bfs::ExhaustiveSearchPlanner;
pub use checker::{
    SocialLawRobustnessChecker, SocialLawRobustnessResult, SocialLawRobustnessStatus,
};
pub use error::{CheckError, CheckResult};
pub use planner::{ClassicalPlanner, PlanGenerationResult, PlanGenerationStatus};
pub use projection::SingleAgentProjection;
pub use synthesis::SocialLawGenerator;
