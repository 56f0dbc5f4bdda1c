//! Error types for the robustness checker

use soclaw_compile::CompileError;
use soclaw_model::ModelError;
use soclaw_sim::SimError;
use thiserror::Error;

/// Errors raised while checking robustness or synthesizing social laws
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The underlying model rejected a construction step
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The reduction layer failed
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The simulation layer failed
    #[error(transparent)]
    Sim(#[from] SimError),

    /// The input problem uses features the planner cannot handle
    #[error("Planner '{planner}' does not support problem kind {kind}")]
    UnsupportedProblem { planner: String, kind: String },

    /// A counterexample plan carried no failure or deadlock witness; the
    /// compiled goal should be unreachable without one
    #[error("Counterexample plan contains no failure or deadlock witness")]
    MissingWitness,

    /// A background planner task failed to complete
    #[error("Planner task failed: {0}")]
    PlannerTask(String),
}

/// Result type for checker operations
pub type CheckResult<T> = Result<T, CheckError>;
