//! Error types for simulation

use soclaw_model::ModelError;
use thiserror::Error;

/// Errors raised while simulating plans over a classical problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The underlying model rejected a construction step
    #[error(transparent)]
    Model(#[from] ModelError),

    /// An action instance carries the wrong number of arguments
    #[error("Action '{action}' takes {expected} parameters, instance has {got}")]
    BadArity {
        action: String,
        expected: usize,
        got: usize,
    },

    /// An atom still contains an unbound parameter after grounding
    #[error("Unbound parameter '{parameter}' in atom of fluent '{fluent}'")]
    UnboundParameter { fluent: String, parameter: String },

    /// An action was applied in a state where its precondition fails
    #[error("Action instance '{0}' is not applicable in the current state")]
    NotApplicable(String),
}

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;
