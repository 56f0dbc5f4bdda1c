//! Error types for the reduction layer

use soclaw_model::ModelError;
use thiserror::Error;

/// Errors raised while compiling a multi-agent problem into its
/// robustness-verification classical problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The underlying model rejected a construction step
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The input problem uses features the selected verifier cannot handle
    #[error("Verifier '{verifier}' does not support problem kind {kind}")]
    UnsupportedProblem { verifier: &'static str, kind: String },

    /// No verifier is registered under the given name
    #[error("Unknown robustness verifier: {0}")]
    UnknownVerifier(String),

    /// Two distinct source fluents mangle to the same shadow name, such as
    /// an environment fluent `a1-done` next to agent `a1`'s fluent `done`
    #[error("Shadow fluent '{shadow}' under prefix '{prefix}' is produced by two distinct source fluents")]
    ShadowCollision { prefix: String, shadow: String },

    /// PDDL export only covers boolean state variables
    #[error("Fluent '{0}' is not boolean and cannot be written as a PDDL predicate")]
    NonBooleanFluent(String),

    /// Writing a PDDL dump to disk failed
    #[error("Failed to write PDDL file '{path}': {message}")]
    PddlIo { path: String, message: String },
}
