//! Error types for the planning model

use thiserror::Error;

/// Errors raised while building or querying a planning model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Referenced agent does not exist in the problem
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Referenced fluent does not exist in the relevant scope
    #[error("Unknown fluent: {0}")]
    UnknownFluent(String),

    /// Referenced action does not exist for the given agent
    #[error("Unknown action '{action}' for agent '{agent}'")]
    UnknownAction { agent: String, action: String },

    /// Referenced user type does not exist
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Referenced object does not exist
    #[error("Unknown object: {0}")]
    UnknownObject(String),

    /// A declaration with the same name already exists
    #[error("Duplicate {kind} definition: {name}")]
    Duplicate { kind: &'static str, name: String },

    /// A wait-for annotation names a literal that is not among the action's
    /// preconditions
    #[error("Wait-for literal '{literal}' is not a precondition of action '{action}' of agent '{agent}'")]
    WaitforNotPrecondition {
        agent: String,
        action: String,
        literal: String,
    },

    /// A wait-for annotation names a negated literal; waiting on the absence
    /// of a fact has no sound encoding, so only positive literals are
    /// waitable
    #[error("Wait-for literal 'not {literal}' of action '{action}' of agent '{agent}' is negated; only positive literals are waitable")]
    NegatedWaitfor {
        agent: String,
        action: String,
        literal: String,
    },

    /// A goal is not tagged with an owning agent; the robustness encodings
    /// have no sound interpretation for global goals
    #[error("Goal '{0}' is not tagged with an owning agent")]
    UntaggedGoal(String),
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
