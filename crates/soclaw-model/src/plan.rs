//! Sequential plans

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a plan: an action applied to concrete objects, optionally
/// attributed to the agent that executes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInstance {
    /// Name of the applied action
    pub action: String,
    /// Concrete object names bound to the action's parameters, in order
    pub parameters: Vec<String>,
    /// Executing agent, when the plan is attributed
    pub agent: Option<String>,
}

impl ActionInstance {
    /// An unattributed instance
    pub fn new(action: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            action: action.into(),
            parameters,
            agent: None,
        }
    }

    /// An instance attributed to `agent`
    pub fn for_agent(
        action: impl Into<String>,
        parameters: Vec<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            parameters,
            agent: Some(agent.into()),
        }
    }
}

impl fmt::Display for ActionInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(agent) = &self.agent {
            write!(f, "{agent}.")?;
        }
        if self.parameters.is_empty() {
            write!(f, "{}", self.action)
        } else {
            write!(f, "{}({})", self.action, self.parameters.join(", "))
        }
    }
}

/// An ordered sequence of action instances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialPlan {
    /// Plan steps in execution order
    pub actions: Vec<ActionInstance>,
}

impl SequentialPlan {
    /// A plan over the given steps
    #[must_use]
    pub fn new(actions: Vec<ActionInstance>) -> Self {
        Self { actions }
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the plan has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Display for SequentialPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.actions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{i}: {step}")?;
        }
        Ok(())
    }
}
