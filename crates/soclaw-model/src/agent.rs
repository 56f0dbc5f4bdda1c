//! Agents: owners of actions and locally-scoped fluents

use crate::action::Action;
use crate::error::{ModelError, ModelResult};
use crate::fluent::Fluent;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An agent of a multi-agent problem
///
/// An agent owns a set of locally-scoped fluents (private views of the world)
/// and the actions it may execute. Actions may refer to the agent's own
/// fluents and to environment fluents of the enclosing problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Agent identifier, unique within the problem
    pub name: String,
    fluents: IndexMap<String, Fluent>,
    actions: IndexMap<String, Action>,
}

impl Agent {
    /// Create an agent with no fluents or actions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fluents: IndexMap::new(),
            actions: IndexMap::new(),
        }
    }

    /// Declare an agent-scoped fluent
    pub fn add_fluent(&mut self, fluent: Fluent) -> ModelResult<()> {
        if self.fluents.contains_key(&fluent.name) {
            return Err(ModelError::Duplicate {
                kind: "fluent",
                name: fluent.name,
            });
        }
        self.fluents.insert(fluent.name.clone(), fluent);
        Ok(())
    }

    /// Add an action owned by this agent
    pub fn add_action(&mut self, action: Action) -> ModelResult<()> {
        if self.actions.contains_key(&action.name) {
            return Err(ModelError::Duplicate {
                kind: "action",
                name: action.name,
            });
        }
        self.actions.insert(action.name.clone(), action);
        Ok(())
    }

    /// Whether `fluent` is locally scoped to this agent
    #[must_use]
    pub fn has_fluent(&self, fluent: &str) -> bool {
        self.fluents.contains_key(fluent)
    }

    /// Look up an agent-scoped fluent
    #[must_use]
    pub fn fluent(&self, name: &str) -> Option<&Fluent> {
        self.fluents.get(name)
    }

    /// Look up an action by name
    pub fn action(&self, name: &str) -> ModelResult<&Action> {
        self.actions.get(name).ok_or_else(|| ModelError::UnknownAction {
            agent: self.name.clone(),
            action: name.to_string(),
        })
    }

    /// Agent-scoped fluents in declaration order
    pub fn fluents(&self) -> impl Iterator<Item = &Fluent> {
        self.fluents.values()
    }

    /// Actions in declaration order
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    /// Mutable access to an action
    pub fn action_mut(&mut self, name: &str) -> ModelResult<&mut Action> {
        let agent = self.name.clone();
        self.actions.get_mut(name).ok_or(ModelError::UnknownAction {
            agent,
            action: name.to_string(),
        })
    }

    /// Remove an action, preserving the declaration order of the rest
    /// (used by social-law restrictions)
    pub fn remove_action(&mut self, name: &str) -> ModelResult<Action> {
        self.actions
            .shift_remove(name)
            .ok_or_else(|| ModelError::UnknownAction {
                agent: self.name.clone(),
                action: name.to_string(),
            })
    }
}
