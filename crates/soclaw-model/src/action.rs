//! Instantaneous actions

use crate::fluent::{Atom, Literal, Parameter};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An unconditional effect: assign `value` to `atom`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// Target atom
    pub atom: Atom,
    /// New value after the action
    pub value: Value,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} := {}", self.atom, self.value)
    }
}

/// An instantaneous action: typed parameters, a conjunction of precondition
/// literals, and a set of effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action name, unique within its owning agent (or compiled problem)
    pub name: String,
    /// Ordered typed parameters
    pub parameters: Vec<Parameter>,
    /// Precondition conjuncts
    pub preconditions: Vec<Literal>,
    /// Effects applied atomically on execution
    pub effects: Vec<Effect>,
}

impl Action {
    /// Create a parameterless action
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_parameters(name, Vec::new())
    }

    /// Create an action with the given parameter list
    pub fn with_parameters(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            parameters,
            preconditions: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Append a precondition conjunct
    pub fn add_precondition(&mut self, literal: Literal) {
        self.preconditions.push(literal);
    }

    /// Append an effect
    pub fn add_effect(&mut self, atom: Atom, value: impl Into<Value>) {
        self.effects.push(Effect {
            atom,
            value: value.into(),
        });
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<_> = self
            .parameters
            .iter()
            .map(|p| format!("?{}: {}", p.name, p.ty))
            .collect();
        writeln!(f, "action {}({})", self.name, params.join(", "))?;
        for pre in &self.preconditions {
            writeln!(f, "  pre  {pre}")?;
        }
        for eff in &self.effects {
            writeln!(f, "  eff  {eff}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates() {
        let mut a = Action::new("take");
        a.add_precondition(Literal::positive(Atom::propositional("free")));
        a.add_effect(Atom::propositional("free"), false);
        a.add_effect(Atom::propositional("holding"), true);
        assert_eq!(a.preconditions.len(), 1);
        assert_eq!(a.effects.len(), 2);
        assert_eq!(a.effects[0].value, Value::Bool(false));
    }

    #[test]
    fn display_lists_parts() {
        let mut a = Action::with_parameters("move", vec![Parameter::new("l", "loc")]);
        a.add_precondition(Literal::positive(Atom::propositional("alive")));
        let s = a.to_string();
        assert!(s.contains("move(?l: loc)"));
        assert!(s.contains("pre  alive"));
    }
}
