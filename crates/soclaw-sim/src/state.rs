//! Ground states

use indexmap::IndexMap;
use soclaw_model::{Atom, ClassicalProblem, Literal, Value};

/// A complete assignment of values to every ground atom of a problem
///
/// Built by enumerating each fluent's ground atoms with its default value,
/// then applying the problem's explicit initial assignments in order.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    values: IndexMap<Atom, Value>,
}

impl State {
    /// The initial state of `problem`
    #[must_use]
    pub fn initial(problem: &ClassicalProblem) -> Self {
        let mut values = IndexMap::new();
        for fluent in problem.fluents() {
            for atom in problem.ground_atoms(fluent) {
                values.insert(atom, fluent.default.clone());
            }
        }
        for (atom, value) in problem.initial_values() {
            values.insert(atom.clone(), value.clone());
        }
        Self { values }
    }

    /// The value of a ground atom, if the atom exists in this state
    #[must_use]
    pub fn value(&self, atom: &Atom) -> Option<&Value> {
        self.values.get(atom)
    }

    /// Whether a ground literal holds; atoms absent from the state never
    /// satisfy a positive literal
    #[must_use]
    pub fn holds(&self, literal: &Literal) -> bool {
        let truth = self
            .values
            .get(&literal.atom)
            .is_some_and(soclaw_model::Value::is_true);
        truth != literal.negated
    }

    /// Assign a value to a ground atom
    pub fn set(&mut self, atom: Atom, value: Value) {
        self.values.insert(atom, value);
    }

    /// Iterate all (atom, value) pairs in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &Value)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soclaw_model::{Feature, Fluent, Object, Parameter, ProblemKind, UserType};

    fn problem() -> ClassicalProblem {
        let mut p = ClassicalProblem::new("s", ProblemKind::with(&[Feature::ActionBased]));
        p.add_user_type(UserType::new("loc")).unwrap();
        p.add_object(Object::new("l1", "loc")).unwrap();
        p.add_object(Object::new("l2", "loc")).unwrap();
        p.add_fluent(Fluent::new("at", vec![Parameter::new("l", "loc")]))
            .unwrap();
        p.add_fluent(Fluent::bool("alive").with_default(Value::Bool(true)))
            .unwrap();
        p.set_initial_value(Atom::ground("at", &["l1"]), Value::Bool(true))
            .unwrap();
        p
    }

    #[test]
    fn defaults_then_overrides() {
        let state = State::initial(&problem());
        assert!(state.holds(&Literal::positive(Atom::ground("at", &["l1"]))));
        assert!(state.holds(&Literal::negative(Atom::ground("at", &["l2"]))));
        assert!(state.holds(&Literal::positive(Atom::propositional("alive"))));
    }

    #[test]
    fn unknown_atom_never_holds_positively() {
        let state = State::initial(&problem());
        let ghost = Atom::propositional("ghost");
        assert!(!state.holds(&Literal::positive(ghost.clone())));
        assert!(state.holds(&Literal::negative(ghost)));
    }

    #[test]
    fn set_updates_truth() {
        let mut state = State::initial(&problem());
        state.set(Atom::propositional("alive"), Value::Bool(false));
        assert!(state.holds(&Literal::negative(Atom::propositional("alive"))));
    }
}
