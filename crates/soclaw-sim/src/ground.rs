//! Parameter binding for action instances

use crate::error::{SimError, SimResult};
use indexmap::IndexMap;
use soclaw_model::{Action, Atom, Literal, Term};

/// A binding of action parameter names to object names
#[derive(Debug, Clone, Default)]
pub struct Binding {
    map: IndexMap<String, String>,
}

impl Binding {
    /// Bind `action`'s parameters to `args` positionally
    pub fn for_action(action: &Action, args: &[String]) -> SimResult<Self> {
        if action.parameters.len() != args.len() {
            return Err(SimError::BadArity {
                action: action.name.clone(),
                expected: action.parameters.len(),
                got: args.len(),
            });
        }
        let map = action
            .parameters
            .iter()
            .zip(args)
            .map(|(p, a)| (p.name.clone(), a.clone()))
            .collect();
        Ok(Self { map })
    }

    /// Ground an atom by substituting every parameter term
    pub fn ground_atom(&self, atom: &Atom) -> SimResult<Atom> {
        let args = atom
            .args
            .iter()
            .map(|term| match term {
                Term::Object(o) => Ok(Term::Object(o.clone())),
                Term::Param(p) => self
                    .map
                    .get(p)
                    .map(|o| Term::Object(o.clone()))
                    .ok_or_else(|| SimError::UnboundParameter {
                        fluent: atom.fluent.clone(),
                        parameter: p.clone(),
                    }),
            })
            .collect::<SimResult<Vec<_>>>()?;
        Ok(Atom::new(atom.fluent.clone(), args))
    }

    /// Ground a literal, preserving polarity
    pub fn ground_literal(&self, literal: &Literal) -> SimResult<Literal> {
        let atom = self.ground_atom(&literal.atom)?;
        Ok(Literal {
            atom,
            negated: literal.negated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soclaw_model::Parameter;

    #[test]
    fn binds_positionally() {
        let action = Action::with_parameters(
            "go",
            vec![Parameter::new("from", "loc"), Parameter::new("to", "loc")],
        );
        let binding = Binding::for_action(&action, &["l1".into(), "l2".into()]).unwrap();
        let atom = Atom::new(
            "at",
            vec![Term::Param("to".into()), Term::Object("r1".into())],
        );
        let ground = binding.ground_atom(&atom).unwrap();
        assert_eq!(ground, Atom::ground("at", &["l2", "r1"]));
    }

    #[test]
    fn arity_mismatch_rejected() {
        let action = Action::with_parameters("go", vec![Parameter::new("l", "loc")]);
        assert!(matches!(
            Binding::for_action(&action, &[]),
            Err(SimError::BadArity { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn unbound_parameter_rejected() {
        let action = Action::new("noop");
        let binding = Binding::for_action(&action, &[]).unwrap();
        let atom = Atom::new("at", vec![Term::Param("ghost".into())]);
        assert!(matches!(
            binding.ground_atom(&atom),
            Err(SimError::UnboundParameter { .. })
        ));
    }
}
