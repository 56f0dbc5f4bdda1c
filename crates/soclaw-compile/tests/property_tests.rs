//! Property tests for the shadow-fact duplication layer

use proptest::prelude::*;
use soclaw_compile::FluentMap;
use soclaw_model::{Agent, Atom, Fluent, Literal};

// hyphens included on purpose: mangled shadow names join segments with
// `-`, and these properties must survive names that contain it
fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,7}"
}

proptest! {
    // correct_version must preserve polarity and arguments for any fluent,
    // whichever scope it resolves to
    #[test]
    fn correct_version_preserves_polarity_and_args(
        fluent in name(),
        agent_name in name(),
        args in prop::collection::vec(name(), 0..3),
        negated in any::<bool>(),
        local in any::<bool>(),
    ) {
        let mut agent = Agent::new(agent_name.clone());
        if local {
            agent.add_fluent(Fluent::bool(fluent.clone())).unwrap();
        }
        let map = FluentMap::new("g");
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let atom = Atom::ground(fluent.clone(), &arg_refs);
        let literal = if negated {
            Literal::negative(atom.clone())
        } else {
            Literal::positive(atom.clone())
        };

        let mapped = map.correct_literal(&agent, &literal);
        prop_assert_eq!(mapped.negated, negated);
        prop_assert_eq!(&mapped.atom.args, &atom.args);
        let expected = if local {
            format!("g-{agent_name}-{fluent}")
        } else {
            format!("g-{fluent}")
        };
        prop_assert_eq!(mapped.atom.fluent, expected);
    }

    // environment and agent shadows of the same fluent never collide
    #[test]
    fn scopes_never_collide(fluent in name(), agent_name in name(), prefix in name()) {
        let map = FluentMap::new(prefix);
        prop_assert_ne!(
            map.env_name(&fluent),
            map.agent_name(&agent_name, &fluent)
        );
    }

    // renaming through a map is stable: mapping the same literal twice
    // gives identical output
    #[test]
    fn mapping_is_deterministic(fluent in name(), agent_name in name()) {
        let agent = Agent::new(agent_name);
        let map = FluentMap::new("l-x");
        let lit = Literal::positive(Atom::propositional(fluent));
        prop_assert_eq!(
            map.correct_literal(&agent, &lit),
            map.correct_literal(&agent, &lit)
        );
    }
}
