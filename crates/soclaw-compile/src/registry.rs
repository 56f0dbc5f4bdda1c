//! Static registry of the available reductions

use crate::error::CompileError;
use crate::simple::SimpleRobustnessVerifier;
use crate::verifier::{RobustnessVerifier, VerifierId};
use crate::waiting::WaitingRobustnessVerifier;

static SIMPLE: SimpleRobustnessVerifier = SimpleRobustnessVerifier;
static WAITING: WaitingRobustnessVerifier = WaitingRobustnessVerifier;

/// Look up a verifier by identifier
#[must_use]
pub fn verifier(id: VerifierId) -> &'static dyn RobustnessVerifier {
    match id {
        VerifierId::Simple => &SIMPLE,
        VerifierId::Waiting => &WAITING,
    }
}

/// Look up a verifier by registry name ("srbv" or "wrbv")
pub fn by_name(name: &str) -> Result<&'static dyn RobustnessVerifier, CompileError> {
    match name {
        "srbv" => Ok(&SIMPLE),
        "wrbv" => Ok(&WAITING),
        other => Err(CompileError::UnknownVerifier(other.to_string())),
    }
}

/// All registered verifiers
#[must_use]
pub fn all() -> [&'static dyn RobustnessVerifier; 2] {
    [&SIMPLE, &WAITING]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for v in all() {
            assert_eq!(by_name(v.id().name()).unwrap().id(), v.id());
        }
        assert!(matches!(
            by_name("qrbv"),
            Err(CompileError::UnknownVerifier(_))
        ));
    }
}
