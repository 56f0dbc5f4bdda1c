//! Problem-kind feature sets
//!
//! Engines (reductions, planners, projectors, the checker) advertise a
//! [`ProblemKind`] of supported features; a problem is supported exactly when
//! its own kind is a subset of the engine's.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single capability/feature of a planning problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    /// Classical single-agent, action-based problem
    ActionBased,
    /// Multi-agent, action-based problem
    ActionBasedMultiAgent,
    /// Flat (non-hierarchical) user types
    FlatTyping,
    /// User types with parents
    HierarchicalTyping,
    /// Negated precondition/goal literals
    NegativeConditions,
    /// Discrete time steps
    DiscreteTime,
    /// Integer-valued fluents
    NumericFluents,
    /// Object-valued fluents
    ObjectFluents,
    /// Effects computed outside the declarative model
    SimulatedEffects,
}

/// A set of [`Feature`]s identifying what a problem contains or an engine
/// supports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemKind {
    features: BTreeSet<Feature>,
}

impl ProblemKind {
    /// The empty kind
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A kind with the given features
    #[must_use]
    pub fn with(features: &[Feature]) -> Self {
        Self {
            features: features.iter().copied().collect(),
        }
    }

    /// Add a feature
    pub fn set(&mut self, feature: Feature) {
        self.features.insert(feature);
    }

    /// Remove a feature
    pub fn unset(&mut self, feature: Feature) {
        self.features.remove(&feature);
    }

    /// Whether the feature is present
    #[must_use]
    pub fn has(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// `self ⊆ other`; the registration interface's `supports` test
    #[must_use]
    pub fn is_subset(&self, other: &ProblemKind) -> bool {
        self.features.is_subset(&other.features)
    }

    /// Features present in both kinds
    #[must_use]
    pub fn intersection(&self, other: &ProblemKind) -> ProblemKind {
        Self {
            features: self.features.intersection(&other.features).copied().collect(),
        }
    }

    /// Iterate features in a stable order
    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.iter().copied()
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.features.iter().map(|x| format!("{x:?}")).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_is_supports() {
        let supported = ProblemKind::with(&[
            Feature::ActionBasedMultiAgent,
            Feature::FlatTyping,
            Feature::HierarchicalTyping,
        ]);
        let kind = ProblemKind::with(&[Feature::ActionBasedMultiAgent, Feature::FlatTyping]);
        assert!(kind.is_subset(&supported));
        assert!(!supported.is_subset(&kind));
    }

    #[test]
    fn set_unset() {
        let mut kind = ProblemKind::new();
        kind.set(Feature::ActionBasedMultiAgent);
        assert!(kind.has(Feature::ActionBasedMultiAgent));
        kind.unset(Feature::ActionBasedMultiAgent);
        kind.set(Feature::ActionBased);
        assert!(!kind.has(Feature::ActionBasedMultiAgent));
        assert!(kind.has(Feature::ActionBased));
    }

    #[test]
    fn intersection_keeps_common() {
        let a = ProblemKind::with(&[Feature::FlatTyping, Feature::DiscreteTime]);
        let b = ProblemKind::with(&[Feature::FlatTyping, Feature::NegativeConditions]);
        assert_eq!(a.intersection(&b), ProblemKind::with(&[Feature::FlatTyping]));
    }
}
