//! The robustness verifier interface and its compilation artifact
//!
//! A verifier turns a multi-agent problem with a wait-for specification into
//! a classical problem that is solvable iff the multi-agent problem is not
//! robust. Alongside the problem it produces an origin table mapping every
//! synthesized action back to the variant kind and source action it encodes,
//! which the checker reads to classify and decode counterexamples.

use crate::error::CompileError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use soclaw_model::{
    ActionInstance, ClassicalProblem, Literal, MaProblemWithWaitfor, ProblemKind, SequentialPlan,
};
use std::fmt;

/// Identifier of a registered reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerifierId {
    /// One-shot fail/wait/crash encoding
    Simple,
    /// Two-stage allow-gated encoding
    Waiting,
}

impl VerifierId {
    /// Registry name of the verifier
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            VerifierId::Simple => "srbv",
            VerifierId::Waiting => "wrbv",
        }
    }
}

impl fmt::Display for VerifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of synthesized action a compiled action name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantTag {
    /// Normal concurrent progress of a source action
    Success,
    /// A single critical precondition literal was violated
    Fail,
    /// The agent blocks on a waitable precondition literal
    Wait,
    /// Turn-consuming no-op once the system has crashed
    PhantomCrash,
    /// Turn-consuming no-op while the agent is waiting
    PhantomWait,
    /// Agent completed all its goals
    EndSuccess,
    /// Agent terminated with a specific goal unreachable
    EndFail,
    /// Waiting formulation: re-enable all of an agent's allow flags
    Local,
    /// Waiting formulation: the agent is blocked with every action disallowed
    Deadlock,
    /// Stage transitions and terminal declarations with no source action
    Control,
}

impl VariantTag {
    /// Whether a plan step with this tag witnesses a precondition failure
    #[must_use]
    pub fn is_failure_witness(self) -> bool {
        matches!(self, VariantTag::Fail)
    }

    /// Whether a plan step with this tag witnesses blocking/deadlock
    #[must_use]
    pub fn is_deadlock_witness(self) -> bool {
        matches!(self, VariantTag::Wait | VariantTag::Deadlock)
    }
}

/// Provenance of one synthesized action: which variant it is, which agent
/// and source action it came from, and (for per-literal variants) the
/// precondition or goal literal it enumerates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOrigin {
    /// Variant kind
    pub tag: VariantTag,
    /// Owning agent of the source action, when any
    pub agent: Option<String>,
    /// Source action name, when the variant encodes one
    pub action: Option<String>,
    /// The enumerated literal for fail/wait/deadlock/end-fail variants
    pub literal: Option<Literal>,
}

impl ActionOrigin {
    /// An origin for a variant of `agent`'s `action`
    pub fn of_action(tag: VariantTag, agent: &str, action: &str) -> Self {
        Self {
            tag,
            agent: Some(agent.to_string()),
            action: Some(action.to_string()),
            literal: None,
        }
    }

    /// An origin enumerating a specific literal of `agent`'s `action`
    pub fn of_literal(tag: VariantTag, agent: &str, action: &str, literal: Literal) -> Self {
        Self {
            literal: Some(literal),
            ..Self::of_action(tag, agent, action)
        }
    }

    /// An origin for a per-agent termination action
    pub fn of_agent(tag: VariantTag, agent: &str) -> Self {
        Self {
            tag,
            agent: Some(agent.to_string()),
            action: None,
            literal: None,
        }
    }

    /// An origin for a control action with no source counterpart
    pub fn control() -> Self {
        Self {
            tag: VariantTag::Control,
            agent: None,
            action: None,
            literal: None,
        }
    }
}

/// The artifact of a compilation: the classical problem plus the origin
/// table for decoding its solution plans
#[derive(Debug, Clone)]
pub struct CompilerResult {
    /// The compiled classical problem
    pub problem: ClassicalProblem,
    /// Which verifier produced this result
    pub verifier: VerifierId,
    origins: IndexMap<String, ActionOrigin>,
}

impl CompilerResult {
    pub(crate) fn new(
        problem: ClassicalProblem,
        verifier: VerifierId,
        origins: IndexMap<String, ActionOrigin>,
    ) -> Self {
        Self {
            problem,
            verifier,
            origins,
        }
    }

    /// The origin of a compiled action, by compiled name
    #[must_use]
    pub fn origin(&self, compiled_action: &str) -> Option<&ActionOrigin> {
        self.origins.get(compiled_action)
    }

    /// Iterate all (compiled name, origin) pairs in synthesis order
    pub fn origins(&self) -> impl Iterator<Item = (&str, &ActionOrigin)> {
        self.origins.iter().map(|(n, o)| (n.as_str(), o))
    }

    /// Decode a solution plan of the compiled problem into the source
    /// problem's action instances, attributed to their agents
    ///
    /// Steps with no source counterpart (termination, stage transitions,
    /// terminal declarations) are dropped.
    #[must_use]
    pub fn map_back(&self, plan: &SequentialPlan) -> SequentialPlan {
        let actions = plan
            .actions
            .iter()
            .filter_map(|step| {
                let origin = self.origins.get(&step.action)?;
                let action = origin.action.as_ref()?;
                let agent = origin.agent.as_ref()?;
                Some(ActionInstance::for_agent(
                    action.clone(),
                    step.parameters.clone(),
                    agent.clone(),
                ))
            })
            .collect();
        SequentialPlan::new(actions)
    }
}

/// A reduction from multi-agent robustness to classical solvability
pub trait RobustnessVerifier: Send + Sync {
    /// Registry identity of this verifier
    fn id(&self) -> VerifierId;

    /// The feature set of problems this verifier can compile
    fn supported_kind(&self) -> ProblemKind;

    /// Whether a problem of the given kind is supported
    fn supports(&self, kind: &ProblemKind) -> bool {
        kind.is_subset(&self.supported_kind())
    }

    /// Compile the robustness-verification problem
    fn compile(&self, input: &MaProblemWithWaitfor) -> Result<CompilerResult, CompileError>;
}
