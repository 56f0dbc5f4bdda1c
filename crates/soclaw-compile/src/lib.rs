//! Reductions from multi-agent robustness to classical planning
//!
//! Given a multi-agent problem with a wait-for specification, each verifier
//! here compiles a classical problem that is solvable iff some interleaving
//! of the agents' plans can fail or deadlock. Two formulations are
//! registered: the simple one-shot fail/wait/crash encoding ("srbv") and the
//! two-stage allow-gated encoding ("wrbv"). The compilation artifact carries
//! an origin table that maps every synthesized action back to its source
//! action and variant kind, so solution plans can be decoded into concrete
//! counterexamples.
//!
//! ```rust
//! use soclaw_compile::{registry, VerifierId};
//! use soclaw_model::{Action, Agent, Atom, Literal, Fluent, MaProblemWithWaitfor, MultiAgentProblem};
//!
//! let mut ma = MultiAgentProblem::new("demo");
//! ma.add_env_fluent(Fluent::bool("free"))?;
//! let mut agent = Agent::new("a1");
//! let mut take = Action::new("take");
//! take.add_precondition(Literal::positive(Atom::propositional("free")));
//! take.add_effect(Atom::propositional("free"), false);
//! agent.add_action(take)?;
//! ma.add_agent(agent)?;
//!
//! let input = MaProblemWithWaitfor::new(ma);
//! let result = registry::verifier(VerifierId::Simple).compile(&input)?;
//! assert!(result.origin("take_s_a1").is_some());
//! # Ok::<(), soclaw_compile::CompileError>(())
//! ```

pub mod error;
pub mod fluent_map;
pub mod pddl;
pub mod registry;
pub mod scaffold;
pub mod simple;
pub mod social_law;
pub mod verifier;
pub mod waiting;

pub use error::CompileError;
pub use fluent_map::FluentMap;
pub use pddl::PddlWriter;
pub use simple::SimpleRobustnessVerifier;
pub use social_law::SocialLaw;
pub use verifier::{
    ActionOrigin, CompilerResult, RobustnessVerifier, VariantTag, VerifierId,
};
pub use waiting::WaitingRobustnessVerifier;
