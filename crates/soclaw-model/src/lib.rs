//! Planning data model for social-law robustness checking
//!
//! This crate defines the multi-agent planning model that the rest of the
//! workspace operates on: typed state variables (fluents), literals, actions,
//! agents, the multi-agent problem with its wait-for specification, and the
//! classical (single-agent, sequential) problem that reductions and
//! projections produce.
//!
//! # Example
//!
//! ```rust
//! use soclaw_model::{
//!     Action, Agent, Atom, Fluent, Literal, MaProblemWithWaitfor, MultiAgentProblem, Value,
//! };
//!
//! let mut ma = MultiAgentProblem::new("handover");
//! ma.add_env_fluent(Fluent::bool("free"))?;
//!
//! let mut agent = Agent::new("a1");
//! let mut take = Action::new("take");
//! take.add_precondition(Literal::positive(Atom::propositional("free")));
//! take.add_effect(Atom::propositional("free"), Value::Bool(false));
//! agent.add_action(take)?;
//! ma.add_agent(agent)?;
//!
//! let mut problem = MaProblemWithWaitfor::new(ma);
//!
//! let waitable = Literal::positive(Atom::propositional("free"));
//! problem.add_waitfor_annotation("a1", "take", waitable)?;
//! # Ok::<(), soclaw_model::ModelError>(())
//! ```

pub mod action;
pub mod agent;
pub mod error;
pub mod fluent;
pub mod kind;
pub mod plan;
pub mod problem;
pub mod value;
pub mod waitfor;

pub use action::{Action, Effect};
pub use agent::Agent;
pub use error::{ModelError, ModelResult};
pub use fluent::{Atom, Fluent, Literal, Parameter, Term};
pub use kind::{Feature, ProblemKind};
pub use plan::{ActionInstance, SequentialPlan};
pub use problem::{ClassicalProblem, Goal, MultiAgentProblem, Object, UserType};
pub use value::Value;
pub use waitfor::{MaProblemWithWaitfor, WaitforSpecification};
