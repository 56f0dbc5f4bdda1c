//! Sequential simulation and plan merging
//!
//! Ground-state execution machinery for the robustness checker: a
//! centralizer that flattens a multi-agent problem into one classical
//! problem, a sequential simulator over ground states, and a round-robin
//! plan merger that interleaves per-agent plans and detects deadlocks.

pub mod centralizer;
pub mod error;
pub mod ground;
pub mod merge;
pub mod simulator;
pub mod state;

pub use centralizer::{centralized_action_name, MultiAgentProblemCentralizer};
pub use error::{SimError, SimResult};
pub use ground::Binding;
pub use merge::{MergeOutcome, MergeStatus, PlanMerger};
pub use simulator::SequentialSimulator;
pub use state::State;
