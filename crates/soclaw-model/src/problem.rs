//! Multi-agent and classical planning problems

use crate::action::Action;
use crate::agent::Agent;
use crate::error::{ModelError, ModelResult};
use crate::fluent::{Atom, Fluent, Literal, Term};
use crate::kind::{Feature, ProblemKind};
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A user-declared object type, optionally with a parent type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserType {
    /// Type name
    pub name: String,
    /// Parent type, if hierarchical
    pub parent: Option<String>,
}

impl UserType {
    /// A root type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    /// A subtype of `parent`
    pub fn subtype(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
        }
    }
}

/// A declared object with its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    /// Object name
    pub name: String,
    /// Name of the object's type
    pub ty: String,
}

impl Object {
    /// Create a new object declaration
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A goal conjunct of a multi-agent problem, tagged with its owning agent
///
/// Goals without an owning agent are representable but rejected by every
/// robustness reduction; see [`ModelError::UntaggedGoal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Owning agent, if any
    pub agent: Option<String>,
    /// The goal literal
    pub literal: Literal,
}

fn subtype_of(types: &IndexMap<String, UserType>, child: &str, ancestor: &str) -> bool {
    if child == ancestor {
        return true;
    }
    let mut current = child;
    while let Some(ty) = types.get(current) {
        match &ty.parent {
            Some(parent) if parent == ancestor => return true,
            Some(parent) => current = parent,
            None => return false,
        }
    }
    false
}

/// A multi-agent planning problem: shared environment fluents, agents with
/// local fluents and actions, explicit initial values and per-agent goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAgentProblem {
    /// Problem name
    pub name: String,
    user_types: IndexMap<String, UserType>,
    objects: IndexMap<String, Object>,
    env_fluents: IndexMap<String, Fluent>,
    agents: IndexMap<String, Agent>,
    env_initial: Vec<(Atom, Value)>,
    agent_initial: Vec<(String, Atom, Value)>,
    goals: Vec<Goal>,
}

impl MultiAgentProblem {
    /// Create an empty problem
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_types: IndexMap::new(),
            objects: IndexMap::new(),
            env_fluents: IndexMap::new(),
            agents: IndexMap::new(),
            env_initial: Vec::new(),
            agent_initial: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// Declare a user type
    pub fn add_user_type(&mut self, ty: UserType) -> ModelResult<()> {
        if self.user_types.contains_key(&ty.name) {
            return Err(ModelError::Duplicate {
                kind: "type",
                name: ty.name,
            });
        }
        if let Some(parent) = &ty.parent {
            if !self.user_types.contains_key(parent) {
                return Err(ModelError::UnknownType(parent.clone()));
            }
        }
        self.user_types.insert(ty.name.clone(), ty);
        Ok(())
    }

    /// Declare an object
    pub fn add_object(&mut self, object: Object) -> ModelResult<()> {
        if !self.user_types.contains_key(&object.ty) {
            return Err(ModelError::UnknownType(object.ty));
        }
        if self.objects.contains_key(&object.name) {
            return Err(ModelError::Duplicate {
                kind: "object",
                name: object.name,
            });
        }
        self.objects.insert(object.name.clone(), object);
        Ok(())
    }

    /// Declare a shared environment fluent
    pub fn add_env_fluent(&mut self, fluent: Fluent) -> ModelResult<()> {
        if self.env_fluents.contains_key(&fluent.name) {
            return Err(ModelError::Duplicate {
                kind: "fluent",
                name: fluent.name,
            });
        }
        self.env_fluents.insert(fluent.name.clone(), fluent);
        Ok(())
    }

    /// Add an agent
    pub fn add_agent(&mut self, agent: Agent) -> ModelResult<()> {
        if self.agents.contains_key(&agent.name) {
            return Err(ModelError::Duplicate {
                kind: "agent",
                name: agent.name,
            });
        }
        self.agents.insert(agent.name.clone(), agent);
        Ok(())
    }

    /// Set the explicit initial value of an environment-scoped ground atom
    pub fn set_initial_value(&mut self, atom: Atom, value: Value) -> ModelResult<()> {
        if !self.env_fluents.contains_key(&atom.fluent) {
            return Err(ModelError::UnknownFluent(atom.fluent));
        }
        self.env_initial.push((atom, value));
        Ok(())
    }

    /// Set the explicit initial value of an agent-scoped ground atom
    pub fn set_agent_initial_value(
        &mut self,
        agent: &str,
        atom: Atom,
        value: Value,
    ) -> ModelResult<()> {
        let a = self.agent(agent)?;
        if !a.has_fluent(&atom.fluent) {
            return Err(ModelError::UnknownFluent(atom.fluent));
        }
        self.agent_initial.push((agent.to_string(), atom, value));
        Ok(())
    }

    /// Add a goal conjunct owned by `agent`
    pub fn add_agent_goal(&mut self, agent: &str, literal: Literal) -> ModelResult<()> {
        if !self.agents.contains_key(agent) {
            return Err(ModelError::UnknownAgent(agent.to_string()));
        }
        self.goals.push(Goal {
            agent: Some(agent.to_string()),
            literal,
        });
        Ok(())
    }

    /// Add a goal conjunct with no owning agent (unsupported by the
    /// reductions, kept representable so the rejection path is testable)
    pub fn add_global_goal(&mut self, literal: Literal) {
        self.goals.push(Goal {
            agent: None,
            literal,
        });
    }

    /// Look up an agent
    pub fn agent(&self, name: &str) -> ModelResult<&Agent> {
        self.agents
            .get(name)
            .ok_or_else(|| ModelError::UnknownAgent(name.to_string()))
    }

    /// Mutable agent lookup
    pub fn agent_mut(&mut self, name: &str) -> ModelResult<&mut Agent> {
        self.agents
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownAgent(name.to_string()))
    }

    /// Agents in declaration order
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Environment fluents in declaration order
    pub fn env_fluents(&self) -> impl Iterator<Item = &Fluent> {
        self.env_fluents.values()
    }

    /// Look up an environment fluent
    #[must_use]
    pub fn env_fluent(&self, name: &str) -> Option<&Fluent> {
        self.env_fluents.get(name)
    }

    /// User types in declaration order
    pub fn user_types(&self) -> impl Iterator<Item = &UserType> {
        self.user_types.values()
    }

    /// Objects in declaration order
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    /// Objects whose type is `ty` or a subtype of it
    pub fn objects_of_type<'a>(&'a self, ty: &'a str) -> impl Iterator<Item = &'a Object> + 'a {
        self.objects
            .values()
            .filter(move |o| subtype_of(&self.user_types, &o.ty, ty))
    }

    /// Explicit environment-scoped initial values
    pub fn env_initial_values(&self) -> impl Iterator<Item = &(Atom, Value)> {
        self.env_initial.iter()
    }

    /// Explicit agent-scoped initial values as (agent, atom, value)
    pub fn agent_initial_values(&self) -> impl Iterator<Item = &(String, Atom, Value)> {
        self.agent_initial.iter()
    }

    /// Goal conjuncts in declaration order
    pub fn goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    /// Compute the feature set of this problem
    #[must_use]
    pub fn kind(&self) -> ProblemKind {
        let mut kind = ProblemKind::new();
        kind.set(Feature::ActionBasedMultiAgent);
        kind.set(Feature::FlatTyping);
        if self.user_types.values().any(|t| t.parent.is_some()) {
            kind.set(Feature::HierarchicalTyping);
        }
        let negative_goal = self.goals.iter().any(|g| g.literal.negated);
        let negative_pre = self
            .agents
            .values()
            .flat_map(Agent::actions)
            .any(|a| a.preconditions.iter().any(|l| l.negated));
        if negative_goal || negative_pre {
            kind.set(Feature::NegativeConditions);
        }
        kind
    }
}

/// A classical (single-agent, sequential) planning problem, as produced by
/// the robustness reductions, the single-agent projection and the centralizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicalProblem {
    /// Problem name
    pub name: String,
    /// Feature set of this problem
    pub kind: ProblemKind,
    user_types: IndexMap<String, UserType>,
    objects: IndexMap<String, Object>,
    fluents: IndexMap<String, Fluent>,
    actions: IndexMap<String, Action>,
    initial: Vec<(Atom, Value)>,
    goals: Vec<Literal>,
}

impl ClassicalProblem {
    /// Create an empty classical problem
    pub fn new(name: impl Into<String>, kind: ProblemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            user_types: IndexMap::new(),
            objects: IndexMap::new(),
            fluents: IndexMap::new(),
            actions: IndexMap::new(),
            initial: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// Declare a user type
    pub fn add_user_type(&mut self, ty: UserType) -> ModelResult<()> {
        if self.user_types.contains_key(&ty.name) {
            return Err(ModelError::Duplicate {
                kind: "type",
                name: ty.name,
            });
        }
        self.user_types.insert(ty.name.clone(), ty);
        Ok(())
    }

    /// Declare an object
    pub fn add_object(&mut self, object: Object) -> ModelResult<()> {
        if self.objects.contains_key(&object.name) {
            return Err(ModelError::Duplicate {
                kind: "object",
                name: object.name,
            });
        }
        self.objects.insert(object.name.clone(), object);
        Ok(())
    }

    /// Declare a fluent; its default applies to every grounding not
    /// explicitly assigned in the initial state
    pub fn add_fluent(&mut self, fluent: Fluent) -> ModelResult<()> {
        if self.fluents.contains_key(&fluent.name) {
            return Err(ModelError::Duplicate {
                kind: "fluent",
                name: fluent.name,
            });
        }
        self.fluents.insert(fluent.name.clone(), fluent);
        Ok(())
    }

    /// Add an action
    pub fn add_action(&mut self, action: Action) -> ModelResult<()> {
        if self.actions.contains_key(&action.name) {
            return Err(ModelError::Duplicate {
                kind: "action",
                name: action.name,
            });
        }
        self.actions.insert(action.name.clone(), action);
        Ok(())
    }

    /// Set an explicit initial value; later assignments override earlier ones
    pub fn set_initial_value(&mut self, atom: Atom, value: Value) -> ModelResult<()> {
        if !self.fluents.contains_key(&atom.fluent) {
            return Err(ModelError::UnknownFluent(atom.fluent));
        }
        self.initial.push((atom, value));
        Ok(())
    }

    /// Add a goal conjunct
    pub fn add_goal(&mut self, literal: Literal) {
        self.goals.push(literal);
    }

    /// Look up a fluent
    #[must_use]
    pub fn fluent(&self, name: &str) -> Option<&Fluent> {
        self.fluents.get(name)
    }

    /// Look up an action
    pub fn action(&self, name: &str) -> ModelResult<&Action> {
        self.actions
            .get(name)
            .ok_or_else(|| ModelError::UnknownAction {
                agent: self.name.clone(),
                action: name.to_string(),
            })
    }

    /// Fluents in declaration order
    pub fn fluents(&self) -> impl Iterator<Item = &Fluent> {
        self.fluents.values()
    }

    /// Actions in declaration order
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    /// User types in declaration order
    pub fn user_types(&self) -> impl Iterator<Item = &UserType> {
        self.user_types.values()
    }

    /// Objects in declaration order
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    /// Objects whose type is `ty` or a subtype of it
    pub fn objects_of_type<'a>(&'a self, ty: &'a str) -> impl Iterator<Item = &'a Object> + 'a {
        self.objects
            .values()
            .filter(move |o| subtype_of(&self.user_types, &o.ty, ty))
    }

    /// Explicit initial values in assignment order
    pub fn initial_values(&self) -> impl Iterator<Item = &(Atom, Value)> {
        self.initial.iter()
    }

    /// Every ground atom of `fluent`, one per binding of its signature to
    /// declared objects (respecting subtyping)
    #[must_use]
    pub fn ground_atoms(&self, fluent: &Fluent) -> Vec<Atom> {
        let mut bindings: Vec<Vec<Term>> = vec![Vec::new()];
        for param in &fluent.signature {
            let objects: Vec<_> = self.objects_of_type(&param.ty).collect();
            let mut next = Vec::with_capacity(bindings.len() * objects.len());
            for binding in &bindings {
                for object in &objects {
                    let mut b = binding.clone();
                    b.push(Term::Object(object.name.clone()));
                    next.push(b);
                }
            }
            bindings = next;
        }
        bindings
            .into_iter()
            .map(|args| Atom::new(fluent.name.clone(), args))
            .collect()
    }

    /// Goal conjuncts
    pub fn goals(&self) -> impl Iterator<Item = &Literal> {
        self.goals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem_with_types() -> MultiAgentProblem {
        let mut p = MultiAgentProblem::new("test");
        p.add_user_type(UserType::new("vehicle")).unwrap();
        p.add_user_type(UserType::subtype("car", "vehicle")).unwrap();
        p.add_object(Object::new("c1", "car")).unwrap();
        p.add_object(Object::new("v1", "vehicle")).unwrap();
        p
    }

    #[test]
    fn subtype_objects_are_found() {
        let p = problem_with_types();
        let vehicles: Vec<_> = p.objects_of_type("vehicle").map(|o| o.name.clone()).collect();
        assert_eq!(vehicles, vec!["c1", "v1"]);
        let cars: Vec<_> = p.objects_of_type("car").map(|o| o.name.clone()).collect();
        assert_eq!(cars, vec!["c1"]);
    }

    #[test]
    fn unknown_parent_type_rejected() {
        let mut p = MultiAgentProblem::new("test");
        let err = p.add_user_type(UserType::subtype("car", "vehicle")).unwrap_err();
        assert_eq!(err, ModelError::UnknownType("vehicle".into()));
    }

    #[test]
    fn kind_reflects_hierarchy_and_polarity() {
        let mut p = problem_with_types();
        assert!(p.kind().has(Feature::HierarchicalTyping));
        assert!(!p.kind().has(Feature::NegativeConditions));

        p.add_env_fluent(Fluent::bool("free")).unwrap();
        p.add_agent(Agent::new("a1")).unwrap();
        p.add_agent_goal("a1", Literal::negative(Atom::propositional("free")))
            .unwrap();
        assert!(p.kind().has(Feature::NegativeConditions));
        assert!(p.kind().has(Feature::ActionBasedMultiAgent));
    }

    #[test]
    fn initial_value_requires_known_fluent() {
        let mut p = MultiAgentProblem::new("test");
        let err = p
            .set_initial_value(Atom::propositional("ghost"), Value::Bool(true))
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownFluent("ghost".into()));
    }

    #[test]
    fn agent_goal_requires_known_agent() {
        let mut p = MultiAgentProblem::new("test");
        assert!(matches!(
            p.add_agent_goal("nobody", Literal::positive(Atom::propositional("x"))),
            Err(ModelError::UnknownAgent(_))
        ));
    }
}
