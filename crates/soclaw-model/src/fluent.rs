//! Fluents, atoms and literals
//!
//! A [`Fluent`] declares a (possibly parameterized) boolean state variable.
//! An [`Atom`] applies a fluent to argument terms; a [`Literal`] is an atom
//! with a polarity. Preconditions and goals are conjunctions of literals.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed parameter of a fluent or action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Name of the parameter's user type
    pub ty: String,
}

impl Parameter {
    /// Create a new parameter
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A declared state variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fluent {
    /// Fluent name, unique within its scope
    pub name: String,
    /// Ordered typed parameters
    pub signature: Vec<Parameter>,
    /// Default initial value for every grounding not explicitly assigned
    pub default: Value,
}

impl Fluent {
    /// A boolean fluent with the given signature, defaulting to false
    pub fn new(name: impl Into<String>, signature: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            signature,
            default: Value::Bool(false),
        }
    }

    /// A propositional (nullary) boolean fluent, defaulting to false
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Override the default initial value
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }
}

/// An argument term of an atom: either an action/fluent parameter or a
/// concrete object
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Reference to a parameter by name
    Param(String),
    /// Reference to an object by name
    Object(String),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Param(p) => write!(f, "?{p}"),
            Term::Object(o) => write!(f, "{o}"),
        }
    }
}

/// A fluent applied to argument terms
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Atom {
    /// Name of the applied fluent
    pub fluent: String,
    /// Argument terms, matching the fluent's signature
    pub args: Vec<Term>,
}

impl Atom {
    /// Create a new atom
    pub fn new(fluent: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            fluent: fluent.into(),
            args,
        }
    }

    /// An atom over a nullary fluent
    pub fn propositional(fluent: impl Into<String>) -> Self {
        Self::new(fluent, Vec::new())
    }

    /// An atom whose arguments are all concrete objects
    pub fn ground(fluent: impl Into<String>, objects: &[&str]) -> Self {
        Self::new(
            fluent,
            objects.iter().map(|o| Term::Object((*o).into())).collect(),
        )
    }

    /// Rebuild this atom over a different fluent name, keeping the arguments
    #[must_use]
    pub fn renamed(&self, fluent: impl Into<String>) -> Self {
        Self::new(fluent, self.args.clone())
    }

    /// Whether all arguments are concrete objects
    #[must_use]
    pub fn is_ground(&self) -> bool {
        self.args.iter().all(|t| matches!(t, Term::Object(_)))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.fluent)
        } else {
            let args: Vec<_> = self.args.iter().map(ToString::to_string).collect();
            write!(f, "{}({})", self.fluent, args.join(", "))
        }
    }
}

/// An atom with a polarity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// The underlying atom
    pub atom: Atom,
    /// True if the literal is negated
    pub negated: bool,
}

impl Literal {
    /// A positive literal
    #[must_use]
    pub fn positive(atom: Atom) -> Self {
        Self {
            atom,
            negated: false,
        }
    }

    /// A negative literal
    #[must_use]
    pub fn negative(atom: Atom) -> Self {
        Self {
            atom,
            negated: true,
        }
    }

    /// The literal with opposite polarity
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            atom: self.atom.clone(),
            negated: !self.negated,
        }
    }

    /// Rebuild this literal over a different fluent name, keeping arguments
    /// and polarity
    #[must_use]
    pub fn renamed(&self, fluent: impl Into<String>) -> Self {
        Self {
            atom: self.atom.renamed(fluent),
            negated: self.negated,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "not {}", self.atom)
        } else {
            write!(f, "{}", self.atom)
        }
    }
}
