//! PDDL export of compiled problems
//!
//! Writes a compiled classical problem as a domain/problem PDDL pair so the
//! reduction output can be fed to external planners or inspected by hand.
//! Only boolean fluents are expressible as predicates.

use crate::error::CompileError;
use indexmap::IndexMap;
use soclaw_model::{Atom, ClassicalProblem, Literal, Term, Value};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Renders a [`ClassicalProblem`] as PDDL text
pub struct PddlWriter<'a> {
    problem: &'a ClassicalProblem,
}

impl<'a> PddlWriter<'a> {
    /// Create a writer over `problem`
    #[must_use]
    pub fn new(problem: &'a ClassicalProblem) -> Self {
        Self { problem }
    }

    fn check_boolean(&self) -> Result<(), CompileError> {
        for fluent in self.problem.fluents() {
            if !matches!(fluent.default, Value::Bool(_)) {
                return Err(CompileError::NonBooleanFluent(fluent.name.clone()));
            }
        }
        Ok(())
    }

    fn render_term(term: &Term) -> String {
        match term {
            Term::Param(p) => format!("?{p}"),
            Term::Object(o) => o.clone(),
        }
    }

    fn render_atom(atom: &Atom) -> String {
        if atom.args.is_empty() {
            format!("({})", atom.fluent)
        } else {
            let args: Vec<_> = atom.args.iter().map(Self::render_term).collect();
            format!("({} {})", atom.fluent, args.join(" "))
        }
    }

    fn render_literal(literal: &Literal) -> String {
        let atom = Self::render_atom(&literal.atom);
        if literal.negated {
            format!("(not {atom})")
        } else {
            atom
        }
    }

    fn render_conjunction(parts: &[String]) -> String {
        match parts.len() {
            0 => "(and )".to_string(),
            1 => parts[0].clone(),
            _ => format!("(and {})", parts.join(" ")),
        }
    }

    /// The domain file contents
    pub fn domain(&self) -> Result<String, CompileError> {
        self.check_boolean()?;
        let mut out = String::new();
        let _ = writeln!(out, "(define (domain {}-domain)", self.problem.name);
        let _ = writeln!(
            out,
            "  (:requirements :strips :typing :negative-preconditions)"
        );

        let types: Vec<_> = self
            .problem
            .user_types()
            .map(|t| match &t.parent {
                Some(parent) => format!("{} - {}", t.name, parent),
                None => t.name.clone(),
            })
            .collect();
        if !types.is_empty() {
            let _ = writeln!(out, "  (:types {})", types.join(" "));
        }

        let _ = writeln!(out, "  (:predicates");
        for fluent in self.problem.fluents() {
            let params: Vec<_> = fluent
                .signature
                .iter()
                .map(|p| format!("?{} - {}", p.name, p.ty))
                .collect();
            if params.is_empty() {
                let _ = writeln!(out, "    ({})", fluent.name);
            } else {
                let _ = writeln!(out, "    ({} {})", fluent.name, params.join(" "));
            }
        }
        let _ = writeln!(out, "  )");

        for action in self.problem.actions() {
            let params: Vec<_> = action
                .parameters
                .iter()
                .map(|p| format!("?{} - {}", p.name, p.ty))
                .collect();
            let _ = writeln!(out, "  (:action {}", action.name);
            let _ = writeln!(out, "    :parameters ({})", params.join(" "));
            let pre: Vec<_> = action
                .preconditions
                .iter()
                .map(Self::render_literal)
                .collect();
            let _ = writeln!(out, "    :precondition {}", Self::render_conjunction(&pre));
            let mut eff = Vec::with_capacity(action.effects.len());
            for effect in &action.effects {
                let atom = Self::render_atom(&effect.atom);
                match &effect.value {
                    Value::Bool(true) => eff.push(atom),
                    Value::Bool(false) => eff.push(format!("(not {atom})")),
                    other => {
                        return Err(CompileError::NonBooleanFluent(format!(
                            "{} := {other}",
                            effect.atom
                        )))
                    }
                }
            }
            let _ = writeln!(out, "    :effect {}", Self::render_conjunction(&eff));
            let _ = writeln!(out, "  )");
        }
        let _ = writeln!(out, ")");
        Ok(out)
    }

    /// The problem file contents
    pub fn problem_file(&self) -> Result<String, CompileError> {
        self.check_boolean()?;
        let mut out = String::new();
        let _ = writeln!(out, "(define (problem {})", self.problem.name);
        let _ = writeln!(out, "  (:domain {}-domain)", self.problem.name);

        let objects: Vec<_> = self
            .problem
            .objects()
            .map(|o| format!("{} - {}", o.name, o.ty))
            .collect();
        if !objects.is_empty() {
            let _ = writeln!(out, "  (:objects {})", objects.join(" "));
        }

        // closed world: list every ground atom that is initially true,
        // explicit assignments overriding fluent defaults
        let mut truth: IndexMap<Atom, bool> = IndexMap::new();
        for fluent in self.problem.fluents() {
            let default = fluent.default.is_true();
            for atom in self.problem.ground_atoms(fluent) {
                truth.insert(atom, default);
            }
        }
        for (atom, value) in self.problem.initial_values() {
            truth.insert(atom.clone(), value.is_true());
        }

        let _ = writeln!(out, "  (:init");
        for (atom, value) in &truth {
            if *value {
                let _ = writeln!(out, "    {}", Self::render_atom(atom));
            }
        }
        let _ = writeln!(out, "  )");

        let goals: Vec<_> = self.problem.goals().map(Self::render_literal).collect();
        let _ = writeln!(out, "  (:goal {})", Self::render_conjunction(&goals));
        let _ = writeln!(out, ")");
        Ok(out)
    }

    /// Write `{name}_domain.pddl` and `{name}_problem.pddl` under `dir`,
    /// returning the two paths
    pub fn write_to_dir(&self, dir: &Path) -> Result<(PathBuf, PathBuf), CompileError> {
        let domain_path = dir.join(format!("{}_domain.pddl", self.problem.name));
        let problem_path = dir.join(format!("{}_problem.pddl", self.problem.name));
        let io_err = |path: &Path, e: std::io::Error| CompileError::PddlIo {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        std::fs::write(&domain_path, self.domain()?).map_err(|e| io_err(&domain_path, e))?;
        std::fs::write(&problem_path, self.problem_file()?)
            .map_err(|e| io_err(&problem_path, e))?;
        info!(domain = %domain_path.display(), problem = %problem_path.display(), "wrote PDDL dump");
        Ok((domain_path, problem_path))
    }
}
