/*!
Construction of a formula within a solver.

Variables join every subsystem through [add_variable](GenericSolver::add_variable);
input clauses are deduplicated, checked for tautology, stored, and attached to the
propagator.

Formulas are usually read from text: [QDIMACS](qdimacs) or the [QCIR-14 gate
format](qcir), with [read_auto](GenericSolver::read_auto) inspecting the first
meaningful line to pick between them (`p` opens a QDIMACS problem line, `#QCIR` a QCIR
header).
*/

pub mod qcir;
pub mod qdimacs;

use std::io::BufRead;

use crate::{
    context::{GenericSolver, SolverState},
    misc::log::targets,
    structures::{
        atom::{Atom, Quantifier},
        constraint::ConstraintKind,
        literal::Literal,
    },
    types::err::{self, ErrorKind, ParseError},
};

/// Ok results of adding a clause.
#[derive(Debug, PartialEq, Eq)]
pub enum ClauseOk {
    /// The clause was stored.
    Added,

    /// The clause holds complementary literals and was skipped.
    Tautology,
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Adds a variable bound by `quantifier` to every subsystem, returning the fresh
    /// internal atom.
    ///
    /// Internal atoms follow prefix order; parsers keep the map to external names.
    pub fn add_variable(
        &mut self,
        quantifier: Quantifier,
        auxiliary: bool,
        name: String,
    ) -> Atom {
        let v = self.variables.add_variable(quantifier, auxiliary, name);
        self.dependencies.add_variable();
        self.watches.add_variable();
        self.heuristic.add_variable(auxiliary, v);
        self.analysis.add_variable();
        v
    }

    /// Adds an input clause over existing variables.
    ///
    /// Literals are sorted and deduplicated; a tautological clause is skipped.
    /// The empty clause is accepted, and will conflict at level zero.
    pub fn add_input_clause(&mut self, mut literals: Vec<Literal>) -> Result<ClauseOk, ErrorKind> {
        if self.state != SolverState::Input {
            return Err(ErrorKind::from(err::BuildError::SolveStarted));
        }
        for literal in &literals {
            if literal.atom() == 0 || literal.atom() > self.variables.last_variable() {
                return Err(ErrorKind::from(err::BuildError::UnknownAtom));
            }
        }

        literals.sort_unstable();
        literals.dedup();
        for pair in literals.windows(2) {
            if pair[0].atom() == pair[1].atom() {
                log::debug!(target: targets::PARSER, "Skipped a tautological clause");
                return Ok(ClauseOk::Tautology);
            }
        }

        let cref = self.constraints.add(&literals, ConstraintKind::Clause, false);
        self.add_constraint_watches(cref, ConstraintKind::Clause);
        Ok(ClauseOk::Added)
    }

    /// Reads a formula, picking the format by the first meaningful line.
    pub fn read_auto(&mut self, reader: impl BufRead) -> Result<(), ErrorKind> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            match line {
                Ok(line) => lines.push(line),
                Err(_) => return Err(ErrorKind::from(ParseError::Empty)),
            }
        }

        for line in &lines {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('c') {
                continue;
            }
            if trimmed.starts_with("#QCIR") {
                return self.read_qcir_lines(&lines);
            }
            if trimmed.starts_with('p') || trimmed.starts_with('a') || trimmed.starts_with('e') {
                return self.read_qdimacs_lines(&lines);
            }
            return Err(ErrorKind::from(ParseError::UnknownFormat));
        }

        // Nothing but whitespace and comments: the empty formula.
        self.read_qdimacs_lines(&lines)
    }
}
