/*!
Reading and writing QDIMACS.

The format: an optional `p cnf <vars> <clauses>` problem line, quantifier blocks
`a <v…> 0` / `e <v…> 0`, then clauses `<lit…> 0`, with 1-based ids and `-` for
negation.
Comment lines open with `c`, and clauses may span lines.

Reading is two-phase.
Quantifier blocks and clause tokens are collected first; variables mentioned only in
the matrix are *free*, and join an existential block outside every declared one.
Internal atoms are then created in prefix order --- free variables first, declared
blocks in declaration order --- and the clauses mapped through the external-to-internal
renaming.

[write_qdimacs](crate::context::GenericSolver::write_qdimacs) emits the formula back
out with external names, so a parse of the output reconstructs the same internal
formula.
*/

use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::{
    context::GenericSolver,
    misc::log::targets,
    structures::{
        atom::{Atom, Quantifier},
        constraint::ConstraintKind,
        literal::Literal,
    },
    types::err::{ErrorKind, ParseError},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Reads a QDIMACS formula.
    pub fn read_qdimacs(&mut self, reader: impl std::io::BufRead) -> Result<(), ErrorKind> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            match line {
                Ok(line) => lines.push(line),
                Err(_) => return Err(ErrorKind::from(ParseError::Empty)),
            }
        }
        self.read_qdimacs_lines(&lines)
    }

    pub(super) fn read_qdimacs_lines(&mut self, lines: &[String]) -> Result<(), ErrorKind> {
        let mut blocks: Vec<(Quantifier, Vec<i64>)> = Vec::new();
        let mut clauses: Vec<Vec<i64>> = Vec::new();
        let mut quantified: HashSet<i64> = HashSet::default();

        let mut clause_tokens: Vec<i64> = Vec::new();
        let mut in_matrix = false;

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('c') || trimmed.starts_with('%') {
                continue;
            }

            if let Some(spec) = trimmed.strip_prefix('p') {
                let mut details = spec.split_whitespace();
                if details.next() != Some("cnf") {
                    return Err(ErrorKind::from(ParseError::ProblemSpecification(
                        line_number,
                    )));
                }
                let atoms: usize = match details.next().map(str::parse) {
                    Some(Ok(count)) => count,
                    _ => {
                        return Err(ErrorKind::from(ParseError::ProblemSpecification(
                            line_number,
                        )))
                    }
                };
                let clause_count: usize = match details.next().map(str::parse) {
                    Some(Ok(count)) => count,
                    _ => {
                        return Err(ErrorKind::from(ParseError::ProblemSpecification(
                            line_number,
                        )))
                    }
                };
                log::debug!(target: targets::PARSER,
                    "Problem line declares {atoms} variables, {clause_count} clauses");
                continue;
            }

            if trimmed.starts_with('a') || trimmed.starts_with('e') {
                if in_matrix || !clause_tokens.is_empty() {
                    return Err(ErrorKind::from(ParseError::MisplacedQuantifier(
                        line_number,
                    )));
                }
                let quantifier = match trimmed.chars().next() {
                    Some('a') => Quantifier::Universal,
                    _ => Quantifier::Existential,
                };
                let mut block = Vec::new();
                let mut closed = false;
                for token in trimmed[1..].split_whitespace() {
                    let id: i64 = token
                        .parse()
                        .map_err(|_| ErrorKind::from(ParseError::Literal(line_number)))?;
                    if id == 0 {
                        closed = true;
                        break;
                    }
                    if id < 0 {
                        return Err(ErrorKind::from(ParseError::Literal(line_number)));
                    }
                    if !quantified.insert(id) {
                        return Err(ErrorKind::from(ParseError::Requantification(line_number)));
                    }
                    block.push(id);
                }
                if !closed {
                    return Err(ErrorKind::from(ParseError::MissingDelimiter(line_number)));
                }
                blocks.push((quantifier, block));
                continue;
            }

            // A clause, or the continuation of one.
            in_matrix = true;
            for token in trimmed.split_whitespace() {
                let literal: i64 = token
                    .parse()
                    .map_err(|_| ErrorKind::from(ParseError::Literal(line_number)))?;
                if literal == 0 {
                    clauses.push(std::mem::take(&mut clause_tokens));
                } else {
                    clause_tokens.push(literal);
                }
            }
        }
        if !clause_tokens.is_empty() {
            return Err(ErrorKind::from(ParseError::MissingDelimiter(lines.len())));
        }

        // Free variables join an existential block outside every declared one.
        let mut free: Vec<i64> = Vec::new();
        for clause in &clauses {
            for literal in clause {
                let id = literal.abs();
                if quantified.insert(id) {
                    free.push(id);
                }
            }
        }
        free.sort_unstable();

        let mut rename: HashMap<i64, Atom> = HashMap::default();
        for id in free {
            let v = self.add_variable(Quantifier::Existential, false, id.to_string());
            rename.insert(id, v);
        }
        for (quantifier, block) in blocks {
            for id in block {
                let v = self.add_variable(quantifier, false, id.to_string());
                rename.insert(id, v);
            }
        }

        for clause in clauses {
            let literals = clause
                .iter()
                .map(|l| Literal::new(rename[&l.abs()], *l > 0))
                .collect();
            self.add_input_clause(literals)?;
        }

        Ok(())
    }

    /// Writes the formula as QDIMACS, with external names.
    pub fn write_qdimacs(&self, writer: &mut impl Write) -> std::io::Result<()> {
        let variable_count = self.variables.variable_count();
        let clause_count = self.constraints.input_refs(ConstraintKind::Clause).len();
        writeln!(writer, "p cnf {variable_count} {clause_count}")?;

        let mut v: Atom = 1;
        while v <= self.variables.last_variable() {
            let quantifier = self.variables.quantifier(v);
            write!(writer, "{quantifier}")?;
            while v <= self.variables.last_variable()
                && self.variables.quantifier(v) == quantifier
            {
                write!(writer, " {}", self.variables.name(v))?;
                v += 1;
            }
            writeln!(writer, " 0")?;
        }

        for cref in self.constraints.input_refs(ConstraintKind::Clause) {
            for literal in self.constraints.literals(*cref, ConstraintKind::Clause) {
                let sign = if literal.polarity() { "" } else { "-" };
                write!(writer, "{sign}{} ", self.variables.name(literal.atom()))?;
            }
            writeln!(writer, "0")?;
        }
        Ok(())
    }
}
