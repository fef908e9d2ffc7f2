/*!
Reading the QCIR-14 gate format.

The format: a `#QCIR-G14 [<maxvar>]` header, an optional `free(<var>, …)` line,
quantifier blocks `exists(<var>, …)` / `forall(<var>, …)`, an `output(<lit>)` line,
and gate definitions `<gate> = <op>(<lit>, …)` with `op ∈ {and, or, xor, ite}`.
Identifiers match `[A-Za-z0-9_]+` and negation is a leading `-`; lines starting with
`#` after the header are comments.

The circuit is Tseitin-encoded into clauses.
Free variables form an outermost existential block, declared blocks follow in order,
and each gate becomes a fresh *auxiliary* existential quantified after every declared
variable --- a fresh innermost block.
Auxiliary variables are never decided on.
The output literal contributes a unit clause.
*/

use std::collections::HashMap;

use crate::{
    context::GenericSolver,
    structures::{
        atom::{Atom, Quantifier},
        literal::Literal,
    },
    types::err::{ErrorKind, ParseError},
};

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits `line` into a head and a parenthesised argument list.
fn split_application(line: &str) -> Option<(&str, Vec<&str>)> {
    let open = line.find('(')?;
    let close = line.rfind(')')?;
    if close < open {
        return None;
    }
    let head = line[..open].trim();
    let body = line[open + 1..close].trim();
    let args = match body.is_empty() {
        true => Vec::new(),
        false => body.split(',').map(str::trim).collect(),
    };
    Some((head, args))
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Reads a QCIR formula.
    pub fn read_qcir(&mut self, reader: impl std::io::BufRead) -> Result<(), ErrorKind> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            match line {
                Ok(line) => lines.push(line),
                Err(_) => return Err(ErrorKind::from(ParseError::Empty)),
            }
        }
        self.read_qcir_lines(&lines)
    }

    pub(super) fn read_qcir_lines(&mut self, lines: &[String]) -> Result<(), ErrorKind> {
        let mut names: HashMap<String, Atom> = HashMap::default();
        let mut clauses: Vec<Vec<Literal>> = Vec::new();
        let mut output: Option<Literal> = None;
        let mut seen_header = false;

        let parse_literal = |names: &HashMap<String, Atom>,
                                 token: &str,
                                 line_number: usize|
         -> Result<Literal, ErrorKind> {
            let (polarity, name) = match token.strip_prefix('-') {
                Some(rest) => (false, rest),
                None => (true, token),
            };
            if name.is_empty() || !name.chars().all(is_name_char) {
                return Err(ErrorKind::from(ParseError::Literal(line_number)));
            }
            match names.get(name) {
                Some(v) => Ok(Literal::new(*v, polarity)),
                None => Err(ErrorKind::from(ParseError::UnknownName(line_number))),
            }
        };

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') {
                if trimmed.starts_with("#QCIR") {
                    seen_header = true;
                }
                continue;
            }
            if !seen_header {
                return Err(ErrorKind::from(ParseError::UnknownFormat));
            }

            let Some((head, args)) = split_application(trimmed) else {
                return Err(ErrorKind::from(ParseError::Gate(line_number)));
            };

            match head {
                "free" | "exists" | "forall" => {
                    let quantifier = match head {
                        "forall" => Quantifier::Universal,
                        _ => Quantifier::Existential,
                    };
                    for name in args {
                        if name.is_empty() || !name.chars().all(is_name_char) {
                            return Err(ErrorKind::from(ParseError::Gate(line_number)));
                        }
                        if names.contains_key(name) {
                            return Err(ErrorKind::from(ParseError::Requantification(
                                line_number,
                            )));
                        }
                        let v = self.add_variable(quantifier, false, name.to_string());
                        names.insert(name.to_string(), v);
                    }
                }

                "output" => {
                    let [token] = args.as_slice() else {
                        return Err(ErrorKind::from(ParseError::Gate(line_number)));
                    };
                    output = Some(parse_literal(&names, token, line_number)?);
                }

                gate_definition => {
                    // <gate> = <op>(<args>)
                    let Some((gate_name, op)) = gate_definition.split_once('=') else {
                        return Err(ErrorKind::from(ParseError::Gate(line_number)));
                    };
                    let gate_name = gate_name.trim();
                    let op = op.trim();
                    if gate_name.is_empty()
                        || !gate_name.chars().all(is_name_char)
                        || names.contains_key(gate_name)
                    {
                        return Err(ErrorKind::from(ParseError::Gate(line_number)));
                    }

                    let mut literals = Vec::with_capacity(args.len());
                    for token in &args {
                        literals.push(parse_literal(&names, token, line_number)?);
                    }

                    let v = self.add_variable(Quantifier::Existential, true, gate_name.to_string());
                    names.insert(gate_name.to_string(), v);
                    let gate = Literal::new(v, true);

                    match op {
                        "and" => {
                            let mut long = vec![gate];
                            for input in &literals {
                                clauses.push(vec![!gate, *input]);
                                long.push(!*input);
                            }
                            clauses.push(long);
                        }

                        "or" => {
                            let mut long = vec![!gate];
                            for input in &literals {
                                clauses.push(vec![gate, !*input]);
                                long.push(*input);
                            }
                            clauses.push(long);
                        }

                        "xor" => {
                            let [a, b] = literals.as_slice() else {
                                return Err(ErrorKind::from(ParseError::Gate(line_number)));
                            };
                            clauses.push(vec![!gate, *a, *b]);
                            clauses.push(vec![!gate, !*a, !*b]);
                            clauses.push(vec![gate, !*a, *b]);
                            clauses.push(vec![gate, *a, !*b]);
                        }

                        "ite" => {
                            let [c, t, e] = literals.as_slice() else {
                                return Err(ErrorKind::from(ParseError::Gate(line_number)));
                            };
                            clauses.push(vec![!gate, !*c, *t]);
                            clauses.push(vec![!gate, *c, *e]);
                            clauses.push(vec![gate, !*c, !*t]);
                            clauses.push(vec![gate, *c, !*e]);
                        }

                        _ => return Err(ErrorKind::from(ParseError::Gate(line_number))),
                    }
                }
            }
        }

        let Some(output) = output else {
            return Err(ErrorKind::from(ParseError::MissingOutput));
        };
        clauses.push(vec![output]);

        for clause in clauses {
            self.add_input_clause(clause)?;
        }
        Ok(())
    }
}
