//! The abstract elements of a quantified formula: atoms, literals, and constraints.
//!
//! A QBF in prenex form pairs a quantifier prefix over [atoms](atom) with a matrix of
//! [constraints](constraint).
//! During a solve the matrix holds constraints of two kinds: *clauses* (disjunctions,
//! from the input formula and clause learning) and *terms* (conjunctions, from model
//! generation and term learning).
//! Most of the solver is symmetric in the two kinds, and the symmetry is captured by
//! [ConstraintKind](constraint::ConstraintKind) rather than by distinct structures.

pub mod atom;
pub mod constraint;
pub mod literal;
