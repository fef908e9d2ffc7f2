//! A library for determining the truth of quantified boolean formulas in prenex form.
//!
//! otter_qbf decides QBFs over clauses (QDIMACS) or gate circuits (QCIR-14) by
//! quantified conflict-driven clause and term learning (QCDCL), with lazy dependency
//! learning between variables.
//!
//! # Orientation
//!
//! The library is designed around the core structure of a [solver](context::Solver).
//!
//! Solvers are built with a [configuration](config::Config), and formulas are added
//! through the textual [QDIMACS and QCIR representations](builder) or
//! programatically.
//!
//! Internally, and at a high level, a solve is viewed in terms of a handful of
//! databases and the procedures which relate them:
//! - Assignments, levels, and antecedents live in a [variable
//!   store](db::variable::VariableStore).
//! - Clauses and terms live in a [constraint database](db::constraint::ConstraintDB)
//!   and are accessed through stable references.
//! - The relation of which variables may be decided before which lives in a
//!   [dependency manager](db::dependency::DependencyManager), and is learnt lazily
//!   during search.
//! - The [procedures] --- propagation over both constraint kinds, constraint
//!   learning, backtracking, and the solve loop --- read and revise the databases.
//!
//! Useful starting points:
//! - The high-level [solve procedure](procedures::solve) to inspect the dynamics of a
//!   solve.
//! - The [propagator](procedures::propagate) for the two-watched-literal discipline
//!   under quantifier dependencies.
//! - The [decision heuristics](heuristics) and [restart schedulers](restarts) for the
//!   pluggable parts.
//!
//! # Example
//!
//! ```rust
//! # use otter_qbf::config::Config;
//! # use otter_qbf::context::Solver;
//! # use otter_qbf::reports::Report;
//! let mut solver = Solver::from_config(Config::default());
//!
//! let formula = "
//! p cnf 2 2
//! e 1 0
//! a 2 0
//! 1 2 0
//! 1 -2 0
//! ";
//!
//! assert!(solver.read_auto(formula.trim_start().as_bytes()).is_ok());
//! assert_eq!(solver.solve(), Report::Satisfiable);
//! ```
//!
//! # Logs
//!
//! To help diagnose issues calls to [log!](log) are made throughout, and a variety of
//! targets are defined in [misc::log] to narrow output to relevant subsystems.
//! No log implementation is fixed; the bundled binary wires
//! [env_logger](https://docs.rs/env_logger/latest/env_logger/), so e.g.
//! `RUST_LOG=propagation …` filters to the propagator.

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::field_reassign_with_default)]

pub mod builder;
pub mod config;
pub mod context;
pub mod db;
pub mod generic;
pub mod heuristics;
pub mod misc;
pub mod procedures;
pub mod reports;
pub mod restarts;
pub mod structures;
pub mod types;
