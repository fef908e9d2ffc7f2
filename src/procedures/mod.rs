/*!
The procedures of a solve, as methods on the [solver](crate::context::GenericSolver).

- [propagate](crate::context::GenericSolver::propagate) --- watched-literal propagation
  over clauses and terms, and initial-term generation.
- [analyze](crate::context::GenericSolver::analyze) --- constraint learning from a
  conflict or a satisfied term.
- [backtrack](crate::context::GenericSolver::backtrack) --- recovery from a conflict.
- [solve](crate::context::GenericSolver::solve) --- the driving loop.
*/

pub mod analysis;
pub mod backjump;
pub mod checks;
pub mod model;
pub mod propagate;
pub mod solve;

use crate::{db::CRef, structures::constraint::ConstraintKind};

/// A constraint which is empty under the current assignment: a falsified clause, or a
/// satisfied term.
///
/// Conflicts are expected outcomes of propagation, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// The offending constraint.
    pub cref: CRef,

    /// Its kind.
    pub kind: ConstraintKind,
}
