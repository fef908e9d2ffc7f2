/*!
Reports for a solve.
*/

use crate::context::SolverState;

/// High-level reports regarding a solve.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula is true.
    Satisfiable,

    /// The formula is false.
    Unsatisfiable,

    /// The status of the formula is unknown, e.g. following an interrupt.
    Unknown,
}

impl From<&SolverState> for Report {
    fn from(state: &SolverState) -> Self {
        match state {
            SolverState::Satisfiable => Report::Satisfiable,
            SolverState::Unsatisfiable => Report::Unsatisfiable,
            SolverState::Input | SolverState::Solving | SolverState::Interrupted => Report::Unknown,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SAT"),
            Self::Unsatisfiable => write!(f, "UNSAT"),
            Self::Unknown => write!(f, "UNDEF"),
        }
    }
}
