/*!
Databases of things recorded during a solve.

- The [variable store](variable) owns assignments, decision levels, antecedents and the
  trail.
- The [constraint database](constraint) owns constraint storage and hands out stable
  [CRef] handles.
- The [dependency manager](dependency) owns the (learnt) dependency relation between
  variables.
- The [watch structures](watches) own the watch lists and the propagation queue.

Fields of the databases are mostly private to ensure the use of methods which uphold
invariants; every other subsystem holds [CRef]s and consults the constraint database to
dereference them.
*/

pub mod constraint;
pub mod dependency;
pub mod variable;
pub mod watches;

/// The index of a decision level.
pub type LevelIndex = u32;

/// An opaque handle to a stored constraint.
///
/// Handles are stable between invocations of
/// [compaction](constraint::ConstraintDB::compact); subsystems holding handles across a
/// compaction rewrite them through
/// [relocated](constraint::ConstraintDB::relocated).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CRef(pub(crate) u32);

impl CRef {
    /// A dedicated non-reference, for decisions and unassigned variables.
    pub const NONE: CRef = CRef(u32::MAX);
}

impl std::fmt::Display for CRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            CRef::NONE => write!(f, "cref(-)"),
            CRef(offset) => write!(f, "cref({offset})"),
        }
    }
}
