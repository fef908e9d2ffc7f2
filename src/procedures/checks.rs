/*!
Reachable-state checks, for use in tests and debug assertions.

The checks mirror the invariants the propagator and trail are designed to uphold; none
is required for a solve, and none is called on release paths.
*/

use crate::{
    context::GenericSolver,
    db::CRef,
    structures::{
        constraint::{ConstraintKind, CONSTRAINT_KINDS},
        literal::Literal,
    },
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// True if no unmarked constraint outside the level-zero queues is unit or empty
    /// under the current assignment.
    ///
    /// Meaningful once the propagation queue has drained.
    pub fn propagation_correct(&self) -> bool {
        for kind in CONSTRAINT_KINDS {
            let unwatched: Vec<CRef> = self.watches.unwatched[kind.index()].clone();
            let all = self
                .constraints
                .input_refs(kind)
                .iter()
                .chain(self.constraints.learnt_refs(kind));

            for cref in all {
                if self.constraints.is_marked(*cref, kind) || unwatched.contains(cref) {
                    continue;
                }
                if self.constraint_disabled(*cref, kind) {
                    continue;
                }

                let unassigned_primaries: Vec<Literal> = self
                    .constraints
                    .literals(*cref, kind)
                    .filter(|l| {
                        self.variables.quantifier(l.atom()) == kind.primary_quantifier()
                            && !self.variables.is_assigned(l.atom())
                    })
                    .collect();

                match unassigned_primaries.as_slice() {
                    [] => return false,
                    [single] => {
                        let blocked = self.constraints.literals(*cref, kind).any(|l| {
                            !self.variables.is_assigned(l.atom())
                                && self.variables.quantifier(l.atom())
                                    != kind.primary_quantifier()
                                && self.dependencies.depends_on(single.atom(), l.atom())
                        });
                        if !blocked {
                            // Unit, yet not on any queue.
                            return false;
                        }
                    }
                    _ => {}
                }
            }
        }
        true
    }

    /// True if the trail is consistent with antecedents: every propagated literal's
    /// antecedent contains it (in constraint orientation), and no earlier-assigned
    /// literal of the antecedent disables it.
    pub fn trail_consistent(&self) -> bool {
        for (position, literal) in self.variables.trail().iter().enumerate() {
            let v = literal.atom();
            let antecedent = self.variables.antecedent(v);
            if antecedent == CRef::NONE {
                continue;
            }
            let kind = match self.variables.quantifier(v) {
                crate::structures::atom::Quantifier::Existential => ConstraintKind::Clause,
                crate::structures::atom::Quantifier::Universal => ConstraintKind::Term,
            };

            let constraint_form = *literal ^ kind;
            if !self
                .constraints
                .literals(antecedent, kind)
                .any(|l| l == constraint_form)
            {
                return false;
            }

            for other in self.constraints.literals(antecedent, kind) {
                if other.atom() == v {
                    continue;
                }
                if self.variables.is_assigned(other.atom())
                    && (self.variables.trail_position(other.atom()) as usize) < position
                    && self.disables(other, kind)
                {
                    return false;
                }
            }
        }
        true
    }
}
