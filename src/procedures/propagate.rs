/*!
Watched-literal propagation over clauses and terms.

# Overview

Propagation enforces the QBF unit rules for both constraint kinds under the current
dependency relation.
Assigned literals queue for propagation; for each, the records of constraints watching
the invalidated literal of each kind are visited and the watchers of each constraint
are repaired, the constraint is found to be unit and its remaining primary is enqueued,
or the constraint is found to be empty and returned as a conflict.

# The two watchers

Positions 0 and 1 of a constraint hold the watched literals.
For every unmarked constraint with two watchers, either watcher

- is a currently-disabling literal, or
- is an unassigned primary, or
- is a blocked secondary dependent on the other watcher.

On addition the first watcher must be an unassigned or disabling primary.
The second may also be a blocked or disabling secondary dependent on the first, and as
a last resort the assigned dependency-covered literal with maximum decision level is
taken, so that backtracking promotes the pair back to validity.
Constraints for which two watchers cannot be established queue aside and propagate
again at decision level zero.

# A correctness subtlety

When the first watcher can be rewatched but the second cannot, the constraint is unit
with the forced literal at position 0, while position 1 may hold a secondary the new
position-0 primary does not depend on.
Before enqueueing, position 1 is swapped with the position the old first watcher moved
to, so the watched pair remains valid after backtracking.

# Initial terms

If the queue drains with no conflict while every variable is assigned, an [initial
term](super::model) is synthesised from the assignment, stored marked, and returned as
a conflict of term kind to drive term learning.
*/

use crate::{
    context::GenericSolver,
    db::CRef,
    misc::log::targets,
    procedures::Conflict,
    structures::{
        constraint::{ConstraintKind, CONSTRAINT_KINDS},
        literal::Literal,
    },
};

/// The outcome of revisiting a constraint without two watchers at level zero.
enum Unwatched {
    /// The constraint is empty.
    Empty,

    /// Two watchers were established; the constraint leaves the queue.
    Watched,

    /// The constraint stays queued (disabled, or unit with its assertion enqueued).
    Kept,
}

/// The outcome of a watcher update.
enum UpdateWatch {
    /// The constraint is empty.
    Empty,

    /// The constraint is intact; true if the visited record is now stale.
    Ok { watcher_changed: bool },
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// True if `literal` is assigned the polarity which disables constraints of
    /// `kind`.
    pub fn disables(&self, literal: Literal, kind: ConstraintKind) -> bool {
        match self.variables.value_of(literal.atom()) {
            None => false,
            Some(value) => (value == literal.polarity()) == kind.disabling_polarity(),
        }
    }

    /// True if some literal of the referenced constraint disables it.
    pub fn constraint_disabled(&self, cref: CRef, kind: ConstraintKind) -> bool {
        self.constraints
            .literals(cref, kind)
            .any(|l| self.disables(l, kind))
    }

    fn is_unassigned_primary(&self, literal: Literal, kind: ConstraintKind) -> bool {
        self.variables.quantifier(literal.atom()) == kind.primary_quantifier()
            && !self.variables.is_assigned(literal.atom())
    }

    fn is_unassigned_or_disabling_primary(&self, literal: Literal, kind: ConstraintKind) -> bool {
        self.variables.quantifier(literal.atom()) == kind.primary_quantifier()
            && (!self.variables.is_assigned(literal.atom()) || self.disables(literal, kind))
    }

    fn is_blocked_secondary(
        &self,
        literal: Literal,
        primary: Literal,
        _kind: ConstraintKind,
    ) -> bool {
        !self.variables.is_assigned(literal.atom())
            && self.dependencies.depends_on(primary.atom(), literal.atom())
    }

    fn is_blocked_or_disabling_secondary(
        &self,
        literal: Literal,
        primary: Literal,
        kind: ConstraintKind,
    ) -> bool {
        if self.variables.quantifier(literal.atom()) == kind.primary_quantifier()
            || !self.dependencies.depends_on(primary.atom(), literal.atom())
        {
            return false;
        }
        if !self.variables.is_assigned(literal.atom()) || self.disables(literal, kind) {
            return true;
        }
        // An assigned, non-disabling secondary still serves while the primary is
        // assigned disablingly at or below its level, as backtracking unassigns the
        // pair in order.
        self.variables.is_assigned(primary.atom())
            && (self.variables.assignment(primary.atom()) == literal.polarity())
                == kind.disabling_polarity()
            && self.variables.decision_level_of(primary.atom())
                <= self.variables.decision_level_of(literal.atom())
    }

    /// The position of a first watcher: an unassigned or disabling primary.
    fn find_first_watcher(&self, cref: CRef, kind: ConstraintKind) -> Option<usize> {
        let size = self.constraints.size(cref, kind);
        (0..size).find(|i| {
            self.is_unassigned_or_disabling_primary(self.constraints.literal(cref, kind, *i), kind)
        })
    }

    /// The position of a second watcher, given the first at position 0.
    ///
    /// Preference goes to an unassigned or disabling primary, or a blocked or
    /// disabling secondary dependent on the first watcher.
    /// Failing both, the assigned dependency-covered literal with maximum decision
    /// level is taken, so the eventual backtrack promotes a valid watcher.
    fn find_second_watcher(&self, cref: CRef, kind: ConstraintKind) -> Option<usize> {
        let size = self.constraints.size(cref, kind);
        let first = self.constraints.literal(cref, kind, 0);

        for i in 1..size {
            let literal = self.constraints.literal(cref, kind, i);
            if self.is_unassigned_or_disabling_primary(literal, kind)
                || self.is_blocked_or_disabling_secondary(literal, first, kind)
            {
                return Some(i);
            }
        }

        let mut fallback: Option<usize> = None;
        for i in 1..size {
            let literal = self.constraints.literal(cref, kind, i);
            let covered = self.variables.quantifier(literal.atom()) == kind.primary_quantifier()
                || self.dependencies.depends_on(first.atom(), literal.atom());
            if covered && self.variables.is_assigned(literal.atom()) {
                let level = self.variables.decision_level_of(literal.atom());
                let better = match fallback {
                    None => true,
                    Some(best) => {
                        level
                            > self
                                .variables
                                .decision_level_of(self.constraints.literal(cref, kind, best).atom())
                    }
                };
                if better {
                    fallback = Some(i);
                }
            }
        }
        fallback
    }

    /// Establishes watchers for a stored constraint and adds it to the watch lists, or
    /// queues it for level-zero propagation.
    pub fn add_constraint_watches(&mut self, cref: CRef, kind: ConstraintKind) {
        match self.find_first_watcher(cref, kind) {
            Some(first) => self.constraints.swap_literals(cref, kind, 0, first),
            None => {
                self.watches.unwatched[kind.index()].push(cref);
                return;
            }
        }
        match self.find_second_watcher(cref, kind) {
            Some(second) => self.constraints.swap_literals(cref, kind, 1, second),
            None => {
                self.watches.unwatched[kind.index()].push(cref);
                return;
            }
        }
        let l0 = self.constraints.literal(cref, kind, 0);
        let l1 = self.constraints.literal(cref, kind, 1);
        self.watches.watch(l0, kind, cref, l1);
        self.watches.watch(l1, kind, cref, l0);
    }

    /// Records an assignment with its antecedent, queueing it for propagation and
    /// notifying the dependency manager and heuristic.
    ///
    /// Returns false if the variable is already assigned the opposite value, in which
    /// case nothing is recorded and the caller holds an empty constraint.
    pub fn enqueue(&mut self, literal: Literal, antecedent: CRef) -> bool {
        if let Some(value) = self.variables.value_of(literal.atom()) {
            return value == literal.polarity();
        }

        if antecedent != CRef::NONE && self.dependencies.learning() {
            let kind = match self.variables.quantifier(literal.atom()) {
                crate::structures::atom::Quantifier::Existential => ConstraintKind::Clause,
                crate::structures::atom::Quantifier::Universal => ConstraintKind::Term,
            };
            self.analysis.reason.clear();
            self.analysis
                .reason
                .extend(self.constraints.literals(antecedent, kind));
            let reason = std::mem::take(&mut self.analysis.reason);
            self.dependencies
                .learn_dependencies(literal.atom(), &reason, &self.variables);
            self.analysis.reason = reason;
        }

        self.variables.assign(literal, antecedent);
        self.counters.propagations += 1;

        let mut eligible = std::mem::take(&mut self.eligible);
        eligible.clear();
        self.dependencies
            .notify_assigned(literal.atom(), &self.variables, &mut eligible);
        self.heuristic.notify_assigned(literal);
        for v in eligible.drain(..) {
            self.heuristic.notify_eligible(v);
        }
        self.eligible = eligible;

        self.watches.queue.push_back(literal);
        true
    }

    /// Drains the propagation queue, returning the first empty constraint found.
    ///
    /// At decision level zero constraints without two watchers are revisited first.
    /// If every variable ends up assigned with no conflict, an initial term is
    /// generated and returned as an empty term.
    pub fn propagate(&mut self) -> Option<Conflict> {
        if self.variables.decision_level() == 0 {
            if let Some(conflict) = self.propagate_unwatched_queues() {
                return Some(conflict);
            }
        }

        while let Some(to_propagate) = self.watches.queue.pop_front() {
            log::trace!(target: targets::PROPAGATION, "Propagating {to_propagate}");
            for kind in CONSTRAINT_KINDS {
                // The literal of the kind invalidated by this assignment.
                let watcher = !(to_propagate ^ kind);

                let records = self.watches.take_list(watcher, kind);
                let mut kept = Vec::with_capacity(records.len());

                for (visited, record) in records.iter().enumerate() {
                    let mut watcher_changed = false;

                    if !self.disables(record.blocker, kind) {
                        let c0 = self.constraints.literal(record.cref, kind, 0);
                        let c1 = self.constraints.literal(record.cref, kind, 1);
                        if c0 == watcher || c1 == watcher {
                            match self.update_watched_literals(record.cref, kind) {
                                UpdateWatch::Empty => {
                                    kept.extend_from_slice(&records[visited..]);
                                    self.watches.restore_list(watcher, kind, kept);
                                    return Some(Conflict {
                                        cref: record.cref,
                                        kind,
                                    });
                                }
                                UpdateWatch::Ok { watcher_changed: c } => watcher_changed = c,
                            }
                        } else {
                            // The constraint moved its watch elsewhere; the record is
                            // stale.
                            watcher_changed = true;
                        }
                    }

                    if !watcher_changed {
                        kept.push(*record);
                    }
                }
                self.watches.restore_list(watcher, kind, kept);
            }
        }

        if self.variables.all_assigned() {
            let term = self.generate_initial_term();
            let cref = self.constraints.add(&term, ConstraintKind::Term, true);
            // Marked immediately, to be removed at the next constraint cleaning.
            self.constraints.mark(cref, ConstraintKind::Term);
            self.counters.initial_terms += 1;
            log::debug!(target: targets::MODEL, "Initial term of {} literals", term.len());
            return Some(Conflict {
                cref,
                kind: ConstraintKind::Term,
            });
        }

        None
    }

    /// Revisits the constraints without two watchers, at decision level zero.
    fn propagate_unwatched_queues(&mut self) -> Option<Conflict> {
        for kind in CONSTRAINT_KINDS {
            let pending = std::mem::take(&mut self.watches.unwatched[kind.index()]);
            let mut kept = Vec::with_capacity(pending.len());
            let mut conflict = None;

            for (visited, cref) in pending.iter().enumerate() {
                match self.propagate_unwatched(*cref, kind) {
                    Unwatched::Watched => {}
                    Unwatched::Kept => kept.push(*cref),
                    Unwatched::Empty => {
                        kept.extend_from_slice(&pending[visited..]);
                        conflict = Some(Conflict { cref: *cref, kind });
                        break;
                    }
                }
            }

            let list = &mut self.watches.unwatched[kind.index()];
            kept.append(list);
            *list = kept;

            if conflict.is_some() {
                return conflict;
            }
        }
        None
    }

    /// Revisits one constraint without two watchers.
    fn propagate_unwatched(&mut self, cref: CRef, kind: ConstraintKind) -> Unwatched {
        let size = self.constraints.size(cref, kind);
        let disabled = self.constraint_disabled(cref, kind);

        let first_is_primary = size > 0
            && self
                .variables
                .quantifier(self.constraints.literal(cref, kind, 0).atom())
                == kind.primary_quantifier();

        if !first_is_primary && !disabled {
            log::trace!(target: targets::PROPAGATION, "Empty {kind} {cref} at level zero");
            return Unwatched::Empty;
        }

        if !disabled {
            // The first watcher is a primary and the constraint is not disabled.
            match self.find_second_watcher(cref, kind) {
                Some(second) => {
                    self.constraints.swap_literals(cref, kind, 1, second);
                    let l0 = self.constraints.literal(cref, kind, 0);
                    let l1 = self.constraints.literal(cref, kind, 1);
                    self.watches.watch(l0, kind, cref, l1);
                    self.watches.watch(l1, kind, cref, l0);
                    Unwatched::Watched
                }
                None => {
                    let forced = self.constraints.literal(cref, kind, 0) ^ kind;
                    match self.enqueue(forced, cref) {
                        true => Unwatched::Kept,
                        false => Unwatched::Empty,
                    }
                }
            }
        } else {
            Unwatched::Kept
        }
    }

    /// Repairs the watchers of a constraint after one was invalidated.
    fn update_watched_literals(&mut self, cref: CRef, kind: ConstraintKind) -> UpdateWatch {
        if self.constraint_disabled(cref, kind) {
            return UpdateWatch::Ok {
                watcher_changed: false,
            };
        }

        let size = self.constraints.size(cref, kind);

        /* If both watchers must be updated it can happen that the first watcher can
        be, but not the second. The old first watcher's position is tracked in
        `old_first` so the watched pair can be restored before a unit assertion; if
        only the second watcher fails the swap below is a no-op. */
        let mut old_first = 1;

        let c0 = self.constraints.literal(cref, kind, 0);
        if self.variables.is_assigned(c0.atom()) {
            let c1 = self.constraints.literal(cref, kind, 1);
            let c1_primary =
                self.variables.quantifier(c1.atom()) == kind.primary_quantifier();

            if !c1_primary || self.variables.is_assigned(c1.atom()) {
                // A fresh unassigned primary must be found for position 0, or the
                // constraint is empty.
                let mut found = false;
                for i in 2..size {
                    let candidate = self.constraints.literal(cref, kind, i);
                    if self.is_unassigned_primary(candidate, kind) {
                        self.constraints.swap_literals(cref, kind, 0, i);
                        old_first = i;
                        let blocker = self.constraints.literal(cref, kind, 1);
                        self.watches.watch(candidate, kind, cref, blocker);
                        found = true;
                        break;
                    }
                }
                if !found {
                    log::trace!(target: targets::PROPAGATION, "Empty {kind} {cref}");
                    return UpdateWatch::Empty;
                }
            } else {
                // The second watcher is an unassigned primary; swap the pair.
                self.constraints.swap_literals(cref, kind, 0, 1);
            }
        }

        // The first watcher is now an unassigned primary; update the second.
        let first = self.constraints.literal(cref, kind, 0);
        for i in 1..size {
            let candidate = self.constraints.literal(cref, kind, i);
            if self.is_unassigned_primary(candidate, kind)
                || self.is_blocked_secondary(candidate, first, kind)
            {
                self.constraints.swap_literals(cref, kind, 1, i);
                let watched = self.constraints.literal(cref, kind, 1);
                self.watches.watch(watched, kind, cref, first);
                return UpdateWatch::Ok {
                    watcher_changed: true,
                };
            }
        }

        // No new second watcher: the constraint is unit. Restore a valid watched pair
        // before asserting.
        self.constraints.swap_literals(cref, kind, 1, old_first);
        let forced = self.constraints.literal(cref, kind, 0) ^ kind;
        log::trace!(target: targets::PROPAGATION, "Unit {kind} {cref} asserts {forced}");
        match self.enqueue(forced, cref) {
            true => UpdateWatch::Ok {
                watcher_changed: false,
            },
            false => UpdateWatch::Empty,
        }
    }
}
