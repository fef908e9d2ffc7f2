/*!
Watch lists and the propagation queue.

Per constraint kind, each literal carries a list of [WatchRecord]s for the constraints
watching it.
A record pairs the constraint reference with a *blocker*: the other watched literal at
the time the record was made.
While the blocker disables the constraint the record can be skipped without touching
the constraint at all.

Constraints for which two watchers could not be established queue in the per-kind
`unwatched` lists and are propagated again at decision level zero.

The propagation queue holds assigned literals whose consequences are yet to be
explored, drained first-in first-out.
*/

use std::collections::VecDeque;

use crate::{
    db::{constraint::ConstraintDB, CRef},
    structures::{
        constraint::{ConstraintKind, CONSTRAINT_KINDS},
        literal::Literal,
    },
};

/// A watch on a literal: the watching constraint, and a blocker to avoid accessing it.
#[derive(Clone, Copy)]
pub struct WatchRecord {
    /// The watching constraint.
    pub cref: CRef,

    /// The other watched literal at the time the record was made.
    pub blocker: Literal,
}

impl WatchRecord {
    pub fn new(cref: CRef, blocker: Literal) -> Self {
        WatchRecord { cref, blocker }
    }
}

/// Watch lists, unwatched-constraint queues, and the propagation queue.
#[derive(Default)]
pub struct Watches {
    /// Records of watching constraints, per kind, indexed by literal.
    watched_by: [Vec<Vec<WatchRecord>>; 2],

    /// Constraints without two watchers, per kind, to propagate at level zero.
    pub unwatched: [Vec<CRef>; 2],

    /// Assigned literals whose consequences are yet to be explored.
    pub queue: VecDeque<Literal>,
}

impl Watches {
    /// Notes a fresh variable, adding entries for both its literals.
    pub fn add_variable(&mut self) {
        for kind in CONSTRAINT_KINDS {
            self.watched_by[kind.index()].push(Vec::default());
            self.watched_by[kind.index()].push(Vec::default());
        }
    }

    /// Notes `constraint` as watching `literal`, with the given blocker.
    pub fn watch(
        &mut self,
        literal: Literal,
        kind: ConstraintKind,
        constraint: CRef,
        blocker: Literal,
    ) {
        self.watched_by[kind.index()][literal.index()].push(WatchRecord::new(constraint, blocker));
    }

    /// Takes the records watching `literal`, for a propagation sweep.
    /// The sweep returns the retained records via [restore_list](Watches::restore_list).
    pub fn take_list(&mut self, literal: Literal, kind: ConstraintKind) -> Vec<WatchRecord> {
        std::mem::take(&mut self.watched_by[kind.index()][literal.index()])
    }

    /// Restores `records` as the list for `literal`, keeping any records added while
    /// the list was taken.
    pub fn restore_list(
        &mut self,
        literal: Literal,
        kind: ConstraintKind,
        mut records: Vec<WatchRecord>,
    ) {
        let list = &mut self.watched_by[kind.index()][literal.index()];
        records.append(list);
        *list = records;
    }

    /// The records watching `literal`.
    pub fn list(&self, literal: Literal, kind: ConstraintKind) -> &[WatchRecord] {
        &self.watched_by[kind.index()][literal.index()]
    }

    /// Rewrites every held reference of the kind through the pending compaction,
    /// dropping records and queue entries of constraints which did not survive.
    pub fn relocate(&mut self, kind: ConstraintKind, db: &ConstraintDB) {
        for list in self.watched_by[kind.index()].iter_mut() {
            list.retain_mut(|record| match db.relocated(record.cref, kind) {
                Some(fresh) => {
                    record.cref = fresh;
                    true
                }
                None => false,
            });
        }

        self.unwatched[kind.index()].retain_mut(|cref| match db.relocated(*cref, kind) {
            Some(fresh) => {
                *cref = fresh;
                true
            }
            None => false,
        });
    }
}
