/*!
A database of constraint related things.

The database exclusively owns constraint storage, one packed [arena] per constraint
kind.
Constraints are distinguished by kind (clause or term) and by source (input or learnt),
and referenced by [CRef]s which remain stable until a [compaction](ConstraintDB::compact)
rewrites all live handles.

# Cleaning

The learnt database of each kind carries a budget.
When the learnt count crosses the budget the driver runs a cleaning: learnt constraints
are sorted by activity and the least active fraction is marked, subject to never marking
a constraint with small lbd and never deleting a constraint which serves as the
antecedent of an assigned variable.
Compaction then moves the survivors to a fresh arena, and each subsystem holding
references rewrites them through [relocated](ConstraintDB::relocated) before the old
arena is dropped.
*/

pub mod arena;

use arena::Arena;

use crate::{
    config::{Activity, ConstraintDBConfig, Lbd},
    db::CRef,
    misc::log::targets,
    structures::{constraint::ConstraintKind, literal::Literal},
};

const RESCALE_LIMIT: f32 = 1e30;
const RESCALE_FACTOR: f32 = 1e-30;

/// A database of constraint related things.
pub struct ConstraintDB {
    config: ConstraintDBConfig,

    arena: [Arena; 2],
    retired: [Option<Arena>; 2],

    input: [Vec<CRef>; 2],
    learnt: [Vec<CRef>; 2],

    bump: [Activity; 2],
    limit: [usize; 2],

    cleanings: [usize; 2],
}

impl ConstraintDB {
    /// A fresh database with local configuration derived from `config`.
    pub fn new(config: &ConstraintDBConfig) -> Self {
        ConstraintDB {
            limit: [
                config.initial_clause_limit.value as usize,
                config.initial_term_limit.value as usize,
            ],
            config: config.clone(),

            arena: [Arena::default(), Arena::default()],
            retired: [None, None],

            input: [Vec::default(), Vec::default()],
            learnt: [Vec::default(), Vec::default()],

            bump: [1.0, 1.0],
            cleanings: [0, 0],
        }
    }

    /// Stores a constraint, returning a reference to it.
    pub fn add(&mut self, literals: &[Literal], kind: ConstraintKind, learnt: bool) -> CRef {
        let cref = CRef(self.arena[kind.index()].alloc(literals, learnt));
        if learnt {
            self.learnt[kind.index()].push(cref);
        } else {
            self.input[kind.index()].push(cref);
        }
        cref
    }

    /// The literal count of the referenced constraint.
    pub fn size(&self, cref: CRef, kind: ConstraintKind) -> usize {
        self.arena[kind.index()].size(cref.0)
    }

    /// The `index`th literal of the referenced constraint.
    ///
    /// Positions 0 and 1 are the watched literals of a constraint with two watchers.
    pub fn literal(&self, cref: CRef, kind: ConstraintKind, index: usize) -> Literal {
        self.arena[kind.index()].literal(cref.0, index)
    }

    /// The literals of the referenced constraint.
    pub fn literals(
        &self,
        cref: CRef,
        kind: ConstraintKind,
    ) -> impl Iterator<Item = Literal> + '_ {
        self.arena[kind.index()].literals(cref.0)
    }

    /// Swaps two literals of the referenced constraint.
    pub fn swap_literals(&mut self, cref: CRef, kind: ConstraintKind, i: usize, j: usize) {
        self.arena[kind.index()].swap_literals(cref.0, i, j);
    }

    /// True if the referenced constraint is marked for deletion, false otherwise.
    pub fn is_marked(&self, cref: CRef, kind: ConstraintKind) -> bool {
        self.arena[kind.index()].is_marked(cref.0)
    }

    /// Marks the referenced constraint for deletion at the next cleaning.
    pub fn mark(&mut self, cref: CRef, kind: ConstraintKind) {
        self.arena[kind.index()].mark(cref.0);
    }

    /// The lbd noted for the referenced constraint.
    pub fn lbd(&self, cref: CRef, kind: ConstraintKind) -> Lbd {
        self.arena[kind.index()].lbd(cref.0)
    }

    /// Notes the lbd of the referenced constraint.
    pub fn set_lbd(&mut self, cref: CRef, kind: ConstraintKind, lbd: Lbd) {
        self.arena[kind.index()].set_lbd(cref.0, lbd);
    }

    /// Bumps the activity of the referenced constraint, rescaling all activities of the
    /// kind if the bump overflows the rescale limit.
    pub fn bump_activity(&mut self, cref: CRef, kind: ConstraintKind) {
        let arena = &mut self.arena[kind.index()];
        let bumped = arena.activity(cref.0) + self.bump[kind.index()] as f32;
        arena.set_activity(cref.0, bumped);

        if bumped > RESCALE_LIMIT {
            for learnt in &self.learnt[kind.index()] {
                let scaled = arena.activity(learnt.0) * RESCALE_FACTOR;
                arena.set_activity(learnt.0, scaled);
            }
            self.bump[kind.index()] *= RESCALE_FACTOR as Activity;
        }
    }

    /// Decays activities of the kind by inflating the pending bump.
    pub fn decay_activities(&mut self, kind: ConstraintKind) {
        self.bump[kind.index()] *= 1.0 / self.config.decay.value;
    }

    /// References to the input constraints of the kind.
    pub fn input_refs(&self, kind: ConstraintKind) -> &[CRef] {
        &self.input[kind.index()]
    }

    /// References to the learnt constraints of the kind.
    pub fn learnt_refs(&self, kind: ConstraintKind) -> &[CRef] {
        &self.learnt[kind.index()]
    }

    /// A count of learnt constraints of the kind.
    pub fn learnt_count(&self, kind: ConstraintKind) -> usize {
        self.learnt[kind.index()].len()
    }

    /// A count of cleanings of the kind.
    pub fn cleaning_count(&self, kind: ConstraintKind) -> usize {
        self.cleanings[kind.index()]
    }

    /// True if the learnt count of the kind has crossed the current budget.
    pub fn over_budget(&self, kind: ConstraintKind) -> bool {
        self.learnt[kind.index()].len() >= self.limit[kind.index()]
    }

    /// Marks the least active learnt constraints of the kind for deletion.
    ///
    /// `locked` guards constraints which serve as the antecedent of an assigned
    /// variable; these are never marked, and survive compaction even if already marked
    /// (an initial term is created marked, and may be an antecedent).
    pub fn mark_for_cleaning(&mut self, kind: ConstraintKind, locked: impl Fn(CRef) -> bool) {
        let arena = &mut self.arena[kind.index()];
        let lbd_bound = self.config.lbd_bound.value;

        let mut candidates: Vec<CRef> = self.learnt[kind.index()].clone();
        candidates.sort_by(|a, b| {
            arena
                .activity(a.0)
                .partial_cmp(&arena.activity(b.0))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let ratio = match kind {
            ConstraintKind::Clause => self.config.clause_removal_ratio.value,
            ConstraintKind::Term => self.config.term_removal_ratio.value,
        };

        let mut marked = 0;
        if self.config.use_activity_threshold.value {
            let threshold =
                (self.bump[kind.index()] / candidates.len().max(1) as Activity) as f32;
            for cref in candidates {
                if arena.activity(cref.0) < threshold
                    && arena.lbd(cref.0) > lbd_bound
                    && !locked(cref)
                {
                    arena.mark(cref.0);
                    marked += 1;
                }
            }
        } else {
            let target = (ratio * candidates.len() as f64) as usize;
            for cref in candidates {
                if marked >= target {
                    break;
                }
                if arena.is_marked(cref.0) || arena.lbd(cref.0) > lbd_bound || locked(cref) {
                    continue;
                }
                arena.mark(cref.0);
                marked += 1;
            }
        }
        log::debug!(target: targets::CONSTRAINT_DB, "Marked {marked} {kind}s for deletion");
    }

    /// Moves surviving constraints of the kind to a fresh arena, leaving forwarding
    /// notes behind for [relocated](ConstraintDB::relocated).
    ///
    /// Until [finish_compaction](ConstraintDB::finish_compaction) every subsystem
    /// holding references must rewrite them.
    pub fn compact(&mut self, kind: ConstraintKind, locked: impl Fn(CRef) -> bool) {
        let mut fresh = Arena::default();
        let arena = &mut self.arena[kind.index()];

        for cref in self.input[kind.index()].iter_mut() {
            *cref = CRef(arena.relocate_into(cref.0, &mut fresh));
        }

        let mut survivors = Vec::with_capacity(self.learnt[kind.index()].len());
        for cref in self.learnt[kind.index()].drain(..) {
            if !arena.is_marked(cref.0) || locked(cref) {
                survivors.push(CRef(arena.relocate_into(cref.0, &mut fresh)));
            }
        }
        self.learnt[kind.index()] = survivors;

        self.retired[kind.index()] = Some(std::mem::replace(arena, fresh));
        self.cleanings[kind.index()] += 1;
        self.limit[kind.index()] += match kind {
            ConstraintKind::Clause => self.config.clause_increment.value,
            ConstraintKind::Term => self.config.term_increment.value,
        } as usize;

        log::info!(target: targets::CONSTRAINT_DB,
            "Cleaned {kind} database, {} learnt remain, budget {}",
            self.learnt[kind.index()].len(), self.limit[kind.index()]);
    }

    /// The fresh reference of a constraint which survived the pending compaction, if
    /// it did.
    ///
    /// Meaningful only between [compact](ConstraintDB::compact) and
    /// [finish_compaction](ConstraintDB::finish_compaction).
    pub fn relocated(&self, cref: CRef, kind: ConstraintKind) -> Option<CRef> {
        let retired = self.retired[kind.index()].as_ref()?;
        retired.forward(cref.0).map(CRef)
    }

    /// Drops the retired arena of the kind, ending the compaction window.
    pub fn finish_compaction(&mut self, kind: ConstraintKind) {
        self.retired[kind.index()] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(ints: &[i64]) -> Vec<Literal> {
        ints.iter().map(|i| Literal::from_int(*i)).collect()
    }

    #[test]
    fn storage_round() {
        let mut db = ConstraintDB::new(&ConstraintDBConfig::default());
        let a = db.add(&lits(&[1, -2, 3]), ConstraintKind::Clause, false);
        let b = db.add(&lits(&[2, 4]), ConstraintKind::Term, true);

        assert_eq!(db.size(a, ConstraintKind::Clause), 3);
        assert_eq!(db.literal(a, ConstraintKind::Clause, 1), Literal::from_int(-2));
        assert_eq!(db.learnt_count(ConstraintKind::Term), 1);
        assert_eq!(db.input_refs(ConstraintKind::Clause), &[a]);
        assert_eq!(db.learnt_refs(ConstraintKind::Term), &[b]);
    }

    #[test]
    fn cleaning_respects_lbd_and_locks() {
        let mut config = ConstraintDBConfig::default();
        config.clause_removal_ratio.value = 1.0;
        let mut db = ConstraintDB::new(&config);

        let keep_lbd = db.add(&lits(&[1, 2, 3]), ConstraintKind::Clause, true);
        db.set_lbd(keep_lbd, ConstraintKind::Clause, 2);

        let keep_lock = db.add(&lits(&[1, 2, 4]), ConstraintKind::Clause, true);
        db.set_lbd(keep_lock, ConstraintKind::Clause, 5);

        let drop_me = db.add(&lits(&[1, 2, 5]), ConstraintKind::Clause, true);
        db.set_lbd(drop_me, ConstraintKind::Clause, 5);

        db.mark_for_cleaning(ConstraintKind::Clause, |cref| cref == keep_lock);

        assert!(!db.is_marked(keep_lbd, ConstraintKind::Clause));
        assert!(!db.is_marked(keep_lock, ConstraintKind::Clause));
        assert!(db.is_marked(drop_me, ConstraintKind::Clause));
    }

    #[test]
    fn compaction_forwards_survivors() {
        let mut db = ConstraintDB::new(&ConstraintDBConfig::default());
        let input = db.add(&lits(&[1, 2]), ConstraintKind::Clause, false);
        let survivor = db.add(&lits(&[1, 3]), ConstraintKind::Clause, true);
        let casualty = db.add(&lits(&[1, 4]), ConstraintKind::Clause, true);
        db.mark(casualty, ConstraintKind::Clause);

        db.compact(ConstraintKind::Clause, |_| false);

        let input_fresh = db.relocated(input, ConstraintKind::Clause).unwrap();
        let survivor_fresh = db.relocated(survivor, ConstraintKind::Clause).unwrap();
        assert_eq!(db.relocated(casualty, ConstraintKind::Clause), None);

        assert_eq!(
            db.literal(survivor_fresh, ConstraintKind::Clause, 1),
            Literal::from_int(3)
        );
        assert_eq!(db.input_refs(ConstraintKind::Clause), &[input_fresh]);
        assert_eq!(db.learnt_refs(ConstraintKind::Clause), &[survivor_fresh]);

        db.finish_compaction(ConstraintKind::Clause);
        assert_eq!(db.learnt_count(ConstraintKind::Clause), 1);
    }
}
