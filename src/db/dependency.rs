/*!
The dependency manager: which variables may be decided before which.

Two operating modes are fixed at construction:

- *prefix*: the classical relation, `v` depends on `w` iff `w` precedes `v` in the
  quantifier prefix (internal atom order is prefix order, so this is `w < v`).
- *learning*: the relation starts empty and grows as unit assertions demonstrate
  dependencies, under one of three recording strategies
  ([all / outermost / fewest](crate::config::DependencyStrategy)).

# Watched dependencies

Decision candidacy asks whether every variable a variable depends on from outside is
assigned.
Rather than scanning, each variable watches at most one unassigned variable it depends
on, in the manner of a watched literal: while the watcher is unassigned the question is
settled negatively, and when the watcher is assigned a replacement is sought.
If none is found every dependency is assigned and the variable becomes a decision
candidate, which the [heuristic](crate::heuristics) is told about as an *eligible*
notification.

Backtracking needs no repair: the watcher of a fully-assigned variable was the last of
its dependencies to be assigned, hence the first to be unassigned again, at which point
it resumes its role.
Watch lists use lazy deletion --- entries are dropped when a scan finds the watcher has
moved on.

# Learning

When a literal is enqueued with a reason, the manager is asked to record dependencies
of the forced variable on reason variables of the opposite quantifier.
The recorded relation only grows, and every recorded variable is assigned at recording
time, which preserves the watcher invariant above.
*/

use std::collections::HashSet;

use crate::{
    config::DependencyStrategy,
    db::variable::VariableStore,
    misc::log::targets,
    structures::{atom::Atom, literal::Literal},
};

#[derive(Default)]
struct DependencyRecord {
    /// The watched dependency, 0 if none.
    watcher: Atom,

    /// Resume position for the watcher search.
    watcher_index: u32,

    dependent_on: HashSet<Atom>,
    dependent_on_ordered: Vec<Atom>,
}

/// The dependency manager.
pub struct DependencyManager {
    strategy: DependencyStrategy,
    records: Vec<DependencyRecord>,
    watched_by: Vec<Vec<Atom>>,
    recorded: usize,
}

impl DependencyManager {
    /// A fresh manager operating under `strategy`.
    pub fn new(strategy: DependencyStrategy) -> Self {
        DependencyManager {
            strategy,
            records: vec![DependencyRecord::default()],
            watched_by: vec![Vec::default()],
            recorded: 0,
        }
    }

    /// Notes a fresh variable.
    pub fn add_variable(&mut self) {
        self.records.push(DependencyRecord::default());
        self.watched_by.push(Vec::default());
    }

    /// True if dependencies are learnt rather than read off the prefix.
    pub fn learning(&self) -> bool {
        !matches!(self.strategy, DependencyStrategy::Off)
    }

    /// A count of dependencies recorded so far.
    pub fn recorded_count(&self) -> usize {
        self.recorded
    }

    /// True if `of` depends on `on`.
    pub fn depends_on(&self, of: Atom, on: Atom) -> bool {
        match self.strategy {
            DependencyStrategy::Off => on < of,
            _ => self.records[of as usize].dependent_on.contains(&on),
        }
    }

    /// The watched dependency of `v`, 0 if none.
    pub fn watcher(&self, v: Atom) -> Atom {
        self.records[v as usize].watcher
    }

    /// True if `v` may be decided on: non-auxiliary, unassigned, and with every
    /// dependency settled --- operationally, without an unassigned watched dependency.
    pub fn is_decision_candidate(&self, v: Atom, variables: &VariableStore) -> bool {
        if v == 0 || variables.is_auxiliary(v) || variables.is_assigned(v) {
            return false;
        }
        let watcher = self.records[v as usize].watcher;
        watcher == 0 || variables.is_assigned(watcher)
    }

    /// Establishes initial watched dependencies.
    ///
    /// In prefix mode every variable with an opposite-quantifier variable to its left
    /// watches one; in learning mode the relation is empty and there is nothing to
    /// watch.
    pub fn notify_start(&mut self, variables: &VariableStore) {
        if self.learning() {
            return;
        }
        for v in 1..=variables.last_variable() {
            if let Some(w) = self.find_watched_dependency(v, variables) {
                self.records[v as usize].watcher = w;
                self.watched_by[w as usize].push(v);
            }
        }
    }

    /// Notes the assignment of `v`, moving the watch of every variable watching `v`.
    ///
    /// Variables for which no replacement watch exists have every dependency assigned;
    /// the unassigned ones among them are appended to `eligible` for the heuristic.
    pub fn notify_assigned(
        &mut self,
        v: Atom,
        variables: &VariableStore,
        eligible: &mut Vec<Atom>,
    ) {
        let mut watchers = std::mem::take(&mut self.watched_by[v as usize]);
        watchers.retain(|&of| {
            if self.records[of as usize].watcher != v {
                // A stale entry from lazy deletion.
                return false;
            }
            match self.find_watched_dependency(of, variables) {
                Some(w) => {
                    self.records[of as usize].watcher = w;
                    self.watched_by[w as usize].push(of);
                    false
                }
                None => {
                    // Every dependency of `of` is assigned; v stays the watcher so the
                    // first unassignment among them restores the watch.
                    if !variables.is_assigned(of) && !variables.is_auxiliary(of) {
                        eligible.push(of);
                    }
                    true
                }
            }
        });
        debug_assert!(self.watched_by[v as usize].is_empty());
        self.watched_by[v as usize] = watchers;
    }

    /// Records that `of` depends on `on`, if not already recorded.
    pub fn add_dependency(&mut self, of: Atom, on: Atom, variables: &VariableStore) {
        debug_assert!(self.learning());
        let record = &mut self.records[of as usize];
        if !record.dependent_on.insert(on) {
            return;
        }
        record.dependent_on_ordered.push(on);
        self.recorded += 1;
        log::trace!(target: targets::DEPENDENCIES, "{of} depends on {on}");

        // Keep the watcher invariant: an unassigned dependency is watched while one
        // exists.
        let watcher = record.watcher;
        if !variables.is_assigned(on) && (watcher == 0 || variables.is_assigned(watcher)) {
            record.watcher = on;
            record.watcher_index = (record.dependent_on_ordered.len() - 1) as u32;
            self.watched_by[on as usize].push(of);
        }
    }

    /// Records dependencies of `unit_v` on the variables of its reason, per the
    /// configured strategy.
    pub fn learn_dependencies(
        &mut self,
        unit_v: Atom,
        reason: &[Literal],
        variables: &VariableStore,
    ) {
        let opposite = variables.quantifier(unit_v).other();
        match self.strategy {
            DependencyStrategy::Off => {}

            DependencyStrategy::All => {
                for literal in reason {
                    let w = literal.atom();
                    if variables.quantifier(w) == opposite {
                        self.add_dependency(unit_v, w, variables);
                    }
                }
            }

            DependencyStrategy::Outermost => {
                let outermost = reason
                    .iter()
                    .map(|l| l.atom())
                    .filter(|w| variables.quantifier(*w) == opposite)
                    .min();
                if let Some(w) = outermost {
                    self.add_dependency(unit_v, w, variables);
                }
            }

            DependencyStrategy::Fewest => {
                let fewest = reason
                    .iter()
                    .map(|l| l.atom())
                    .filter(|w| variables.quantifier(*w) == opposite)
                    .min_by_key(|w| self.records[*w as usize].dependent_on.len());
                if let Some(w) = fewest {
                    self.add_dependency(unit_v, w, variables);
                }
            }
        }
    }

    /// An unassigned dependency of `v` to watch, resuming the scan where it last
    /// stopped.
    fn find_watched_dependency(&mut self, v: Atom, variables: &VariableStore) -> Option<Atom> {
        let record = &mut self.records[v as usize];
        match self.strategy {
            DependencyStrategy::Off => {
                // The implicit dependencies are the opposite-quantifier variables to
                // the left of v.
                if v == 1 {
                    return None;
                }
                let opposite = variables.quantifier(v).other();
                let span = v - 1;
                let start = record.watcher_index % span;
                for k in 0..span {
                    let w = 1 + ((start + k) % span);
                    if variables.quantifier(w) == opposite && !variables.is_assigned(w) {
                        record.watcher_index = w - 1;
                        return Some(w);
                    }
                }
                None
            }

            _ => {
                let ordered = &record.dependent_on_ordered;
                if ordered.is_empty() {
                    return None;
                }
                let span = ordered.len() as u32;
                let start = record.watcher_index % span;
                for k in 0..span {
                    let index = (start + k) % span;
                    let w = ordered[index as usize];
                    if !variables.is_assigned(w) {
                        record.watcher_index = index;
                        return Some(w);
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::CRef, structures::atom::Quantifier};

    fn store(quantifiers: &[Quantifier]) -> VariableStore {
        let mut variables = VariableStore::default();
        for q in quantifiers {
            variables.add_variable(*q, false, String::default());
        }
        variables
    }

    #[test]
    fn prefix_candidacy() {
        use Quantifier::{Existential, Universal};
        let mut variables = store(&[Universal, Existential, Universal]);
        let mut deps = DependencyManager::new(DependencyStrategy::Off);
        for _ in 0..3 {
            deps.add_variable();
        }
        deps.notify_start(&variables);

        // 1 leads the prefix, 2 waits on 1, 3 waits on 2.
        assert!(deps.is_decision_candidate(1, &variables));
        assert!(!deps.is_decision_candidate(2, &variables));
        assert!(!deps.is_decision_candidate(3, &variables));

        variables.assign(Literal::new(1, true), CRef::NONE);
        let mut eligible = Vec::new();
        deps.notify_assigned(1, &variables, &mut eligible);
        assert_eq!(eligible, vec![2]);
        assert!(deps.is_decision_candidate(2, &variables));
        assert!(!deps.is_decision_candidate(3, &variables));
    }

    #[test]
    fn learnt_relation_grows() {
        use Quantifier::{Existential, Universal};
        let mut variables = store(&[Universal, Existential]);
        let mut deps = DependencyManager::new(DependencyStrategy::All);
        deps.add_variable();
        deps.add_variable();
        deps.notify_start(&variables);

        // Without recorded dependencies everything is a candidate.
        assert!(deps.is_decision_candidate(2, &variables));

        variables.assign(Literal::new(1, false), CRef::NONE);
        let reason = [Literal::new(1, true), Literal::new(2, true)];
        deps.learn_dependencies(2, &reason, &variables);

        assert!(deps.depends_on(2, 1));
        assert!(!deps.depends_on(1, 2));
        assert_eq!(deps.recorded_count(), 1);

        // Recording again is no growth.
        deps.learn_dependencies(2, &reason, &variables);
        assert_eq!(deps.recorded_count(), 1);
    }
}
