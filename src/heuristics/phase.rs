/*!
Phase selection: saved phases, and the heuristics applied when no phase is saved.

Every assignment saves its phase.
When a variable is decided on, the saved phase is reused unless phase saving is
disabled or no phase has been saved, in which case the configured [phase
heuristic](crate::config::PhaseHeuristicKind) chooses.

A split decision heuristic may keep saved phases for its two decision modes
separately; [PhaseStore] covers both layouts, and a mode toggle is a no-op for the
plain layout.
*/

use rand::Rng;

use crate::{
    config::PhaseHeuristicKind,
    db::{constraint::ConstraintDB, dependency::DependencyManager, variable::VariableStore},
    structures::{
        atom::{Atom, Quantifier},
        constraint::ConstraintKind,
        literal::Literal,
    },
};

use super::DecisionMode;

/// Saved phases, kept per decision mode when split.
pub struct PhaseStore {
    split: bool,
    mode: DecisionMode,
    existential: Vec<Option<bool>>,
    universal: Vec<Option<bool>>,
}

impl PhaseStore {
    /// A store with a single phase per variable.
    pub fn plain() -> Self {
        PhaseStore {
            split: false,
            mode: DecisionMode::Existential,
            existential: vec![None],
            universal: Vec::default(),
        }
    }

    /// A store with a phase per variable per decision mode, starting in `mode`.
    pub fn split(mode: DecisionMode) -> Self {
        PhaseStore {
            split: true,
            mode,
            existential: vec![None],
            universal: vec![None],
        }
    }

    /// Notes a fresh variable.
    pub fn add_variable(&mut self) {
        self.existential.push(None);
        if self.split {
            self.universal.push(None);
        }
    }

    fn current(&self) -> &Vec<Option<bool>> {
        match (self.split, self.mode) {
            (false, _) | (true, DecisionMode::Existential) => &self.existential,
            (true, DecisionMode::Universal) => &self.universal,
        }
    }

    /// True if a phase is saved for `v`, false otherwise.
    pub fn has_phase(&self, v: Atom) -> bool {
        self.current()[v as usize].is_some()
    }

    /// The saved phase of `v`, defaulting to false.
    pub fn phase(&self, v: Atom) -> bool {
        self.current()[v as usize] == Some(true)
    }

    /// Saves `phase` for `v` in the current mode's store.
    pub fn save(&mut self, v: Atom, phase: bool) {
        match (self.split, self.mode) {
            (false, _) | (true, DecisionMode::Existential) => {
                self.existential[v as usize] = Some(phase)
            }
            (true, DecisionMode::Universal) => self.universal[v as usize] = Some(phase),
        }
    }

    /// Follows a decision-mode toggle; a no-op unless split.
    pub fn notify_toggle_mode(&mut self) {
        if self.split {
            self.mode = self.mode.other();
        }
    }
}

/// The phase heuristic, with scores precomputed at solve start.
pub struct PhasePolicy {
    kind: PhaseHeuristicKind,
    jw_true: Vec<f64>,
    jw_false: Vec<f64>,
}

impl PhasePolicy {
    pub fn new(kind: PhaseHeuristicKind) -> Self {
        PhasePolicy {
            kind,
            jw_true: Vec::default(),
            jw_false: Vec::default(),
        }
    }

    /// Precomputes Jeroslow–Wang scores over the input clauses.
    pub fn notify_start(&mut self, variables: &VariableStore, constraints: &ConstraintDB) {
        if self.kind != PhaseHeuristicKind::InvJW {
            return;
        }
        let count = variables.variable_count() + 1;
        self.jw_true = vec![0.0; count];
        self.jw_false = vec![0.0; count];

        for cref in constraints.input_refs(ConstraintKind::Clause) {
            let size = constraints.size(*cref, ConstraintKind::Clause);
            let weight = (2.0_f64).powi(-(size as i32));
            for literal in constraints.literals(*cref, ConstraintKind::Clause) {
                match literal.polarity() {
                    true => self.jw_true[literal.atom() as usize] += weight,
                    false => self.jw_false[literal.atom() as usize] += weight,
                }
            }
        }
    }

    /// Chooses a phase for `v`.
    pub fn choose(
        &self,
        v: Atom,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        rng: &mut impl Rng,
    ) -> bool {
        match self.kind {
            PhaseHeuristicKind::False => false,
            PhaseHeuristicKind::True => true,
            PhaseHeuristicKind::Random => rng.random_bool(0.5),

            // The existential player leans towards satisfying clauses, the universal
            // player away from them.
            PhaseHeuristicKind::InvJW => {
                let towards = self.jw_true[v as usize] >= self.jw_false[v as usize];
                match variables.quantifier(v) {
                    Quantifier::Existential => towards,
                    Quantifier::Universal => !towards,
                }
            }

            PhaseHeuristicKind::QType => {
                matches!(variables.quantifier(v), Quantifier::Existential)
            }

            PhaseHeuristicKind::Watcher => {
                let watcher = dependencies.watcher(v);
                watcher != 0 && variables.value_of(watcher) == Some(true)
            }
        }
    }
}

/// Shared state of every decision heuristic: auxiliary flags, saved phases, and the
/// level noted at the latest backtrack.
pub struct HeuristicCommon {
    pub auxiliary: Vec<bool>,
    pub no_phase_saving: bool,
    pub phases: PhaseStore,
    pub policy: PhasePolicy,
    pub backtrack_level_before: crate::db::LevelIndex,
}

impl HeuristicCommon {
    pub fn new(no_phase_saving: bool, policy: PhasePolicy, phases: PhaseStore) -> Self {
        HeuristicCommon {
            auxiliary: vec![false],
            no_phase_saving,
            phases,
            policy,
            backtrack_level_before: 0,
        }
    }

    pub fn add_variable(&mut self, auxiliary: bool) {
        self.auxiliary.push(auxiliary);
        self.phases.add_variable();
    }

    pub fn is_auxiliary(&self, v: Atom) -> bool {
        self.auxiliary[v as usize]
    }

    /// Saves the phase of an assignment.
    pub fn note_assignment(&mut self, literal: Literal) {
        self.phases.save(literal.atom(), literal.polarity());
    }

    /// The phase to decide `v` with: the saved phase, or the phase heuristic when
    /// phase saving is disabled or no phase is saved.
    pub fn select_phase(
        &mut self,
        v: Atom,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        rng: &mut impl Rng,
    ) -> bool {
        if self.no_phase_saving || !self.phases.has_phase(v) {
            let phase = self.policy.choose(v, variables, dependencies, rng);
            self.phases.save(v, phase);
        }
        self.phases.phase(v)
    }

    /// True if `v` will be a decision candidate once the pending backtrack completes:
    /// its watched dependency is absent, or assigned below the level backtracked from.
    pub fn eligible_after_backtrack(
        &self,
        v: Atom,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> bool {
        let watcher = dependencies.watcher(v);
        watcher == 0
            || (variables.is_assigned(watcher)
                && variables.decision_level_of(watcher) < self.backtrack_level_before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_phases_are_independent() {
        let mut store = PhaseStore::split(DecisionMode::Existential);
        store.add_variable();

        store.save(1, true);
        assert!(store.has_phase(1));
        assert!(store.phase(1));

        store.notify_toggle_mode();
        assert!(!store.has_phase(1));
        store.save(1, false);
        assert!(store.has_phase(1));
        assert!(!store.phase(1));

        store.notify_toggle_mode();
        assert!(store.phase(1));
    }

    #[test]
    fn plain_toggle_is_no_op() {
        let mut store = PhaseStore::plain();
        store.add_variable();
        store.save(1, true);
        store.notify_toggle_mode();
        assert!(store.has_phase(1));
        assert!(store.phase(1));
    }
}
