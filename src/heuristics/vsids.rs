/*!
VSIDS decision heuristics.

Each variable carries a floating activity, and unassigned candidates sit on a max-heap
keyed on activity.
On learning, the assigned variables of the learnt constraint (and, if configured, the
conflict-side literals) are bumped; the pending bump then inflates by the inverse decay,
and all activities rescale by 1e-60 once any exceeds 1e60.

Ties between equally active variables may be broken by literal occurrence counts,
preferring more or fewer primary or secondary occurrences as configured.

The split variant keeps two independent activity states, one per decision mode, and
toggles the active one after a configured number of restarts.
*/

use rand::Rng;

use crate::{
    config::{Activity, VsidsTiebreak},
    db::{
        constraint::ConstraintDB, dependency::DependencyManager, variable::VariableStore,
        LevelIndex,
    },
    generic::index_heap::IndexHeap,
    structures::{
        atom::{Atom, Quantifier},
        constraint::ConstraintKind,
        literal::Literal,
    },
};

use super::{phase::HeuristicCommon, DecisionMode};

const RESCALE_LIMIT: Activity = 1e60;
const RESCALE_FACTOR: Activity = 1e-60;

/// A heap key: activity first, then the occurrence tiebreak.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct VsidsKey {
    activity: Activity,
    occurrences: f64,
}

/// One VSIDS decision state: the keyed heap and the pending bump.
pub struct VsidsState {
    heap: IndexHeap<VsidsKey>,
    score_increment: Activity,
}

impl VsidsState {
    fn new(score_increment: Activity) -> Self {
        VsidsState {
            heap: IndexHeap::default(),
            score_increment,
        }
    }

    fn add_variable(&mut self, v: Atom) {
        self.heap.grow_to(v as usize, VsidsKey::default());
    }

    fn note_occurrences(&mut self, v: Atom, occurrences: f64) {
        let key = VsidsKey {
            activity: self.heap.key(v as usize).activity,
            occurrences,
        };
        self.heap.revise_key(v as usize, key);
    }

    fn insert(&mut self, v: Atom) {
        self.heap.insert(v as usize);
    }

    fn bump(&mut self, v: Atom) {
        let mut key = *self.heap.key(v as usize);
        key.activity += self.score_increment;
        self.heap.revise_key(v as usize, key);
        self.heap.update(v as usize);

        if key.activity > RESCALE_LIMIT {
            self.heap.apply_to_keys(|key| VsidsKey {
                activity: key.activity * RESCALE_FACTOR,
                occurrences: key.occurrences,
            });
            self.score_increment *= RESCALE_FACTOR;
        }
    }

    fn decay(&mut self, factor: Activity) {
        self.score_increment *= 1.0 / factor;
    }

    fn choose(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> Option<Atom> {
        while let Some(v) = self.heap.peek_best() {
            self.heap.pop_best();
            if dependencies.is_decision_candidate(v as Atom, variables) {
                return Some(v as Atom);
            }
        }
        None
    }
}

/// Occurrence counts for the configured tiebreak, signed so that larger is preferred.
fn tiebreak_occurrences(
    tiebreak: VsidsTiebreak,
    variables: &VariableStore,
    constraints: &ConstraintDB,
    v: Atom,
) -> f64 {
    let (secondary, fewer) = match tiebreak {
        VsidsTiebreak::Arbitrary => return 0.0,
        VsidsTiebreak::MorePrimary => (false, false),
        VsidsTiebreak::FewerPrimary => (false, true),
        VsidsTiebreak::MoreSecondary => (true, false),
        VsidsTiebreak::FewerSecondary => (true, true),
    };

    // Existentials are primary in clauses and secondary in terms; universals the
    // other way around.
    let kind = match (variables.quantifier(v), secondary) {
        (Quantifier::Existential, false) | (Quantifier::Universal, true) => ConstraintKind::Clause,
        (Quantifier::Existential, true) | (Quantifier::Universal, false) => ConstraintKind::Term,
    };

    let mut count = 0;
    for cref in constraints.input_refs(kind) {
        if constraints.literals(*cref, kind).any(|l| l.atom() == v) {
            count += 1;
        }
    }

    match fewer {
        true => -(count as f64),
        false => count as f64,
    }
}

/// The VSIDS decision heuristic.
pub struct VsidsHeuristic {
    pub common: HeuristicCommon,
    state: VsidsState,
    decay: Activity,
    tiebreak: VsidsTiebreak,
    bump_conflict_side: bool,
}

impl VsidsHeuristic {
    pub fn new(
        common: HeuristicCommon,
        score_increment: Activity,
        decay: Activity,
        tiebreak: VsidsTiebreak,
        bump_conflict_side: bool,
    ) -> Self {
        VsidsHeuristic {
            common,
            state: VsidsState::new(score_increment),
            decay,
            tiebreak,
            bump_conflict_side,
        }
    }

    pub fn add_variable(&mut self, auxiliary: bool, v: Atom) {
        self.common.add_variable(auxiliary);
        self.state.add_variable(v);
    }

    pub fn notify_start(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        constraints: &ConstraintDB,
    ) {
        for v in 1..=variables.last_variable() {
            if !self.common.is_auxiliary(v) {
                let occurrences = tiebreak_occurrences(self.tiebreak, variables, constraints, v);
                self.state.note_occurrences(v, occurrences);
                if dependencies.is_decision_candidate(v, variables) {
                    self.state.insert(v);
                }
            }
        }
    }

    pub fn notify_assigned(&mut self, literal: Literal) {
        self.common.note_assignment(literal);
    }

    pub fn notify_unassigned(
        &mut self,
        literal: Literal,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        let v = literal.atom();
        if !self.common.is_auxiliary(v)
            && self
                .common
                .eligible_after_backtrack(v, variables, dependencies)
        {
            self.state.insert(v);
        }
    }

    pub fn notify_eligible(&mut self, v: Atom) {
        if !self.common.is_auxiliary(v) {
            self.state.insert(v);
        }
    }

    pub fn notify_learned(
        &mut self,
        literals: &[Literal],
        conflict_side: &[Literal],
        variables: &VariableStore,
    ) {
        for literal in literals {
            let v = literal.atom();
            if variables.is_assigned(v) && !self.common.is_auxiliary(v) {
                self.state.bump(v);
            }
        }
        if self.bump_conflict_side {
            for literal in conflict_side {
                let v = literal.atom();
                if variables.is_assigned(v) && !self.common.is_auxiliary(v) {
                    self.state.bump(v);
                }
            }
        }
        self.state.decay(self.decay);
    }

    pub fn notify_backtrack(&mut self, level_before: LevelIndex) {
        self.common.backtrack_level_before = level_before;
    }

    pub fn choose_variable(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> Option<Atom> {
        self.state.choose(variables, dependencies)
    }

    pub fn select_phase(
        &mut self,
        v: Atom,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        rng: &mut impl Rng,
    ) -> bool {
        self.common.select_phase(v, variables, dependencies, rng)
    }
}

/// The split VSIDS decision heuristic: one activity state per decision mode.
pub struct SplitVsidsHeuristic {
    pub common: HeuristicCommon,
    existential: VsidsState,
    universal: VsidsState,
    mode: DecisionMode,
    mode_cycles: u32,
    cycle_counter: u32,
    always_bump: bool,
    decay: Activity,
    tiebreak: VsidsTiebreak,
}

impl SplitVsidsHeuristic {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        common: HeuristicCommon,
        mode: DecisionMode,
        mode_cycles: u32,
        score_increment: Activity,
        decay: Activity,
        always_bump: bool,
        tiebreak: VsidsTiebreak,
    ) -> Self {
        SplitVsidsHeuristic {
            common,
            existential: VsidsState::new(score_increment),
            universal: VsidsState::new(score_increment),
            mode,
            mode_cycles,
            cycle_counter: 0,
            always_bump,
            decay,
            tiebreak,
        }
    }

    fn current(&mut self) -> &mut VsidsState {
        match self.mode {
            DecisionMode::Existential => &mut self.existential,
            DecisionMode::Universal => &mut self.universal,
        }
    }

    pub fn add_variable(&mut self, auxiliary: bool, v: Atom) {
        self.common.add_variable(auxiliary);
        self.existential.add_variable(v);
        self.universal.add_variable(v);
    }

    pub fn notify_start(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        constraints: &ConstraintDB,
    ) {
        for v in 1..=variables.last_variable() {
            if !self.common.is_auxiliary(v) {
                let occurrences = tiebreak_occurrences(self.tiebreak, variables, constraints, v);
                self.existential.note_occurrences(v, occurrences);
                self.universal.note_occurrences(v, occurrences);
                if dependencies.is_decision_candidate(v, variables) {
                    self.existential.insert(v);
                    self.universal.insert(v);
                }
            }
        }
    }

    pub fn notify_assigned(&mut self, literal: Literal) {
        self.common.note_assignment(literal);
    }

    pub fn notify_unassigned(
        &mut self,
        literal: Literal,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        let v = literal.atom();
        if !self.common.is_auxiliary(v)
            && self
                .common
                .eligible_after_backtrack(v, variables, dependencies)
        {
            // Both queues receive the variable; redundant copies fall out when a
            // decision literal is requested.
            self.existential.insert(v);
            self.universal.insert(v);
        }
    }

    pub fn notify_eligible(&mut self, v: Atom) {
        if !self.common.is_auxiliary(v) {
            self.existential.insert(v);
            self.universal.insert(v);
        }
    }

    pub fn notify_learned(
        &mut self,
        literals: &[Literal],
        kind: ConstraintKind,
        variables: &VariableStore,
    ) {
        let decay = self.decay;
        let bump_into = |state: &mut VsidsState, common: &HeuristicCommon| {
            for literal in literals {
                let v = literal.atom();
                if variables.is_assigned(v) && !common.is_auxiliary(v) {
                    state.bump(v);
                }
            }
            state.decay(decay);
        };

        if self.always_bump {
            let state = match kind {
                ConstraintKind::Term => &mut self.existential,
                ConstraintKind::Clause => &mut self.universal,
            };
            bump_into(state, &self.common);
        } else if self.mode.learns_on(kind) {
            let state = match self.mode {
                DecisionMode::Existential => &mut self.existential,
                DecisionMode::Universal => &mut self.universal,
            };
            bump_into(state, &self.common);
        }
    }

    pub fn notify_backtrack(&mut self, level_before: LevelIndex) {
        self.common.backtrack_level_before = level_before;
    }

    pub fn notify_restart(&mut self) {
        self.cycle_counter += 1;
        if self.cycle_counter >= self.mode_cycles {
            self.cycle_counter = 0;
            self.mode = self.mode.other();
            self.common.phases.notify_toggle_mode();
        }
    }

    pub fn choose_variable(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> Option<Atom> {
        self.current().choose(variables, dependencies)
    }

    pub fn select_phase(
        &mut self,
        v: Atom,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        rng: &mut impl Rng,
    ) -> bool {
        self.common.select_phase(v, variables, dependencies, rng)
    }
}
