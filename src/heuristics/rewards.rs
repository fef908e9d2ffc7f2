/*!
Reward-learning decision heuristics (CQB and EMAB).

A [ring](crate::generic::ring) tracks the currently-assigned candidate variables, and a
max-heap keyed on a per-variable quality score selects decisions.

Each learning event assigns each currently-assigned variable a reward:

- *CQB*: a constant keyed on the learnt constraint's LBD --- 4 for LBD 2, 2 for LBD 3
  or 4, and 1 otherwise --- for every assigned variable.
- *EMAB*: 1 for variables appearing in the learnt constraint, 0 otherwise.

Quality then updates by exponential moving average, `q ← (1−α)·q + α·reward`, and the
heap is refreshed.
*/

use rand::Rng;

use crate::{
    config::Lbd,
    db::{dependency::DependencyManager, variable::VariableStore, LevelIndex},
    generic::{index_heap::IndexHeap, ring::Ring},
    structures::{atom::Atom, literal::Literal},
};

use super::phase::HeuristicCommon;

/// Weight of a fresh reward in the quality average.
const STEP_SIZE: f64 = 0.2;

/// The reward rules.
pub enum RewardRule {
    /// A constant keyed on the learnt constraint's LBD, for every assigned variable.
    ConstraintQuality,

    /// 1 for variables of the learnt constraint, 0 otherwise.
    Membership,
}

/// A reward-learning decision heuristic.
pub struct RewardHeuristic {
    pub common: HeuristicCommon,
    rule: RewardRule,

    /// The currently-assigned candidate variables.
    assigned: Ring,

    /// Learnt quality of all variables; the best candidate is selected this way.
    quality: IndexHeap<f64>,

    /// Pending rewards, reset after each learning event.
    reward: Vec<f64>,
}

impl RewardHeuristic {
    pub fn new(common: HeuristicCommon, rule: RewardRule) -> Self {
        RewardHeuristic {
            common,
            rule,
            assigned: Ring::default(),
            quality: IndexHeap::default(),
            reward: vec![0.0],
        }
    }

    pub fn add_variable(&mut self, auxiliary: bool, v: Atom) {
        self.common.add_variable(auxiliary);
        self.assigned.grow_to(v as usize);
        self.quality.grow_to(v as usize, 0.0);
        self.reward.push(0.0);
    }

    pub fn notify_start(&mut self, variables: &VariableStore, dependencies: &DependencyManager) {
        for v in 1..=variables.last_variable() {
            if !self.common.is_auxiliary(v) && dependencies.is_decision_candidate(v, variables) {
                self.quality.insert(v as usize);
            }
        }
    }

    pub fn notify_assigned(&mut self, literal: Literal) {
        let v = literal.atom();
        self.common.note_assignment(literal);
        if !self.common.is_auxiliary(v) {
            self.assigned.insert(v);
        }
    }

    pub fn notify_unassigned(
        &mut self,
        literal: Literal,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        let v = literal.atom();
        if !self.common.is_auxiliary(v) {
            if self
                .common
                .eligible_after_backtrack(v, variables, dependencies)
            {
                self.quality.insert(v as usize);
            }
            self.assigned.remove(v);
        }
    }

    pub fn notify_eligible(&mut self, v: Atom) {
        if !self.common.is_auxiliary(v) {
            if !self.quality.contains(v as usize) {
                self.quality.insert(v as usize);
            } else {
                self.quality.update(v as usize);
            }
        }
    }

    pub fn notify_learned(&mut self, literals: &[Literal], lbd: Lbd) {
        match self.rule {
            RewardRule::ConstraintQuality => {
                let reward = match lbd {
                    2 => 4.0,
                    3 | 4 => 2.0,
                    _ => 1.0,
                };
                for v in self.assigned.iter() {
                    self.reward[v as usize] = reward;
                }
            }

            RewardRule::Membership => {
                for literal in literals {
                    self.reward[literal.atom() as usize] = 1.0;
                }
            }
        }
        self.finalize_reward_cycle();
    }

    /// Folds pending rewards of assigned variables into quality and resets them.
    fn finalize_reward_cycle(&mut self) {
        for v in self.assigned.iter() {
            let v = v as usize;
            let quality = (1.0 - STEP_SIZE) * self.quality.key(v) + STEP_SIZE * self.reward[v];
            self.quality.revise_key(v, quality);
            if self.quality.contains(v) {
                self.quality.update(v);
            } else {
                self.quality.insert(v);
            }
            self.reward[v] = 0.0;
        }
    }

    pub fn notify_backtrack(&mut self, level_before: LevelIndex) {
        self.common.backtrack_level_before = level_before;
    }

    pub fn choose_variable(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> Option<Atom> {
        while let Some(v) = self.quality.peek_best() {
            self.quality.pop_best();
            if dependencies.is_decision_candidate(v as Atom, variables) {
                return Some(v as Atom);
            }
        }
        None
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
