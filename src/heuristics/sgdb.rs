/*!
The SGDB decision heuristic: logistic regression over per-variable features, trained by
stochastic gradient descent.

Each variable carries a weight.
A learning event labels the currently-assigned variables --- 1 for variables of the
learnt constraint, 0 otherwise --- and takes a gradient step with L2 regularisation:

```text
w(v) ← w(v) + lr·((x(v) − σ(w(v))) − λ·w(v))
```

The learning rate decays additively towards a configured minimum.
Decisions take the candidate with the greatest weight, through the same ring-and-heap
plumbing as the reward-learning heuristics.
*/

use rand::Rng;

use crate::{
    db::{dependency::DependencyManager, variable::VariableStore, LevelIndex},
    generic::{index_heap::IndexHeap, ring::Ring},
    structures::{atom::Atom, literal::Literal},
};

use super::phase::HeuristicCommon;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// The SGDB decision heuristic.
pub struct SgdbHeuristic {
    pub common: HeuristicCommon,

    assigned: Ring,
    weights: IndexHeap<f64>,
    member: Vec<bool>,

    learning_rate: f64,
    rate_decay: f64,
    rate_minimum: f64,
    lambda: f64,
}

impl SgdbHeuristic {
    pub fn new(
        common: HeuristicCommon,
        learning_rate: f64,
        rate_decay: f64,
        rate_minimum: f64,
        lambda: f64,
    ) -> Self {
        SgdbHeuristic {
            common,
            assigned: Ring::default(),
            weights: IndexHeap::default(),
            member: vec![false],
            learning_rate,
            rate_decay,
            rate_minimum,
            lambda,
        }
    }

    pub fn add_variable(&mut self, auxiliary: bool, v: Atom) {
        self.common.add_variable(auxiliary);
        self.assigned.grow_to(v as usize);
        self.weights.grow_to(v as usize, 0.0);
        self.member.push(false);
    }

    pub fn notify_start(&mut self, variables: &VariableStore, dependencies: &DependencyManager) {
        for v in 1..=variables.last_variable() {
            if !self.common.is_auxiliary(v) && dependencies.is_decision_candidate(v, variables) {
                self.weights.insert(v as usize);
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
                self.weights.insert(v as usize);
            }
            self.assigned.remove(v);
        }
    }

    pub fn notify_eligible(&mut self, v: Atom) {
        if !self.common.is_auxiliary(v) && !self.weights.contains(v as usize) {
            self.weights.insert(v as usize);
        }
    }

    pub fn notify_learned(&mut self, literals: &[Literal]) {
        for literal in literals {
            self.member[literal.atom() as usize] = true;
        }

        for v in self.assigned.iter() {
            let v = v as usize;
            let weight = *self.weights.key(v);
            let x = if self.member[v] { 1.0 } else { 0.0 };
            let step = self.learning_rate * ((x - sigmoid(weight)) - self.lambda * weight);
            self.weights.revise_key(v, weight + step);
            if self.weights.contains(v) {
                self.weights.update(v);
            }
        }

        for literal in literals {
            self.member[literal.atom() as usize] = false;
        }

        self.learning_rate = (self.learning_rate - self.rate_decay).max(self.rate_minimum);
    }

    pub fn notify_backtrack(&mut self, level_before: LevelIndex) {
        self.common.backtrack_level_before = level_before;
    }

    pub fn choose_variable(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) -> Option<Atom> {
        while let Some(v) = self.weights.peek_best() {
            self.weights.pop_best();
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
