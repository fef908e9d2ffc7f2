/*!
Initial-term generation.

When propagation leaves every variable assigned with no conflict, the assignment
satisfies the matrix, and a term witnessing the satisfaction is synthesised to drive
term learning.
The term selects, for each input clause, a literal disabling it under the assignment.

Three strategies:

- *off*: the term is the full assignment.
- *simple*: per clause, prefer a disabling existential, else any disabling literal.
- *weighted*: a greedy weighted hitting set.
  Variables are bucketed by how many still-uncovered clauses their true literal
  disables, scaled by a weight `w(v) = 1 + s·c(v)^e (+ p if universal)` where the cost
  `c(v)` counts universals to the right for existentials and existentials to the left
  for universals.
  The variable maximising covered-per-weight is taken repeatedly until every clause is
  covered.
  Variables of the final existential block are skipped outright, as their literals
  would be removed by reduction anyway.

Weights are distributed once, when the solve starts.
*/

use std::collections::HashSet;

use crate::{
    config::{ModelGenConfig, ModelGenerationKind},
    context::GenericSolver,
    db::{variable::VariableStore, CRef},
    structures::{
        atom::{Atom, Quantifier},
        constraint::ConstraintKind,
        literal::Literal,
    },
};

/// Initial-term generation state: the strategy and the variable weights.
pub struct ModelGeneration {
    strategy: ModelGenerationKind,
    exponent: f64,
    scaling_factor: f64,
    universal_penalty: f64,

    /// Weights indexed by variable, with a dummy at index 0; assigned up to the last
    /// universal.
    weights: Vec<f64>,

    last_universal: Atom,
}

impl ModelGeneration {
    pub fn from_config(config: &ModelGenConfig) -> Self {
        ModelGeneration {
            strategy: config.strategy,
            exponent: config.exponent.value,
            scaling_factor: config.scaling_factor.value,
            universal_penalty: config.universal_penalty.value,
            weights: Vec::default(),
            last_universal: 0,
        }
    }

    /// Distributes variable weights.
    ///
    /// Weights are only assigned up to the last universal, as the final existential
    /// block (if any) has no use for them.
    pub fn notify_start(&mut self, variables: &VariableStore) {
        self.last_universal = (1..=variables.last_variable())
            .filter(|v| variables.quantifier(*v) == Quantifier::Universal)
            .max()
            .unwrap_or(0);

        self.weights.clear();
        self.weights.push(1.0);

        if self.strategy != ModelGenerationKind::Weighted {
            return;
        }

        /* The cost of an existential is based on the number of universals to its
        right, so negative counts are pushed first and the total is added afterwards.
        The existential count is offset by one to avoid a division by zero when a
        single universal block precedes a final existential one. */
        let mut seen = [1u32, 0u32];
        let mut costs: Vec<i64> = vec![1];
        for v in 1..=self.last_universal {
            match variables.quantifier(v) {
                Quantifier::Existential => {
                    costs.push(-(seen[1] as i64));
                    seen[0] += 1;
                }
                Quantifier::Universal => {
                    costs.push(seen[0] as i64);
                    seen[1] += 1;
                }
            }
        }
        for v in 1..=self.last_universal {
            if variables.quantifier(v) == Quantifier::Existential {
                costs[v as usize] += seen[1] as i64;
            }
        }

        for v in 1..=self.last_universal {
            let quantifier = variables.quantifier(v);
            let opposite_count = match quantifier {
                Quantifier::Existential => seen[1],
                Quantifier::Universal => seen[0],
            };
            let cost = costs[v as usize] as f64 / opposite_count as f64;
            let penalty = match quantifier {
                Quantifier::Universal => self.universal_penalty,
                Quantifier::Existential => 0.0,
            };
            self.weights
                .push(self.scaling_factor * cost.powf(self.exponent) + 1.0 + penalty);
        }
    }

    fn weight(&self, v: Atom) -> f64 {
        self.weights[v as usize]
    }
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Synthesises an initial term from the current (total) assignment.
    pub fn generate_initial_term(&mut self) -> Vec<Literal> {
        match self.model.strategy {
            ModelGenerationKind::Off => self.variables.trail().to_vec(),
            ModelGenerationKind::Simple => self.generate_term_simple(),
            ModelGenerationKind::Weighted => self.generate_term_hitting_set(),
        }
    }

    /// Per input clause, prefer a disabling existential literal, else any disabling
    /// literal.
    fn generate_term_simple(&mut self) -> Vec<Literal> {
        let mut characteristic =
            vec![false; 2 * self.variables.variable_count() + 2];

        for cref in self.constraints.input_refs(ConstraintKind::Clause) {
            let mut disabling = None;
            for literal in self.constraints.literals(*cref, ConstraintKind::Clause) {
                if self.disables(literal, ConstraintKind::Clause) {
                    if self.variables.quantifier(literal.atom()) == Quantifier::Existential {
                        disabling = Some(literal);
                        break;
                    }
                    if disabling.is_none() {
                        disabling = Some(literal);
                    }
                }
            }
            // Every clause is disabled: the assignment is total and conflict-free.
            if let Some(literal) = disabling {
                characteristic[literal.index()] = true;
            }
        }

        (0..characteristic.len())
            .filter(|i| characteristic[*i])
            .map(Literal::from_index)
            .collect()
    }

    /// Greedy weighted hitting set over disabling literals.
    fn generate_term_hitting_set(&mut self) -> Vec<Literal> {
        let last_universal = self.model.last_universal;
        let mut term = Vec::new();

        // occurrences[v] holds the input clauses whose cover currently falls to the
        // true literal of v. Clauses already covered by a final-block existential are
        // skipped outright.
        let mut occurrences: Vec<HashSet<CRef>> =
            vec![HashSet::default(); last_universal as usize + 1];
        let mut true_variables = Vec::new();
        for cref in self.constraints.input_refs(ConstraintKind::Clause) {
            let mut already_covered = false;
            for literal in self.constraints.literals(*cref, ConstraintKind::Clause) {
                if self.disables(literal, ConstraintKind::Clause) {
                    if literal.atom() > last_universal {
                        already_covered = true;
                        break;
                    }
                    true_variables.push(literal.atom());
                }
            }
            if !already_covered {
                for v in &true_variables {
                    occurrences[*v as usize].insert(*cref);
                }
            }
            true_variables.clear();
        }

        let bucket_of = |occurrences: &Vec<HashSet<CRef>>, model: &ModelGeneration, v: Atom| {
            (occurrences[v as usize].len() as f64 / model.weight(v)) as usize
        };

        let mut max_occurrences: i64 = -1;
        for v in 1..=last_universal {
            let scaled = bucket_of(&occurrences, &self.model, v) as i64;
            if scaled > max_occurrences {
                max_occurrences = scaled;
            }
        }

        // Buckets of variables by scaled cover count: an efficiently updatable sorted
        // list. position[v] is the index of v within its bucket; affected[v] notes v
        // awaits re-bucketing.
        let mut buckets: Vec<Vec<Atom>> = vec![Vec::default(); (max_occurrences + 1).max(1) as usize];
        let mut position = vec![0usize; last_universal as usize + 1];
        let mut is_affected = vec![false; last_universal as usize + 1];

        for v in 1..=last_universal {
            if !occurrences[v as usize].is_empty() {
                let bucket = &mut buckets[bucket_of(&occurrences, &self.model, v)];
                position[v as usize] = bucket.len();
                bucket.push(v);
            }
        }

        let mut affected: Vec<Atom> = Vec::new();
        while max_occurrences >= 0 {
            let current = match buckets[max_occurrences as usize].pop() {
                Some(v) => v,
                None => {
                    max_occurrences -= 1;
                    continue;
                }
            };

            term.push(Literal::new(current, self.variables.assignment(current)));

            let covered = std::mem::take(&mut occurrences[current as usize]);
            for cref in &covered {
                for literal in self.constraints.literals(*cref, ConstraintKind::Clause) {
                    let v = literal.atom();
                    if v == current
                        || v > last_universal
                        || !self.disables(literal, ConstraintKind::Clause)
                        || !occurrences[v as usize].contains(cref)
                    {
                        continue;
                    }
                    if !is_affected[v as usize] {
                        // Unlink v from its current bucket; it re-buckets below once
                        // every covered clause has been removed from its set.
                        is_affected[v as usize] = true;
                        affected.push(v);

                        let bucket = &mut buckets[bucket_of(&occurrences, &self.model, v)];
                        let slot = position[v as usize];
                        let last = *bucket.last().unwrap();
                        position[last as usize] = slot;
                        bucket[slot] = last;
                        bucket.pop();
                    }
                    occurrences[v as usize].remove(cref);
                }
            }

            for v in affected.drain(..) {
                is_affected[v as usize] = false;
                if !occurrences[v as usize].is_empty() {
                    let bucket = &mut buckets[bucket_of(&occurrences, &self.model, v)];
                    position[v as usize] = bucket.len();
                    bucket.push(v);
                }
            }

            while max_occurrences >= 0 && buckets[max_occurrences as usize].is_empty() {
                max_occurrences -= 1;
            }
        }

        term
    }
}
