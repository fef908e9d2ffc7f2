/*!
Constraint learning, symmetric for clauses and terms.

# Overview

Analysis starts from an empty constraint --- a falsified clause or a satisfied term ---
and resolves antecedents off the trail, first-UIP style, until the resolvent asserts a
literal at some earlier level.

Per iteration:

1. *Reduce*: remove each secondary literal no primary of the constraint depends on.
2. If the constraint is empty, the solve is decided (empty clause: false; empty term:
   true).
3. If the constraint is *asserting* --- a unique primary at the maximal primary
   decision level, every other literal effective below that level --- stop, with the
   asserting literal at position 0.
4. Otherwise resolve on the primary assigned latest: its antecedent contains the
   complementary literal, and the remainder merges in.

Merging may introduce a literal whose complement is already present.
For a secondary literal the pivot does not depend on, the pair is kept (long-distance
resolution; the merged variable is inner to the pivot).
A merge over a variable the pivot *does* depend on is illegal --- reducing such a pair
would turn a tautology into the empty constraint --- and arises only when an earlier
assertion ignored a dependency recorded since.
The analysis is then abandoned and the trail rebuilt from nothing, so propagation under
the grown relation no longer makes the untenable assertion.
A primary pair cannot arise, as every primary of an empty-or-resolvent constraint is
assigned to the non-disabling polarity.

# Asserting constraints

A constraint asserts `e` at backjump level `b` when backtracking to `b` leaves `e` the
single unassigned primary with no unassigned secondary `e` depends on: every other
primary and every blocked secondary must be assigned strictly below `e`'s level, and
`b` is the maximum of their levels.
A long-distance pair over a variable `e` depends on blocks assertion; resolution
continues past it, or abandons the analysis (see below).

# Stuck analyses

With learnt dependencies the pivot can be a decision while the constraint is not
asserting (an unassigned blocked secondary).
The analysis then gives up asserting and reports a chronological backtrack below the
pivot's level; the resolvent is sound and is stored, though it asserts nothing.

# Reductions and the partial certificate

The literals removed by reduction are recorded, and on a terminal (empty) result kept
aside: restricted to the outermost quantifier block they witness the winning player's
moves, from which the partial certificate is read.
*/

use crate::{
    config::Lbd,
    context::GenericSolver,
    db::{CRef, LevelIndex},
    misc::log::targets,
    procedures::Conflict,
    structures::{
        atom::{Atom, Quantifier},
        constraint::ConstraintKind,
        literal::Literal,
    },
};

/// Working storage of the learning engine.
#[derive(Default)]
pub struct AnalysisBuffer {
    /// Literal-indexed membership flags for the resolvent.
    member: Vec<bool>,

    /// The literals of the resolvent.
    pub literals: Vec<Literal>,

    /// Pivot literals resolved away, reported to the heuristic.
    pub conflict_side: Vec<Literal>,

    /// Literals removed by reduction during the running analysis.
    reduced: Vec<Literal>,

    /// The reductions of the terminal analysis.
    last_reduced: Vec<Literal>,

    /// Scratch space for reason literals.
    pub reason: Vec<Literal>,

    /// Scratch space for the primary atoms of the resolvent.
    primaries: Vec<Atom>,

    /// Scratch space for lbd computation.
    levels: Vec<LevelIndex>,
}

impl AnalysisBuffer {
    /// Notes a fresh variable.
    pub fn add_variable(&mut self) {
        self.member.push(false);
        self.member.push(false);
    }

    fn insert(&mut self, literal: Literal) {
        if !self.member[literal.index()] {
            self.member[literal.index()] = true;
            self.literals.push(literal);
        }
    }

    fn remove_at(&mut self, index: usize) -> Literal {
        let literal = self.literals.swap_remove(index);
        self.member[literal.index()] = false;
        literal
    }

    fn contains(&self, literal: Literal) -> bool {
        self.member[literal.index()]
    }

    fn clear(&mut self) {
        for literal in self.literals.drain(..) {
            self.member[literal.index()] = false;
        }
        self.conflict_side.clear();
        self.reduced.clear();
    }
}

/// The result of an analysis.
pub enum AnalysisOutcome {
    /// The empty constraint was derived; the solve is decided by the conflict's kind.
    Terminal,

    /// An asserting constraint was derived, held in the analysis buffer with the
    /// asserting literal at position 0.
    Asserting { backjump: LevelIndex, lbd: Lbd },

    /// The analysis reached a decision without an asserting constraint; the resolvent
    /// (in the buffer) is sound but asserts nothing, and the search backtracks
    /// chronologically to the reported level.
    Stuck { level: LevelIndex },

    /// A resolution step would merge complementary literals over a variable the pivot
    /// depends on; the trail must be rebuilt under the grown dependency relation.
    Blocked,
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Analyses an empty constraint, deriving a new constraint by resolution.
    pub fn analyze(&mut self, conflict: Conflict) -> AnalysisOutcome {
        let kind = conflict.kind;
        log::debug!(target: targets::ANALYSIS,
            "Analysis of {} {} at level {}", kind, conflict.cref, self.variables.decision_level());

        self.analysis.clear();
        let mut seed = std::mem::take(&mut self.analysis.reason);
        seed.clear();
        seed.extend(self.constraints.literals(conflict.cref, kind));
        for literal in seed.drain(..) {
            self.analysis.insert(literal);
        }
        self.analysis.reason = seed;

        self.constraints.bump_activity(conflict.cref, kind);

        loop {
            self.reduce(kind);

            if self.analysis.literals.is_empty() {
                self.analysis.last_reduced = self.analysis.reduced.clone();
                log::debug!(target: targets::ANALYSIS, "Derived the empty {kind}");
                self.constraints.decay_activities(kind);
                return AnalysisOutcome::Terminal;
            }

            if let Some((index, backjump)) = self.asserting_point(kind) {
                self.analysis.literals.swap(0, index);
                let lbd = self.resolvent_lbd();
                self.constraints.decay_activities(kind);
                return AnalysisOutcome::Asserting { backjump, lbd };
            }

            // The pivot: the primary assigned latest on the trail.
            let pivot_index = self
                .analysis
                .literals
                .iter()
                .enumerate()
                .filter(|(_, l)| {
                    self.variables.quantifier(l.atom()) == kind.primary_quantifier()
                })
                .max_by_key(|(_, l)| self.variables.trail_position(l.atom()))
                .map(|(i, _)| i);

            // Reduction leaves no secondary without a primary, so a nonempty
            // constraint holds a primary.
            let pivot_index = match pivot_index {
                Some(index) => index,
                None => {
                    self.analysis.last_reduced = self.analysis.reduced.clone();
                    return AnalysisOutcome::Terminal;
                }
            };

            let pivot = self.analysis.literals[pivot_index];
            let antecedent = self.variables.antecedent(pivot.atom());

            if antecedent == CRef::NONE {
                // The pivot is a decision; nothing further to resolve with.
                self.counters.stuck_analyses += 1;
                let level = self.variables.decision_level_of(pivot.atom());
                log::debug!(target: targets::ANALYSIS, "Stuck on decision {pivot}, backtracking below {level}");
                self.constraints.decay_activities(kind);
                return AnalysisOutcome::Stuck {
                    level: level.saturating_sub(1),
                };
            }

            self.analysis.remove_at(pivot_index);
            self.analysis.conflict_side.push(pivot);
            self.constraints.bump_activity(antecedent, kind);

            let mut reason = std::mem::take(&mut self.analysis.reason);
            reason.clear();
            reason.extend(self.constraints.literals(antecedent, kind));
            let mut blocked = false;
            for literal in reason.drain(..) {
                if literal == !pivot {
                    continue;
                }
                if self.analysis.contains(!literal)
                    && self.dependencies.depends_on(pivot.atom(), literal.atom())
                {
                    // The merged variable is a dependency of the pivot: the pivot was
                    // asserted before the relation recorded it.
                    blocked = true;
                    break;
                }
                debug_assert!(
                    self.variables.quantifier(literal.atom()) != kind.primary_quantifier()
                        || !self.analysis.contains(!literal)
                );
                self.analysis.insert(literal);
            }
            self.analysis.reason = reason;

            if blocked {
                self.counters.stuck_analyses += 1;
                log::debug!(target: targets::ANALYSIS,
                    "Resolution blocked on a dependency of {pivot}; the trail is rebuilt");
                self.constraints.decay_activities(kind);
                return AnalysisOutcome::Blocked;
            }
        }
    }

    /// Removes each secondary literal no primary of the resolvent depends on.
    fn reduce(&mut self, kind: ConstraintKind) {
        let mut primaries = std::mem::take(&mut self.analysis.primaries);
        primaries.clear();
        primaries.extend(
            self.analysis
                .literals
                .iter()
                .filter(|l| self.variables.quantifier(l.atom()) == kind.primary_quantifier())
                .map(|l| l.atom()),
        );

        let mut index = 0;
        while index < self.analysis.literals.len() {
            let literal = self.analysis.literals[index];
            if self.variables.quantifier(literal.atom()) != kind.primary_quantifier()
                && !primaries
                    .iter()
                    .any(|p| self.dependencies.depends_on(*p, literal.atom()))
            {
                self.analysis.remove_at(index);
                self.analysis.reduced.push(literal);
                log::trace!(target: targets::REDUCTION, "Reduced {literal}");
                continue;
            }
            index += 1;
        }

        self.analysis.primaries = primaries;
    }

    /// The position of the asserting literal and the backjump level, if the resolvent
    /// is asserting.
    fn asserting_point(&self, kind: ConstraintKind) -> Option<(usize, LevelIndex)> {
        let primary = kind.primary_quantifier();

        // The unique primary at the maximal primary level.
        let mut asserting: Option<(usize, LevelIndex)> = None;
        let mut tied = false;
        for (index, literal) in self.analysis.literals.iter().enumerate() {
            if self.variables.quantifier(literal.atom()) != primary {
                continue;
            }
            let level = self.variables.decision_level_of(literal.atom());
            match asserting {
                None => asserting = Some((index, level)),
                Some((_, best)) if level > best => {
                    asserting = Some((index, level));
                    tied = false;
                }
                Some((_, best)) if level == best => tied = true,
                Some(_) => {}
            }
        }
        let (e_index, e_level) = asserting?;
        if tied || e_level == 0 {
            return None;
        }
        let e_atom = self.analysis.literals[e_index].atom();

        let mut backjump = 0;
        for (index, literal) in self.analysis.literals.iter().enumerate() {
            if index == e_index {
                continue;
            }
            let v = literal.atom();
            if self.variables.quantifier(v) == primary {
                backjump = backjump.max(self.variables.decision_level_of(v));
            } else if self.dependencies.depends_on(e_atom, v) {
                // A secondary the asserting variable depends on must be settled
                // strictly below the asserting level.
                if !self.variables.is_assigned(v) || self.analysis.contains(!*literal) {
                    return None;
                }
                let level = self.variables.decision_level_of(v);
                if level >= e_level {
                    return None;
                }
                backjump = backjump.max(level);
            }
        }

        Some((e_index, backjump))
    }

    /// The number of distinct decision levels among the assigned literals of the
    /// resolvent.
    fn resolvent_lbd(&mut self) -> Lbd {
        let mut levels = std::mem::take(&mut self.analysis.levels);
        levels.clear();
        levels.extend(
            self.analysis
                .literals
                .iter()
                .filter(|l| self.variables.is_assigned(l.atom()))
                .map(|l| self.variables.decision_level_of(l.atom())),
        );
        levels.sort_unstable();
        levels.dedup();
        let lbd = levels.len().min(Lbd::MAX as usize) as Lbd;
        self.analysis.levels = levels;
        lbd
    }

    /// The assignment of the outermost quantifier block read off the terminal
    /// analysis, if one has happened.
    ///
    /// The literals reduced from the final resolvent, restricted to the outermost
    /// block, witness the winning player's moves: as recorded for terms, complemented
    /// for clauses (the universal player falsifies).
    pub fn partial_certificate(&self) -> Option<Vec<Literal>> {
        let last = self.variables.last_variable();
        if last == 0 {
            return None;
        }
        let kind = match self.state {
            crate::context::SolverState::Satisfiable => ConstraintKind::Term,
            crate::context::SolverState::Unsatisfiable => ConstraintKind::Clause,
            _ => return None,
        };

        let block_quantifier = self.variables.quantifier(1);
        let mut block_end = 1;
        while block_end < last && self.variables.quantifier(block_end + 1) == block_quantifier {
            block_end += 1;
        }

        // The certificate concerns the winning player's block.
        let winner = match kind {
            ConstraintKind::Term => Quantifier::Existential,
            ConstraintKind::Clause => Quantifier::Universal,
        };
        if block_quantifier != winner {
            return None;
        }

        let mut assignment: Vec<Option<bool>> = vec![None; block_end as usize + 1];
        for literal in &self.analysis.last_reduced {
            let v = literal.atom();
            if v <= block_end && !self.variables.is_auxiliary(v) {
                let polarity = match kind {
                    ConstraintKind::Term => literal.polarity(),
                    ConstraintKind::Clause => !literal.polarity(),
                };
                assignment[v as usize] = Some(polarity);
            }
        }

        Some(
            (1..=block_end)
                .filter_map(|v| assignment[v as usize].map(|polarity| Literal::new(v, polarity)))
                .collect(),
        )
    }
}
