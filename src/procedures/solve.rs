/*!
The driving loop.

Roughly, per iteration:

```none
          +---------------+
  +-------| make decision |
  |       +---------------+
  |               ⌃
  |               | no conflict, no restart due
  |               |
  ⌄   +-----------+-----+          +--> empty constraint: clause ⇒ false, term ⇒ true
------| propagate       |----------+
  ⌃   +-----------------+          |
  |               |                +--> every variable assigned ⇒ an initial term
  |               | conflict           (analysed like any other empty constraint)
  |               ⌄
  |   +-----------------+
  +---| analyse + jump  |
      +-----------------+
```

Propagation either returns an empty constraint (a falsified clause, a satisfied term,
or the initial term of a total assignment) or exhausts the queue.
An empty constraint is analysed: a terminal (empty) result decides the solve, and an
asserting result backjumps, stores the learnt constraint, and enqueues the asserting
literal with the fresh constraint as its antecedent --- which re-enters propagation.
With no conflict, a due restart unwinds to level zero, and otherwise the heuristic
decides.

The learnt database of either kind is cleaned when its budget is crossed, directly
after the learnt constraint which crossed it is attached.

The only interruption point is the externally set interrupt flag, checked at the top
of each iteration; an interrupted solve reports unknown.
*/

use std::collections::HashSet;

use crate::{
    context::{GenericSolver, SolverState},
    db::CRef,
    misc::log::targets,
    procedures::analysis::AnalysisOutcome,
    reports::Report,
    structures::{atom::Quantifier, constraint::ConstraintKind},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// One-off notifications when a solve begins: model-generation weights, initial
    /// watched dependencies, and heuristic setup.
    fn notify_start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.model.notify_start(&self.variables);
        self.dependencies.notify_start(&self.variables);
        self.heuristic
            .notify_start(&self.variables, &self.dependencies, &self.constraints);
    }

    /// Determines the truth of the formula, unless interrupted.
    pub fn solve(&mut self) -> Report {
        match self.state {
            SolverState::Satisfiable | SolverState::Unsatisfiable => return self.report(),
            SolverState::Input | SolverState::Solving | SolverState::Interrupted => {}
        }
        self.notify_start();
        self.state = SolverState::Solving;

        'solve_loop: loop {
            self.counters.iterations += 1;

            if self.interrupted() {
                self.state = SolverState::Interrupted;
                break 'solve_loop;
            }

            let Some(conflict) = self.propagate() else {
                if self.variables.all_assigned() {
                    // Unreachable while initial terms are generated; kept for the
                    // model-generation-free path.
                    self.state = SolverState::Satisfiable;
                    break 'solve_loop;
                }

                if self.restarts.should_restart() {
                    self.counters.restarts += 1;
                    self.backtrack(0);
                    self.heuristic.notify_restart();
                    continue 'solve_loop;
                }

                match self
                    .heuristic
                    .decide(&self.variables, &self.dependencies, &mut self.rng)
                {
                    None => {
                        self.state = SolverState::Satisfiable;
                        break 'solve_loop;
                    }
                    Some(decision) => {
                        self.counters.decisions += 1;
                        self.variables.push_decision_level();
                        log::trace!(target: targets::DECISION,
                            "Decision {decision} at level {}", self.variables.decision_level());
                        let fresh = self.enqueue(decision, CRef::NONE);
                        debug_assert!(fresh);
                    }
                }
                continue 'solve_loop;
            };

            self.counters.conflicts += 1;

            match self.analyze(conflict) {
                AnalysisOutcome::Terminal => {
                    self.state = match conflict.kind {
                        ConstraintKind::Clause => SolverState::Unsatisfiable,
                        ConstraintKind::Term => SolverState::Satisfiable,
                    };
                    break 'solve_loop;
                }

                AnalysisOutcome::Stuck { level } => {
                    // The resolvent asserts nothing, but is sound: store it, then
                    // resume below the blocking decision.
                    self.backtrack(level);
                    let literals = std::mem::take(&mut self.analysis.literals);
                    let cref = self.constraints.add(&literals, conflict.kind, true);
                    self.analysis.literals = literals;
                    self.add_constraint_watches(cref, conflict.kind);
                    match conflict.kind {
                        ConstraintKind::Clause => self.counters.learnt_clauses += 1,
                        ConstraintKind::Term => self.counters.learnt_terms += 1,
                    }
                }

                AnalysisOutcome::Blocked => {
                    // An assertion on the trail ignored a dependency recorded since.
                    self.reset_trail();
                }

                AnalysisOutcome::Asserting { backjump, lbd } => {
                    self.restarts.notify_learned(lbd);

                    // The heuristic observes the conflicting assignment.
                    let literals = std::mem::take(&mut self.analysis.literals);
                    self.heuristic.notify_learned(
                        &literals,
                        conflict.kind,
                        &self.analysis.conflict_side,
                        lbd,
                        &self.variables,
                    );

                    self.backtrack(backjump);

                    let cref = self.constraints.add(&literals, conflict.kind, true);
                    self.analysis.literals = literals;
                    self.constraints.set_lbd(cref, conflict.kind, lbd);
                    match conflict.kind {
                        ConstraintKind::Clause => self.counters.learnt_clauses += 1,
                        ConstraintKind::Term => self.counters.learnt_terms += 1,
                    }

                    self.add_constraint_watches(cref, conflict.kind);

                    let asserting = self.analysis.literals[0] ^ conflict.kind;
                    let fresh = self.enqueue(asserting, cref);
                    debug_assert!(fresh);

                    if self.constraints.over_budget(conflict.kind) {
                        self.clean_constraints(conflict.kind);
                    }
                }
            }
        }

        log::info!(target: targets::ANALYSIS,
            "Solve finished: {} after {} conflicts, {} decisions, {} restarts",
            self.report(), self.counters.conflicts, self.counters.decisions, self.counters.restarts);
        self.report()
    }

    /// Cleans the learnt database of the kind: marks the least active constraints,
    /// compacts the arena, and rewrites every held reference.
    pub fn clean_constraints(&mut self, kind: ConstraintKind) {
        let mut locked: HashSet<CRef> = HashSet::default();
        for literal in self.variables.trail() {
            let v = literal.atom();
            let of_kind = match self.variables.quantifier(v) {
                Quantifier::Existential => kind == ConstraintKind::Clause,
                Quantifier::Universal => kind == ConstraintKind::Term,
            };
            if of_kind {
                let antecedent = self.variables.antecedent(v);
                if antecedent != CRef::NONE {
                    locked.insert(antecedent);
                }
            }
        }

        self.constraints
            .mark_for_cleaning(kind, |cref| locked.contains(&cref));
        self.constraints.compact(kind, |cref| locked.contains(&cref));

        self.watches.relocate(kind, &self.constraints);

        let mut antecedent_updates = Vec::new();
        for literal in self.variables.trail() {
            let v = literal.atom();
            let of_kind = match self.variables.quantifier(v) {
                Quantifier::Existential => kind == ConstraintKind::Clause,
                Quantifier::Universal => kind == ConstraintKind::Term,
            };
            if of_kind {
                let antecedent = self.variables.antecedent(v);
                if antecedent != CRef::NONE {
                    let fresh = self
                        .constraints
                        .relocated(antecedent, kind)
                        .expect("antecedents survive cleaning");
                    antecedent_updates.push((v, fresh));
                }
            }
        }
        for (v, fresh) in antecedent_updates {
            self.variables.set_antecedent(v, fresh);
        }

        self.constraints.finish_compaction(kind);
    }
}
