/*!
Recovery from a conflict.

A backtrack undoes every decision level above a target, truncating the trail to a
prefix.

Notifications fire in a fixed order: the propagation queue is cleared first, the
heuristic is told the level backtracked from (so overflow queues can promote entries
which remain eligible), and then each freed literal is reported in reverse-trail order
once its value is cleared.
The dependency manager needs no per-literal notification: a watched dependency that
was exhausted is the last-assigned and hence first-unassigned dependency, so watches
restore themselves.
*/

use crate::{context::GenericSolver, db::LevelIndex, misc::log::targets};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Backtracks to the target level.
    /// A target at or above the current level is a no-op.
    pub fn backtrack(&mut self, target: LevelIndex) {
        let level_before = self.variables.decision_level();
        if target >= level_before {
            return;
        }
        log::trace!(target: targets::BACKJUMP, "Backtrack from {level_before} to {target}");

        self.watches.queue.clear();
        self.heuristic
            .notify_backtrack(level_before, &self.variables, &self.dependencies);

        let mut freed = Vec::new();
        self.variables.unassign_to(target, |literal| freed.push(literal));
        for literal in freed {
            self.heuristic
                .notify_unassigned(literal, &self.variables, &self.dependencies);
        }
    }

    /// Clears the trail outright, level-zero assignments included.
    ///
    /// Level-zero consequences are relative to the dependency relation in force when
    /// they were derived.
    /// When an analysis finds such a consequence untenable under the grown relation,
    /// the trail is rebuilt from nothing: the level-zero queues re-propagate, and
    /// assertions blocked by fresh dependencies no longer fire.
    pub fn reset_trail(&mut self) {
        let level_before = self.variables.decision_level();
        log::debug!(target: targets::BACKJUMP, "Trail reset from level {level_before}");

        self.watches.queue.clear();
        self.heuristic
            .notify_backtrack(level_before, &self.variables, &self.dependencies);

        let mut freed = Vec::new();
        self.variables.unassign_all(|literal| freed.push(literal));
        for literal in freed {
            self.heuristic
                .notify_unassigned(literal, &self.variables, &self.dependencies);
        }
        self.counters.trail_resets += 1;
    }
}
