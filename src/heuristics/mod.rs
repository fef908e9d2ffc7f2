/*!
Decision heuristics.

All heuristics share a notification surface --- assignment, unassignment, eligibility,
learning, backtrack, restart --- and produce decision literals on request.
Dispatch is over the [DecisionHeuristic] enum of concrete heuristics, avoiding any
deep hierarchy.

Decision variables are filtered by the [dependency
manager's](crate::db::dependency::DependencyManager) candidacy test.
Under dependency learning decisions are unrestricted in principle, so if a heuristic's
own queue runs dry while unassigned variables remain (possible when the learnt relation
admits no watched-dependency candidate), the dispatch falls back to the outermost
unassigned non-auxiliary variable.

Phase selection is shared: the saved phase, unless phase saving is disabled or no phase
was saved, in which case the configured [phase
heuristic](crate::config::PhaseHeuristicKind) applies.
*/

pub mod phase;
pub mod rewards;
pub mod sgdb;
pub mod vmtf;
pub mod vsids;

use rand::Rng;

use crate::{
    config::{Config, DecisionHeuristicKind, DependencyStrategy, Lbd},
    db::{
        constraint::ConstraintDB, dependency::DependencyManager, variable::VariableStore,
        LevelIndex,
    },
    misc::log::targets,
    structures::{atom::Atom, constraint::ConstraintKind, literal::Literal},
};

use phase::{HeuristicCommon, PhasePolicy, PhaseStore};
use rewards::{RewardHeuristic, RewardRule};
use sgdb::SgdbHeuristic;
use vmtf::{SplitVmtfHeuristic, VmtfHeuristic, VmtfOrdering};
use vsids::{SplitVsidsHeuristic, VsidsHeuristic};

/// The decision mode of a split heuristic.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum DecisionMode {
    /// Prioritising the existential player; learning happens on terms.
    Existential,

    /// Prioritising the universal player; learning happens on clauses.
    Universal,
}

impl DecisionMode {
    /// The other mode.
    pub fn other(self) -> Self {
        match self {
            Self::Existential => Self::Universal,
            Self::Universal => Self::Existential,
        }
    }

    /// True if constraints of `kind` are learnt on in this mode.
    pub fn learns_on(self, kind: ConstraintKind) -> bool {
        match self {
            Self::Existential => kind == ConstraintKind::Term,
            Self::Universal => kind == ConstraintKind::Clause,
        }
    }
}

/// A tagged union of the concrete decision heuristics.
pub enum DecisionHeuristic {
    Vmtf(VmtfHeuristic),
    SplitVmtf(SplitVmtfHeuristic),
    Vsids(VsidsHeuristic),
    SplitVsids(SplitVsidsHeuristic),
    Reward(RewardHeuristic),
    Sgdb(SgdbHeuristic),
}

impl DecisionHeuristic {
    /// Builds the heuristic selected by `config`.
    ///
    /// With dependency learning disabled the VMTF prefix specialisation is used
    /// regardless of the configured kind; [Config::validate] rejects other
    /// combinations up front.
    pub fn from_config(config: &Config) -> Self {
        let heuristic = &config.heuristic;
        let policy = PhasePolicy::new(heuristic.phase);
        let start_mode = match heuristic.start_univ_mode.value {
            true => DecisionMode::Universal,
            false => DecisionMode::Existential,
        };
        let split_kind = matches!(
            heuristic.decision,
            DecisionHeuristicKind::SplitVmtf | DecisionHeuristicKind::SplitVsids
        );
        let phases = match split_kind && heuristic.split_phase_saving.value {
            true => PhaseStore::split(start_mode),
            false => PhaseStore::plain(),
        };
        let common = HeuristicCommon::new(!heuristic.phase_saving, policy, phases);

        if matches!(config.dependencies.strategy, DependencyStrategy::Off) {
            return DecisionHeuristic::Vmtf(VmtfHeuristic::new(common, VmtfOrdering::Static));
        }

        match heuristic.decision {
            DecisionHeuristicKind::Vmtf => {
                DecisionHeuristic::Vmtf(VmtfHeuristic::new(common, VmtfOrdering::Arbitrary))
            }

            DecisionHeuristicKind::VmtfOrder => {
                DecisionHeuristic::Vmtf(VmtfHeuristic::new(common, VmtfOrdering::ByPrefix))
            }

            DecisionHeuristicKind::SplitVmtf => DecisionHeuristic::SplitVmtf(
                SplitVmtfHeuristic::new(
                    common,
                    start_mode,
                    heuristic.mode_cycles.value,
                    heuristic.always_move.value,
                    heuristic.move_by_prefix.value,
                ),
            ),

            DecisionHeuristicKind::Vsids => DecisionHeuristic::Vsids(VsidsHeuristic::new(
                common,
                heuristic.score_increment.value,
                heuristic.score_decay.value,
                heuristic.tiebreak,
                heuristic.bump_conflict_side.value,
            )),

            DecisionHeuristicKind::SplitVsids => DecisionHeuristic::SplitVsids(
                SplitVsidsHeuristic::new(
                    common,
                    start_mode,
                    heuristic.mode_cycles.value,
                    heuristic.score_increment.value,
                    heuristic.score_decay.value,
                    heuristic.always_bump.value,
                    heuristic.tiebreak,
                ),
            ),

            DecisionHeuristicKind::Cqb => DecisionHeuristic::Reward(RewardHeuristic::new(
                common,
                RewardRule::ConstraintQuality,
            )),

            DecisionHeuristicKind::Emab => {
                DecisionHeuristic::Reward(RewardHeuristic::new(common, RewardRule::Membership))
            }

            DecisionHeuristicKind::Sgdb => DecisionHeuristic::Sgdb(SgdbHeuristic::new(
                common,
                heuristic.initial_learning_rate.value,
                heuristic.learning_rate_decay.value,
                heuristic.learning_rate_minimum.value,
                heuristic.lambda_factor.value,
            )),
        }
    }

    fn common_mut(&mut self) -> &mut HeuristicCommon {
        match self {
            Self::Vmtf(h) => &mut h.common,
            Self::SplitVmtf(h) => &mut h.common,
            Self::Vsids(h) => &mut h.common,
            Self::SplitVsids(h) => &mut h.common,
            Self::Reward(h) => &mut h.common,
            Self::Sgdb(h) => &mut h.common,
        }
    }

    /// Notes a fresh variable.
    pub fn add_variable(&mut self, auxiliary: bool, v: Atom) {
        match self {
            Self::Vmtf(h) => h.add_variable(auxiliary),
            Self::SplitVmtf(h) => h.add_variable(auxiliary),
            Self::Vsids(h) => h.add_variable(auxiliary, v),
            Self::SplitVsids(h) => h.add_variable(auxiliary, v),
            Self::Reward(h) => h.add_variable(auxiliary, v),
            Self::Sgdb(h) => h.add_variable(auxiliary, v),
        }
    }

    /// One-off initialisation when the solve begins.
    pub fn notify_start(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        constraints: &ConstraintDB,
    ) {
        self.common_mut().policy.notify_start(variables, constraints);
        match self {
            Self::Vmtf(h) => h.notify_start(),
            Self::SplitVmtf(h) => h.notify_start(),
            Self::Vsids(h) => h.notify_start(variables, dependencies, constraints),
            Self::SplitVsids(h) => h.notify_start(variables, dependencies, constraints),
            Self::Reward(h) => h.notify_start(variables, dependencies),
            Self::Sgdb(h) => h.notify_start(variables, dependencies),
        }
    }

    /// Notes an assignment.
    pub fn notify_assigned(&mut self, literal: Literal) {
        match self {
            Self::Vmtf(h) => h.notify_assigned(literal),
            Self::SplitVmtf(h) => h.notify_assigned(literal),
            Self::Vsids(h) => h.notify_assigned(literal),
            Self::SplitVsids(h) => h.notify_assigned(literal),
            Self::Reward(h) => h.notify_assigned(literal),
            Self::Sgdb(h) => h.notify_assigned(literal),
        }
    }

    /// Notes an unassignment during a backtrack.
    pub fn notify_unassigned(
        &mut self,
        literal: Literal,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        match self {
            Self::Vmtf(h) => h.notify_unassigned(literal, variables, dependencies),
            Self::SplitVmtf(h) => h.notify_unassigned(literal, variables, dependencies),
            Self::Vsids(h) => h.notify_unassigned(literal, variables, dependencies),
            Self::SplitVsids(h) => h.notify_unassigned(literal, variables, dependencies),
            Self::Reward(h) => h.notify_unassigned(literal, variables, dependencies),
            Self::Sgdb(h) => h.notify_unassigned(literal, variables, dependencies),
        }
    }

    /// Notes that `v` became a decision candidate.
    pub fn notify_eligible(&mut self, v: Atom) {
        match self {
            Self::Vmtf(h) => h.notify_eligible(v),
            Self::SplitVmtf(h) => h.notify_eligible(v),
            Self::Vsids(h) => h.notify_eligible(v),
            Self::SplitVsids(h) => h.notify_eligible(v),
            Self::Reward(h) => h.notify_eligible(v),
            Self::Sgdb(h) => h.notify_eligible(v),
        }
    }

    /// Notes a learnt constraint, while the conflicting assignment is still in place.
    pub fn notify_learned(
        &mut self,
        literals: &[Literal],
        kind: ConstraintKind,
        conflict_side: &[Literal],
        lbd: Lbd,
        variables: &VariableStore,
    ) {
        match self {
            Self::Vmtf(h) => h.notify_learned(literals, variables),
            Self::SplitVmtf(h) => h.notify_learned(literals, kind, variables),
            Self::Vsids(h) => h.notify_learned(literals, conflict_side, variables),
            Self::SplitVsids(h) => h.notify_learned(literals, kind, variables),
            Self::Reward(h) => h.notify_learned(literals, lbd),
            Self::Sgdb(h) => h.notify_learned(literals),
        }
    }

    /// Notes an impending backtrack from `level_before`.
    pub fn notify_backtrack(
        &mut self,
        level_before: LevelIndex,
        variables: &VariableStore,
        dependencies: &DependencyManager,
    ) {
        match self {
            Self::Vmtf(h) => h.notify_backtrack(level_before, variables, dependencies),
            Self::SplitVmtf(h) => h.notify_backtrack(level_before, variables, dependencies),
            Self::Vsids(h) => h.notify_backtrack(level_before),
            Self::SplitVsids(h) => h.notify_backtrack(level_before),
            Self::Reward(h) => h.notify_backtrack(level_before),
            Self::Sgdb(h) => h.notify_backtrack(level_before),
        }
    }

    /// Notes a restart.
    pub fn notify_restart(&mut self) {
        match self {
            Self::SplitVmtf(h) => h.notify_restart(),
            Self::SplitVsids(h) => h.notify_restart(),
            Self::Vmtf(_) | Self::Vsids(_) | Self::Reward(_) | Self::Sgdb(_) => {}
        }
    }

    /// A decision literal, or None if every variable is assigned.
    pub fn decide(
        &mut self,
        variables: &VariableStore,
        dependencies: &DependencyManager,
        rng: &mut impl Rng,
    ) -> Option<Literal> {
        let chosen = match self {
            Self::Vmtf(h) => h.choose_variable(variables, dependencies),
            Self::SplitVmtf(h) => h.choose_variable(variables, dependencies),
            Self::Vsids(h) => h.choose_variable(variables, dependencies),
            Self::SplitVsids(h) => h.choose_variable(variables, dependencies),
            Self::Reward(h) => h.choose_variable(variables, dependencies),
            Self::Sgdb(h) => h.choose_variable(variables, dependencies),
        };

        let v = match chosen {
            Some(v) => v,
            None => {
                // No watched-dependency candidate; fall back to the outermost
                // unassigned variable.
                let fallback = (1..=variables.last_variable())
                    .find(|v| !variables.is_assigned(*v) && !variables.is_auxiliary(*v))?;
                log::trace!(target: targets::DECISION, "Fallback decision on {fallback}");
                fallback
            }
        };
        debug_assert!(!variables.is_assigned(v));

        let phase = match self {
            Self::Vmtf(h) => h.select_phase(v, variables, dependencies, rng),
            Self::SplitVmtf(h) => h.select_phase(v, variables, dependencies, rng),
            Self::Vsids(h) => h.select_phase(v, variables, dependencies, rng),
            Self::SplitVsids(h) => h.select_phase(v, variables, dependencies, rng),
            Self::Reward(h) => h.select_phase(v, variables, dependencies, rng),
            Self::Sgdb(h) => h.select_phase(v, variables, dependencies, rng),
        };

        Some(Literal::new(v, phase))
    }
}
