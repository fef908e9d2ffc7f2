//! Configuration of the decision heuristic.

use super::{Activity, ConfigOption};

/// The family of decision heuristics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionHeuristicKind {
    /// Variable move-to-front.
    /// With dependency learning disabled this specialises to a fixed prefix order.
    Vmtf,

    /// Variable move-to-front, moving learnt variables sorted by quantifier depth.
    VmtfOrder,

    /// Activity-based scoring over learnt constraints.
    Vsids,

    /// Stochastic gradient descent over per-variable features.
    Sgdb,

    /// Move-to-front with separate existential and universal decision states.
    SplitVmtf,

    /// Activity scoring with separate existential and universal decision states.
    SplitVsids,

    /// Reward learning with an LBD-keyed reward for all assigned variables.
    Cqb,

    /// Reward learning with a membership reward for variables of the learnt constraint.
    Emab,
}

impl std::str::FromStr for DecisionHeuristicKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VMTF" => Ok(Self::Vmtf),
            "VMTF_ORD" => Ok(Self::VmtfOrder),
            "VSIDS" => Ok(Self::Vsids),
            "SGDB" => Ok(Self::Sgdb),
            "SPLIT_VMTF" => Ok(Self::SplitVmtf),
            "SPLIT_VSIDS" => Ok(Self::SplitVsids),
            "CQB" => Ok(Self::Cqb),
            "EMAB" => Ok(Self::Emab),
            _ => Err(()),
        }
    }
}

/// Phase selection, for when no saved phase applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseHeuristicKind {
    /// Phase by (inverted) Jeroslow–Wang scores over the input clauses.
    InvJW,

    /// Phase by the quantifier of the decision variable.
    QType,

    /// Phase copied from the assignment of the watched dependency.
    Watcher,

    /// A random phase.
    Random,

    /// Constant false.
    False,

    /// Constant true.
    True,
}

impl std::str::FromStr for PhaseHeuristicKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invJW" => Ok(Self::InvJW),
            "qtype" => Ok(Self::QType),
            "watcher" => Ok(Self::Watcher),
            "random" => Ok(Self::Random),
            "false" => Ok(Self::False),
            "true" => Ok(Self::True),
            _ => Err(()),
        }
    }
}

/// Tiebreaking between equally active variables under VSIDS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VsidsTiebreak {
    /// No tiebreaking.
    Arbitrary,

    /// Prefer more primary-literal occurrences.
    MorePrimary,

    /// Prefer fewer primary-literal occurrences.
    FewerPrimary,

    /// Prefer more secondary-literal occurrences.
    MoreSecondary,

    /// Prefer fewer secondary-literal occurrences.
    FewerSecondary,
}

impl std::str::FromStr for VsidsTiebreak {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arbitrary" => Ok(Self::Arbitrary),
            "more-primary" => Ok(Self::MorePrimary),
            "fewer-primary" => Ok(Self::FewerPrimary),
            "more-secondary" => Ok(Self::MoreSecondary),
            "fewer-secondary" => Ok(Self::FewerSecondary),
            _ => Err(()),
        }
    }
}

/// Configuration for the decision heuristic.
#[derive(Clone)]
pub struct HeuristicConfig {
    /// Which decision heuristic to use.
    pub decision: DecisionHeuristicKind,

    /// Default to the saved phase of a variable when deciding on it.
    pub phase_saving: bool,

    /// The phase heuristic applied when no saved phase is used.
    pub phase: PhaseHeuristicKind,

    /// Tiebreaking strategy for equally active variables.
    pub tiebreak: VsidsTiebreak,

    /// The amount with which to bump a variable under VSIDS.
    pub score_increment: ConfigOption<Activity>,

    /// The decay of variable activity after each learning event.
    pub score_decay: ConfigOption<Activity>,

    /// Additionally bump conflict-side literals on learning.
    pub bump_conflict_side: ConfigOption<bool>,

    /// The number of restarts after which a split heuristic switches mode.
    pub mode_cycles: ConfigOption<u32>,

    /// Move variables for every learnt constraint, regardless of the active mode.
    pub always_move: ConfigOption<bool>,

    /// Move variables sorted by their quantifier depth when learning constraints.
    pub move_by_prefix: ConfigOption<bool>,

    /// Bump variable scores for every learnt constraint, regardless of the active mode.
    pub always_bump: ConfigOption<bool>,

    /// Keep saved phases for the two decision modes separately.
    pub split_phase_saving: ConfigOption<bool>,

    /// Start a split heuristic in universal mode.
    pub start_univ_mode: ConfigOption<bool>,

    /// Initial learning rate of SGDB.
    pub initial_learning_rate: ConfigOption<f64>,

    /// Additive decay of the SGDB learning rate.
    pub learning_rate_decay: ConfigOption<f64>,

    /// Minimum SGDB learning rate.
    pub learning_rate_minimum: ConfigOption<f64>,

    /// SGDB regularisation parameter.
    pub lambda_factor: ConfigOption<f64>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        HeuristicConfig {
            decision: DecisionHeuristicKind::Vmtf,
            phase_saving: true,
            phase: PhaseHeuristicKind::Watcher,
            tiebreak: VsidsTiebreak::Arbitrary,

            score_increment: ConfigOption {
                name: "var-activity-inc",
                min: 0.0,
                max: Activity::MAX,
                value: 1.0,
            },

            score_decay: ConfigOption {
                name: "var-activity-decay",
                min: 0.0,
                max: 1.0,
                value: 0.95,
            },

            bump_conflict_side: ConfigOption {
                name: "bump-conflict-side",
                min: false,
                max: true,
                value: false,
            },

            mode_cycles: ConfigOption {
                name: "mode-cycles",
                min: 0,
                max: u32::MAX,
                value: 1,
            },

            always_move: ConfigOption {
                name: "always-move",
                min: false,
                max: true,
                value: false,
            },

            move_by_prefix: ConfigOption {
                name: "move-by-prefix",
                min: false,
                max: true,
                value: false,
            },

            always_bump: ConfigOption {
                name: "always-bump",
                min: false,
                max: true,
                value: false,
            },

            split_phase_saving: ConfigOption {
                name: "split-phase-saving",
                min: false,
                max: true,
                value: false,
            },

            start_univ_mode: ConfigOption {
                name: "start-univ-mode",
                min: false,
                max: true,
                value: false,
            },

            initial_learning_rate: ConfigOption {
                name: "initial-learning-rate",
                min: 0.0,
                max: 1.0,
                value: 0.8,
            },

            learning_rate_decay: ConfigOption {
                name: "learning-rate-decay",
                min: 0.0,
                max: 1.0,
                value: 2e-6,
            },

            learning_rate_minimum: ConfigOption {
                name: "learning-rate-minimum",
                min: 0.0,
                max: 1.0,
                value: 0.12,
            },

            lambda_factor: ConfigOption {
                name: "lambda-factor",
                min: 0.0,
                max: 1.0,
                value: 0.1,
            },
        }
    }
}
