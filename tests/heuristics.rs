//! Every scenario solves identically under every decision heuristic, restart
//! strategy, dependency strategy, model-generation strategy, and phase heuristic.

use otter_qbf::config::{
    Config, DecisionHeuristicKind, DependencyStrategy, ModelGenerationKind, PhaseHeuristicKind,
    RestartStrategy,
};

mod common;
use common::{solve_with, SCENARIOS};

const HEURISTICS: [DecisionHeuristicKind; 8] = [
    DecisionHeuristicKind::Vmtf,
    DecisionHeuristicKind::VmtfOrder,
    DecisionHeuristicKind::Vsids,
    DecisionHeuristicKind::Sgdb,
    DecisionHeuristicKind::SplitVmtf,
    DecisionHeuristicKind::SplitVsids,
    DecisionHeuristicKind::Cqb,
    DecisionHeuristicKind::Emab,
];

const RESTARTS: [RestartStrategy; 4] = [
    RestartStrategy::Off,
    RestartStrategy::Luby,
    RestartStrategy::InnerOuter,
    RestartStrategy::Ema,
];

#[test]
fn heuristics_by_restarts() {
    for heuristic in HEURISTICS {
        for restarts in RESTARTS {
            let mut config = Config::default();
            config.heuristic.decision = heuristic;
            config.restarts.strategy = restarts;
            for (formula, expected) in SCENARIOS {
                assert_eq!(
                    solve_with(formula, config.clone()),
                    expected,
                    "{heuristic:?} with {restarts:?} restarts on {formula:?}"
                );
            }
        }
    }
}

#[test]
fn dependency_strategies() {
    for strategy in [
        DependencyStrategy::Off,
        DependencyStrategy::Outermost,
        DependencyStrategy::Fewest,
        DependencyStrategy::All,
    ] {
        let mut config = Config::default();
        config.dependencies.strategy = strategy;
        // Without dependency learning the decision heuristic must be VMTF.
        config.heuristic.decision = DecisionHeuristicKind::Vmtf;
        assert!(config.validate().is_ok());
        for (formula, expected) in SCENARIOS {
            assert_eq!(
                solve_with(formula, config.clone()),
                expected,
                "{strategy:?} on {formula:?}"
            );
        }
    }
}

#[test]
fn model_generation_strategies() {
    for strategy in [
        ModelGenerationKind::Off,
        ModelGenerationKind::Simple,
        ModelGenerationKind::Weighted,
    ] {
        let mut config = Config::default();
        config.model_generation.strategy = strategy;
        for (formula, expected) in SCENARIOS {
            assert_eq!(
                solve_with(formula, config.clone()),
                expected,
                "{strategy:?} on {formula:?}"
            );
        }
    }
}

#[test]
fn phase_heuristics() {
    for phase in [
        PhaseHeuristicKind::InvJW,
        PhaseHeuristicKind::QType,
        PhaseHeuristicKind::Watcher,
        PhaseHeuristicKind::Random,
        PhaseHeuristicKind::False,
        PhaseHeuristicKind::True,
    ] {
        let mut config = Config::default();
        config.heuristic.phase = phase;
        config.heuristic.phase_saving = false;
        for (formula, expected) in SCENARIOS {
            assert_eq!(
                solve_with(formula, config.clone()),
                expected,
                "{phase:?} on {formula:?}"
            );
        }
    }
}

#[test]
fn split_heuristic_options() {
    for decision in [
        DecisionHeuristicKind::SplitVmtf,
        DecisionHeuristicKind::SplitVsids,
    ] {
        for start_univ in [false, true] {
            for split_phases in [false, true] {
                let mut config = Config::default();
                config.heuristic.decision = decision;
                config.heuristic.start_univ_mode.value = start_univ;
                config.heuristic.split_phase_saving.value = split_phases;
                config.heuristic.always_move.value = true;
                config.heuristic.always_bump.value = true;
                for (formula, expected) in SCENARIOS {
                    assert_eq!(solve_with(formula, config.clone()), expected);
                }
            }
        }
    }
}

#[test]
fn dependency_off_requires_vmtf() {
    let mut config = Config::default();
    config.dependencies.strategy = DependencyStrategy::Off;
    config.heuristic.decision = DecisionHeuristicKind::Vsids;
    assert!(config.validate().is_err());
}
