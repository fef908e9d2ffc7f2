//! Checks over reachable internal states: watcher discipline, trail consistency,
//! deterministic re-propagation, and growth of the learnt dependency relation.

use otter_qbf::{
    config::Config,
    context::Solver,
    db::CRef,
    reports::Report,
    structures::literal::Literal,
};

mod common;

fn built(formula: &str) -> Solver {
    let mut solver = Solver::from_config(Config::default());
    solver.read_auto(formula.as_bytes()).expect("well-formed");
    solver
}

const CHAIN: &str = "\
p cnf 4 3
e 1 0
a 2 0
e 3 4 0
1 2 3 0
1 -2 4 0
-1 3 4 0
";

#[test]
fn propagation_upholds_watcher_discipline() {
    let mut solver = built(CHAIN);
    assert!(solver.propagate().is_none());
    assert!(solver.propagation_correct());
    assert!(solver.trail_consistent());
}

#[test]
fn repropagation_after_backtrack_is_identical() {
    let mut solver = built("p cnf 3 2\ne 1 0\na 2 0\ne 3 0\n1 0\n-1 3 0\n");

    assert!(solver.propagate().is_none());
    let level_zero: Vec<Literal> = solver.variables.trail().to_vec();
    assert!(!level_zero.is_empty());

    // A decision, its consequences, and a full backtrack.
    solver.variables.push_decision_level();
    assert!(solver.enqueue(Literal::new(2, true), CRef::NONE));
    let conflict = solver.propagate();
    solver.backtrack(0);

    assert_eq!(solver.variables.trail(), level_zero.as_slice());

    // Re-propagation finds nothing further at level zero.
    if conflict.is_none() {
        assert!(solver.propagate().is_none());
        assert_eq!(solver.variables.trail(), level_zero.as_slice());
    }
}

#[test]
fn trail_is_topologically_ordered() {
    let mut solver = built(CHAIN);
    assert!(solver.propagate().is_none());

    solver.variables.push_decision_level();
    assert!(solver.enqueue(Literal::new(1, false), CRef::NONE));
    if solver.propagate().is_none() {
        assert!(solver.trail_consistent());
    }
}

#[test]
fn dependencies_only_grow() {
    let mut solver = built("p cnf 2 2\ne 1 0\na 2 0\n1 2 0\n1 -2 0\n");

    let before = solver.dependencies.recorded_count();
    assert_eq!(solver.solve(), Report::Satisfiable);
    let after = solver.dependencies.recorded_count();

    assert!(after >= before);
    // The unit assertions of both clauses demonstrate that 1 depends on 2.
    assert!(solver.dependencies.depends_on(1, 2));
    assert!(!solver.dependencies.depends_on(2, 1));
}

#[test]
fn antecedents_are_recorded() {
    let mut solver = built("p cnf 2 2\ne 1 0\ne 2 0\n1 0\n-1 2 0\n");
    assert!(solver.propagate().is_none());

    // Both assignments are propagations, with antecedents on record.
    assert!(solver.variables.is_assigned(1));
    assert!(solver.variables.is_assigned(2));
    assert_ne!(solver.variables.antecedent(1), CRef::NONE);
    assert_ne!(solver.variables.antecedent(2), CRef::NONE);
    assert!(solver.trail_consistent());
}

#[test]
fn blocked_merge_rebuilds_the_trail() {
    // True: 2 can mirror the negation of 1. A naive level-zero assertion of 2 from
    // the first clause ignores the dependency on 1, and the conflict on the second
    // clause would otherwise resolve into a reducible tautology.
    let mut solver = built("p cnf 2 2\na 1 0\ne 2 0\n1 2 0\n-1 -2 0\n");
    assert_eq!(solver.solve(), Report::Satisfiable);
    assert!(solver.counters.trail_resets >= 1);
}

#[test]
fn blocked_merge_under_every_heuristic() {
    use otter_qbf::config::DecisionHeuristicKind;
    for decision in [
        DecisionHeuristicKind::Vmtf,
        DecisionHeuristicKind::Vsids,
        DecisionHeuristicKind::Cqb,
    ] {
        let mut config = Config::default();
        config.heuristic.decision = decision;
        let mut solver = Solver::from_config(config);
        solver
            .read_auto("p cnf 2 2\na 1 0\ne 2 0\n1 2 0\n-1 -2 0\n".as_bytes())
            .unwrap();
        assert_eq!(solver.solve(), Report::Satisfiable, "{decision:?}");
    }
}

#[test]
fn solved_states_are_stable() {
    let mut solver = built(common::SCENARIOS[2].0);
    assert_eq!(solver.solve(), Report::Unsatisfiable);
    // A further solve call reports without searching.
    assert_eq!(solver.solve(), Report::Unsatisfiable);
}
