use otter_qbf::{config::Config, context::Solver, reports::Report, structures::literal::Literal};

mod common;
use common::{solve, SCENARIOS};

mod scenarios {
    use super::*;

    #[test]
    fn all_verdicts() {
        for (formula, expected) in SCENARIOS {
            assert_eq!(solve(formula), expected, "on {formula:?}");
        }
    }

    #[test]
    fn forced_inner_existential() {
        // Universal 1 can be either; 2 is forced true.
        let mut solver = Solver::from_config(Config::default());
        solver
            .read_auto("p cnf 2 2\na 1 0\ne 2 0\n1 2 0\n-1 2 0\n".as_bytes())
            .unwrap();
        assert_eq!(solver.solve(), Report::Satisfiable);
    }
}

mod boundaries {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(solve(""), Report::Satisfiable);
    }

    #[test]
    fn empty_formula() {
        assert_eq!(solve("p cnf 0 0\n"), Report::Satisfiable);
    }

    #[test]
    fn one_empty_clause() {
        assert_eq!(solve("p cnf 1 1\ne 1 0\n0\n"), Report::Unsatisfiable);
    }

    #[test]
    fn one_tautological_clause() {
        assert_eq!(solve("p cnf 1 1\ne 1 0\n1 -1 0\n"), Report::Satisfiable);
    }

    #[test]
    fn variables_without_clauses() {
        assert_eq!(solve("p cnf 3 0\ne 1 0\na 2 0\ne 3 0\n"), Report::Satisfiable);
    }

    #[test]
    fn total_level_zero_assignment() {
        // Both variables are forced at level zero; satisfiability arrives through the
        // initial-term path.
        let report = solve("p cnf 2 3\ne 1 0\ne 2 0\n1 0\n2 0\n1 2 0\n");
        assert_eq!(report, Report::Satisfiable);
    }
}

mod certificates {
    use super::*;

    fn certificate(formula: &str) -> Option<Vec<Literal>> {
        let mut solver = Solver::from_config(Config::default());
        solver.read_auto(formula.as_bytes()).unwrap();
        solver.solve();
        solver.partial_certificate()
    }

    #[test]
    fn outermost_existential_on_sat() {
        // 1 must be true.
        let cert = certificate("p cnf 2 2\ne 1 0\na 2 0\n1 2 0\n1 -2 0\n");
        assert_eq!(cert, Some(vec![Literal::new(1, true)]));
    }

    #[test]
    fn outermost_universal_on_unsat() {
        // The universal player falsifies the unit clause.
        let cert = certificate("p cnf 1 1\na 1 0\n1 0\n");
        assert_eq!(cert, Some(vec![Literal::new(1, false)]));
    }

    #[test]
    fn losing_player_has_no_certificate() {
        // Satisfiable, but the outermost block is universal.
        let cert = certificate("p cnf 2 2\na 1 0\ne 2 0\n1 2 0\n-1 2 0\n");
        assert_eq!(cert, None);
    }
}

mod counters {
    use super::*;

    #[test]
    fn initial_terms_are_counted() {
        let mut solver = Solver::from_config(Config::default());
        solver
            .read_auto("p cnf 2 1\ne 1 0\ne 2 0\n1 2 0\n".as_bytes())
            .unwrap();
        assert_eq!(solver.solve(), Report::Satisfiable);
        assert!(solver.counters.initial_terms >= 1);
    }

    #[test]
    fn conflicts_are_counted() {
        let mut solver = Solver::from_config(Config::default());
        solver
            .read_auto(SCENARIOS[2].0.as_bytes())
            .unwrap();
        assert_eq!(solver.solve(), Report::Unsatisfiable);
        assert!(solver.counters.conflicts >= 1);
    }
}

mod interruption {
    use super::*;

    #[test]
    fn interrupted_solve_is_unknown() {
        let mut solver = Solver::from_config(Config::default());
        solver.read_auto(SCENARIOS[0].0.as_bytes()).unwrap();
        solver.interrupt_flag().store(true, std::sync::atomic::Ordering::Relaxed);
        assert_eq!(solver.solve(), Report::Unknown);
    }
}
