use otter_qbf::{
    config::Config,
    context::Solver,
    reports::Report,
    structures::constraint::ConstraintKind,
    types::err::{ErrorKind, ParseError},
};

mod common;

fn built(formula: &str) -> Solver {
    let mut solver = Solver::from_config(Config::default());
    solver.read_auto(formula.as_bytes()).expect("well-formed");
    solver
}

mod qdimacs {
    use super::*;
    use otter_qbf::structures::atom::Quantifier;

    /// The quantifier prefix and clause literal sets of a solver's input, in internal
    /// form.
    fn structure(solver: &Solver) -> (Vec<Quantifier>, Vec<Vec<i64>>) {
        let prefix = (1..=solver.variables.last_variable())
            .map(|v| solver.variables.quantifier(v))
            .collect();
        let mut clauses: Vec<Vec<i64>> = solver
            .constraints
            .input_refs(ConstraintKind::Clause)
            .iter()
            .map(|cref| {
                let mut literals: Vec<i64> = solver
                    .constraints
                    .literals(*cref, ConstraintKind::Clause)
                    .map(|l| l.as_int())
                    .collect();
                literals.sort_unstable();
                literals
            })
            .collect();
        clauses.sort();
        (prefix, clauses)
    }

    #[test]
    fn round_trip_is_structurally_identical() {
        for (formula, _) in common::SCENARIOS {
            let first = built(formula);

            let mut printed = Vec::new();
            first.write_qdimacs(&mut printed).unwrap();
            let second = built(std::str::from_utf8(&printed).unwrap());

            assert_eq!(structure(&first), structure(&second), "via {formula:?}");
        }
    }

    #[test]
    fn free_variables_are_outermost_existentials() {
        // 2 is quantified, 1 is free: 1 lands outside the universal block.
        let solver = built("p cnf 2 1\na 2 0\n1 2 0\n");
        assert_eq!(solver.variables.quantifier(1), Quantifier::Existential);
        assert_eq!(solver.variables.quantifier(2), Quantifier::Universal);
        assert_eq!(solver.variables.name(1), "1");
    }

    #[test]
    fn clauses_may_span_lines() {
        let solver = built("p cnf 2 1\ne 1 2 0\n1\n2 0\n");
        assert_eq!(solver.constraints.input_refs(ConstraintKind::Clause).len(), 1);
        assert_eq!(
            solver
                .constraints
                .size(solver.constraints.input_refs(ConstraintKind::Clause)[0], ConstraintKind::Clause),
            2
        );
    }

    #[test]
    fn duplicate_literals_collapse() {
        let solver = built("p cnf 1 1\ne 1 0\n1 1 1 0\n");
        let cref = solver.constraints.input_refs(ConstraintKind::Clause)[0];
        assert_eq!(solver.constraints.size(cref, ConstraintKind::Clause), 1);
    }

    mod errors {
        use super::*;

        fn parse_error(formula: &str) -> ParseError {
            let mut solver = Solver::from_config(Config::default());
            match solver.read_auto(formula.as_bytes()) {
                Err(ErrorKind::Parse(e)) => e,
                other => panic!("expected a parse error, got {other:?}"),
            }
        }

        #[test]
        fn malformed_problem_line() {
            assert!(matches!(
                parse_error("p dnf 1 1\n"),
                ParseError::ProblemSpecification(1)
            ));
        }

        #[test]
        fn quantifier_after_clause() {
            assert!(matches!(
                parse_error("p cnf 2 1\ne 1 0\n1 0\na 2 0\n"),
                ParseError::MisplacedQuantifier(4)
            ));
        }

        #[test]
        fn requantification() {
            assert!(matches!(
                parse_error("p cnf 1 0\ne 1 0\na 1 0\n"),
                ParseError::Requantification(3)
            ));
        }

        #[test]
        fn unterminated_clause() {
            assert!(matches!(
                parse_error("p cnf 1 1\ne 1 0\n1\n"),
                ParseError::MissingDelimiter(_)
            ));
        }

        #[test]
        fn junk() {
            assert!(matches!(
                parse_error("hello world\n"),
                ParseError::UnknownFormat
            ));
        }
    }
}

mod qcir {
    use super::*;

    const FORCED: &str = "\
#QCIR-G14
forall(1)
exists(2)
output(g2)
g1 = and(1, 2)
g3 = and(-1, 2)
g2 = or(g1, g3)
";

    #[test]
    fn circuit_solves() {
        // (1 ∧ 2) ∨ (¬1 ∧ 2) holds for both values of 1, through 2.
        let mut solver = built(FORCED);
        assert_eq!(solver.solve(), Report::Satisfiable);
    }

    #[test]
    fn gates_are_auxiliary_innermost_existentials() {
        let solver = built(FORCED);
        use otter_qbf::structures::atom::Quantifier;
        assert_eq!(solver.variables.variable_count(), 5);
        for v in 3..=5 {
            assert_eq!(solver.variables.quantifier(v), Quantifier::Existential);
            assert!(solver.variables.is_auxiliary(v));
        }
        assert!(!solver.variables.is_auxiliary(1));
    }

    #[test]
    fn qcir_to_qdimacs_round_trip_verdict() {
        let mut direct = built(FORCED);
        let direct_report = direct.solve();

        let printer = built(FORCED);
        let mut printed = Vec::new();
        printer.write_qdimacs(&mut printed).unwrap();
        let mut reparsed = built(std::str::from_utf8(&printed).unwrap());

        assert_eq!(reparsed.solve(), direct_report);
    }

    #[test]
    fn xor_gate() {
        // ∃1∀2: 1 ⊕ 2 is false when 2 mirrors 1.
        let formula = "\
#QCIR-G14
exists(1)
forall(2)
output(g)
g = xor(1, 2)
";
        let mut solver = built(formula);
        assert_eq!(solver.solve(), Report::Unsatisfiable);
    }

    #[test]
    fn ite_gate() {
        // ∀c∃t: ite(c, t, -t) is satisfiable, t tracking c.
        let formula = "\
#QCIR-G14
forall(c)
exists(t)
output(g)
g = ite(c, t, -t)
";
        let mut solver = built(formula);
        assert_eq!(solver.solve(), Report::Satisfiable);
    }

    #[test]
    fn empty_conjunction_is_true() {
        let formula = "\
#QCIR-G14
output(g)
g = and()
";
        let mut solver = built(formula);
        assert_eq!(solver.solve(), Report::Satisfiable);
    }

    mod errors {
        use super::*;

        fn parse_error(formula: &str) -> ParseError {
            let mut solver = Solver::from_config(Config::default());
            match solver.read_auto(formula.as_bytes()) {
                Err(ErrorKind::Parse(e)) => e,
                other => panic!("expected a parse error, got {other:?}"),
            }
        }

        #[test]
        fn missing_output() {
            assert!(matches!(
                parse_error("#QCIR-G14\nexists(1)\n"),
                ParseError::MissingOutput
            ));
        }

        #[test]
        fn unknown_gate_input() {
            assert!(matches!(
                parse_error("#QCIR-G14\noutput(g)\ng = and(x)\n"),
                ParseError::UnknownName(3)
            ));
        }

        #[test]
        fn wrong_xor_arity() {
            assert!(matches!(
                parse_error("#QCIR-G14\nexists(1)\noutput(g)\ng = xor(1)\n"),
                ParseError::Gate(4)
            ));
        }
    }
}
