use otter_qbf::{config::Config, context::Solver, reports::Report};

/// Builds a solver over `formula` and solves, with the given configuration.
#[allow(dead_code)]
pub fn solve_with(formula: &str, config: Config) -> Report {
    let mut solver = Solver::from_config(config);
    solver
        .read_auto(formula.as_bytes())
        .expect("well-formed formula");
    solver.solve()
}

/// Builds a solver over `formula` and solves, with the default configuration.
#[allow(dead_code)]
pub fn solve(formula: &str) -> Report {
    solve_with(formula, Config::default())
}

/// The six end-to-end scenarios, with their verdicts.
pub const SCENARIOS: [(&str, Report); 6] = [
    (
        "p cnf 2 2\na 1 0\ne 2 0\n1 2 0\n-1 2 0\n",
        Report::Satisfiable,
    ),
    (
        "p cnf 2 2\ne 1 0\na 2 0\n1 2 0\n1 -2 0\n",
        Report::Satisfiable,
    ),
    (
        "p cnf 2 4\na 1 0\ne 2 0\n1 2 0\n1 -2 0\n-1 2 0\n-1 -2 0\n",
        Report::Unsatisfiable,
    ),
    ("p cnf 1 2\ne 1 0\n1 0\n-1 0\n", Report::Unsatisfiable),
    ("p cnf 1 1\na 1 0\n1 0\n", Report::Unsatisfiable),
    ("", Report::Satisfiable),
];
