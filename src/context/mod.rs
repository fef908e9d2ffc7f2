/*!
The solver --- to which a formula is added and within which a solve takes place.

Strictly, a [GenericSolver] and a [Solver].
The generic solver is generic over the source of randomness; [Solver] fixes it to
[MinimalPCG32](crate::generic::minimal_pcg::MinimalPCG32) so a solve is deterministic.

The solver owns every subsystem as a field, and the procedures which tie subsystems
together --- [propagation](crate::procedures::propagate),
[analysis](crate::procedures::analysis), [backtracking](crate::procedures::backjump),
and the [solve loop](crate::procedures::solve) itself --- are methods, so ownership
rests in one place and cross-subsystem notifications are explicit calls rather than
back-pointers.

# Example

```rust
# use otter_qbf::context::Solver;
# use otter_qbf::config::Config;
# use otter_qbf::reports::Report;
let mut solver = Solver::from_config(Config::default());
solver
    .read_auto("p cnf 2 2\na 1 0\ne 2 0\n1 2 0\n-1 2 0\n".as_bytes())
    .unwrap();
assert_eq!(solver.solve(), Report::Satisfiable);
```
*/

mod counters;
pub use counters::Counters;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    config::Config,
    db::{
        constraint::ConstraintDB, dependency::DependencyManager, variable::VariableStore,
        watches::Watches,
    },
    generic::minimal_pcg::MinimalPCG32,
    heuristics::DecisionHeuristic,
    procedures::{analysis::AnalysisBuffer, model::ModelGeneration},
    reports::Report,
    restarts::RestartScheduler,
    structures::atom::Atom,
};

/// The state of a solver.
#[derive(PartialEq, Eq, Debug)]
pub enum SolverState {
    /// The formula is still being built.
    Input,

    /// A solve is underway.
    Solving,

    /// The formula was determined true.
    Satisfiable,

    /// The formula was determined false.
    Unsatisfiable,

    /// The solve was interrupted.
    Interrupted,
}

/// The solver, generic over the source of randomness.
pub struct GenericSolver<R: rand::Rng + std::default::Default> {
    /// The configuration of this solver.
    pub config: Config,

    /// The state of this solver.
    pub state: SolverState,

    /// Assignments, levels, antecedents, and the trail.
    pub variables: VariableStore,

    /// Constraint storage.
    pub constraints: ConstraintDB,

    /// The dependency relation and watched dependencies.
    pub dependencies: DependencyManager,

    /// Watch lists and the propagation queue.
    pub watches: Watches,

    /// The decision heuristic.
    pub heuristic: DecisionHeuristic,

    /// The restart scheduler.
    pub restarts: RestartScheduler,

    /// Working storage of the learning engine.
    pub analysis: AnalysisBuffer,

    /// Initial-term generation state.
    pub model: ModelGeneration,

    /// Counts of things.
    pub counters: Counters,

    /// The source of randomness.
    pub rng: R,

    /// Set from outside to abandon the solve with an unknown result.
    interrupt: Arc<AtomicBool>,

    /// Scratch space for eligibility notifications.
    pub(crate) eligible: Vec<Atom>,

    pub(crate) started: bool,
}

/// A solver with a fixed, deterministic, source of randomness.
pub type Solver = GenericSolver<MinimalPCG32>;

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// A fresh solver from a configuration.
    pub fn from_config(config: Config) -> Self {
        GenericSolver {
            state: SolverState::Input,
            variables: VariableStore::default(),
            constraints: ConstraintDB::new(&config.constraint_db),
            dependencies: DependencyManager::new(config.dependencies.strategy),
            watches: Watches::default(),
            heuristic: DecisionHeuristic::from_config(&config),
            restarts: RestartScheduler::from_config(&config.restarts),
            analysis: AnalysisBuffer::default(),
            model: ModelGeneration::from_config(&config.model_generation),
            counters: Counters::default(),
            rng: R::default(),
            interrupt: Arc::new(AtomicBool::new(false)),
            eligible: Vec::default(),
            started: false,
            config,
        }
    }

    /// The report of this solver.
    pub fn report(&self) -> Report {
        Report::from(&self.state)
    }

    /// A handle to the interrupt flag, e.g. for a signal handler.
    ///
    /// The driver checks the flag at the top of each iteration and abandons the solve
    /// with [Report::Unknown] when set.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// True if an interrupt was delivered.
    pub fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }
}
