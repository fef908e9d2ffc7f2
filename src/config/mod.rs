/*!
Configuration of a solver.

All configuration for a solver is contained within [Config], split into groups which are
handed to the subsystem they concern when the solver is built.
Numeric and boolean options are [ConfigOption]s, which pair the value with its
name and permitted range so the CLI can validate and report without duplicating
either.
Strategy selections are plain enums with [FromStr](std::str::FromStr) instances
matching the strings accepted on the command line.
*/

mod config_option;
pub use config_option::ConfigOption;

mod dbs;
pub use dbs::ConstraintDBConfig;

mod heuristic;
pub use heuristic::{
    DecisionHeuristicKind, HeuristicConfig, PhaseHeuristicKind, VsidsTiebreak,
};

mod restarts;
pub use restarts::{RestartConfig, RestartStrategy};

mod model;
pub use model::{ModelGenConfig, ModelGenerationKind};

mod dependency;
pub use dependency::{DependencyConfig, DependencyStrategy};

/// Representation of activities.
pub type Activity = f64;

/// Representation of literal block distances.
pub type Lbd = u16;

/// The primary configuration structure.
#[derive(Clone, Default)]
pub struct Config {
    /// Configuration of the constraint database.
    pub constraint_db: ConstraintDBConfig,

    /// Configuration of the decision heuristic.
    pub heuristic: HeuristicConfig,

    /// Configuration of the restart scheduler.
    pub restarts: RestartConfig,

    /// Configuration of initial-term generation.
    pub model_generation: ModelGenConfig,

    /// Configuration of the dependency manager.
    pub dependencies: DependencyConfig,
}

impl Config {
    /// Checks the declared constraints between options.
    ///
    /// At present one constraint is declared: without dependency learning the decision
    /// heuristic must be VMTF, as only the VMTF prefix heuristic respects a fixed
    /// quantifier order.
    pub fn validate(&self) -> Result<(), &'static str> {
        if matches!(self.dependencies.strategy, DependencyStrategy::Off)
            && !matches!(self.heuristic.decision, DecisionHeuristicKind::Vmtf)
        {
            return Err("decision heuristic must be VMTF if dependency learning is deactivated");
        }
        Ok(())
    }
}
