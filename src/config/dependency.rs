//! Configuration of the dependency manager.

/// How dependencies between variables are tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyStrategy {
    /// No learning: the classical prefix order is the dependency relation.
    Off,

    /// Record only the outermost opposite-quantifier variable of a reason.
    Outermost,

    /// Record the opposite-quantifier variable with the fewest recorded dependencies.
    Fewest,

    /// Record every opposite-quantifier variable of a reason.
    All,
}

impl std::str::FromStr for DependencyStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "outermost" => Ok(Self::Outermost),
            "fewest" => Ok(Self::Fewest),
            "all" => Ok(Self::All),
            _ => Err(()),
        }
    }
}

/// Configuration for the dependency manager.
#[derive(Clone)]
pub struct DependencyConfig {
    /// Which dependency strategy to use.
    pub strategy: DependencyStrategy,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        DependencyConfig {
            strategy: DependencyStrategy::All,
        }
    }
}
