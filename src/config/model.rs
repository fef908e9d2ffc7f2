//! Configuration of initial-term generation.

use super::ConfigOption;

/// How an initial term is generated from a total assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelGenerationKind {
    /// The initial term is the full assignment.
    Off,

    /// Per clause, prefer a disabling existential literal, else any disabling literal.
    Simple,

    /// Greedy weighted hitting set over disabling literals.
    Weighted,
}

impl std::str::FromStr for ModelGenerationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "depqbf" => Ok(Self::Simple),
            "weighted" => Ok(Self::Weighted),
            _ => Err(()),
        }
    }
}

/// Configuration for initial-term generation.
#[derive(Clone)]
pub struct ModelGenConfig {
    /// Which generation strategy to use.
    pub strategy: ModelGenerationKind,

    /// Exponent skewing the distribution of weights.
    pub exponent: ConfigOption<f64>,

    /// Scaling factor for variable weights.
    pub scaling_factor: ConfigOption<f64>,

    /// Additive penalty for universal variables.
    pub universal_penalty: ConfigOption<f64>,
}

impl Default for ModelGenConfig {
    fn default() -> Self {
        ModelGenConfig {
            strategy: ModelGenerationKind::Simple,

            exponent: ConfigOption {
                name: "exponent",
                min: 0.5,
                max: 2.0,
                value: 1.0,
            },

            scaling_factor: ConfigOption {
                name: "scaling-factor",
                min: 0.0,
                max: 1.0,
                value: 1.0,
            },

            universal_penalty: ConfigOption {
                name: "universal-penalty",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },
        }
    }
}
