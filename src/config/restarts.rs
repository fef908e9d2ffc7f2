//! Configuration of the restart scheduler.

use super::ConfigOption;
use crate::generic::luby::LubyRepresentation;

/// The restart strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartStrategy {
    /// Never restart.
    Off,

    /// Restart intervals follow the luby sequence.
    Luby,

    /// Geometric inner intervals within geometric outer intervals.
    InnerOuter,

    /// Restart on a divergence of fast and slow LBD averages.
    Ema,
}

impl std::str::FromStr for RestartStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "luby" => Ok(Self::Luby),
            "inner-outer" => Ok(Self::InnerOuter),
            "EMA" => Ok(Self::Ema),
            _ => Err(()),
        }
    }
}

/// Configuration for the restart scheduler.
#[derive(Clone)]
pub struct RestartConfig {
    /// Which restart strategy to use.
    pub strategy: RestartStrategy,

    /// Multiplier for luby restart intervals.
    pub luby_multiplier: ConfigOption<LubyRepresentation>,

    /// Weight of a fresh constraint LBD in the slow average.
    pub alpha: ConfigOption<f64>,

    /// Minimum number of conflicts between EMA restarts.
    pub minimum_distance: ConfigOption<u32>,

    /// Restart if the short-term LBD average is this much larger than the long-term.
    pub threshold_factor: ConfigOption<f64>,

    /// Initial number of conflicts until an inner restart.
    pub inner_restart_distance: ConfigOption<u32>,

    /// Initial number of conflicts until an outer restart.
    pub outer_restart_distance: ConfigOption<u32>,

    /// Restart limit multiplier.
    pub restart_multiplier: ConfigOption<f64>,
}

impl Default for RestartConfig {
    fn default() -> Self {
        RestartConfig {
            strategy: RestartStrategy::InnerOuter,

            luby_multiplier: ConfigOption {
                name: "luby-restart-multiplier",
                min: 1,
                max: LubyRepresentation::MAX,
                value: 50,
            },

            alpha: ConfigOption {
                name: "alpha",
                min: 0.0,
                max: 1.0,
                value: 2e-5,
            },

            minimum_distance: ConfigOption {
                name: "minimum-distance",
                min: 0,
                max: u32::MAX,
                value: 20,
            },

            threshold_factor: ConfigOption {
                name: "threshold-factor",
                min: 0.0,
                max: f64::MAX,
                value: 1.4,
            },

            inner_restart_distance: ConfigOption {
                name: "inner-restart-distance",
                min: 0,
                max: u32::MAX,
                value: 100,
            },

            outer_restart_distance: ConfigOption {
                name: "outer-restart-distance",
                min: 0,
                max: u32::MAX,
                value: 100,
            },

            restart_multiplier: ConfigOption {
                name: "restart-multiplier",
                min: 1.0,
                max: f64::MAX,
                value: 1.1,
            },
        }
    }
}
