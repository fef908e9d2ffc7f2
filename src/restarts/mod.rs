/*!
Restart schedulers.

Each scheduler observes the LBD of learnt constraints through
[notify_learned](RestartScheduler::notify_learned) and answers
[should_restart](RestartScheduler::should_restart) at decision points; a positive
answer resets the conflicts-since-restart count and advances the strategy's intervals.

Four strategies are provided: off, luby (intervals follow the luby sequence scaled by a
multiplier), inner-outer (geometric inner intervals which reset and advance a geometric
outer interval on overrun), and EMA (fast and slow exponential moving averages of LBD,
restarting when the fast average exceeds the slow by a configured factor).
*/

use crate::{
    config::{Lbd, RestartConfig, RestartStrategy},
    generic::luby::Luby,
    misc::log::targets,
};

/// Step of the fast LBD average.
const FAST_STEP: f64 = 1.0 / 32.0;

/// A restart scheduler.
pub enum RestartScheduler {
    /// Never restart.
    Off,

    /// Intervals follow the luby sequence, scaled.
    Luby {
        luby: Luby,
        multiplier: u32,
        conflicts: u32,
    },

    /// Geometric inner intervals within geometric outer intervals.
    InnerOuter {
        inner: f64,
        outer: f64,
        initial_inner: f64,
        multiplier: f64,
        conflicts: u32,
    },

    /// Fast and slow exponential moving averages of LBD.
    Ema {
        fast: f64,
        slow: f64,
        alpha: f64,
        minimum_distance: u32,
        threshold_factor: f64,
        conflicts: u32,
    },
}

impl RestartScheduler {
    /// Builds the scheduler selected by `config`.
    pub fn from_config(config: &RestartConfig) -> Self {
        match config.strategy {
            RestartStrategy::Off => RestartScheduler::Off,

            RestartStrategy::Luby => RestartScheduler::Luby {
                luby: Luby::default(),
                multiplier: config.luby_multiplier.value,
                conflicts: 0,
            },

            RestartStrategy::InnerOuter => RestartScheduler::InnerOuter {
                inner: config.inner_restart_distance.value as f64,
                outer: config.outer_restart_distance.value as f64,
                initial_inner: config.inner_restart_distance.value as f64,
                multiplier: config.restart_multiplier.value,
                conflicts: 0,
            },

            RestartStrategy::Ema => RestartScheduler::Ema {
                fast: 0.0,
                slow: 0.0,
                alpha: config.alpha.value,
                minimum_distance: config.minimum_distance.value,
                threshold_factor: config.threshold_factor.value,
                conflicts: 0,
            },
        }
    }

    /// Notes the LBD of a learnt constraint.
    pub fn notify_learned(&mut self, lbd: Lbd) {
        match self {
            RestartScheduler::Off => {}

            RestartScheduler::Luby { conflicts, .. }
            | RestartScheduler::InnerOuter { conflicts, .. } => *conflicts += 1,

            RestartScheduler::Ema {
                fast,
                slow,
                alpha,
                conflicts,
                ..
            } => {
                *slow += *alpha * (lbd as f64 - *slow);
                *fast += FAST_STEP * (lbd as f64 - *fast);
                *conflicts += 1;
            }
        }
    }

    /// True if a restart is due.
    /// A positive answer consumes the pending interval.
    pub fn should_restart(&mut self) -> bool {
        match self {
            RestartScheduler::Off => false,

            RestartScheduler::Luby {
                luby,
                multiplier,
                conflicts,
            } => {
                let interval = *multiplier * luby.current();
                if *conflicts >= interval {
                    *conflicts = 0;
                    luby.next();
                    log::debug!(target: targets::RESTART, "Luby restart, next interval {}", *multiplier * luby.current());
                    true
                } else {
                    false
                }
            }

            RestartScheduler::InnerOuter {
                inner,
                outer,
                initial_inner,
                multiplier,
                conflicts,
            } => {
                if (*conflicts as f64) >= *inner {
                    *conflicts = 0;
                    *inner *= *multiplier;
                    if *inner > *outer {
                        *inner = *initial_inner;
                        *outer *= *multiplier;
                    }
                    log::debug!(target: targets::RESTART, "Inner-outer restart, inner {inner:.0} outer {outer:.0}");
                    true
                } else {
                    false
                }
            }

            RestartScheduler::Ema {
                fast,
                slow,
                minimum_distance,
                threshold_factor,
                conflicts,
                ..
            } => {
                if *conflicts >= *minimum_distance && *fast > *slow * *threshold_factor {
                    *conflicts = 0;
                    log::debug!(target: targets::RESTART, "EMA restart, fast {fast:.2} slow {slow:.2}");
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(strategy: RestartStrategy) -> RestartConfig {
        let mut config = RestartConfig::default();
        config.strategy = strategy;
        config
    }

    #[test]
    fn off_never_restarts() {
        let mut scheduler = RestartScheduler::from_config(&config_with(RestartStrategy::Off));
        for _ in 0..1000 {
            scheduler.notify_learned(2);
            assert!(!scheduler.should_restart());
        }
    }

    #[test]
    fn luby_intervals() {
        let mut config = config_with(RestartStrategy::Luby);
        config.luby_multiplier.value = 2;
        let mut scheduler = RestartScheduler::from_config(&config);

        // First interval is 2 * luby(1) = 2.
        scheduler.notify_learned(3);
        assert!(!scheduler.should_restart());
        scheduler.notify_learned(3);
        assert!(scheduler.should_restart());
        // And again: the second luby element is also 1.
        scheduler.notify_learned(3);
        assert!(!scheduler.should_restart());
        scheduler.notify_learned(3);
        assert!(scheduler.should_restart());
    }

    #[test]
    fn inner_outer_growth() {
        let mut config = config_with(RestartStrategy::InnerOuter);
        config.inner_restart_distance.value = 2;
        config.outer_restart_distance.value = 2;
        config.restart_multiplier.value = 2.0;
        let mut scheduler = RestartScheduler::from_config(&config);

        scheduler.notify_learned(3);
        scheduler.notify_learned(3);
        assert!(scheduler.should_restart());

        // Inner overran outer, so it reset to 2 rather than growing to 4.
        scheduler.notify_learned(3);
        assert!(!scheduler.should_restart());
        scheduler.notify_learned(3);
        assert!(scheduler.should_restart());
    }

    #[test]
    fn ema_tracks_divergence() {
        let mut config = config_with(RestartStrategy::Ema);
        config.minimum_distance.value = 4;
        let mut scheduler = RestartScheduler::from_config(&config);

        // A burst of high-LBD constraints pushes the fast average over the slow.
        for _ in 0..8 {
            scheduler.notify_learned(30);
        }
        assert!(scheduler.should_restart());
    }
}
