//! Configuration of the constraint database.

use super::{Activity, ConfigOption, Lbd};

/// Configuration for the constraint database.
#[derive(Clone)]
pub struct ConstraintDBConfig {
    /// The initial budget of learnt clauses before a cleaning is scheduled.
    pub initial_clause_limit: ConfigOption<u32>,

    /// The initial budget of learnt terms before a cleaning is scheduled.
    pub initial_term_limit: ConfigOption<u32>,

    /// Increment to the learnt clause budget after each cleaning.
    pub clause_increment: ConfigOption<u32>,

    /// Increment to the learnt term budget after each cleaning.
    pub term_increment: ConfigOption<u32>,

    /// Fraction of learnt clauses removed while cleaning.
    pub clause_removal_ratio: ConfigOption<f64>,

    /// Fraction of learnt terms removed while cleaning.
    pub term_removal_ratio: ConfigOption<f64>,

    /// Remove all constraints with activities below a threshold rather than a fixed
    /// fraction.
    pub use_activity_threshold: ConfigOption<bool>,

    /// Constraints with lbd within the bound (lbd ≤ bound) are never removed.
    pub lbd_bound: ConfigOption<Lbd>,

    /// The amount with which to bump the activity of a used constraint.
    pub bump: ConfigOption<Activity>,

    /// The decay to constraint activities each conflict.
    pub decay: ConfigOption<Activity>,
}

impl Default for ConstraintDBConfig {
    fn default() -> Self {
        ConstraintDBConfig {
            initial_clause_limit: ConfigOption {
                name: "initial-clause-DB-size",
                min: 1,
                max: u32::MAX,
                value: 4000,
            },

            initial_term_limit: ConfigOption {
                name: "initial-term-DB-size",
                min: 1,
                max: u32::MAX,
                value: 500,
            },

            clause_increment: ConfigOption {
                name: "clause-DB-increment",
                min: 1,
                max: u32::MAX,
                value: 4000,
            },

            term_increment: ConfigOption {
                name: "term-DB-increment",
                min: 1,
                max: u32::MAX,
                value: 500,
            },

            clause_removal_ratio: ConfigOption {
                name: "clause-removal-ratio",
                min: 0.0,
                max: 1.0,
                value: 0.5,
            },

            term_removal_ratio: ConfigOption {
                name: "term-removal-ratio",
                min: 0.0,
                max: 1.0,
                value: 0.5,
            },

            use_activity_threshold: ConfigOption {
                name: "use-activity-threshold",
                min: false,
                max: true,
                value: false,
            },

            lbd_bound: ConfigOption {
                name: "LBD-threshold",
                min: 0,
                max: Lbd::MAX,
                value: 2,
            },

            bump: ConfigOption {
                name: "constraint-activity-inc",
                min: 0.0,
                max: Activity::MAX,
                value: 1.0,
            },

            decay: ConfigOption {
                name: "constraint-activity-decay",
                min: 0.0,
                max: 1.0,
                value: 0.999,
            },
        }
    }
}
