/*!
Miscellaneous items related to [logging](log).

Calls to the log macros are made throughout the library, with a target per subsystem so
output can be narrowed to relevant parts.
No log implementation is provided; for details, see [log].

For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/),
logs of the propagator can be filtered with `RUST_LOG=propagation …`.
*/

/// Targets to be used within a [log] macro.
pub mod targets {
    pub const PROPAGATION: &str = "propagation";
    pub const ANALYSIS: &str = "analysis";
    pub const DEPENDENCIES: &str = "dependencies";
    pub const REDUCTION: &str = "reduction";
    pub const CONSTRAINT_DB: &str = "constraint_db";
    pub const BACKJUMP: &str = "backjump";
    pub const DECISION: &str = "decision";
    pub const MODEL: &str = "model";
    pub const PARSER: &str = "parser";
    pub const RESTART: &str = "restart";
}
