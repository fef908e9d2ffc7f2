/// Counts for various things which count, roughly.
pub struct Counters {
    /// A count of every conflict seen during a solve, initial terms included.
    pub conflicts: usize,

    /// A count of all decisions made.
    pub decisions: usize,

    /// A count of all literals enqueued, decisions included.
    pub propagations: usize,

    /// The number of restarts through a solve.
    pub restarts: usize,

    /// The total number of iterations through the solve loop.
    pub iterations: usize,

    /// A count of clauses learnt from conflicts.
    pub learnt_clauses: usize,

    /// A count of terms learnt, initial terms excluded.
    pub learnt_terms: usize,

    /// A count of initial terms generated from total assignments.
    pub initial_terms: usize,

    /// A count of analyses abandoned without an asserting constraint.
    pub stuck_analyses: usize,

    /// A count of trail rebuilds forced by illegal long-distance merges.
    pub trail_resets: usize,
}

impl Default for Counters {
    fn default() -> Self {
        Counters {
            conflicts: 0,
            decisions: 0,
            propagations: 0,
            restarts: 0,
            iterations: 0,
            learnt_clauses: 0,
            learnt_terms: 0,
            initial_terms: 0,
            stuck_analyses: 0,
            trail_resets: 0,
        }
    }
}
