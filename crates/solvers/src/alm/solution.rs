use std::time::Duration;

/// Why the outer loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Both the primal and dual tolerances were met.
    Converged,

    /// Reached the outer iteration limit without converging.
    MaxIter,

    /// Ran out of time without converging.
    MaxTime,

    /// The inner solver hit a non-finite value.
    Failed,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of an augmented Lagrangian solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: Status,

    /// Final iterate.
    pub x: Vec<f64>,

    /// Final multipliers.
    pub y: Vec<f64>,

    /// Final penalty weights.
    pub sigma: Vec<f64>,

    /// Infinity norm of the last constraint violation.
    pub norm_e: f64,

    /// Inner tolerance of the last outer iteration.
    pub epsilon: f64,

    /// Number of outer iterations performed.
    pub outer_iterations: usize,

    /// Total inner iterations across all outer iterations.
    pub inner_iterations: usize,

    pub elapsed: Duration,
}
