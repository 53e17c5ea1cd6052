use super::InnerSolution;

/// Event emitted by the outer loop once per outer iteration.
///
/// The event is emitted after the multipliers have been updated and before
/// the penalty weights change for the next iteration.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Zero-based outer iteration number.
    pub iteration: usize,

    /// Current iterate.
    pub x: &'a [f64],

    /// Updated and projected multipliers.
    pub y: &'a [f64],

    /// Penalty weights used in this iteration.
    pub sigma: &'a [f64],

    /// Infinity norm of the constraint violation.
    pub norm_e: f64,

    /// Inner tolerance used in this iteration.
    pub epsilon: f64,

    /// What the inner solver reported.
    pub inner: InnerSolution,
}
