use alm_core::{Error, Problem};

/// Outcome of one inner solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerStatus {
    /// The stationarity measure dropped below the requested tolerance.
    Converged,

    /// The inner iteration limit was reached.
    MaxIter,

    /// The inner time budget ran out.
    MaxTime,

    /// An evaluation produced a NaN or infinite value.
    NotFinite,
}

/// What the inner solver reports back to the outer loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InnerSolution {
    pub status: InnerStatus,

    /// Stationarity measure at the returned point.
    pub stationarity: f64,

    /// Number of inner iterations performed.
    pub iterations: usize,
}

/// A solver for the box-constrained subproblem
///
/// ```text
/// minimize  ψ(x; y, Σ)  subject to  x ∈ C
/// ```
///
/// Implementations evaluate ψ and ∇ψ through the [`Problem`] merit
/// operations and project onto [`Problem::c`].
pub trait InnerSolver {
    /// Improves `x` in place until its stationarity measure is at most
    /// `epsilon`, or a limit is hit.
    ///
    /// # Errors
    ///
    /// Returns any structural error raised by the problem.
    fn solve<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        sigma: &[f64],
        epsilon: f64,
        x: &mut [f64],
        y: &[f64],
    ) -> Result<InnerSolution, Error>;
}
