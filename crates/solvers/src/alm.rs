//! Augmented Lagrangian method for problems with general constraints.
//!
//! # Algorithm
//!
//! The constraint `g(x) ∈ D` is moved into the cost through the augmented
//! Lagrangian merit function
//!
//! ```text
//! ψ(x; y, Σ) = f(x) + ½ dist²_Σ(g(x) + Σ⁻¹y, D)
//! ```
//!
//! Each outer iteration minimizes ψ over the box `C` with an
//! [`InnerSolver`], then updates the multipliers `y ← Π(ŷ)` and grows the
//! penalty weights `Σ` of constraints whose violation did not decrease
//! enough. The inner tolerance starts at ε₀ and shrinks by ρ per iteration
//! down to ε.
//!
//! The solve has converged once the constraint violation
//! `e = g(x) − Π_D(g(x) + Σ⁻¹y)` satisfies `‖e‖∞ ≤ δ` and the inner
//! stationarity is at most ε.
//!
//! # Observer Events
//!
//! One [`Event`] is emitted per outer iteration. Observers can return
//! [`Action::StopEarly`] to halt with the current iterate. A converged
//! iteration reports [`Status::Converged`] regardless of the action.

mod action;
mod error;
mod event;
mod inner;
mod multipliers;
mod params;
mod penalty;
mod solution;
mod solve;
mod state;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use inner::{InnerSolution, InnerSolver, InnerStatus};
pub use multipliers::project_y;
pub use params::AlmParams;
pub use penalty::{initialize_penalty, update_penalty_weights};
pub use solution::{Solution, Status};

use alm_core::{Observer, Problem};

/// Minimizes `problem` starting from `x0` with multipliers `y0`.
///
/// The observer receives an [`Event`] after every outer iteration.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if `params` does not verify,
/// [`Error::Problem`] if `x0` or `y0` has the wrong length or an evaluation
/// fails structurally.
pub fn minimize<P, S, Obs>(
    problem: &P,
    inner: &mut S,
    x0: &[f64],
    y0: &[f64],
    params: &AlmParams,
    observer: Obs,
) -> Result<Solution, Error>
where
    P: Problem + ?Sized,
    S: InnerSolver,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    solve::solve(problem, inner, x0, y0, params, observer)
}

/// Minimizes `problem` without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// See [`minimize`].
pub fn minimize_unobserved<P, S>(
    problem: &P,
    inner: &mut S,
    x0: &[f64],
    y0: &[f64],
    params: &AlmParams,
) -> Result<Solution, Error>
where
    P: Problem + ?Sized,
    S: InnerSolver,
{
    minimize(problem, inner, x0, y0, params, ())
}
