//! The shared numerical kernel behind every ψ and ∇ψ evaluation.
//!
//! Given the constraint value `g(x)`, multipliers `y`, and penalty weights
//! `Σ`, the augmented Lagrangian merit function is
//!
//! ```text
//! ψ(x) = f(x) + ½ dist²_Σ(g(x) + Σ⁻¹y, D)
//!      = f(x) + ½ dᵀŷ
//!
//! with  ζ = g(x) + Σ⁻¹y
//!       d = ζ − Π_D(ζ)
//!       ŷ = Σ d
//! ```
//!
//! and its gradient is `∇ψ(x) = ∇f(x) + ∇g(x) ŷ`.

use crate::{Bounds, bounds::clamp};

/// Computes `ŷ` in place and returns `dᵀŷ`.
///
/// On entry `g_y_hat` holds `g(x)`, on return it holds `ŷ`. `sigma` is
/// either a single weight broadcast to every constraint or one weight per
/// constraint. Both layouts perform the same floating-point operations per
/// coordinate, so a uniform weight vector reproduces the scalar result
/// exactly.
///
/// # Panics
///
/// Panics if `sigma` has neither one nor `m` entries.
pub fn calc_y_hat_dt_y_hat(d: &Bounds, g_y_hat: &mut [f64], y: &[f64], sigma: &[f64]) -> f64 {
    let m = d.len();
    debug_assert_eq!(g_y_hat.len(), m);
    debug_assert_eq!(y.len(), m);
    let (lb, ub) = (d.lowerbound(), d.upperbound());

    if let [sigma] = *sigma {
        let sigma_inv = 1.0 / sigma;
        let mut dt_y_hat = 0.0;
        for i in 0..m {
            let zeta = g_y_hat[i] + sigma_inv * y[i];
            let di = zeta - clamp(zeta, lb[i], ub[i]);
            dt_y_hat += di * sigma * di;
            g_y_hat[i] = sigma * di;
        }
        dt_y_hat
    } else {
        assert_eq!(
            sigma.len(),
            m,
            "sigma must hold one weight or one per constraint"
        );
        let mut dt_y_hat = 0.0;
        for i in 0..m {
            let zeta = g_y_hat[i] + (1.0 / sigma[i]) * y[i];
            let di = zeta - clamp(zeta, lb[i], ub[i]);
            dt_y_hat += di * sigma[i] * di;
            g_y_hat[i] = sigma[i] * di;
        }
        dt_y_hat
    }
}
