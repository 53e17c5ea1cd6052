use alm_core::{Error, Problem};
use tracing::{debug, trace};

use super::AlmParams;

/// Chooses the initial penalty weights from the problem scaling at `x0`.
///
/// ```text
/// σ = σ₀ · max(1, |f(x0)|) / max(1, ½‖g(x0)‖²)
/// ```
///
/// clamped to `[Σ_min, Σ_max]` and written to every entry of `sigma`.
///
/// # Errors
///
/// Propagates evaluation errors from the problem.
pub fn initialize_penalty<P: Problem + ?Sized>(
    problem: &P,
    params: &AlmParams,
    x0: &[f64],
    sigma: &mut [f64],
) -> Result<(), Error> {
    let f0 = problem.eval_f(x0)?;
    let mut g0 = vec![0.0; problem.m()];
    problem.eval_g(x0, &mut g0)?;

    let half_sq_norm = 0.5 * g0.iter().map(|g| g * g).sum::<f64>();
    let value = params.initial_penalty_factor * f0.abs().max(1.0) / half_sq_norm.max(1.0);
    let value = value.max(params.min_penalty).min(params.max_penalty);

    debug!(f0, half_sq_norm, sigma = value, "initial penalty");
    sigma.fill(value);
    Ok(())
}

/// Updates the penalty weights after an outer iteration.
///
/// `e` is the constraint violation of this iteration and `old_e` that of the
/// previous one, with `norm_e` and `old_norm_e` their norms. When the
/// violation is already below δ the weights are kept. Otherwise a weight
/// grows by up to `penalty_update_factor` if its violation did not shrink by
/// the factor θ, never beyond Σ_max.
#[allow(clippy::too_many_arguments)]
pub fn update_penalty_weights(
    params: &AlmParams,
    penalty_update_factor: f64,
    first_iter: bool,
    e: &[f64],
    old_e: &[f64],
    norm_e: f64,
    old_norm_e: f64,
    sigma_old: &[f64],
    sigma: &mut [f64],
) {
    if norm_e <= params.delta {
        sigma.copy_from_slice(sigma_old);
        return;
    }

    let theta = params.rel_penalty_increase_threshold;
    if params.single_penalty_factor {
        if first_iter || norm_e > theta * old_norm_e {
            let value = params.max_penalty.min(penalty_update_factor * sigma_old[0]);
            trace!(sigma = value, "single penalty increased");
            sigma.fill(value);
        } else {
            sigma.copy_from_slice(sigma_old);
        }
        return;
    }

    for i in 0..e.len() {
        sigma[i] = if first_iter || e[i].abs() > theta * old_e[i].abs() {
            let scale = (penalty_update_factor * e[i].abs() / norm_e).max(1.0);
            params.max_penalty.min(scale * sigma_old[i])
        } else {
            sigma_old[i]
        };
    }
}
