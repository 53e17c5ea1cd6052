use std::time::Instant;

use alm_core::Problem;

use super::{AlmParams, Solution, Status, initialize_penalty, project_y, update_penalty_weights};

/// Iterates and work buffers of the outer loop.
pub(super) struct State {
    pub(super) x: Vec<f64>,
    pub(super) y: Vec<f64>,
    pub(super) sigma: Vec<f64>,
    sigma_old: Vec<f64>,
    g: Vec<f64>,
    y_hat: Vec<f64>,
    e: Vec<f64>,
    old_e: Vec<f64>,
    pub(super) norm_e: f64,
    old_norm_e: f64,
    pub(super) epsilon: f64,
    pub(super) inner_iterations: usize,
    start: Instant,
}

impl State {
    /// Sets up the first outer iteration, choosing Σ₀ if none was given.
    pub(super) fn new<P: Problem + ?Sized>(
        problem: &P,
        params: &AlmParams,
        x0: &[f64],
        y0: &[f64],
    ) -> Result<Self, alm_core::Error> {
        let start = Instant::now();
        let m = problem.m();

        let mut sigma = vec![0.0; m];
        if m > 0 {
            match params.initial_penalty {
                Some(value) => sigma.fill(value),
                None => initialize_penalty(problem, params, x0, &mut sigma)?,
            }
        }

        Ok(Self {
            x: x0.to_vec(),
            y: y0.to_vec(),
            sigma_old: sigma.clone(),
            sigma,
            g: vec![0.0; m],
            y_hat: vec![0.0; m],
            e: vec![0.0; m],
            old_e: vec![0.0; m],
            norm_e: f64::INFINITY,
            old_norm_e: f64::INFINITY,
            epsilon: params.initial_tolerance,
            inner_iterations: 0,
            start,
        })
    }

    /// Computes the constraint violation `e = g(x) − Π_D(g(x) + Σ⁻¹y)` and
    /// replaces `y` by the projected `ŷ`.
    pub(super) fn update_multipliers<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        params: &AlmParams,
    ) -> Result<(), alm_core::Error> {
        if self.y.is_empty() {
            self.norm_e = 0.0;
            return Ok(());
        }

        problem.eval_g(&self.x, &mut self.g)?;

        let d = problem.d();
        let (lb, ub) = (d.lowerbound(), d.upperbound());
        for i in 0..self.g.len() {
            let zeta = self.g[i] + self.y[i] / self.sigma[i];
            let projected = if zeta.is_nan() {
                zeta
            } else {
                zeta.max(lb[i]).min(ub[i])
            };
            self.e[i] = self.g[i] - projected;
        }
        self.norm_e = inf_norm(&self.e);

        self.y_hat.copy_from_slice(&self.g);
        problem.calc_y_hat_dt_y_hat(&mut self.y_hat, &self.y, &self.sigma);
        self.y.copy_from_slice(&self.y_hat);
        project_y(&mut self.y, lb, ub, params.max_multiplier);
        Ok(())
    }

    /// Updates Σ and moves the current violation into the history.
    pub(super) fn update_penalty(&mut self, params: &AlmParams, first_iter: bool) {
        self.sigma_old.copy_from_slice(&self.sigma);
        update_penalty_weights(
            params,
            params.penalty_update_factor,
            first_iter,
            &self.e,
            &self.old_e,
            self.norm_e,
            self.old_norm_e,
            &self.sigma_old,
            &mut self.sigma,
        );
        std::mem::swap(&mut self.e, &mut self.old_e);
        self.old_norm_e = self.norm_e;
    }

    pub(super) fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    pub(super) fn into_solution(self, status: Status, outer_iterations: usize) -> Solution {
        Solution {
            status,
            elapsed: self.start.elapsed(),
            x: self.x,
            y: self.y,
            sigma: self.sigma,
            norm_e: self.norm_e,
            epsilon: self.epsilon,
            outer_iterations,
            inner_iterations: self.inner_iterations,
        }
    }
}

/// `‖v‖∞`, or NaN if any entry is NaN.
fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, vi| {
        if vi.is_nan() || acc.is_nan() {
            f64::NAN
        } else {
            acc.max(vi.abs())
        }
    })
}
