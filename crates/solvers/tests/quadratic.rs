//! Solves a small constrained quadratic end to end with a projected gradient
//! inner solver.

use alm_core::{Counted, Error, Problem};
use alm_problems::Quadratic;
use alm_solvers::{
    SolverConfig,
    alm::{self, AlmParams, InnerSolution, InnerSolver, InnerStatus, Status},
};
use approx::assert_relative_eq;

/// Fixed-step projected gradient descent on ψ over the box `C`.
///
/// The step is `1 / (lipschitz_f + max Σ)`, which is safe for problems whose
/// constraints are linear with unit gradients.
struct ProjectedGradient {
    lipschitz_f: f64,
    max_iter: usize,
}

impl InnerSolver for ProjectedGradient {
    fn solve<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        sigma: &[f64],
        epsilon: f64,
        x: &mut [f64],
        y: &[f64],
    ) -> Result<InnerSolution, Error> {
        let (n, m) = (problem.n(), problem.m());
        let max_sigma = sigma.iter().copied().fold(0.0, f64::max);
        let step = 1.0 / (self.lipschitz_f + max_sigma);

        let mut grad = vec![0.0; n];
        let mut work_n = vec![0.0; n];
        let mut work_m = vec![0.0; m];
        let mut step_x = vec![0.0; n];
        let mut trial = vec![0.0; n];

        for iterations in 0..self.max_iter {
            let psi = problem.eval_psi_grad_psi(x, y, sigma, &mut grad, &mut work_n, &mut work_m)?;
            if !psi.is_finite() {
                return Ok(InnerSolution {
                    status: InnerStatus::NotFinite,
                    stationarity: f64::NAN,
                    iterations,
                });
            }

            for i in 0..n {
                step_x[i] = x[i] - step * grad[i];
            }
            problem.c().project(&step_x, &mut trial);

            let stationarity = x
                .iter()
                .zip(&trial)
                .fold(0.0_f64, |acc, (xi, ti)| acc.max((xi - ti).abs() / step));
            x.copy_from_slice(&trial);

            if stationarity <= epsilon {
                return Ok(InnerSolution {
                    status: InnerStatus::Converged,
                    stationarity,
                    iterations: iterations + 1,
                });
            }
        }

        Ok(InnerSolution {
            status: InnerStatus::MaxIter,
            stationarity: f64::INFINITY,
            iterations: self.max_iter,
        })
    }
}

const X0: [f64; 2] = [3.0, 3.0];
const Y0: [f64; 2] = [0.0, 0.0];

fn params() -> AlmParams {
    AlmParams {
        epsilon: 1e-8,
        delta: 1e-8,
        ..AlmParams::default()
    }
}

#[test]
fn finds_the_constrained_minimum() {
    let problem = Counted::new(Quadratic::new());
    let mut inner = ProjectedGradient {
        lipschitz_f: 4.0,
        max_iter: 1_000_000,
    };

    let solution = alm::minimize_unobserved(&problem, &mut inner, &X0, &Y0, &params()).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], -1.0 / 6.0, epsilon = 1e-6);
    assert_relative_eq!(solution.x[1], 0.5, epsilon = 1e-6);
    assert_relative_eq!(solution.y[0], 0.0, epsilon = 1e-6);
    assert_relative_eq!(solution.y[1], -4.0 / 3.0, epsilon = 1e-5);
    assert!(solution.norm_e <= params().delta);
    assert!(problem.evaluations().psi_grad_psi > 0);
}

#[test]
fn single_penalty_factor_reaches_the_same_point() {
    let params = AlmParams {
        single_penalty_factor: true,
        ..params()
    };
    let mut inner = ProjectedGradient {
        lipschitz_f: 4.0,
        max_iter: 1_000_000,
    };

    let problem = Quadratic::new();
    let solution = alm::minimize_unobserved(&problem, &mut inner, &X0, &Y0, &params).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert_eq!(solution.sigma[0], solution.sigma[1]);
    assert_relative_eq!(solution.x[1], 0.5, epsilon = 1e-6);
}

#[test]
fn parameters_can_come_from_toml() {
    let config = SolverConfig::from_toml_str(
        r#"
        [alm]
        epsilon = 1e-8
        delta = 1e-8
        initial_penalty = 100
        "#,
    )
    .unwrap();
    let mut inner = ProjectedGradient {
        lipschitz_f: 4.0,
        max_iter: 1_000_000,
    };

    let solution = alm::minimize(
        &Quadratic::new(),
        &mut inner,
        &X0,
        &Y0,
        &config.alm,
        |event: &alm::Event<'_>| {
            assert!(event.sigma.iter().all(|&s| s >= 100.0));
            None
        },
    )
    .unwrap();

    assert_eq!(solution.status, Status::Converged);
}
