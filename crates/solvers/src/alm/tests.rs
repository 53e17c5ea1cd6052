use std::collections::VecDeque;

use alm_core::{Bounds, ByRef, Constraints, Counted, FnProblem, Problem};
use approx::assert_relative_eq;

use super::*;

/// f(x) = ½‖x‖², g(x) = x₀ ∈ [1, ∞).
fn problem() -> FnProblem {
    let d = Bounds::new(vec![1.0], vec![f64::INFINITY]).unwrap();
    FnProblem::with_constraints(Constraints::new(Bounds::unbounded(2), d))
        .with_f(|x| 0.5 * (x[0] * x[0] + x[1] * x[1]))
        .with_grad_f(|x, g| g.copy_from_slice(x))
        .with_g(|x, g| g[0] = x[0])
        .with_grad_g_prod(|_, y, out| {
            out[0] = y[0];
            out[1] = 0.0;
        })
}

/// Returns queued iterates instead of solving, repeating the last one.
struct Scripted {
    iterates: VecDeque<[f64; 2]>,
    status: InnerStatus,
    calls: Vec<(Vec<f64>, f64)>,
}

impl Scripted {
    fn new(iterates: &[[f64; 2]]) -> Self {
        Self {
            iterates: iterates.iter().copied().collect(),
            status: InnerStatus::Converged,
            calls: Vec::new(),
        }
    }
}

impl InnerSolver for Scripted {
    fn solve<P: Problem + ?Sized>(
        &mut self,
        _problem: &P,
        sigma: &[f64],
        epsilon: f64,
        x: &mut [f64],
        _y: &[f64],
    ) -> Result<InnerSolution, alm_core::Error> {
        self.calls.push((sigma.to_vec(), epsilon));
        let next = if self.iterates.len() > 1 {
            self.iterates.pop_front()
        } else {
            self.iterates.front().copied()
        };
        if let Some(next) = next {
            x.copy_from_slice(&next);
        }
        Ok(InnerSolution {
            status: self.status,
            stationarity: 0.0,
            iterations: 3,
        })
    }
}

fn params() -> AlmParams {
    AlmParams {
        initial_penalty: Some(10.0),
        penalty_update_factor: 10.0,
        max_iter: 10,
        ..AlmParams::default()
    }
}

#[test]
fn converges_once_violation_vanishes() {
    let mut inner = Scripted::new(&[[0.5, 0.0], [1.0, 0.0]]);

    let solution =
        minimize_unobserved(&problem(), &mut inner, &[0.0, 0.0], &[0.0], &params()).unwrap();

    // Iteration 1: e = 0.5 − 1, ŷ = 10 · (0.5 − 1) = −5, Σ grows to 100.
    // Iteration 2: x₀ = 1 is feasible, so e = 0 while ŷ stays at −5.
    assert_eq!(solution.status, Status::Converged);
    assert_eq!(solution.outer_iterations, 2);
    assert_eq!(solution.inner_iterations, 6);
    assert_eq!(solution.x, vec![1.0, 0.0]);
    assert_relative_eq!(solution.y[0], -5.0, epsilon = 1e-12);
    assert_eq!(solution.sigma, vec![100.0]);
    assert_eq!(solution.norm_e, 0.0);

    assert_eq!(inner.calls[0].0, vec![10.0]);
    assert_eq!(inner.calls[1].0, vec![100.0]);
}

#[test]
fn inner_tolerance_shrinks_to_epsilon() {
    let params = AlmParams {
        initial_tolerance: 1.0,
        tolerance_update_factor: 0.1,
        epsilon: 1e-2,
        max_iter: 4,
        ..params()
    };
    let mut inner = Scripted::new(&[[0.5, 0.0]]);

    let solution =
        minimize_unobserved(&problem(), &mut inner, &[0.0, 0.0], &[0.0], &params).unwrap();

    let tolerances: Vec<f64> = inner.calls.iter().map(|(_, eps)| *eps).collect();
    assert_relative_eq!(tolerances[0], 1.0);
    assert_relative_eq!(tolerances[1], 0.1);
    assert_relative_eq!(tolerances[2], 1e-2);
    assert_relative_eq!(tolerances[3], 1e-2);
    assert_relative_eq!(solution.epsilon, 1e-2);
}

#[test]
fn iteration_limit_reports_max_iter() {
    let mut inner = Scripted::new(&[[0.5, 0.0]]);

    let solution =
        minimize_unobserved(&problem(), &mut inner, &[0.0, 0.0], &[0.0], &params()).unwrap();

    assert_eq!(solution.status, Status::MaxIter);
    assert_eq!(solution.outer_iterations, 10);
    assert_eq!(inner.calls.len(), 10);
    assert!(solution.norm_e > 0.0);
    // Penalties never exceed Σ_max.
    assert!(solution.sigma[0] <= params().max_penalty);
}

#[test]
fn non_finite_inner_result_fails() {
    let mut inner = Scripted::new(&[[f64::NAN, 0.0]]);
    inner.status = InnerStatus::NotFinite;

    let solution =
        minimize_unobserved(&problem(), &mut inner, &[0.0, 0.0], &[0.0], &params()).unwrap();

    assert_eq!(solution.status, Status::Failed);
    assert_eq!(solution.outer_iterations, 1);
    assert_eq!(solution.y, vec![0.0]);
}

#[test]
fn nan_constraint_value_never_converges() {
    // g(x) = √x₀ ∈ [0, 1] is NaN at the iterate x₀ = −1.
    let d = Bounds::new(vec![0.0], vec![1.0]).unwrap();
    let problem = FnProblem::with_constraints(Constraints::new(Bounds::unbounded(2), d))
        .with_f(|x| x[1] * x[1])
        .with_g(|x, g| g[0] = x[0].sqrt());
    let mut inner = Scripted::new(&[[-1.0, 0.0]]);

    let solution =
        minimize_unobserved(&problem, &mut inner, &[0.0, 0.0], &[0.0], &params()).unwrap();

    assert_eq!(solution.status, Status::MaxIter);
    assert!(solution.norm_e.is_nan());
    assert!(solution.y[0].is_nan());
}

#[test]
fn observer_can_stop_early() {
    let mut inner = Scripted::new(&[[0.5, 0.0]]);
    let mut seen = Vec::new();

    let solution = minimize(
        &problem(),
        &mut inner,
        &[0.0, 0.0],
        &[0.0],
        &params(),
        |event: &Event<'_>| {
            seen.push((event.iteration, event.norm_e, event.y.to_vec()));
            (event.iteration == 2).then_some(Action::StopEarly)
        },
    )
    .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.outer_iterations, 3);
    assert_eq!(seen.len(), 3);
    assert_relative_eq!(seen[0].1, 0.5);
    assert_relative_eq!(seen[0].2[0], -5.0, epsilon = 1e-12);
}

#[test]
fn borrowed_observer_follows_several_solves() {
    let mut iterations = Vec::new();
    let mut record = |event: &Event<'_>| -> Option<Action> {
        iterations.push(event.iteration);
        None
    };

    for _ in 0..2 {
        let mut inner = Scripted::new(&[[0.5, 0.0], [1.0, 0.0]]);
        let solution = minimize(
            &problem(),
            &mut inner,
            &[0.0, 0.0],
            &[0.0],
            &params(),
            ByRef(&mut record),
        )
        .unwrap();
        assert_eq!(solution.status, Status::Converged);
    }

    assert_eq!(iterations, vec![0, 1, 0, 1]);
}

#[test]
fn convergence_wins_over_stop_request() {
    let mut inner = Scripted::new(&[[2.0, 0.0]]);

    let solution = minimize(
        &problem(),
        &mut inner,
        &[0.0, 0.0],
        &[0.0],
        &params(),
        |_: &Event<'_>| Some(Action::StopEarly),
    )
    .unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert_eq!(solution.outer_iterations, 1);
}

#[test]
fn initial_penalty_is_chosen_when_absent() {
    let params = AlmParams {
        initial_penalty: None,
        initial_penalty_factor: 20.0,
        ..params()
    };
    let mut inner = Scripted::new(&[[2.0, 0.0]]);

    minimize_unobserved(&problem(), &mut inner, &[3.0, 4.0], &[0.0], &params).unwrap();

    // f(x0) = 12.5, ½‖g(x0)‖² = 4.5
    assert_relative_eq!(inner.calls[0].0[0], 20.0 * 12.5 / 4.5);
}

#[test]
fn unconstrained_problems_need_no_constraint_evaluations() {
    let problem = Counted::new(
        FnProblem::new(2, 0)
            .with_f(|x| x[0] * x[0])
            .with_grad_f(|x, g| g.copy_from_slice(&[2.0 * x[0], 0.0])),
    );
    let mut inner = Scripted::new(&[[0.0, 0.0]]);

    let solution = minimize_unobserved(&problem, &mut inner, &[1.0, 1.0], &[], &params()).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert!(solution.sigma.is_empty());
    assert_eq!(problem.evaluations().total(), 0);
}

#[test]
fn invalid_params_are_rejected() {
    let params = AlmParams {
        max_iter: 0,
        ..params()
    };
    let err = minimize_unobserved(
        &problem(),
        &mut Scripted::new(&[]),
        &[0.0, 0.0],
        &[0.0],
        &params,
    )
    .unwrap_err();

    let Error::InvalidConfig(config) = err else {
        panic!("expected an invalid config error");
    };
    assert_eq!(config.field(), Some("AlmParams::max_iter"));
}

#[test]
fn mismatched_lengths_are_rejected() {
    let err = minimize_unobserved(
        &problem(),
        &mut Scripted::new(&[]),
        &[0.0],
        &[0.0],
        &params(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Problem(alm_core::Error::InvalidArgument(_))
    ));

    let err = minimize_unobserved(
        &problem(),
        &mut Scripted::new(&[]),
        &[0.0, 0.0],
        &[],
        &params(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("y0"));
}

#[test]
fn logs_through_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let mut inner = Scripted::new(&[[0.5, 0.0], [1.0, 0.0]]);
    let solution =
        minimize_unobserved(&problem(), &mut inner, &[0.0, 0.0], &[0.0], &params()).unwrap();
    assert_eq!(solution.status, Status::Converged);
}
