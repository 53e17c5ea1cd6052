use alm_core::{Counted, Error, ParamProblem, Problem};
use alm_problems::{Quadratic, himmelblau, parametric_quadratic, rosenbrock};
use approx::assert_relative_eq;
use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::StdRng};

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|vi| vi * vi).sum::<f64>().sqrt()
}

/// Central finite-difference approximation of `∇²L(x, y) v` from gradients.
fn fd_hess_prod<P: Problem + ?Sized>(problem: &P, x: &[f64], y: &[f64], v: &[f64]) -> Vec<f64> {
    let h = 1e-5;
    let n = x.len();
    let forward: Vec<f64> = x.iter().zip(v).map(|(xi, vi)| xi + h * vi).collect();
    let backward: Vec<f64> = x.iter().zip(v).map(|(xi, vi)| xi - h * vi).collect();

    let mut plus = vec![0.0; n];
    let mut minus = vec![0.0; n];
    let mut work = vec![0.0; n];
    problem.eval_grad_l(&forward, y, &mut plus, &mut work).unwrap();
    problem.eval_grad_l(&backward, y, &mut minus, &mut work).unwrap();

    plus.iter()
        .zip(&minus)
        .map(|(p, m)| (p - m) / (2.0 * h))
        .collect()
}

fn assert_hessian_matches_fd<P: Problem + ?Sized>(problem: &P, x: &[f64], y: &[f64], seed: u64) {
    let n = problem.n();
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..5 {
        let v: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();

        let mut hv = vec![0.0; n];
        problem.eval_hess_l_prod(x, y, &v, &mut hv).unwrap();
        let fd = fd_hess_prod(problem, x, y, &v);

        let diff: Vec<f64> = hv.iter().zip(&fd).map(|(a, b)| a - b).collect();
        let rel_err = norm(&diff) / norm(&hv);
        assert!(rel_err < 1e-4, "relative error {rel_err} for v = {v:?}");
    }
}

fn assert_dense_hessian_matches_prod<P: Problem + ?Sized>(problem: &P, x: &[f64], y: &[f64]) {
    let n = problem.n();
    let mut h = Array2::zeros((n, n));
    problem.eval_hess_l(x, y, h.view_mut()).unwrap();

    for j in 0..n {
        let mut e = vec![0.0; n];
        e[j] = 1.0;
        let mut hv = vec![0.0; n];
        problem.eval_hess_l_prod(x, y, &e, &mut hv).unwrap();
        for i in 0..n {
            assert_relative_eq!(h[[i, j]], hv[i]);
        }
    }
}

#[test]
fn himmelblau_has_a_minimum_at_three_two() {
    let problem = himmelblau();
    assert_eq!((problem.n(), problem.m()), (2, 0));
    assert!(!problem.c().contains(&[3.0, 2.0]));
    assert!(problem.c().contains(&[3.0, 1.8]));

    let mut grad = [1.0; 2];
    let f = problem.eval_f_grad_f(&[3.0, 2.0], &mut grad).unwrap();
    assert_eq!(f, 0.0);
    assert_eq!(norm(&grad), 0.0);
}

#[test]
fn himmelblau_hessian_matches_finite_differences() {
    let problem = himmelblau();
    assert_hessian_matches_fd(&problem, &[0.0, 0.0], &[], 7);
    assert_hessian_matches_fd(&problem, &[-0.5, 1.2], &[], 11);
    assert_dense_hessian_matches_prod(&problem, &[0.0, 0.0], &[]);
    assert_dense_hessian_matches_prod(&problem, &[2.5, -0.3], &[]);
}

#[test]
fn himmelblau_merit_is_its_cost() {
    let problem = himmelblau();
    let x = [1.0, 1.0];
    let mut grad = [0.0; 2];
    let psi = problem
        .eval_psi_grad_psi(&x, &[], &[], &mut grad, &mut [0.0; 2], &mut [])
        .unwrap();

    // (1 + 1 − 11)² + (1 + 1 − 7)² = 81 + 25
    assert_eq!(psi, 106.0);
    let dx0 = 2.0 * (2.0 * -9.0 - 5.0);
    let dx1 = 2.0 * (1.0 + 2.0 * -5.0 - 10.0);
    assert_eq!(grad, [dx0, dx1]);
}

#[test]
fn rosenbrock_depends_on_its_parameter() {
    let mut problem = rosenbrock();
    assert_eq!(problem.param(), &[100.0]);

    let x = [0.5, 0.5];
    // (1 − 0.5)² + 100 (0.5 − 0.25)²
    assert_relative_eq!(problem.eval_f(&x).unwrap(), 0.25 + 6.25);

    problem.set_param(&[1.0]).unwrap();
    assert_relative_eq!(problem.eval_f(&x).unwrap(), 0.25 + 0.0625);

    assert!(matches!(
        problem.set_param(&[1.0, 2.0]),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn rosenbrock_derivatives_are_consistent() {
    let mut problem = rosenbrock();
    let mut grad = [0.0; 2];
    let f = problem.eval_f_grad_f(&[1.0, 1.0], &mut grad).unwrap();
    assert_eq!(f, 0.0);
    assert_eq!(grad, [0.0, 0.0]);

    assert_hessian_matches_fd(&problem, &[0.3, -0.2], &[], 1);
    problem.set_param(&[2.5]).unwrap();
    assert_hessian_matches_fd(&problem, &[-0.1, 0.7], &[], 2);
    assert_dense_hessian_matches_prod(&problem, &[0.8, 0.1], &[]);
}

#[test]
fn quadratic_fused_evaluation_matches_primitives() {
    let problem = Quadratic::new();
    let x = [0.7, -1.3];

    let mut fused = [0.0; 2];
    let f = problem.eval_f_grad_f(&x, &mut fused).unwrap();

    let mut grad = [0.0; 2];
    problem.eval_grad_f(&x, &mut grad).unwrap();
    assert_eq!(f, problem.eval_f(&x).unwrap());
    assert_eq!(fused, grad);
}

#[test]
fn quadratic_hessian_and_constraints() {
    let problem = Quadratic::new();
    let y = [0.2, -0.4];
    assert_hessian_matches_fd(&problem, &[3.0, 3.0], &y, 3);
    assert_dense_hessian_matches_prod(&problem, &[3.0, 3.0], &y);

    let mut grad_gi = [9.0; 2];
    problem.eval_grad_gi(&[0.0, 0.0], 1, &mut grad_gi).unwrap();
    assert_eq!(grad_gi, [0.0, 1.0]);
    assert!(matches!(
        problem.eval_grad_gi(&[0.0, 0.0], 2, &mut grad_gi),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn parametric_quadratic_matches_default_quadratic() {
    let fixed = Quadratic::new();
    let family = parametric_quadratic();
    let x = [3.0, 3.0];
    let y = [1.0, -2.0];
    let sigma = [1e3, 1e3];

    let (mut work_n, mut work_m) = ([0.0; 2], [0.0; 2]);
    let (mut grad_a, mut grad_b) = ([0.0; 2], [0.0; 2]);
    let psi_a = fixed
        .eval_psi_grad_psi(&x, &y, &sigma, &mut grad_a, &mut work_n, &mut work_m)
        .unwrap();
    let psi_b = family
        .eval_psi_grad_psi(&x, &y, &sigma, &mut grad_b, &mut work_n, &mut work_m)
        .unwrap();

    assert_relative_eq!(psi_a, psi_b, max_relative = 1e-12);
    assert_relative_eq!(grad_a[0], grad_b[0], max_relative = 1e-12);
    assert_relative_eq!(grad_a[1], grad_b[1], max_relative = 1e-12);
}

#[test]
fn clones_evaluate_like_the_original() {
    let problems: Vec<Box<dyn Problem>> = vec![
        Box::new(himmelblau()),
        Box::new(rosenbrock()),
        Box::new(Quadratic::new()),
        Box::new(parametric_quadratic()),
    ];
    let x = [0.4, 0.6];

    for problem in &problems {
        let copy = problem.boxed_clone().unwrap();
        assert_eq!(copy.n(), problem.n());
        assert_eq!(copy.m(), problem.m());
        assert_eq!(copy.c(), problem.c());
        assert_eq!(copy.d(), problem.d());
        assert_eq!(copy.eval_f(&x).unwrap(), problem.eval_f(&x).unwrap());
    }
}

#[test]
fn counting_does_not_change_results() {
    let plain = Quadratic::new();
    let counted = Counted::new(Quadratic::new());
    let x = [0.1, 0.2];
    let y = [0.5, -0.5];
    let sigma = [10.0, 20.0];

    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..4 {
        let x = [
            x[0] + rng.random_range(-1.0..1.0),
            x[1] + rng.random_range(-1.0..1.0),
        ];
        let (mut work_n, mut work_m) = ([0.0; 2], [0.0; 2]);
        let (mut a, mut b) = ([0.0; 2], [0.0; 2]);
        let psi_a = plain
            .eval_psi_grad_psi(&x, &y, &sigma, &mut a, &mut work_n, &mut work_m)
            .unwrap();
        let psi_b = counted
            .eval_psi_grad_psi(&x, &y, &sigma, &mut b, &mut work_n, &mut work_m)
            .unwrap();
        assert_eq!(psi_a, psi_b);
        assert_eq!(a, b);
    }

    assert_eq!(counted.evaluations().psi_grad_psi, 4);
    assert_eq!(counted.evaluations().total(), 4);
    assert!(counted.evaluations().to_string().contains("ψ_grad_ψ"));
}
