use alm_core::{Bounds, Constraints, FnParamProblem, ParamProblem};

/// The Rosenbrock function with its curvature `p` as a parameter.
///
/// ```text
/// f(x; p) = (1 − x₀)² + p (x₁ − x₀²)²
/// ```
///
/// Restricted to `[-0.25, 0.9] × [-0.5, 0.8]`, which excludes the
/// unconstrained minimum at `(1, 1)`. The parameter starts at `p = 100`.
#[must_use]
pub fn rosenbrock() -> FnParamProblem {
    let c = Bounds::new(vec![-0.25, -0.5], vec![0.9, 0.8]).expect("constant bounds are ordered");
    let mut problem = FnParamProblem::with_constraints(Constraints::new(c, Bounds::unbounded(0)), 1)
        .with_f(|x, p| {
            let r = x[1] - x[0] * x[0];
            (1.0 - x[0]).powi(2) + p[0] * r * r
        })
        .with_grad_f(|x, p, g| {
            let r = x[1] - x[0] * x[0];
            g[0] = -2.0 * (1.0 - x[0]) - 4.0 * p[0] * x[0] * r;
            g[1] = 2.0 * p[0] * r;
        })
        .with_g(|_, _, _| {})
        .with_grad_g_prod(|_, _, _, grad| grad.fill(0.0))
        .with_grad_gi(|_, _, _, grad_gi| grad_gi.fill(0.0))
        .with_hess_l_prod(|x, p, _, v, hv| {
            let [h00, h01, h11] = hessian(x, p[0]);
            hv[0] = h00 * v[0] + h01 * v[1];
            hv[1] = h01 * v[0] + h11 * v[1];
        })
        .with_hess_l(|x, p, _, mut h| {
            let [h00, h01, h11] = hessian(x, p[0]);
            h[[0, 0]] = h00;
            h[[0, 1]] = h01;
            h[[1, 0]] = h01;
            h[[1, 1]] = h11;
        });
    problem.param_mut()[0] = 100.0;
    problem
}

fn hessian(x: &[f64], p: f64) -> [f64; 3] {
    [
        2.0 - 4.0 * p * x[1] + 12.0 * p * x[0] * x[0],
        -4.0 * p * x[0],
        2.0 * p,
    ]
}
