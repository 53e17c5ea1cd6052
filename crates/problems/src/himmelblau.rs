use alm_core::{Bounds, Constraints, FnProblem};

fn sq(x: f64) -> f64 {
    x * x
}

/// Himmelblau's function on `[-1, 4] × [-1, 1.8]`, without general
/// constraints.
///
/// ```text
/// f(x) = (x₀² + x₁ − 11)² + (x₀ + x₁² − 7)²
/// ```
///
/// `(3, 2)`, one of its four global minima, lies inside the box.
#[must_use]
pub fn himmelblau() -> FnProblem {
    let c = Bounds::new(vec![-1.0, -1.0], vec![4.0, 1.8])
        .expect("constant bounds are ordered");
    FnProblem::with_constraints(Constraints::new(c, Bounds::unbounded(0)))
        .with_f(|x| sq(sq(x[0]) + x[1] - 11.0) + sq(x[0] + sq(x[1]) - 7.0))
        .with_grad_f(|x, g| {
            g[0] = 2.0 * (2.0 * x[0] * (sq(x[0]) + x[1] - 11.0) + x[0] + sq(x[1]) - 7.0);
            g[1] = 2.0 * (sq(x[0]) + 2.0 * x[1] * (x[0] + sq(x[1]) - 7.0) + x[1] - 11.0);
        })
        .with_g(|_, _| {})
        .with_grad_g_prod(|_, _, grad| grad.fill(0.0))
        .with_grad_gi(|_, _, grad_gi| grad_gi.fill(0.0))
        .with_hess_l_prod(|x, _, v, hv| {
            let [h00, h01, h11] = hessian(x);
            hv[0] = h00 * v[0] + h01 * v[1];
            hv[1] = h01 * v[0] + h11 * v[1];
        })
        .with_hess_l(|x, _, mut h| {
            let [h00, h01, h11] = hessian(x);
            h[[0, 0]] = h00;
            h[[0, 1]] = h01;
            h[[1, 0]] = h01;
            h[[1, 1]] = h11;
        })
}

/// Upper triangle of ∇²f.
fn hessian(x: &[f64]) -> [f64; 3] {
    [
        4.0 * (sq(x[0]) + x[1] - 11.0) + 8.0 * sq(x[0]) + 2.0,
        4.0 * x[0] + 4.0 * x[1],
        4.0 * (x[0] + sq(x[1]) - 7.0) + 8.0 * sq(x[1]) + 2.0,
    ]
}
