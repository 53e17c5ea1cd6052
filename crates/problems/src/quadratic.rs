use alm_core::{Bounds, Constraints, Error, FnParamProblem, ParamProblem, Problem};
use ndarray::ArrayViewMut2;

/// `D = ℝ × [0.5, ∞)`
fn constraints() -> Constraints {
    let inf = f64::INFINITY;
    let d = Bounds::new(vec![-inf, 0.5], vec![inf, inf]).expect("constant bounds are ordered");
    Constraints::new(Bounds::unbounded(2), d)
}

/// A convex quadratic whose constraint is the identity map.
///
/// ```text
/// minimize    xᵀQx          Q = [1.5  0.5]
/// subject to  x₁ ≥ 0.5          [0.5  1.5]
/// ```
///
/// written as `g(x) = x ∈ D`. The solution is `x = (−1/6, 1/2)` with
/// multipliers `y = (0, −4/3)`.
///
/// `eval_f_grad_f` is overridden to share the product `Qx`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadratic {
    q: [[f64; 2]; 2],
    constraints: Constraints,
}

impl Default for Quadratic {
    fn default() -> Self {
        Self {
            q: [[1.5, 0.5], [0.5, 1.5]],
            constraints: constraints(),
        }
    }
}

impl Quadratic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn q_prod(&self, v: &[f64]) -> [f64; 2] {
        let q = &self.q;
        [
            q[0][0] * v[0] + q[0][1] * v[1],
            q[1][0] * v[0] + q[1][1] * v[1],
        ]
    }
}

impl Problem for Quadratic {
    fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    fn boxed_clone(&self) -> Result<Box<dyn Problem>, Error> {
        Ok(Box::new(self.clone()))
    }

    fn eval_f(&self, x: &[f64]) -> Result<f64, Error> {
        let qx = self.q_prod(x);
        Ok(x[0] * qx[0] + x[1] * qx[1])
    }

    fn eval_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<(), Error> {
        let qx = self.q_prod(x);
        grad_fx[0] = 2.0 * qx[0];
        grad_fx[1] = 2.0 * qx[1];
        Ok(())
    }

    fn eval_g(&self, x: &[f64], gx: &mut [f64]) -> Result<(), Error> {
        gx.copy_from_slice(x);
        Ok(())
    }

    fn eval_grad_g_prod(&self, _x: &[f64], y: &[f64], grad_gxy: &mut [f64]) -> Result<(), Error> {
        grad_gxy.copy_from_slice(y);
        Ok(())
    }

    fn eval_grad_gi(&self, _x: &[f64], i: usize, grad_gi: &mut [f64]) -> Result<(), Error> {
        if i >= self.m() {
            return Err(Error::invalid_argument(format!(
                "constraint index {i} out of range"
            )));
        }
        grad_gi.fill(0.0);
        grad_gi[i] = 1.0;
        Ok(())
    }

    fn eval_hess_l_prod(
        &self,
        _x: &[f64],
        _y: &[f64],
        v: &[f64],
        hv: &mut [f64],
    ) -> Result<(), Error> {
        let qv = self.q_prod(v);
        hv[0] = 2.0 * qv[0];
        hv[1] = 2.0 * qv[1];
        Ok(())
    }

    fn eval_hess_l(
        &self,
        _x: &[f64],
        _y: &[f64],
        mut h: ArrayViewMut2<'_, f64>,
    ) -> Result<(), Error> {
        for (i, row) in self.q.iter().enumerate() {
            for (j, &qij) in row.iter().enumerate() {
                h[[i, j]] = 2.0 * qij;
            }
        }
        Ok(())
    }

    fn eval_f_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<f64, Error> {
        let qx = self.q_prod(x);
        grad_fx[0] = 2.0 * qx[0];
        grad_fx[1] = 2.0 * qx[1];
        Ok(x[0] * qx[0] + x[1] * qx[1])
    }
}

/// `f(x; p) = ½ xᵀQ(p)x` with `Q(p) = [[p₀, p₁], [p₁, p₂]]`, subject to the
/// same constraints as [`Quadratic`].
///
/// The parameter starts at `(3, 1, 3)`, for which this matches [`Quadratic`].
#[must_use]
pub fn parametric_quadratic() -> FnParamProblem {
    let mut problem = FnParamProblem::with_constraints(constraints(), 3)
        .with_f(|x, p| {
            let cross = 2.0 * p[1] * x[0] * x[1];
            0.5 * (p[0] * x[0] * x[0] + cross + p[2] * x[1] * x[1])
        })
        .with_grad_f(|x, p, g| {
            g[0] = p[0] * x[0] + p[1] * x[1];
            g[1] = p[1] * x[0] + p[2] * x[1];
        })
        .with_g(|x, _, g| g.copy_from_slice(x))
        .with_grad_g_prod(|_, _, y, grad| grad.copy_from_slice(y))
        .with_grad_gi(|_, _, i, grad_gi| {
            grad_gi.fill(0.0);
            grad_gi[i] = 1.0;
        })
        .with_hess_l_prod(|_, p, _, v, hv| {
            hv[0] = p[0] * v[0] + p[1] * v[1];
            hv[1] = p[1] * v[0] + p[2] * v[1];
        })
        .with_hess_l(|_, p, _, mut h| {
            h[[0, 0]] = p[0];
            h[[0, 1]] = p[1];
            h[[1, 0]] = p[1];
            h[[1, 1]] = p[2];
        });
    problem.param_mut().copy_from_slice(&[3.0, 1.0, 3.0]);
    problem
}
