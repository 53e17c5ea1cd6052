mod closure;
mod counted;
mod param;


pub use closure::FnProblem;
pub use counted::Counted;
pub use param::{FnParamProblem, ParamProblem};

use ndarray::ArrayViewMut2;

use crate::{Bounds, Error, merit};

/// The variable bounds `C` and constraint bounds `D` of a problem.
///
/// The problem dimensions are derived from the boxes: `n = C.len()` and
/// `m = D.len()`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraints {
    c: Bounds,
    d: Bounds,
}

impl Constraints {
    #[must_use]
    pub fn new(c: Bounds, d: Bounds) -> Self {
        Self { c, d }
    }

    /// Creates constraints that leave `x` and `g(x)` free.
    #[must_use]
    pub fn unbounded(n: usize, m: usize) -> Self {
        Self::new(Bounds::unbounded(n), Bounds::unbounded(m))
    }

    #[must_use]
    pub fn n(&self) -> usize {
        self.c.len()
    }

    #[must_use]
    pub fn m(&self) -> usize {
        self.d.len()
    }

    #[must_use]
    pub fn c(&self) -> &Bounds {
        &self.c
    }

    #[must_use]
    pub fn d(&self) -> &Bounds {
        &self.d
    }

    pub fn c_mut(&mut self) -> &mut Bounds {
        &mut self.c
    }

    pub fn d_mut(&mut self) -> &mut Bounds {
        &mut self.d
    }
}

/// Evaluation contract for minimization problems of the form
///
/// ```text
/// minimize    f(x)               f : ℝⁿ → ℝ
/// subject to  x ∈ C
///             g(x) ∈ D           g : ℝⁿ → ℝᵐ
/// ```
///
/// Implementors supply [`Problem::constraints`] and override whichever
/// primitive evaluations they support; primitives that are not overridden
/// return [`Error::NotImplemented`]. The combined and augmented Lagrangian
/// operations have default implementations written purely in terms of the
/// primitives, and may be overridden when a backend can share intermediate
/// results.
///
/// Output arguments are caller-owned slices of the documented length. No
/// operation allocates.
pub trait Problem {
    /// Returns the boxes `C` and `D`.
    fn constraints(&self) -> &Constraints;

    /// Number of decision variables, the dimension of `x`.
    fn n(&self) -> usize {
        self.constraints().n()
    }

    /// Number of constraints, the dimension of `g(x)`.
    fn m(&self) -> usize {
        self.constraints().m()
    }

    /// Bounds on the decision variables, `x ∈ C`.
    fn c(&self) -> &Bounds {
        self.constraints().c()
    }

    /// Bounds on the constraint values, `g(x) ∈ D`.
    fn d(&self) -> &Bounds {
        self.constraints().d()
    }

    /// Returns an owned duplicate of this problem, captured state included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotCloneable`] unless the implementation opts in.
    fn boxed_clone(&self) -> Result<Box<dyn Problem>, Error> {
        let name = std::any::type_name::<Self>();
        Err(Error::NotCloneable(name.to_owned()))
    }

    // --- Primitive evaluations --------------------------------------------

    /// Evaluates the cost `f(x)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn eval_f(&self, _x: &[f64]) -> Result<f64, Error> {
        Err(Error::NotImplemented("eval_f"))
    }

    /// Evaluates the cost gradient `∇f(x)` into `grad_fx` (length `n`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn eval_grad_f(&self, _x: &[f64], _grad_fx: &mut [f64]) -> Result<(), Error> {
        Err(Error::NotImplemented("eval_grad_f"))
    }

    /// Evaluates the constraints `g(x)` into `gx` (length `m`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn eval_g(&self, _x: &[f64], _gx: &mut [f64]) -> Result<(), Error> {
        Err(Error::NotImplemented("eval_g"))
    }

    /// Evaluates `∇g(x) y` into `grad_gxy` (length `n`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn eval_grad_g_prod(&self, _x: &[f64], _y: &[f64], _grad_gxy: &mut [f64]) -> Result<(), Error> {
        Err(Error::NotImplemented("eval_grad_g_prod"))
    }

    /// Evaluates the gradient `∇gᵢ(x)` of constraint `i < m`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn eval_grad_gi(&self, _x: &[f64], _i: usize, _grad_gi: &mut [f64]) -> Result<(), Error> {
        Err(Error::NotImplemented("eval_grad_gi"))
    }

    /// Evaluates the Hessian-vector product `∇²ₓₓL(x, y) v` into `hv`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn eval_hess_l_prod(
        &self,
        _x: &[f64],
        _y: &[f64],
        _v: &[f64],
        _hv: &mut [f64],
    ) -> Result<(), Error> {
        Err(Error::NotImplemented("eval_hess_l_prod"))
    }

    /// Evaluates the dense `n × n` Hessian of the Lagrangian `∇²ₓₓL(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn eval_hess_l(&self, _x: &[f64], _y: &[f64], _h: ArrayViewMut2<'_, f64>) -> Result<(), Error> {
        Err(Error::NotImplemented("eval_hess_l"))
    }

    // --- Combined evaluations ---------------------------------------------

    /// Evaluates `f(x)` and `∇f(x)`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_f_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<f64, Error> {
        self.eval_grad_f(x, grad_fx)?;
        self.eval_f(x)
    }

    /// Evaluates `f(x)` and `g(x)`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_f_g(&self, x: &[f64], g: &mut [f64]) -> Result<f64, Error> {
        self.eval_g(x, g)?;
        self.eval_f(x)
    }

    /// Evaluates `f(x)`, `∇f(x)` and `g(x)`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_f_grad_f_g(&self, x: &[f64], grad_fx: &mut [f64], g: &mut [f64]) -> Result<f64, Error> {
        self.eval_g(x, g)?;
        self.eval_f_grad_f(x, grad_fx)
    }

    /// Evaluates `∇f(x)` and `∇g(x) y`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_grad_f_grad_g_prod(
        &self,
        x: &[f64],
        y: &[f64],
        grad_f: &mut [f64],
        grad_gxy: &mut [f64],
    ) -> Result<(), Error> {
        self.eval_grad_f(x, grad_f)?;
        self.eval_grad_g_prod(x, y, grad_gxy)
    }

    /// Evaluates the gradient of the Lagrangian `∇f(x) + ∇g(x) y`.
    ///
    /// `work_n` is scratch space of length `n`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_grad_l(
        &self,
        x: &[f64],
        y: &[f64],
        grad_l: &mut [f64],
        work_n: &mut [f64],
    ) -> Result<(), Error> {
        self.eval_grad_f_grad_g_prod(x, y, grad_l, work_n)?;
        for (gl, w) in grad_l.iter_mut().zip(work_n.iter()) {
            *gl += w;
        }
        Ok(())
    }

    // --- Augmented Lagrangian ---------------------------------------------
    //
    // `sigma` holds either one weight shared by every constraint or `m`
    // weights. Any other length panics in `calc_y_hat_dt_y_hat`.

    /// Evaluates `ψ(x)` and writes `ŷ` for a later [`Problem::eval_grad_psi_from_y_hat`].
    ///
    /// When `m = 0` this is `f(x)`, and `y`, `sigma` and `y_hat` are untouched.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_psi_y_hat(
        &self,
        x: &[f64],
        y: &[f64],
        sigma: &[f64],
        y_hat: &mut [f64],
    ) -> Result<f64, Error> {
        if self.m() == 0 {
            return self.eval_f(x);
        }
        let f = self.eval_f_g(x, y_hat)?;
        let dt_y_hat = self.calc_y_hat_dt_y_hat(y_hat, y, sigma);
        Ok(f + 0.5 * dt_y_hat)
    }

    /// Evaluates `∇ψ(x) = ∇f(x) + ∇g(x) ŷ` from a `ŷ` computed at the same `x`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_grad_psi_from_y_hat(
        &self,
        x: &[f64],
        y_hat: &[f64],
        grad_psi: &mut [f64],
        work_n: &mut [f64],
    ) -> Result<(), Error> {
        if self.m() == 0 {
            self.eval_grad_f(x, grad_psi)
        } else {
            self.eval_grad_l(x, y_hat, grad_psi, work_n)
        }
    }

    /// Evaluates `∇ψ(x)`, recomputing `ŷ` in `work_m`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_grad_psi(
        &self,
        x: &[f64],
        y: &[f64],
        sigma: &[f64],
        grad_psi: &mut [f64],
        work_n: &mut [f64],
        work_m: &mut [f64],
    ) -> Result<(), Error> {
        if self.m() == 0 {
            return self.eval_grad_f(x, grad_psi);
        }
        self.eval_g(x, work_m)?;
        self.calc_y_hat_dt_y_hat(work_m, y, sigma);
        self.eval_grad_psi_from_y_hat(x, work_m, grad_psi, work_n)
    }

    /// Evaluates `ψ(x)` and `∇ψ(x)` together, sharing the `g(x)` evaluation.
    ///
    /// On return `work_m` holds `ŷ`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the primitives.
    fn eval_psi_grad_psi(
        &self,
        x: &[f64],
        y: &[f64],
        sigma: &[f64],
        grad_psi: &mut [f64],
        work_n: &mut [f64],
        work_m: &mut [f64],
    ) -> Result<f64, Error> {
        if self.m() == 0 {
            return self.eval_f_grad_f(x, grad_psi);
        }
        let f = self.eval_f_g(x, work_m)?;
        let dt_y_hat = self.calc_y_hat_dt_y_hat(work_m, y, sigma);
        self.eval_grad_l(x, work_m, grad_psi, work_n)?;
        Ok(f + 0.5 * dt_y_hat)
    }

    /// Turns `g(x)` in `g_y_hat` into `ŷ` and returns `dᵀŷ`.
    ///
    /// See [`merit::calc_y_hat_dt_y_hat`].
    fn calc_y_hat_dt_y_hat(&self, g_y_hat: &mut [f64], y: &[f64], sigma: &[f64]) -> f64 {
        merit::calc_y_hat_dt_y_hat(self.d(), g_y_hat, y, sigma)
    }
}

impl<P: Problem + ?Sized> Problem for Box<P> {
    fn constraints(&self) -> &Constraints {
        (**self).constraints()
    }

    fn boxed_clone(&self) -> Result<Box<dyn Problem>, Error> {
        (**self).boxed_clone()
    }

    fn eval_f(&self, x: &[f64]) -> Result<f64, Error> {
        (**self).eval_f(x)
    }

    fn eval_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<(), Error> {
        (**self).eval_grad_f(x, grad_fx)
    }

    fn eval_g(&self, x: &[f64], gx: &mut [f64]) -> Result<(), Error> {
        (**self).eval_g(x, gx)
    }

    fn eval_grad_g_prod(&self, x: &[f64], y: &[f64], grad_gxy: &mut [f64]) -> Result<(), Error> {
        (**self).eval_grad_g_prod(x, y, grad_gxy)
    }

    fn eval_grad_gi(&self, x: &[f64], i: usize, grad_gi: &mut [f64]) -> Result<(), Error> {
        (**self).eval_grad_gi(x, i, grad_gi)
    }

    fn eval_hess_l_prod(
        &self,
        x: &[f64],
        y: &[f64],
        v: &[f64],
        hv: &mut [f64],
    ) -> Result<(), Error> {
        (**self).eval_hess_l_prod(x, y, v, hv)
    }

    fn eval_hess_l(&self, x: &[f64], y: &[f64], h: ArrayViewMut2<'_, f64>) -> Result<(), Error> {
        (**self).eval_hess_l(x, y, h)
    }

    fn eval_f_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<f64, Error> {
        (**self).eval_f_grad_f(x, grad_fx)
    }

    fn eval_f_g(&self, x: &[f64], g: &mut [f64]) -> Result<f64, Error> {
        (**self).eval_f_g(x, g)
    }

    fn eval_f_grad_f_g(&self, x: &[f64], grad_fx: &mut [f64], g: &mut [f64]) -> Result<f64, Error> {
        (**self).eval_f_grad_f_g(x, grad_fx, g)
    }

    fn eval_grad_f_grad_g_prod(
        &self,
        x: &[f64],
        y: &[f64],
        grad_f: &mut [f64],
        grad_gxy: &mut [f64],
    ) -> Result<(), Error> {
        (**self).eval_grad_f_grad_g_prod(x, y, grad_f, grad_gxy)
    }

    fn eval_grad_l(
        &self,
        x: &[f64],
        y: &[f64],
        grad_l: &mut [f64],
        work_n: &mut [f64],
    ) -> Result<(), Error> {
        (**self).eval_grad_l(x, y, grad_l, work_n)
    }

    fn eval_psi_y_hat(
        &self,
        x: &[f64],
        y: &[f64],
        sigma: &[f64],
        y_hat: &mut [f64],
    ) -> Result<f64, Error> {
        (**self).eval_psi_y_hat(x, y, sigma, y_hat)
    }

    fn eval_grad_psi_from_y_hat(
        &self,
        x: &[f64],
        y_hat: &[f64],
        grad_psi: &mut [f64],
        work_n: &mut [f64],
    ) -> Result<(), Error> {
        (**self).eval_grad_psi_from_y_hat(x, y_hat, grad_psi, work_n)
    }

    fn eval_grad_psi(
        &self,
        x: &[f64],
        y: &[f64],
        sigma: &[f64],
        grad_psi: &mut [f64],
        work_n: &mut [f64],
        work_m: &mut [f64],
    ) -> Result<(), Error> {
        (**self).eval_grad_psi(x, y, sigma, grad_psi, work_n, work_m)
    }

    fn eval_psi_grad_psi(
        &self,
        x: &[f64],
        y: &[f64],
        sigma: &[f64],
        grad_psi: &mut [f64],
        work_n: &mut [f64],
        work_m: &mut [f64],
    ) -> Result<f64, Error> {
        (**self).eval_psi_grad_psi(x, y, sigma, grad_psi, work_n, work_m)
    }

    fn calc_y_hat_dt_y_hat(&self, g_y_hat: &mut [f64], y: &[f64], sigma: &[f64]) -> f64 {
        (**self).calc_y_hat_dt_y_hat(g_y_hat, y, sigma)
    }
}
