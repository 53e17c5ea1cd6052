use std::{fmt, sync::Arc};

use ndarray::ArrayViewMut2;

use crate::{Error, Problem, problem::Constraints};

type CostFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;
type VecFn = Arc<dyn Fn(&[f64], &mut [f64]) + Send + Sync>;
type ProdFn = Arc<dyn Fn(&[f64], &[f64], &mut [f64]) + Send + Sync>;
type IndexFn = Arc<dyn Fn(&[f64], usize, &mut [f64]) + Send + Sync>;
type HessProdFn = Arc<dyn Fn(&[f64], &[f64], &[f64], &mut [f64]) + Send + Sync>;
type HessFn = Arc<dyn for<'a> Fn(&[f64], &[f64], ArrayViewMut2<'a, f64>) + Send + Sync>;

/// A problem whose primitive evaluations are supplied as closures.
///
/// Each primitive is set independently; an unset primitive reports
/// [`Error::NotImplemented`]. Combined and merit operations come from the
/// [`Problem`] defaults. Cloning shares the captured closures, so a clone
/// evaluates exactly like the original.
///
/// ```
/// use alm_core::{FnProblem, Problem};
///
/// let problem = FnProblem::new(2, 0)
///     .with_f(|x| x[0] * x[0] + x[1] * x[1])
///     .with_grad_f(|x, g| {
///         g[0] = 2.0 * x[0];
///         g[1] = 2.0 * x[1];
///     });
///
/// assert_eq!(problem.eval_f(&[1.0, 2.0]).unwrap(), 5.0);
/// let mut h = ndarray::Array2::zeros((2, 2));
/// assert!(problem.eval_hess_l(&[0.0; 2], &[], h.view_mut()).is_err());
/// ```
#[derive(Clone)]
pub struct FnProblem {
    constraints: Constraints,
    f: Option<CostFn>,
    grad_f: Option<VecFn>,
    g: Option<VecFn>,
    grad_g_prod: Option<ProdFn>,
    grad_gi: Option<IndexFn>,
    hess_l_prod: Option<HessProdFn>,
    hess_l: Option<HessFn>,
}

impl FnProblem {
    /// Creates a problem with `n` variables and `m` constraints, all unbounded.
    #[must_use]
    pub fn new(n: usize, m: usize) -> Self {
        Self::with_constraints(Constraints::unbounded(n, m))
    }

    #[must_use]
    pub fn with_constraints(constraints: Constraints) -> Self {
        Self {
            constraints,
            f: None,
            grad_f: None,
            g: None,
            grad_g_prod: None,
            grad_gi: None,
            hess_l_prod: None,
            hess_l: None,
        }
    }

    pub fn constraints_mut(&mut self) -> &mut Constraints {
        &mut self.constraints
    }

    #[must_use]
    pub fn with_f(mut self, f: impl Fn(&[f64]) -> f64 + Send + Sync + 'static) -> Self {
        self.f = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_grad_f(mut self, f: impl Fn(&[f64], &mut [f64]) + Send + Sync + 'static) -> Self {
        self.grad_f = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_g(mut self, f: impl Fn(&[f64], &mut [f64]) + Send + Sync + 'static) -> Self {
        self.g = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_grad_g_prod(
        mut self,
        f: impl Fn(&[f64], &[f64], &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.grad_g_prod = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_grad_gi(
        mut self,
        f: impl Fn(&[f64], usize, &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.grad_gi = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_hess_l_prod(
        mut self,
        f: impl Fn(&[f64], &[f64], &[f64], &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.hess_l_prod = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_hess_l(
        mut self,
        f: impl for<'a> Fn(&[f64], &[f64], ArrayViewMut2<'a, f64>) + Send + Sync + 'static,
    ) -> Self {
        self.hess_l = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for FnProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProblem")
            .field("constraints", &self.constraints)
            .field("f", &self.f.is_some())
            .field("grad_f", &self.grad_f.is_some())
            .field("g", &self.g.is_some())
            .field("grad_g_prod", &self.grad_g_prod.is_some())
            .field("grad_gi", &self.grad_gi.is_some())
            .field("hess_l_prod", &self.hess_l_prod.is_some())
            .field("hess_l", &self.hess_l.is_some())
            .finish()
    }
}

impl Problem for FnProblem {
    fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    fn boxed_clone(&self) -> Result<Box<dyn Problem>, Error> {
        Ok(Box::new(self.clone()))
    }

    fn eval_f(&self, x: &[f64]) -> Result<f64, Error> {
        let f = self.f.as_ref().ok_or(Error::NotImplemented("eval_f"))?;
        Ok(f(x))
    }

    fn eval_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<(), Error> {
        let f = self
            .grad_f
            .as_ref()
            .ok_or(Error::NotImplemented("eval_grad_f"))?;
        f(x, grad_fx);
        Ok(())
    }

    fn eval_g(&self, x: &[f64], gx: &mut [f64]) -> Result<(), Error> {
        let f = self.g.as_ref().ok_or(Error::NotImplemented("eval_g"))?;
        f(x, gx);
        Ok(())
    }

    fn eval_grad_g_prod(&self, x: &[f64], y: &[f64], grad_gxy: &mut [f64]) -> Result<(), Error> {
        let f = self
            .grad_g_prod
            .as_ref()
            .ok_or(Error::NotImplemented("eval_grad_g_prod"))?;
        f(x, y, grad_gxy);
        Ok(())
    }

    fn eval_grad_gi(&self, x: &[f64], i: usize, grad_gi: &mut [f64]) -> Result<(), Error> {
        let f = self
            .grad_gi
            .as_ref()
            .ok_or(Error::NotImplemented("eval_grad_gi"))?;
        f(x, i, grad_gi);
        Ok(())
    }

    fn eval_hess_l_prod(
        &self,
        x: &[f64],
        y: &[f64],
        v: &[f64],
        hv: &mut [f64],
    ) -> Result<(), Error> {
        let f = self
            .hess_l_prod
            .as_ref()
            .ok_or(Error::NotImplemented("eval_hess_l_prod"))?;
        f(x, y, v, hv);
        Ok(())
    }

    fn eval_hess_l(&self, x: &[f64], y: &[f64], h: ArrayViewMut2<'_, f64>) -> Result<(), Error> {
        let f = self
            .hess_l
            .as_ref()
            .ok_or(Error::NotImplemented("eval_hess_l"))?;
        f(x, y, h);
        Ok(())
    }
}
