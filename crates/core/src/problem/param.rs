use std::{fmt, sync::Arc};

use ndarray::ArrayViewMut2;

use crate::{Error, Problem, problem::Constraints};

/// A problem family that shares structure across a parameter vector.
///
/// The parameter has a fixed size `p` and is threaded into every evaluation,
/// so a problem can be re-evaluated at new parameter values (for example, a
/// new initial state in receding-horizon control) without reconstruction.
pub trait ParamProblem: Problem {
    /// Returns the current parameter vector.
    fn param(&self) -> &[f64];

    /// Returns the parameter vector for in-place modification.
    fn param_mut(&mut self) -> &mut [f64];

    /// Number of parameters.
    fn p(&self) -> usize {
        self.param().len()
    }

    /// Replaces the parameter vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `param` does not have length `p`.
    fn set_param(&mut self, param: &[f64]) -> Result<(), Error> {
        if param.len() != self.p() {
            return Err(Error::invalid_argument(format!(
                "parameter has length {} but the problem expects {}",
                param.len(),
                self.p()
            )));
        }
        self.param_mut().copy_from_slice(param);
        Ok(())
    }
}

type CostFn = Arc<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>;
type VecFn = Arc<dyn Fn(&[f64], &[f64], &mut [f64]) + Send + Sync>;
type ProdFn = Arc<dyn Fn(&[f64], &[f64], &[f64], &mut [f64]) + Send + Sync>;
type IndexFn = Arc<dyn Fn(&[f64], &[f64], usize, &mut [f64]) + Send + Sync>;
type HessProdFn = Arc<dyn Fn(&[f64], &[f64], &[f64], &[f64], &mut [f64]) + Send + Sync>;
type HessFn = Arc<dyn for<'a> Fn(&[f64], &[f64], &[f64], ArrayViewMut2<'a, f64>) + Send + Sync>;

/// A closure-backed [`ParamProblem`].
///
/// Every closure receives the parameter vector right after `x`. The
/// parameter starts out filled with NaN so that evaluating before
/// [`ParamProblem::set_param`] shows up in the results.
#[derive(Clone)]
pub struct FnParamProblem {
    constraints: Constraints,
    param: Vec<f64>,
    f: Option<CostFn>,
    grad_f: Option<VecFn>,
    g: Option<VecFn>,
    grad_g_prod: Option<ProdFn>,
    grad_gi: Option<IndexFn>,
    hess_l_prod: Option<HessProdFn>,
    hess_l: Option<HessFn>,
}

impl FnParamProblem {
    /// Creates a problem with `n` variables, `m` constraints and `p` parameters.
    #[must_use]
    pub fn new(n: usize, m: usize, p: usize) -> Self {
        Self::with_constraints(Constraints::unbounded(n, m), p)
    }

    #[must_use]
    pub fn with_constraints(constraints: Constraints, p: usize) -> Self {
        Self {
            constraints,
            param: vec![f64::NAN; p],
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
    pub fn with_f(mut self, f: impl Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static) -> Self {
        self.f = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_grad_f(
        mut self,
        f: impl Fn(&[f64], &[f64], &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.grad_f = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_g(
        mut self,
        f: impl Fn(&[f64], &[f64], &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.g = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_grad_g_prod(
        mut self,
        f: impl Fn(&[f64], &[f64], &[f64], &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.grad_g_prod = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_grad_gi(
        mut self,
        f: impl Fn(&[f64], &[f64], usize, &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.grad_gi = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_hess_l_prod(
        mut self,
        f: impl Fn(&[f64], &[f64], &[f64], &[f64], &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.hess_l_prod = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_hess_l(
        mut self,
        f: impl for<'a> Fn(&[f64], &[f64], &[f64], ArrayViewMut2<'a, f64>) + Send + Sync + 'static,
    ) -> Self {
        self.hess_l = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for FnParamProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnParamProblem")
            .field("constraints", &self.constraints)
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

impl ParamProblem for FnParamProblem {
    fn param(&self) -> &[f64] {
        &self.param
    }

    fn param_mut(&mut self) -> &mut [f64] {
        &mut self.param
    }
}

impl Problem for FnParamProblem {
    fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    fn boxed_clone(&self) -> Result<Box<dyn Problem>, Error> {
        Ok(Box::new(self.clone()))
    }

    fn eval_f(&self, x: &[f64]) -> Result<f64, Error> {
        let f = self.f.as_ref().ok_or(Error::NotImplemented("eval_f"))?;
        Ok(f(x, &self.param))
    }

    fn eval_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<(), Error> {
        let f = self
            .grad_f
            .as_ref()
            .ok_or(Error::NotImplemented("eval_grad_f"))?;
        f(x, &self.param, grad_fx);
        Ok(())
    }

    fn eval_g(&self, x: &[f64], gx: &mut [f64]) -> Result<(), Error> {
        let f = self.g.as_ref().ok_or(Error::NotImplemented("eval_g"))?;
        f(x, &self.param, gx);
        Ok(())
    }

    fn eval_grad_g_prod(&self, x: &[f64], y: &[f64], grad_gxy: &mut [f64]) -> Result<(), Error> {
        let f = self
            .grad_g_prod
            .as_ref()
            .ok_or(Error::NotImplemented("eval_grad_g_prod"))?;
        f(x, &self.param, y, grad_gxy);
        Ok(())
    }

    fn eval_grad_gi(&self, x: &[f64], i: usize, grad_gi: &mut [f64]) -> Result<(), Error> {
        let f = self
            .grad_gi
            .as_ref()
            .ok_or(Error::NotImplemented("eval_grad_gi"))?;
        f(x, &self.param, i, grad_gi);
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
        f(x, &self.param, y, v, hv);
        Ok(())
    }

    fn eval_hess_l(&self, x: &[f64], y: &[f64], h: ArrayViewMut2<'_, f64>) -> Result<(), Error> {
        let f = self
            .hess_l
            .as_ref()
            .ok_or(Error::NotImplemented("eval_hess_l"))?;
        f(x, &self.param, y, h);
        Ok(())
    }
}
