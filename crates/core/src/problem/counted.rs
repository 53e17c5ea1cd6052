use std::{cell::Cell, time::Instant};

use ndarray::ArrayViewMut2;

use crate::{Error, Eval, EvalCounter, ParamProblem, Problem, problem::Constraints};

/// Wraps a problem and records how often, and for how long, each evaluation
/// operation runs.
///
/// Only calls made through the wrapper are recorded. If an inner default
/// implementation calls other operations (for example `eval_psi_grad_psi`
/// calling `eval_f_g`), those nested calls are not counted separately. A
/// fused `eval_psi_grad_psi` therefore shows up once, not as one call each
/// to `eval_f_g` and `eval_grad_l`, and totals are lower than those of a
/// counter that dispatches nested calls back through itself.
///
/// Cloning a `Counted` gives the clone fresh, zeroed counters.
#[derive(Debug)]
pub struct Counted<P> {
    inner: P,
    evaluations: Cell<EvalCounter>,
}

impl<P: Problem> Counted<P> {
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            evaluations: Cell::new(EvalCounter::default()),
        }
    }

    /// Returns a snapshot of the counters.
    #[must_use]
    pub fn evaluations(&self) -> EvalCounter {
        self.evaluations.get()
    }

    pub fn reset_evaluations(&self) {
        self.evaluations.set(EvalCounter::default());
    }

    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Mutable access to the wrapped problem. Counters are left as they are.
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> P {
        self.inner
    }

    fn timed<T>(&self, eval: Eval, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let mut evaluations = self.evaluations.get();
        evaluations.record(eval, start.elapsed());
        self.evaluations.set(evaluations);
        out
    }
}

impl<P: Problem + Clone> Clone for Counted<P> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<P: ParamProblem> ParamProblem for Counted<P> {
    fn param(&self) -> &[f64] {
        self.inner.param()
    }

    fn param_mut(&mut self) -> &mut [f64] {
        self.inner.param_mut()
    }

    fn set_param(&mut self, param: &[f64]) -> Result<(), Error> {
        self.inner.set_param(param)
    }
}

impl<P: Problem> Problem for Counted<P> {
    fn constraints(&self) -> &Constraints {
        self.inner.constraints()
    }

    fn boxed_clone(&self) -> Result<Box<dyn Problem>, Error> {
        match self.inner.boxed_clone() {
            Ok(inner) => Ok(Box::new(Counted::new(inner))),
            Err(Error::NotCloneable(_)) => Err(Error::NotCloneable(
                std::any::type_name::<Self>().to_owned(),
            )),
            Err(err) => Err(err),
        }
    }

    fn eval_f(&self, x: &[f64]) -> Result<f64, Error> {
        self.timed(Eval::F, || self.inner.eval_f(x))
    }

    fn eval_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<(), Error> {
        self.timed(Eval::GradF, || self.inner.eval_grad_f(x, grad_fx))
    }

    fn eval_g(&self, x: &[f64], gx: &mut [f64]) -> Result<(), Error> {
        self.timed(Eval::G, || self.inner.eval_g(x, gx))
    }

    fn eval_grad_g_prod(&self, x: &[f64], y: &[f64], grad_gxy: &mut [f64]) -> Result<(), Error> {
        self.timed(Eval::GradGProd, || {
            self.inner.eval_grad_g_prod(x, y, grad_gxy)
        })
    }

    fn eval_grad_gi(&self, x: &[f64], i: usize, grad_gi: &mut [f64]) -> Result<(), Error> {
        self.timed(Eval::GradGi, || self.inner.eval_grad_gi(x, i, grad_gi))
    }

    fn eval_hess_l_prod(
        &self,
        x: &[f64],
        y: &[f64],
        v: &[f64],
        hv: &mut [f64],
    ) -> Result<(), Error> {
        self.timed(Eval::HessLProd, || self.inner.eval_hess_l_prod(x, y, v, hv))
    }

    fn eval_hess_l(&self, x: &[f64], y: &[f64], h: ArrayViewMut2<'_, f64>) -> Result<(), Error> {
        self.timed(Eval::HessL, || self.inner.eval_hess_l(x, y, h))
    }

    fn eval_f_grad_f(&self, x: &[f64], grad_fx: &mut [f64]) -> Result<f64, Error> {
        self.timed(Eval::FGradF, || self.inner.eval_f_grad_f(x, grad_fx))
    }

    fn eval_f_g(&self, x: &[f64], g: &mut [f64]) -> Result<f64, Error> {
        self.timed(Eval::FG, || self.inner.eval_f_g(x, g))
    }

    fn eval_f_grad_f_g(&self, x: &[f64], grad_fx: &mut [f64], g: &mut [f64]) -> Result<f64, Error> {
        self.timed(Eval::FGradFG, || self.inner.eval_f_grad_f_g(x, grad_fx, g))
    }

    fn eval_grad_f_grad_g_prod(
        &self,
        x: &[f64],
        y: &[f64],
        grad_f: &mut [f64],
        grad_gxy: &mut [f64],
    ) -> Result<(), Error> {
        self.timed(Eval::GradFGradGProd, || {
            self.inner.eval_grad_f_grad_g_prod(x, y, grad_f, grad_gxy)
        })
    }

    fn eval_grad_l(
        &self,
        x: &[f64],
        y: &[f64],
        grad_l: &mut [f64],
        work_n: &mut [f64],
    ) -> Result<(), Error> {
        self.timed(Eval::GradL, || self.inner.eval_grad_l(x, y, grad_l, work_n))
    }

    fn eval_psi_y_hat(
        &self,
        x: &[f64],
        y: &[f64],
        sigma: &[f64],
        y_hat: &mut [f64],
    ) -> Result<f64, Error> {
        self.timed(Eval::Psi, || self.inner.eval_psi_y_hat(x, y, sigma, y_hat))
    }

    fn eval_grad_psi_from_y_hat(
        &self,
        x: &[f64],
        y_hat: &[f64],
        grad_psi: &mut [f64],
        work_n: &mut [f64],
    ) -> Result<(), Error> {
        self.timed(Eval::GradPsiFromYHat, || {
            self.inner.eval_grad_psi_from_y_hat(x, y_hat, grad_psi, work_n)
        })
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
        self.timed(Eval::GradPsi, || {
            self.inner.eval_grad_psi(x, y, sigma, grad_psi, work_n, work_m)
        })
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
        self.timed(Eval::PsiGradPsi, || {
            self.inner
                .eval_psi_grad_psi(x, y, sigma, grad_psi, work_n, work_m)
        })
    }

    fn calc_y_hat_dt_y_hat(&self, g_y_hat: &mut [f64], y: &[f64], sigma: &[f64]) -> f64 {
        self.inner.calc_y_hat_dt_y_hat(g_y_hat, y, sigma)
    }
}
