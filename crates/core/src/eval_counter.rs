use std::{
    fmt,
    ops::{Add, AddAssign},
    time::Duration,
};

/// Identifies one evaluation operation of a [`Problem`](crate::Problem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eval {
    F,
    GradF,
    FGradF,
    FG,
    FGradFG,
    GradFGradGProd,
    G,
    GradGProd,
    GradGi,
    GradL,
    HessLProd,
    HessL,
    Psi,
    GradPsi,
    GradPsiFromYHat,
    PsiGradPsi,
}

impl Eval {
    /// Every operation, in reporting order.
    pub const ALL: [Eval; 16] = [
        Eval::F,
        Eval::GradF,
        Eval::FGradF,
        Eval::FG,
        Eval::FGradFG,
        Eval::GradFGradGProd,
        Eval::G,
        Eval::GradGProd,
        Eval::GradGi,
        Eval::GradL,
        Eval::HessLProd,
        Eval::HessL,
        Eval::Psi,
        Eval::GradPsi,
        Eval::GradPsiFromYHat,
        Eval::PsiGradPsi,
    ];

    /// Short name used when reporting.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Eval::F => "f",
            Eval::GradF => "grad_f",
            Eval::FGradF => "f_grad_f",
            Eval::FG => "f_g",
            Eval::FGradFG => "f_grad_f_g",
            Eval::GradFGradGProd => "grad_f_grad_g_prod",
            Eval::G => "g",
            Eval::GradGProd => "grad_g_prod",
            Eval::GradGi => "grad_gi",
            Eval::GradL => "grad_L",
            Eval::HessLProd => "hess_L_prod",
            Eval::HessL => "hess_L",
            Eval::Psi => "ψ",
            Eval::GradPsi => "grad_ψ",
            Eval::GradPsiFromYHat => "grad_ψ_from_ŷ",
            Eval::PsiGradPsi => "ψ_grad_ψ",
        }
    }
}

/// Accumulated wall-clock time per evaluation operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvalTimer {
    pub f: Duration,
    pub grad_f: Duration,
    pub f_grad_f: Duration,
    pub f_g: Duration,
    pub f_grad_f_g: Duration,
    pub grad_f_grad_g_prod: Duration,
    pub g: Duration,
    pub grad_g_prod: Duration,
    pub grad_gi: Duration,
    pub grad_l: Duration,
    pub hess_l_prod: Duration,
    pub hess_l: Duration,
    pub psi: Duration,
    pub grad_psi: Duration,
    pub grad_psi_from_y_hat: Duration,
    pub psi_grad_psi: Duration,
}

impl EvalTimer {
    fn slot_mut(&mut self, eval: Eval) -> &mut Duration {
        match eval {
            Eval::F => &mut self.f,
            Eval::GradF => &mut self.grad_f,
            Eval::FGradF => &mut self.f_grad_f,
            Eval::FG => &mut self.f_g,
            Eval::FGradFG => &mut self.f_grad_f_g,
            Eval::GradFGradGProd => &mut self.grad_f_grad_g_prod,
            Eval::G => &mut self.g,
            Eval::GradGProd => &mut self.grad_g_prod,
            Eval::GradGi => &mut self.grad_gi,
            Eval::GradL => &mut self.grad_l,
            Eval::HessLProd => &mut self.hess_l_prod,
            Eval::HessL => &mut self.hess_l,
            Eval::Psi => &mut self.psi,
            Eval::GradPsi => &mut self.grad_psi,
            Eval::GradPsiFromYHat => &mut self.grad_psi_from_y_hat,
            Eval::PsiGradPsi => &mut self.psi_grad_psi,
        }
    }

    fn slot(&self, eval: Eval) -> Duration {
        match eval {
            Eval::F => self.f,
            Eval::GradF => self.grad_f,
            Eval::FGradF => self.f_grad_f,
            Eval::FG => self.f_g,
            Eval::FGradFG => self.f_grad_f_g,
            Eval::GradFGradGProd => self.grad_f_grad_g_prod,
            Eval::G => self.g,
            Eval::GradGProd => self.grad_g_prod,
            Eval::GradGi => self.grad_gi,
            Eval::GradL => self.grad_l,
            Eval::HessLProd => self.hess_l_prod,
            Eval::HessL => self.hess_l,
            Eval::Psi => self.psi,
            Eval::GradPsi => self.grad_psi,
            Eval::GradPsiFromYHat => self.grad_psi_from_y_hat,
            Eval::PsiGradPsi => self.psi_grad_psi,
        }
    }
}

impl AddAssign<&EvalTimer> for EvalTimer {
    fn add_assign(&mut self, other: &EvalTimer) {
        for eval in Eval::ALL {
            *self.slot_mut(eval) += other.slot(eval);
        }
    }
}

/// Call counts and elapsed times for every evaluation operation.
///
/// Counts are public fields named after the operation (`counter.f`,
/// `counter.psi_grad_psi`, ...), times live in the matching fields of
/// [`EvalCounter::time`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvalCounter {
    pub f: u64,
    pub grad_f: u64,
    pub f_grad_f: u64,
    pub f_g: u64,
    pub f_grad_f_g: u64,
    pub grad_f_grad_g_prod: u64,
    pub g: u64,
    pub grad_g_prod: u64,
    pub grad_gi: u64,
    pub grad_l: u64,
    pub hess_l_prod: u64,
    pub hess_l: u64,
    pub psi: u64,
    pub grad_psi: u64,
    pub grad_psi_from_y_hat: u64,
    pub psi_grad_psi: u64,

    pub time: EvalTimer,
}

impl EvalCounter {
    fn slot_mut(&mut self, eval: Eval) -> &mut u64 {
        match eval {
            Eval::F => &mut self.f,
            Eval::GradF => &mut self.grad_f,
            Eval::FGradF => &mut self.f_grad_f,
            Eval::FG => &mut self.f_g,
            Eval::FGradFG => &mut self.f_grad_f_g,
            Eval::GradFGradGProd => &mut self.grad_f_grad_g_prod,
            Eval::G => &mut self.g,
            Eval::GradGProd => &mut self.grad_g_prod,
            Eval::GradGi => &mut self.grad_gi,
            Eval::GradL => &mut self.grad_l,
            Eval::HessLProd => &mut self.hess_l_prod,
            Eval::HessL => &mut self.hess_l,
            Eval::Psi => &mut self.psi,
            Eval::GradPsi => &mut self.grad_psi,
            Eval::GradPsiFromYHat => &mut self.grad_psi_from_y_hat,
            Eval::PsiGradPsi => &mut self.psi_grad_psi,
        }
    }

    fn slot(&self, eval: Eval) -> u64 {
        match eval {
            Eval::F => self.f,
            Eval::GradF => self.grad_f,
            Eval::FGradF => self.f_grad_f,
            Eval::FG => self.f_g,
            Eval::FGradFG => self.f_grad_f_g,
            Eval::GradFGradGProd => self.grad_f_grad_g_prod,
            Eval::G => self.g,
            Eval::GradGProd => self.grad_g_prod,
            Eval::GradGi => self.grad_gi,
            Eval::GradL => self.grad_l,
            Eval::HessLProd => self.hess_l_prod,
            Eval::HessL => self.hess_l,
            Eval::Psi => self.psi,
            Eval::GradPsi => self.grad_psi,
            Eval::GradPsiFromYHat => self.grad_psi_from_y_hat,
            Eval::PsiGradPsi => self.psi_grad_psi,
        }
    }
}

impl EvalCounter {
    /// Records one call of `eval` that took `elapsed`.
    pub fn record(&mut self, eval: Eval, elapsed: Duration) {
        *self.slot_mut(eval) += 1;
        *self.time.slot_mut(eval) += elapsed;
    }

    #[must_use]
    pub fn count(&self, eval: Eval) -> u64 {
        self.slot(eval)
    }

    #[must_use]
    pub fn time(&self, eval: Eval) -> Duration {
        self.time.slot(eval)
    }

    /// Total number of recorded calls across all operations.
    #[must_use]
    pub fn total(&self) -> u64 {
        Eval::ALL.iter().map(|&e| self.count(e)).sum()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl AddAssign<&EvalCounter> for EvalCounter {
    fn add_assign(&mut self, other: &EvalCounter) {
        for eval in Eval::ALL {
            *self.slot_mut(eval) += other.slot(eval);
        }
        self.time += &other.time;
    }
}

impl Add<&EvalCounter> for EvalCounter {
    type Output = EvalCounter;

    fn add(mut self, other: &EvalCounter) -> EvalCounter {
        self += other;
        self
    }
}

impl fmt::Display for EvalCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, eval) in Eval::ALL.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:>18}:{:>6}  ({} s)",
                eval.name(),
                self.count(*eval),
                self.time(*eval).as_secs_f64()
            )?;
        }
        Ok(())
    }
}
