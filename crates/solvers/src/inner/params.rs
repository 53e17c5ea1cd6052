use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, config::seconds};

/// Measure of stationarity used to decide when the inner solver is done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCriterion {
    /// ‖γ⁻¹(x − x̂) + ∇ψ(x̂) − ∇ψ(x)‖∞
    #[default]
    ApproxKkt,
    /// ‖Π_C(x − ∇ψ(x)) − x‖∞
    ProjGradNorm,
    /// ‖Π_C(x − ∇ψ(x)/‖∇ψ(x)‖∞) − x‖∞
    ProjGradUnitNorm,
    /// Fixed-point residual ‖γ⁻¹(x − x̂)‖∞
    FprNorm,
    /// Dual infeasibility as reported by Ipopt.
    Ipopt,
}

/// Initial Lipschitz estimate of ∇ψ, from finite differences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LipschitzParams {
    /// Initial estimate. Zero means estimate it from finite differences.
    pub l0: f64,
    /// Relative step size for the finite-difference estimate.
    pub epsilon: f64,
    /// Minimum step size for the finite-difference estimate.
    pub delta: f64,
    /// Factor relating the step size γ to the Lipschitz constant, γ = factor / L.
    pub l_gamma_factor: f64,
}

impl Default for LipschitzParams {
    fn default() -> Self {
        Self {
            l0: 0.0,
            epsilon: 1e-6,
            delta: 1e-12,
            l_gamma_factor: 0.95,
        }
    }
}

impl LipschitzParams {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidArgument`] naming the first bad field.
    pub fn verify(&self) -> Result<(), ConfigError> {
        if self.l0.is_nan() || self.l0 < 0.0 {
            return Err(ConfigError::invalid(
                "LipschitzParams::l0",
                "must be non-negative",
            ));
        }
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err(ConfigError::invalid(
                "LipschitzParams::epsilon",
                "must be positive",
            ));
        }
        if self.delta.is_nan() || self.delta <= 0.0 {
            return Err(ConfigError::invalid(
                "LipschitzParams::delta",
                "must be positive",
            ));
        }
        if !(self.l_gamma_factor > 0.0 && self.l_gamma_factor < 1.0) {
            return Err(ConfigError::invalid(
                "LipschitzParams::l_gamma_factor",
                "must be in (0, 1)",
            ));
        }
        Ok(())
    }
}

/// Settings for the PANOC iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanocParams {
    pub max_iter: usize,
    #[serde(with = "seconds")]
    pub max_time: Duration,
    /// Smallest line search parameter before falling back to a projected
    /// gradient step.
    pub tau_min: f64,
    /// Lipschitz estimates are kept in `[l_min, l_max]`.
    pub l_min: f64,
    pub l_max: f64,
    /// Number of past merit values in the nonmonotone line search. Zero is
    /// monotone.
    pub nonmonotone_linesearch: usize,
    /// The quasi-Newton step is accepted without a line search when the
    /// fixed-point residual drops below this fraction of its recent maximum.
    pub fpr_shortcut_accept_factor: f64,
    /// Number of fixed-point residuals kept for the shortcut test.
    pub fpr_shortcut_history: usize,
    pub stop_crit: StopCriterion,
    pub update_lipschitz_in_linesearch: bool,
    pub alternative_linesearch_cond: bool,
    /// Use Hessian-vector products of the Lagrangian in the quasi-Newton step.
    pub hessian_vec: bool,
    pub hessian_vec_finite_differences: bool,
    pub full_augmented_hessian: bool,
    /// Tolerance on the quadratic upper bound, relative to machine epsilon.
    pub quadratic_upperbound_tolerance_factor: f64,
    /// Log progress every this many iterations. Zero disables it.
    pub print_interval: usize,
    pub lipschitz: LipschitzParams,
}

impl Default for PanocParams {
    fn default() -> Self {
        Self {
            max_iter: 100,
            max_time: Duration::from_secs(300),
            tau_min: 1.0 / 256.0,
            l_min: 1e-5,
            l_max: 1e20,
            nonmonotone_linesearch: 0,
            fpr_shortcut_accept_factor: 0.999,
            fpr_shortcut_history: 1,
            stop_crit: StopCriterion::default(),
            update_lipschitz_in_linesearch: true,
            alternative_linesearch_cond: false,
            hessian_vec: true,
            hessian_vec_finite_differences: true,
            full_augmented_hessian: true,
            quadratic_upperbound_tolerance_factor: 10.0,
            print_interval: 0,
            lipschitz: LipschitzParams::default(),
        }
    }
}

impl PanocParams {
    /// Checks the Lipschitz settings, then the PANOC settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidArgument`] naming the first bad field.
    pub fn verify(&self) -> Result<(), ConfigError> {
        self.lipschitz.verify()?;
        if self.max_iter == 0 {
            return Err(ConfigError::invalid(
                "PanocParams::max_iter",
                "cannot be 0",
            ));
        }
        if self.max_time.is_zero() {
            return Err(ConfigError::invalid(
                "PanocParams::max_time",
                "cannot be 0",
            ));
        }
        if !(self.tau_min > 0.0 && self.tau_min < 1.0) {
            return Err(ConfigError::invalid(
                "PanocParams::tau_min",
                "must be in (0, 1)",
            ));
        }
        if self.l_min.is_nan() || self.l_min < 0.0 {
            return Err(ConfigError::invalid(
                "PanocParams::l_min",
                "must be non-negative",
            ));
        }
        if self.l_max.is_nan() || self.l_max < 0.0 {
            return Err(ConfigError::invalid(
                "PanocParams::l_max",
                "must be non-negative",
            ));
        }
        if self.l_max < self.l_min {
            return Err(ConfigError::invalid(
                "PanocParams::l_max",
                "must not be less than l_min",
            ));
        }
        if !(self.fpr_shortcut_accept_factor >= 0.0 && self.fpr_shortcut_accept_factor < 1.0) {
            return Err(ConfigError::invalid(
                "PanocParams::fpr_shortcut_accept_factor",
                "must be in [0, 1)",
            ));
        }
        if self.fpr_shortcut_history == 0 {
            return Err(ConfigError::invalid(
                "PanocParams::fpr_shortcut_history",
                "cannot be 0",
            ));
        }
        let tolerance_factor = self.quadratic_upperbound_tolerance_factor;
        if tolerance_factor.is_nan() || tolerance_factor < 0.0 {
            return Err(ConfigError::invalid(
                "PanocParams::quadratic_upperbound_tolerance_factor",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Cautious BFGS update rule: an update is only accepted when
/// `sᵀy / sᵀs ≥ epsilon · ‖p‖^alpha`. A zero `epsilon` accepts every update
/// with positive curvature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CbfgsParams {
    pub alpha: f64,
    pub epsilon: f64,
}

impl Default for CbfgsParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            epsilon: 0.0,
        }
    }
}

/// Settings for the limited-memory BFGS direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LbfgsParams {
    /// Number of stored correction pairs.
    pub memory: usize,
    pub cbfgs: CbfgsParams,
}

impl Default for LbfgsParams {
    fn default() -> Self {
        Self {
            memory: 10,
            cbfgs: CbfgsParams::default(),
        }
    }
}

impl LbfgsParams {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidArgument`] naming the first bad field.
    pub fn verify(&self) -> Result<(), ConfigError> {
        if self.memory == 0 {
            return Err(ConfigError::invalid("LbfgsParams::memory", "cannot be 0"));
        }
        if self.cbfgs.epsilon.is_nan() || self.cbfgs.epsilon < 0.0 {
            return Err(ConfigError::invalid(
                "LbfgsParams::cbfgs.epsilon",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}
