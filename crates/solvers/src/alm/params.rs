use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, config::seconds};

/// Parameters of the outer augmented Lagrangian loop.
///
/// Supplied once per solve and not modified by it. Greek names from the
/// usual presentation of the method are given in each field's docs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlmParams {
    /// Primal tolerance ε on the inner stationarity measure.
    pub epsilon: f64,
    /// Dual tolerance δ on the constraint violation ‖e‖∞.
    pub delta: f64,
    /// Penalty growth factor Δ.
    pub penalty_update_factor: f64,
    /// Initial penalty weight Σ₀. When absent the weight is chosen by
    /// [`initialize_penalty`](super::initialize_penalty).
    pub initial_penalty: Option<f64>,
    /// Scale σ₀ of the automatically chosen initial penalty.
    pub initial_penalty_factor: f64,
    /// Inner tolerance ε₀ of the first outer iteration.
    pub initial_tolerance: f64,
    /// Inner tolerance decrease factor ρ.
    pub tolerance_update_factor: f64,
    /// A constraint's penalty only grows if its violation did not shrink by
    /// at least this factor θ.
    pub rel_penalty_increase_threshold: f64,
    /// Multipliers are clipped to `[-M, M]`.
    pub max_multiplier: f64,
    /// Σ_max
    pub max_penalty: f64,
    /// Σ_min
    pub min_penalty: f64,
    /// Maximum number of outer iterations.
    pub max_iter: usize,
    #[serde(with = "seconds")]
    pub max_time: Duration,
    /// Share one penalty weight between all constraints.
    pub single_penalty_factor: bool,
}

impl Default for AlmParams {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            delta: 1e-5,
            penalty_update_factor: 10.0,
            initial_penalty: None,
            initial_penalty_factor: 20.0,
            initial_tolerance: 1.0,
            tolerance_update_factor: 1e-1,
            rel_penalty_increase_threshold: 0.1,
            max_multiplier: 1e9,
            max_penalty: 1e9,
            min_penalty: 1e-9,
            max_iter: 100,
            max_time: Duration::from_secs(300),
            single_penalty_factor: false,
        }
    }
}

impl AlmParams {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidArgument`] naming the first bad field.
    pub fn verify(&self) -> Result<(), ConfigError> {
        positive("AlmParams::epsilon", self.epsilon)?;
        positive("AlmParams::delta", self.delta)?;
        if self.penalty_update_factor.is_nan() || self.penalty_update_factor <= 1.0 {
            return Err(ConfigError::invalid(
                "AlmParams::penalty_update_factor",
                "must be greater than 1",
            ));
        }
        if let Some(sigma) = self.initial_penalty {
            positive("AlmParams::initial_penalty", sigma)?;
        }
        positive(
            "AlmParams::initial_penalty_factor",
            self.initial_penalty_factor,
        )?;
        positive("AlmParams::initial_tolerance", self.initial_tolerance)?;
        if !(self.tolerance_update_factor > 0.0 && self.tolerance_update_factor <= 1.0) {
            return Err(ConfigError::invalid(
                "AlmParams::tolerance_update_factor",
                "must be in (0, 1]",
            ));
        }
        let theta = self.rel_penalty_increase_threshold;
        if !(theta > 0.0 && theta < 1.0) {
            return Err(ConfigError::invalid(
                "AlmParams::rel_penalty_increase_threshold",
                "must be in (0, 1)",
            ));
        }
        positive("AlmParams::max_multiplier", self.max_multiplier)?;
        positive("AlmParams::min_penalty", self.min_penalty)?;
        if self.max_penalty.is_nan() || self.max_penalty < self.min_penalty {
            return Err(ConfigError::invalid(
                "AlmParams::max_penalty",
                "must not be less than min_penalty",
            ));
        }
        if self.max_iter == 0 {
            return Err(ConfigError::invalid("AlmParams::max_iter", "cannot be 0"));
        }
        if self.max_time.is_zero() {
            return Err(ConfigError::invalid("AlmParams::max_time", "cannot be 0"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 {
        Err(ConfigError::invalid(field, "must be positive"))
    } else {
        Ok(())
    }
}
