//! Solver configuration, loadable from TOML.
//!
//! ```
//! use alm_solvers::SolverConfig;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     [alm]
//!     epsilon = 1e-8
//!     max_time = 2.5
//!
//!     [lbfgs]
//!     memory = 20
//! "#).unwrap();
//!
//! assert_eq!(config.alm.epsilon, 1e-8);
//! assert_eq!(config.alm.max_time.as_millis(), 2500);
//! assert_eq!(config.lbfgs.memory, 20);
//! ```


use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    alm::AlmParams,
    inner::{LbfgsParams, PanocParams},
};

/// Errors raised while loading or validating solver settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter is outside its admissible range.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { field, reason }
    }

    /// Returns the offending field for [`ConfigError::InvalidArgument`].
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Settings for the outer augmented Lagrangian loop and its inner solver.
///
/// Missing tables and keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub alm: AlmParams,
    pub panoc: PanocParams,
    pub lbfgs: LbfgsParams,
}

impl SolverConfig {
    /// Reads and verifies a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds an invalid parameter.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and verifies a configuration string.
    ///
    /// # Errors
    ///
    /// Returns an error if `s` is not valid TOML or holds an invalid parameter.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.verify()?;
        Ok(config)
    }

    /// Writes the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Checks every parameter group.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn verify(&self) -> Result<(), ConfigError> {
        self.alm.verify()?;
        self.panoc.verify()?;
        self.lbfgs.verify()
    }
}

/// Serializes a [`Duration`](std::time::Duration) as fractional seconds.
pub(crate) mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub(crate) fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(value.as_secs_f64())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
