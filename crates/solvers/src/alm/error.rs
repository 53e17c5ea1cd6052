use crate::ConfigError;

/// Errors that can occur during an augmented Lagrangian solve.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("problem error: {0}")]
    Problem(#[from] alm_core::Error),
}
