//! Augmented Lagrangian outer loop and solver settings.
//!
//! - [`alm`]: penalty initialization and update, multiplier projection, and
//!   the outer driver that turns a constrained [`Problem`] into a sequence of
//!   box-constrained subproblems for an [`alm::InnerSolver`]
//! - [`inner`]: validated settings for the PANOC-LBFGS inner solver
//! - [`SolverConfig`]: all of the above, loadable from TOML
//!
//! [`Problem`]: alm_core::Problem

mod config;

pub mod alm;
pub mod inner;

pub use config::{ConfigError, SolverConfig};
