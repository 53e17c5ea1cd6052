//! Settings for the structured PANOC-LBFGS inner solver.
//!
//! The inner iteration itself lives outside this crate and is plugged into
//! the outer loop through [`InnerSolver`](crate::alm::InnerSolver). These
//! types carry its settings and check them once before a solve, so an
//! implementation can rely on every field being in range.

mod params;

pub use params::{CbfgsParams, LbfgsParams, LipschitzParams, PanocParams, StopCriterion};
