//! Problem abstraction and augmented-Lagrangian merit evaluation.
//!
//! This crate defines the shared abstractions that the outer augmented
//! Lagrangian loop and its inner solvers build on:
//!
//! - [`Bounds`]: an axis-aligned box, used for both the variable bounds `C`
//!   and the constraint bounds `D`
//! - [`Problem`]: the evaluation contract, with mandatory primitives and
//!   overridable combined and merit-function operations
//! - [`FnProblem`], [`FnParamProblem`]: closure-backed problem variants
//! - [`Counted`]: a decorator that counts and times every evaluation
//! - [`Observer`]: receives solver events and optionally returns control actions
//!
//! The problem being solved is
//!
//! ```text
//! minimize    f(x)
//! subject to  x ∈ C
//!             g(x) ∈ D
//! ```

mod bounds;
mod error;
mod eval_counter;
mod observer;
mod problem;

pub mod merit;

pub use bounds::Bounds;
pub use error::Error;
pub use eval_counter::{Eval, EvalCounter, EvalTimer};
pub use observer::{ByRef, Observer};
pub use problem::{Constraints, Counted, FnParamProblem, FnProblem, ParamProblem, Problem};
