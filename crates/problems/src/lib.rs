//! Reference problems for testing evaluation backends and solvers.
//!
//! - [`himmelblau`]: unconstrained nonconvex cost on a box, four minima
//! - [`rosenbrock`]: parametrized Rosenbrock valley on a box
//! - [`Quadratic`]: convex quadratic with a general constraint, implemented
//!   directly on the trait with fused evaluations
//! - [`parametric_quadratic`]: the same family with its Hessian as a parameter

mod himmelblau;
mod quadratic;
mod rosenbrock;

pub use himmelblau::himmelblau;
pub use quadratic::{Quadratic, parametric_quadratic};
pub use rosenbrock::rosenbrock;
