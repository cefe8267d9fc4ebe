//! Active-set QP solver main module.
//!
//! The user facing entry point is [`QpSolver`], which owns the problem
//! data, its settings and a preallocated workspace.
//!
//! The numerical engine is exposed at a lower level as well.  A
//! [`QpProblem`] holds the dimensions, tolerances and all sparsity
//! patterns of a problem, including the symbolic QR factorization of the
//! KKT matrix.  A [`QpData`] partitions caller-owned flat buffers, sized
//! by [`QpProblem::work_size`], into the solver state of one solve.  The
//! engine operations (factorization, step computation, line search and
//! active-set changes) are methods on `QpData` and never allocate.

mod bounds;
mod error_types;
mod flip;
mod info;
mod info_print;
mod kkt;
mod linesearch;
mod message;
mod problem;
mod residuals;
mod settings;
#[allow(clippy::module_inception)]
mod solver;
mod solution;
mod step;
mod workspace;

#[cfg(feature = "serde")]
mod json;

pub use bounds::*;
pub use error_types::*;
pub use flip::*;
pub use info::*;
pub use kkt::*;
pub use message::*;
pub use problem::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;
pub use workspace::*;

#[cfg(feature = "serde")]
pub use json::*;
