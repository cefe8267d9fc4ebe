//! Sparse matrix and vector types and the numerical kernels used by the solver.
//!
//! All internal math goes through the traits defined here, which are
//! implemented generically for floats of type [`FloatT`].  Sparse data is held
//! in compressed sparse column (CSC) format, either as an owning
//! [`CscMatrix`] or as a structure-only [`CscPattern`] paired with a separate
//! slice of nonzeros through a borrowed [`CscView`].

mod csc;
mod error_types;
mod floats;
mod math_traits;
mod vecmath;

pub use csc::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
