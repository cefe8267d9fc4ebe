//! Sparse Householder QR factorization.
//!
//! The factorization is split into a symbolic phase, computed once from a
//! fixed sparsity pattern, and numeric routines that operate on caller-owned
//! buffers without allocating.

#[allow(clippy::module_inception)]
mod qr;
pub use qr::*;
