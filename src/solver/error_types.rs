use super::SettingsError;
use crate::algebra::SparseFormatError;
use crate::qr::QrError;
use thiserror::Error;

/// Error type returned when constructing a [`QpSolver`](crate::solver::QpSolver)
/// or [`QpProblem`](crate::solver::QpProblem)
#[derive(Error, Debug)]
pub enum QpSetupError {
    #[error("Bad matrix format: {0}")]
    BadFormat(#[from] SparseFormatError),
    #[error("Incompatible dimension for {0}: expected {1}, found {2}")]
    IncompatibleDimension(&'static str, usize, usize),
    #[error("Hessian pattern must be square and structurally symmetric")]
    AsymmetricHessian,
    #[error("Bad settings: {0}")]
    BadSettings(#[from] SettingsError),
    #[error("KKT factorization setup failed: {0}")]
    Factorization(#[from] QrError),
}

/// Failures of the numeric core, reported through the
/// [`SolverStatus`](crate::solver::SolverStatus) of a solve
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum QpError {
    #[error("No admissible multiplier sign for component {0}")]
    InfeasibleBounds(usize),
    #[error("No search direction")]
    NoSearchDirection,
}
