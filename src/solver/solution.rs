use super::{QpData, QpInfo, QpMessage, SolverStatus};
use crate::algebra::*;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Solution returned by a [`QpSolver`](crate::solver::QpSolver)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct QpSolution<T> {
    /// primal solution
    pub x: Vec<T>,
    /// augmented variable `[x; A*x]`
    pub z: Vec<T>,
    /// multipliers of the bounds on `z`.  Negative entries belong to
    /// active lower bounds, positive entries to active upper bounds.
    pub lam: Vec<T>,
    /// objective value
    pub obj_val: T,
    /// final solver status
    pub status: SolverStatus,
    /// number of iterations
    pub iterations: u32,
    /// largest bound violation
    pub pr: T,
    /// largest dual infeasibility
    pub du: T,
    /// last action taken by the solver
    #[cfg_attr(feature = "serde", serde(skip))]
    pub message: Option<QpMessage<T>>,
    /// solve time in seconds
    pub solve_time: f64,
}

impl<T> QpSolution<T>
where
    T: FloatT,
{
    /// Create a new `QpSolution` object
    pub fn new(nx: usize, na: usize) -> Self {
        Self {
            x: vec![T::zero(); nx],
            z: vec![T::zero(); nx + na],
            lam: vec![T::zero(); nx + na],
            obj_val: T::nan(),
            status: SolverStatus::Unsolved,
            iterations: 0,
            pr: T::nan(),
            du: T::nan(),
            message: None,
            solve_time: 0f64,
        }
    }

    pub(crate) fn finalize(&mut self, data: &QpData<'_, T>, info: &QpInfo<T>) {
        let nx = data.prob.nx;
        self.x.copy_from(&data.z[..nx]);
        self.z.copy_from(&data.z[..]);
        self.lam.copy_from(&data.lam[..]);

        self.status = info.status;
        self.obj_val = if info.status == SolverStatus::InfeasibleBounds {
            T::nan()
        } else {
            data.f
        };
        self.iterations = info.iterations;
        self.pr = data.pr;
        self.du = data.du;
        self.message = data.msg;
        self.solve_time = info.solve_time;
    }
}
