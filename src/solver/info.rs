use super::{QpData, QpMessage, SolverStatus};
use crate::algebra::*;
use crate::io::PrintTarget;
use crate::timers::*;

/// Progress information for the most recent iteration of a
/// [`QpSolver`](crate::solver::QpSolver)

#[derive(Default, Debug)]
pub struct QpInfo<T> {
    pub iterations: u32,
    /// objective value
    pub obj_val: T,
    /// largest bound violation and its component
    pub pr: T,
    pub ipr: Option<usize>,
    /// largest dual infeasibility and its primal variable
    pub du: T,
    pub idu: Option<usize>,
    /// step length of the last step
    pub tau: T,
    /// the KKT matrix was found singular
    pub sing: bool,
    /// smallest |diag(R)| and the KKT column attaining it
    pub mina: T,
    pub imina: usize,
    /// last action taken
    pub message: Option<QpMessage<T>>,

    pub solve_time: f64,
    pub status: SolverStatus,

    pub(crate) stream: PrintTarget,
}

impl<T> QpInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self, timers: &mut Timers) {
        self.status = SolverStatus::Unsolved;
        self.iterations = 0;
        self.solve_time = 0f64;
        self.message = None;

        timers.reset_timer("solve");
    }

    /// record the scalars of the current iterate
    pub(crate) fn update(&mut self, data: &QpData<'_, T>, iter: u32) {
        self.iterations = iter;
        self.obj_val = data.f;
        self.pr = data.pr;
        self.ipr = data.ipr;
        self.du = data.du;
        self.idu = data.idu;
        self.tau = data.tau;
        self.sing = data.sing;
        self.mina = data.mina;
        self.imina = data.imina;
        self.message = data.msg;
    }

    pub(crate) fn finalize(&mut self, status: SolverStatus, timers: &Timers) {
        self.status = status;
        self.solve_time = timers.elapsed("solve").as_secs_f64();
    }
}
