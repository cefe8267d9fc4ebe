#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::timers::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------
// Solver status type
// ---------------------------------

/// Status of solver at termination

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution.
    Solved,
    /// Iteration limit reached before a solution was found.
    MaxIterations,
    /// A component has equal bounds that are both absent.  The solve was not attempted.
    InfeasibleBounds,
    /// The KKT matrix is singular and no active-set change restores its rank.
    SingularKkt,
    /// Enforcing a blocking bound would make the KKT matrix singular,
    /// and the iterate cannot move without it.
    ActiveSetConflict,
    /// Solver terminated due to lack of progress.
    InsufficientProgress,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<QpError> for SolverStatus {
    fn from(e: QpError) -> Self {
        match e {
            QpError::InfeasibleBounds(_) => SolverStatus::InfeasibleBounds,
            QpError::NoSearchDirection => SolverStatus::SingularKkt,
        }
    }
}

// ---------------------------------
// top level solver container type
// ---------------------------------

/// Active-set solver for the problem
///
/// ```text
/// minimize    1/2 x'Hx + g'x
/// subject to  lbz <= [x; Ax] <= ubz
/// ```
///
/// The solver owns the problem data and one workspace.  The iterate is
/// kept in the workspace between calls to [`solve`](QpSolver::solve), so
/// that a second solve after updating the data starts from the previous
/// solution.
pub struct QpSolver<T: FloatT = f64> {
    pub problem: QpProblem<T>,
    nz_h: Vec<T>,
    nz_a: Vec<T>,
    g: Vec<T>,
    lbz: Vec<T>,
    ubz: Vec<T>,

    // workspace
    fbuf: Vec<T>,
    ibuf: Vec<usize>,
    kinds: Vec<BoundKind>,

    pub settings: QpSettings<T>,
    pub info: QpInfo<T>,
    pub solution: QpSolution<T>,
    pub timers: Option<Timers>,
}

impl<T> QpSolver<T>
where
    T: FloatT,
{
    pub fn new(
        H: &CscMatrix<T>,
        g: &[T],
        A: &CscMatrix<T>,
        lbz: &[T],
        ubz: &[T],
        settings: QpSettings<T>,
    ) -> Result<Self, QpSetupError> {
        let mut timers = Timers::default();
        let mut output;

        timeit! {timers => "setup"; {

        H.check_format()?;
        A.check_format()?;

        let problem = QpProblem::new(&H.pattern(), &A.pattern(), &settings)?;
        let (nx, na, nz) = (problem.nx, problem.na, problem.nz);
        _check_dimension("g", nx, g.len())?;
        _check_dimension("lbz", nz, lbz.len())?;
        _check_dimension("ubz", nz, ubz.len())?;

        // flat workspace, zeroed so the first solve starts from z = lam = 0
        let size = problem.work_size();
        let fbuf = vec![T::zero(); size.nf];
        let ibuf = vec![0; size.ni];
        let kinds = vec![BoundKind::default(); nz];

        let info = QpInfo::<T>::new();
        let solution = QpSolution::<T>::new(nx, na);

        output = Self {
            problem,
            nz_h: H.nzval.clone(),
            nz_a: A.nzval.clone(),
            g: g.to_vec(),
            lbz: lbz.to_vec(),
            ubz: ubz.to_vec(),
            fbuf,
            ibuf,
            kinds,
            settings,
            info,
            solution,
            timers: None,
        };

        }} //end "setup" timer

        output.timers.replace(timers);
        Ok(output)
    }

    /// Set the starting point of the next solve.  `x` has length `nx`
    /// and `lam` length `nx + na`.
    pub fn set_initial_guess(&mut self, x: &[T], lam: &[T]) -> Result<(), QpSetupError> {
        let (nx, nz) = (self.problem.nx, self.problem.nz);
        _check_dimension("x", nx, x.len())?;
        _check_dimension("lam", nz, lam.len())?;

        let mut data = self.data();
        data.z[..nx].copy_from(x);
        data.lam.copy_from(lam);
        Ok(())
    }

    /// Overwrite the bounds on `z = [x; A*x]`
    pub fn update_bounds(&mut self, lbz: &[T], ubz: &[T]) -> Result<(), QpSetupError> {
        let nz = self.problem.nz;
        _check_dimension("lbz", nz, lbz.len())?;
        _check_dimension("ubz", nz, ubz.len())?;
        self.lbz.copy_from(lbz);
        self.ubz.copy_from(ubz);
        Ok(())
    }

    /// Overwrite the linear objective term
    pub fn update_g(&mut self, g: &[T]) -> Result<(), QpSetupError> {
        _check_dimension("g", self.problem.nx, g.len())?;
        self.g.copy_from(g);
        Ok(())
    }

    /// Hessian with the current values
    pub fn H(&self) -> CscMatrix<T> {
        let p = &self.problem.H;
        CscMatrix::new(p.m, p.n, p.colptr.clone(), p.rowval.clone(), self.nz_h.clone())
    }

    /// constraint Jacobian with the current values
    pub fn A(&self) -> CscMatrix<T> {
        let p = &self.problem.A;
        CscMatrix::new(p.m, p.n, p.colptr.clone(), p.rowval.clone(), self.nz_a.clone())
    }

    pub fn g(&self) -> &[T] {
        &self.g
    }

    pub fn bounds(&self) -> (&[T], &[T]) {
        (&self.lbz, &self.ubz)
    }

    fn data(&mut self) -> QpData<'_, T> {
        QpData::new(
            &self.problem,
            &self.nz_h,
            &self.nz_a,
            &self.g,
            &mut self.fbuf,
            &mut self.ibuf,
            &mut self.kinds,
        )
    }

    /// Run the solver
    pub fn solve(&mut self) {
        let mut timers = self.timers.take().unwrap_or_default();

        let Self {
            problem,
            nz_h,
            nz_a,
            g,
            lbz,
            ubz,
            fbuf,
            ibuf,
            kinds,
            settings,
            info,
            solution,
            ..
        } = self;

        // output failures never interrupt the solve
        let _ = info.print_banner(settings);
        let _ = info.print_configuration(settings, problem);
        let _ = info.print_status_header(settings);

        info.reset(&mut timers);

        let mut data = QpData::new(problem, nz_h, nz_a, g, fbuf, ibuf, kinds);
        data.lbz.copy_from(lbz);
        data.ubz.copy_from(ubz);
        let status;

        timeit! {timers => "solve"; {
            status = _solve_loop(&mut data, info, settings);
        }}

        info.update(&data, info.iterations);
        info.finalize(status, &timers);
        solution.finalize(&data, info);

        let _ = info.print_footer(settings);

        self.timers.replace(timers);
    }
}

// ---------------------------------
// main loop
// ---------------------------------

fn _solve_loop<T: FloatT>(
    data: &mut QpData<'_, T>,
    info: &mut QpInfo<T>,
    settings: &QpSettings<T>,
) -> SolverStatus {
    if let Err(e) = data.reset() {
        return e.into();
    }
    data.calc_dependent();
    data.factorize();

    let mut iter: u32 = 0;
    let mut blocking = None;
    let mut regularity = None;
    let mut progress = ProgressMonitor::new(settings.min_terminate_step_length);

    loop {
        data.calc_dependent();

        // change the active set and factorize the new KKT matrix
        let changed = data.flip(blocking, regularity);
        data.factorize();

        info.update(data, iter);
        let _ = info.print_status(settings);

        if !changed {
            if data.converged() {
                return SolverStatus::Solved;
            }
            if iter > 0 && !progress.moved() {
                return match data.msg {
                    Some(QpMessage::CannotEnforce { .. }) => SolverStatus::ActiveSetConflict,
                    _ => SolverStatus::InsufficientProgress,
                };
            }
        }
        if progress.repeated(&*data.lam) {
            return SolverStatus::InsufficientProgress;
        }
        if iter >= settings.max_iter {
            return SolverStatus::MaxIterations;
        }
        iter += 1;

        regularity = match data.calc_step() {
            Ok(r) => r,
            Err(e) => {
                info.iterations = iter;
                return e.into();
            }
        };
        blocking = data.linesearch();
        progress.record_step(data);
    }
}

// number of recent active sets searched for a repeat
const CYCLE_WINDOW: usize = 16;

/// Tracks whether the iteration still makes progress.
///
/// A step counts as movement if it is longer than `min_step` along a
/// nonzero direction.  Active sets are remembered by their hash until the
/// iterate moves, so that returning to one of them is detected as a cycle.
pub(crate) struct ProgressMonitor<T> {
    min_step: T,
    moved: bool,
    seen: [u64; CYCLE_WINDOW],
    nseen: usize,
}

impl<T> ProgressMonitor<T>
where
    T: FloatT,
{
    pub(crate) fn new(min_step: T) -> Self {
        Self {
            min_step,
            moved: false,
            seen: [0; CYCLE_WINDOW],
            nseen: 0,
        }
    }

    /// the last step moved the iterate
    pub(crate) fn moved(&self) -> bool {
        self.moved
    }

    /// Record the step just taken by [`QpData::linesearch`]
    pub(crate) fn record_step(&mut self, data: &QpData<'_, T>) {
        let nonzero = |v: &[T]| v.iter().any(|&x| x != T::zero());
        self.moved = data.tau > self.min_step && (nonzero(&*data.dz) || nonzero(&*data.dlam));
        if self.moved {
            self.nseen = 0;
        }
    }

    /// Record the active set encoded by `lam`.  Returns `true` if the
    /// same active set was recorded since the iterate last moved.
    pub(crate) fn repeated(&mut self, lam: &[T]) -> bool {
        let mut hasher = DefaultHasher::new();
        for &l in lam {
            BoundState::of(l).hash(&mut hasher);
        }
        let key = hasher.finish();

        let n = usize::min(self.nseen, CYCLE_WINDOW);
        if self.seen[..n].contains(&key) {
            return true;
        }
        self.seen[self.nseen % CYCLE_WINDOW] = key;
        self.nseen += 1;
        false
    }
}

fn _check_dimension(field: &'static str, expected: usize, found: usize) -> Result<(), QpSetupError> {
    if expected != found {
        return Err(QpSetupError::IncompatibleDimension(field, expected, found));
    }
    Ok(())
}

impl<T> ConfigurablePrintTarget for QpSolver<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.info.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}
