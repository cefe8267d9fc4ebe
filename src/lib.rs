//! __qrqp__ is a sparse active-set solver for convex quadratic programs
//! with box bounds on an augmented variable.  It solves
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T H x + g^T x\\\\\[2ex\]
//!  \text{subject to} & l_x \le x \le u_x \\\\\[1ex\]
//!         & l_a \le A x \le u_a
//!  \end{array}
//! $$
//!
//! with decision variables $x \in \mathbb{R}^{n_x}$ and constraint
//! values $A x \in \mathbb{R}^{n_a}$.  Primal variables and constraint
//! values are stacked into a single vector $z = [x; Ax]$ of length
//! $n_z = n_x + n_a$ with bounds $l_z \le z \le u_z$.  Equal bounds
//! encode an equality, infinite bounds are absent.
//!
//! Each iteration assembles a KKT matrix for the current active set,
//! factors it with a sparse Householder QR and takes a primal-dual
//! Newton step (or a nullspace step when the KKT matrix is singular).
//! The step is limited by a piecewise linear primal/dual line search,
//! after which a single bound is activated or released.
//!
//! All scratch memory is sized at setup from the sparsity patterns
//! of $H$ and $A$, so no allocation happens inside the solve loop.
//!
//! # Example
//!
//! ```no_run
//! use qrqp::{algebra::*, solver::*};
//!
//! // minimize x^2 + y^2 - 2x  subject to  x + y >= 1
//! let H = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![2., 2.]);
//! let g = [-2., 0.];
//! let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
//! let inf = f64::INFINITY;
//! let lbz = [-inf, -inf, 1.];
//! let ubz = [inf, inf, inf];
//!
//! let settings = QpSettings::default();
//! let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, settings).unwrap();
//! solver.solve();
//! assert_eq!(solver.solution.status, SolverStatus::Solved);
//! ```

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod io;
pub mod qr;
pub mod solver;
pub mod timers;
