#![allow(non_snake_case)]
use qrqp::{algebra::*, solver::*};

const INF: f64 = f64::INFINITY;

fn quiet() -> QpSettings<f64> {
    QpSettingsBuilder::default().verbose(false).build().unwrap()
}

fn sum_row() -> CscMatrix<f64> {
    // A = [1 1]
    CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.])
}

#[test]
fn test_eq_constrained_sum() {
    // minimize x^2 + y^2 subject to x + y = 1
    let H = CscMatrix::from_diag(&[2., 2.]);
    let g = [0., 0.];
    let lbz = [-INF, -INF, 1.];
    let ubz = [INF, INF, 1.];

    let mut solver = QpSolver::new(&H, &g, &sum_row(), &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(sol.x.dist(&[0.5, 0.5]) <= 1e-10);
    assert!(f64::abs(sol.lam[2] + 1.) <= 1e-10);
}

#[test]
fn test_eq_constrained_zero_multiplier() {
    // the unconstrained minimizer (1, 0) already satisfies x + y = 1
    let H = CscMatrix::from_diag(&[2., 2.]);
    let g = [-2., 0.];
    let lbz = [-INF, -INF, 1.];
    let ubz = [INF, INF, 1.];

    let mut solver = QpSolver::new(&H, &g, &sum_row(), &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(sol.x.dist(&[1., 0.]) <= 1e-10);
    assert!(f64::abs(sol.obj_val + 1.) <= 1e-10);

    // an equality keeps a nonzero multiplier
    assert_ne!(sol.lam[2], 0.);
    assert!(f64::abs(sol.lam[2]) <= 1e-8);
}

#[test]
fn test_eq_fixed_variable() {
    // x0 fixed to 3, minimize x0^2 + x1^2 - 2 x0 - 2 x1
    let H = CscMatrix::from_diag(&[2., 2.]);
    let g = [-2., -2.];
    let A = CscMatrix::spalloc(0, 2, 0);
    let lbz = [3., -INF];
    let ubz = [3., INF];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(sol.x.dist(&[3., 1.]) <= 1e-10);
    assert!(f64::abs(sol.lam[0] + 4.) <= 1e-10);
    assert!(f64::abs(sol.obj_val - 2.) <= 1e-10);
}

#[test]
fn test_bound_implied_by_equality() {
    // minimize x'x subject to 0.5 x = 0.5 and 0.9 <= x <= 2.  The bound
    // violated at the start cannot be enforced next to its equality,
    // but the first step satisfies it anyway.
    let H = CscMatrix::from_diag(&[2., 2.]);
    let A = CscMatrix::from_diag(&[0.5, 0.5]);
    let g = [0., 0.];
    let lbz = [0.9, 0.9, 0.5, 0.5];
    let ubz = [2., 2., 0.5, 0.5];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert_eq!(sol.iterations, 1);
    assert!(sol.x.dist(&[1., 1.]) <= 1e-10);
    assert_eq!(sol.lam[0], 0.);
    assert!(f64::abs(sol.lam[2] + 4.) <= 1e-10);
}
