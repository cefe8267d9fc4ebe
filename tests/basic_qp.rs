#![allow(non_snake_case)]
use qrqp::{algebra::*, solver::*};

const INF: f64 = f64::INFINITY;

fn quiet() -> QpSettings<f64> {
    QpSettingsBuilder::default().verbose(false).build().unwrap()
}

#[test]
fn test_qp_unconstrained() {
    // minimize x0^2 + 2 x1^2 - 2 x0 - 4 x1
    let H = CscMatrix::from_diag(&[2., 4.]);
    let g = [-2., -4.];
    let A = CscMatrix::spalloc(0, 2, 0);
    let lbz = [-INF, -INF];
    let ubz = [INF, INF];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.solution.x.dist(&[1., 1.]) <= 1e-10);
    assert!(f64::abs(solver.solution.obj_val + 3.) <= 1e-10);
    assert_eq!(solver.solution.lam, vec![0., 0.]);
}

#[test]
fn test_qp_inequality() {
    // minimize x^2 + y^2 subject to x + y >= 1
    let H = CscMatrix::from_diag(&[2., 2.]);
    let g = [0., 0.];
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
    let lbz = [-INF, -INF, 1.];
    let ubz = [INF, INF, INF];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(sol.x.dist(&[0.5, 0.5]) <= 1e-10);
    assert!(f64::abs(sol.z[2] - 1.) <= 1e-10);
    assert!(f64::abs(sol.obj_val - 0.5) <= 1e-10);

    // lower bound of the constraint active
    assert!(f64::abs(sol.lam[2] + 1.) <= 1e-10);
    assert!(sol.pr <= 1e-8 && sol.du <= 1e-8);
}

#[test]
fn test_qp_inactive_constraint() {
    // the unconstrained minimizer (1, 2) satisfies x + y <= 5
    let H = CscMatrix::from_diag(&[2., 2.]);
    let g = [-2., -4.];
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
    let lbz = [-INF, -INF, -INF];
    let ubz = [INF, INF, 5.];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(sol.x.dist(&[1., 2.]) <= 1e-10);
    assert_eq!(sol.lam[2], 0.);
}

#[test]
fn test_qp_upper_constraint() {
    // minimize (x-1)^2 + (y-2)^2 subject to x + y <= 2
    let H = CscMatrix::from_diag(&[2., 2.]);
    let g = [-2., -4.];
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
    let lbz = [-INF, -INF, -INF];
    let ubz = [INF, INF, 2.];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(sol.x.dist(&[0.5, 1.5]) <= 1e-8);
    assert!(sol.lam[2] > 0.);
    assert!(f64::abs(sol.lam[2] - 1.) <= 1e-8);
}

#[test]
fn test_qp_coupled_hessian() {
    // H = [4 1; 1 2], g = [1, 1], x >= 0, x + y >= 1
    let H = CscMatrix::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![4., 1., 1., 2.]);
    let g = [1., 1.];
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
    let lbz = [0., 0., 1.];
    let ubz = [INF, INF, INF];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);

    // minimize 2x^2 + xy + y^2 + x + y on x + y = 1: x = 0.25, y = 0.75
    assert!(sol.x.dist(&[0.25, 0.75]) <= 1e-8);
    assert!(sol.lam[2] < 0.);
    assert!(sol.pr <= 1e-8 && sol.du <= 1e-8);
}
