#![allow(non_snake_case)]
use qrqp::{algebra::*, solver::*};

const INF: f64 = f64::INFINITY;

fn quiet() -> QpSettings<f64> {
    QpSettingsBuilder::default().verbose(false).build().unwrap()
}

#[test]
fn test_box_univariate_upper() {
    // minimize x^2 - 10x on [0, 3]
    let H = CscMatrix::from_diag(&[2.]);
    let g = [-10.];
    let A = CscMatrix::spalloc(0, 1, 0);

    let mut solver = QpSolver::new(&H, &g, &A, &[0.], &[3.], quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert_eq!(sol.iterations, 2);
    assert!(f64::abs(sol.x[0] - 3.) <= 1e-12);
    assert!(f64::abs(sol.lam[0] - 4.) <= 1e-12);
    assert!(f64::abs(sol.obj_val + 21.) <= 1e-12);
    assert_eq!(sol.pr, 0.);
    assert!(sol.du <= 1e-12);
}

#[test]
fn test_box_univariate_lower() {
    // minimize x^2 + 10x on [0, 3]
    let H = CscMatrix::from_diag(&[2.]);
    let g = [10.];
    let A = CscMatrix::spalloc(0, 1, 0);

    let mut solver = QpSolver::new(&H, &g, &A, &[0.], &[3.], quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(f64::abs(sol.x[0]) <= 1e-12);
    assert!(sol.lam[0] < 0.);
    assert!(f64::abs(sol.lam[0] + 10.) <= 1e-10);
}

#[test]
fn test_box_mixed() {
    // separable problem with one component at each bound and one interior
    let H = CscMatrix::identity(3);
    let g = [-5., 5., -0.5];
    let A = CscMatrix::spalloc(0, 3, 0);
    let lbz = [-1., -1., -1.];
    let ubz = [1., 1., 1.];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(sol.x.dist(&[1., -1., 0.5]) <= 1e-10);
    assert!(sol.lam[0] > 0.);
    assert!(sol.lam[1] < 0.);
    assert_eq!(sol.lam[2], 0.);
}

#[test]
fn test_box_one_sided() {
    let H = CscMatrix::identity(2);
    let g = [2., -2.];
    let A = CscMatrix::spalloc(0, 2, 0);
    let lbz = [0., -INF];
    let ubz = [INF, 1.];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(sol.x.dist(&[0., 1.]) <= 1e-10);
    assert!(sol.lam[0] < 0. && sol.lam[1] > 0.);
}

#[test]
fn test_box_finite_infinity() {
    // bounds at or beyond `inf` are treated as absent
    let settings = QpSettingsBuilder::default()
        .verbose(false)
        .inf(1e20)
        .build()
        .unwrap();
    let H = CscMatrix::from_diag(&[2.]);
    let g = [-10.];
    let A = CscMatrix::spalloc(0, 1, 0);

    let mut solver = QpSolver::new(&H, &g, &A, &[-1e20], &[1e20], settings).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(f64::abs(sol.x[0] - 5.) <= 1e-12);
    assert_eq!(sol.lam[0], 0.);
}

#[test]
fn test_box_infeasible_bounds() {
    let H = CscMatrix::identity(2);
    let g = [0., 0.];
    let A = CscMatrix::spalloc(0, 2, 0);
    let lbz = [0., INF];
    let ubz = [1., INF];

    let mut solver = QpSolver::new(&H, &g, &A, &lbz, &ubz, quiet()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::InfeasibleBounds);
    assert_eq!(sol.iterations, 0);
    assert!(sol.obj_val.is_nan());
}
