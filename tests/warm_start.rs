#![allow(non_snake_case)]
use qrqp::{algebra::*, solver::*};

const INF: f64 = f64::INFINITY;

fn quiet() -> QpSettings<f64> {
    QpSettingsBuilder::default().verbose(false).build().unwrap()
}

fn univariate_solver() -> QpSolver<f64> {
    // minimize x^2 - 10x on [0, 3]
    let H = CscMatrix::from_diag(&[2.]);
    let A = CscMatrix::spalloc(0, 1, 0);
    QpSolver::new(&H, &[-10.], &A, &[0.], &[3.], quiet()).unwrap()
}

#[test]
fn test_initial_guess() {
    let H = CscMatrix::from_diag(&[2., 2.]);
    let A = CscMatrix::spalloc(0, 2, 0);
    let mut solver =
        QpSolver::new(&H, &[0., 0.], &A, &[-INF, -INF], &[INF, INF], quiet()).unwrap();

    solver.set_initial_guess(&[3., -4.], &[0., 0.]).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert_eq!(sol.iterations, 1);
    assert!(sol.x.norm_inf() <= 1e-12);
    assert!(f64::abs(sol.obj_val) <= 1e-12);
}

#[test]
fn test_resolve_from_solution() {
    let mut solver = univariate_solver();
    solver.solve();
    assert_eq!(solver.solution.status, SolverStatus::Solved);
    let iters = solver.solution.iterations;
    assert!(iters > 0);

    // the second solve starts at the optimum
    solver.solve();
    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert_eq!(solver.solution.iterations, 0);
    assert!(f64::abs(solver.solution.x[0] - 3.) <= 1e-12);
}

#[test]
fn test_resolve_after_update_g() {
    let mut solver = univariate_solver();
    solver.solve();
    assert!(solver.solution.lam[0] > 0.);

    // minimizer moves into the interior, the active bound is released
    solver.update_g(&[-4.]).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert_eq!(sol.iterations, 1);
    assert!(f64::abs(sol.x[0] - 2.) <= 1e-12);
    assert_eq!(sol.lam[0], 0.);
    assert_eq!(sol.message, Some(QpMessage::RemovedForDual(0)));
}

#[test]
fn test_resolve_after_update_bounds() {
    let mut solver = univariate_solver();
    solver.solve();

    // the previous solution now violates the upper bound
    solver.update_bounds(&[0.], &[1.]).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Solved);
    assert!(f64::abs(sol.x[0] - 1.) <= 1e-12);
    assert!(f64::abs(sol.lam[0] - 8.) <= 1e-10);
    assert_eq!(solver.bounds().1, &[1.]);
}
