#![allow(non_snake_case)]

#[cfg(feature = "serde")]
#[test]
fn test_json_io() {
    use qrqp::{algebra::*, solver::*};
    use std::io::{Seek, SeekFrom};

    let H = CscMatrix {
        m: 1,
        n: 1,
        colptr: vec![0, 1],
        rowval: vec![0],
        nzval: vec![2.0],
    };
    let g = [1.0];
    let A = CscMatrix {
        m: 1,
        n: 1,
        colptr: vec![0, 1],
        rowval: vec![0],
        nzval: vec![-1.0],
    };
    // -x >= 2
    let lbz = [f64::NEG_INFINITY, 2.0];
    let ubz = [f64::INFINITY, f64::INFINITY];

    let settings = QpSettingsBuilder::default().verbose(false).build().unwrap();

    let mut solver = QpSolver::<f64>::new(&H, &g, &A, &lbz, &ubz, settings).unwrap();
    solver.solve();
    assert_eq!(solver.solution.status, SolverStatus::Solved);

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = QpSolver::<f64>::read_from_file(&mut file).unwrap();
    assert_eq!(solver2.bounds().1, &ubz);
    solver2.solve();
    assert_eq!(solver.solution.x, solver2.solution.x);
    assert_eq!(solver.solution.lam, solver2.solution.lam);
}

#[cfg(feature = "serde")]
#[test]
fn test_json_solution() {
    use qrqp::solver::*;

    let mut sol = QpSolution::<f64>::new(1, 1);
    sol.status = SolverStatus::Solved;
    (sol.obj_val, sol.pr, sol.du) = (-1., 0., 0.);
    sol.message = Some(QpMessage::NoSearchDirection);

    let json = serde_json::to_string(&sol).unwrap();
    let sol2: QpSolution<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(sol2.status, SolverStatus::Solved);
    assert_eq!(sol2.message, None);
}
