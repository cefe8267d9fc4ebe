#![allow(non_snake_case)]

use qrqp::{algebra::*, io::ConfigurablePrintTarget, solver::*};

fn test_print_solver() -> QpSolver<f64> {
    let H = CscMatrix::identity(1);
    let g = [-2.];
    let A = CscMatrix::identity(1);
    let lbz = [-f64::INFINITY, 0.];
    let ubz = [f64::INFINITY, 1.];
    let settings = QpSettings::default();
    QpSolver::new(&H, &g, &A, &lbz, &ubz, settings).unwrap()
}

#[test]
fn test_print_to_stdout() {
    let mut solver = test_print_solver();
    solver.print_to_stdout();
    solver.solve();
}

#[test]
fn test_print_to_buffer() {
    let mut solver = test_print_solver();
    solver.print_to_buffer();
    solver.solve();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("qrqp"));
    assert!(result.contains("Solved"));
}

#[test]
fn test_print_quiet() {
    let mut solver = test_print_solver();
    solver.settings.verbose = false;
    solver.print_to_buffer();
    solver.solve();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_print_to_file() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    solver.print_to_file(file.into_file());
    solver.solve();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("qrqp"));
}

#[test]
fn test_print_to_stream() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    let stream = Box::new(file.into_file());

    solver.print_to_stream(stream);
    solver.solve();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("qrqp"));
}

#[test]
fn test_print_to_sink() {
    let mut solver = test_print_solver();
    solver.print_to_sink();
    solver.solve();
    // no output
}
