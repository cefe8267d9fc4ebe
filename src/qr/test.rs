use super::*;
use crate::algebra::{CscMatrix, FloatT};
use std::iter::zip;

// tests of QR internals.  Configured as submodule of qr.rs to expose them.

fn test_matrix_3x3() -> CscMatrix<f64> {
    // A =
    //[ 4.0  1.0   ⋅ ]
    //[ 2.0  5.0  1.0]
    //[  ⋅   3.0  6.0]
    CscMatrix::new(
        3,
        3,
        vec![0, 2, 5, 7],
        vec![0, 1, 0, 1, 2, 1, 2],
        vec![4., 2., 1., 5., 3., 1., 6.],
    )
}

fn test_matrix_singular() -> CscMatrix<f64> {
    // A =
    //[ 1.0  1.0   ⋅ ]
    //[ 2.0  2.0   ⋅ ]
    //[  ⋅    ⋅   3.0]
    CscMatrix::new(
        3,
        3,
        vec![0, 2, 4, 5],
        vec![0, 1, 0, 1, 2],
        vec![1., 2., 1., 2., 3.],
    )
}

fn inf_norm_diff<T: FloatT>(a: &[T], b: &[T]) -> T {
    zip(a, b).fold(T::zero(), |acc, (x, y)| T::max(acc, T::abs(*x - *y)))
}

struct Factors {
    qr: QrSymbolic,
    nz_v: Vec<f64>,
    nz_r: Vec<f64>,
    beta: Vec<f64>,
    work: Vec<f64>,
}

fn factor(A: &CscMatrix<f64>, settings: &QrSettings) -> Factors {
    let qr = QrSymbolic::new(&A.pattern(), settings).unwrap();
    let mut f = Factors {
        nz_v: vec![0.; qr.nnz_v()],
        nz_r: vec![0.; qr.nnz_r()],
        beta: vec![0.; qr.n()],
        work: vec![0.; qr.work_len()],
        qr,
    };
    f.qr
        .factor(&A.nzval, &mut f.nz_v, &mut f.nz_r, &mut f.beta, &mut f.work);
    f
}

fn no_amd() -> QrSettings {
    QrSettingsBuilder::default().amd_enable(false).build().unwrap()
}

#[test]
fn test_invperm() {
    assert!(_invperm(&[2, 0, 1]).is_ok());
    assert!(_invperm(&[2, 0, 2]).is_err());
    assert!(_invperm(&[3, 0, 1]).is_err());
}

#[test]
fn test_house() {
    let mut x = [3., 4.];
    let (beta, s) = _house(&mut x);
    assert_eq!(s, 5.);

    // (I - beta*v*v')*[3;4] = [5;0]
    let v = x;
    let vx = v[0] * 3. + v[1] * 4.;
    let y = [3. - beta * vx * v[0], 4. - beta * vx * v[1]];
    assert!(inf_norm_diff(&y, &[5., 0.]) < 1e-14);

    // negative scalar is reflected to a positive one
    let mut x = [-2.];
    let (beta, s) = _house(&mut x);
    assert_eq!((beta, s, x[0]), (2., 2., 1.));
}

#[test]
fn test_not_square() {
    let A = CscMatrix::<f64>::spalloc(3, 2, 0);
    let out = QrSymbolic::new(&A.pattern(), &QrSettings::default());
    assert_eq!(out.err(), Some(QrError::NotSquare));
}

#[test]
fn test_bad_perm() {
    let A = test_matrix_3x3();
    let settings = QrSettingsBuilder::default()
        .perm(vec![0, 0, 1])
        .build()
        .unwrap();
    let out = QrSymbolic::new(&A.pattern(), &settings);
    assert_eq!(out.err(), Some(QrError::InvalidPermutation));

    let settings = QrSettingsBuilder::default().perm(vec![0, 1]).build().unwrap();
    let out = QrSymbolic::new(&A.pattern(), &settings);
    assert_eq!(out.err(), Some(QrError::InvalidPermutation));
}

#[test]
fn test_solve() {
    let A = test_matrix_3x3();

    for settings in [QrSettings::default(), no_amd()] {
        let mut f = factor(&A, &settings);
        assert_eq!(f.qr.nrow_ext(), 3);

        let mut x = vec![6., 15., 24.];
        f.qr.solve(&f.nz_v, &f.nz_r, &f.beta, &mut x, &mut f.work);
        assert!(inf_norm_diff(&x, &[1., 2., 3.]) < 1e-12);

        let mut x = vec![8., 20., 20.];
        f.qr
            .solve_transposed(&f.nz_v, &f.nz_r, &f.beta, &mut x, &mut f.work);
        assert!(inf_norm_diff(&x, &[1., 2., 3.]) < 1e-12);

        let rank = f.qr.singular(&f.nz_r, 1e-12);
        assert_eq!(rank.nullity, 0);
        assert!(rank.min_diag > 1.);
    }
}

#[test]
fn test_solve_indefinite() {
    // A =
    //[ 2.0   ⋅   1.0]
    //[  ⋅   2.0  1.0]
    //[ 1.0  1.0   ⋅ ]
    let A = CscMatrix::new(
        3,
        3,
        vec![0, 2, 4, 6],
        vec![0, 2, 1, 2, 0, 1],
        vec![2., 1., 2., 1., 1., 1.],
    );
    let mut f = factor(&A, &QrSettings::default());

    let b = vec![1., -1., 2.];
    let mut x = b.clone();
    f.qr.solve(&f.nz_v, &f.nz_r, &f.beta, &mut x, &mut f.work);

    let mut r = b.clone();
    A.view().gemv(&mut r, &x, 1., -1.);
    assert!(r.norm_inf() < 1e-12);
}

#[test]
fn test_singular_columns() {
    let A = test_matrix_singular();
    let f = factor(&A, &no_amd());

    let rank = f.qr.singular(&f.nz_r, 1e-12);
    assert_eq!(rank.nullity, 1);
    assert_eq!(rank.min_step, 1);
    assert_eq!(rank.min_col, 1);

    let steps: Vec<usize> = f.qr.singular_steps(&f.nz_r, 1e-12).collect();
    assert_eq!(steps, vec![1]);

    let mut v = vec![0.; 3];
    f.qr.null_vector(&f.nz_r, 1, 1e-12, &mut v);
    assert!(inf_norm_diff(&v, &[-1., 1., 0.]) < 1e-12);

    let mut r = vec![0.; 3];
    A.view().gemv(&mut r, &v, 1., 0.);
    assert!(r.norm_inf() < 1e-12);
}

#[test]
fn test_singular_columns_amd() {
    let A = test_matrix_singular();
    let f = factor(&A, &QrSettings::default());

    let rank = f.qr.singular(&f.nz_r, 1e-12);
    assert_eq!(rank.nullity, 1);

    let mut v = vec![0.; 3];
    f.qr.null_vector(&f.nz_r, rank.min_step, 1e-12, &mut v);
    assert_eq!(v[rank.min_col], 1.);

    let mut r = vec![0.; 3];
    A.view().gemv(&mut r, &v, 1., 0.);
    assert!(r.norm_inf() < 1e-12);
}

#[test]
fn test_structurally_empty_column() {
    // A =
    //[ 1.0   ⋅ ]
    //[ 2.0   ⋅ ]
    let A = CscMatrix::new(2, 2, vec![0, 2, 2], vec![0, 1], vec![1., 2.]);
    let f = factor(&A, &no_amd());

    // second column gets a fictitious pivot row
    assert_eq!(f.qr.nrow_ext(), 3);
    assert_eq!(f.qr.prinv, vec![0, 2, 1]);

    let rank = f.qr.singular(&f.nz_r, 1e-12);
    assert_eq!(rank.nullity, 1);
    assert_eq!(rank.min_col, 1);

    let mut v = vec![0.; 2];
    f.qr.null_vector(&f.nz_r, 1, 1e-12, &mut v);
    assert_eq!(v, vec![0., 1.]);
}

#[test]
fn test_refactor_same_pattern() {
    let A = test_matrix_3x3();
    let mut f = factor(&A, &QrSettings::default());

    // new values on the same pattern
    let mut B = A.clone();
    B.nzval.iter_mut().for_each(|v| *v *= 2.);
    f.qr
        .factor(&B.nzval, &mut f.nz_v, &mut f.nz_r, &mut f.beta, &mut f.work);

    let mut x = vec![6., 15., 24.];
    f.qr.solve(&f.nz_v, &f.nz_r, &f.beta, &mut x, &mut f.work);
    assert!(inf_norm_diff(&x, &[0.5, 1., 1.5]) < 1e-12);
}
