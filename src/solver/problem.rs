#![allow(non_snake_case)]
use super::{QpSettings, QpSetupError};
use crate::algebra::*;
use crate::qr::{QrSettingsBuilder, QrSymbolic};

/// Scratch buffer sizes required by [`QpData`](crate::solver::QpData)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkSize {
    /// length of the floating point buffer
    pub nf: usize,
    /// length of the integer buffer
    pub ni: usize,
}

/// Problem descriptor: dimensions, tolerances and all sparsity patterns
/// of a bound constrained QP.
///
/// The descriptor holds structure only and is fixed for the lifetime of
/// a solver.  It may be shared read-only between independent solves.
#[derive(Debug, Clone)]
pub struct QpProblem<T> {
    /// number of primal variables
    pub nx: usize,
    /// number of linear constraints
    pub na: usize,
    /// number of augmented variables, `nx + na`
    pub nz: usize,

    /// smallest permitted nonzero multiplier magnitude
    pub dmin: T,
    /// bound magnitude treated as absent
    pub inf: T,
    /// weighting of dual versus primal error
    pub du_to_pr: T,
    /// singularity threshold on |diag(R)|
    pub sing_tol: T,
    /// step components below this are snapped to zero
    pub step_zero_tol: T,
    /// primal and dual feasibility tolerances
    pub tol_pr: T,
    pub tol_du: T,

    /// Hessian pattern (both triangles)
    pub H: CscPattern,
    /// constraint Jacobian pattern
    pub A: CscPattern,
    /// transpose of `A`, with the map from nonzeros of `A` to those of `AT`
    pub AT: CscPattern,
    pub(crate) at_map: Vec<usize>,

    /// KKT pattern, the union over all active sets
    pub kkt: CscPattern,
    /// map from nonzeros of the KKT matrix to those of its transpose
    pub(crate) kkt_tmap: Vec<usize>,
    // positions of H, A, AT entries and of the diagonal within the KKT
    pub(crate) h_to_kkt: Vec<usize>,
    pub(crate) a_to_kkt: Vec<usize>,
    pub(crate) at_to_kkt: Vec<usize>,
    pub(crate) kkt_diag: Vec<usize>,

    /// symbolic QR factorization of the KKT pattern
    pub qr: QrSymbolic,
}

impl<T> QpProblem<T>
where
    T: FloatT,
{
    pub fn new(
        H: &CscPattern,
        A: &CscPattern,
        settings: &QpSettings<T>,
    ) -> Result<Self, QpSetupError> {
        settings.validate()?;

        let nx = H.n;
        let na = A.m;
        let nz = nx + na;

        if H.m != nx {
            return Err(QpSetupError::IncompatibleDimension("H rows", nx, H.m));
        }
        if A.n != nx {
            return Err(QpSetupError::IncompatibleDimension("A columns", nx, A.n));
        }
        if !H.is_symmetric() {
            return Err(QpSetupError::AsymmetricHessian);
        }

        let (AT, at_map) = A.transpose();
        let (kkt, maps) = _kkt_pattern(H, A, &AT);
        let (_, kkt_tmap) = kkt.transpose();

        let qr_settings = QrSettingsBuilder::default()
            .amd_enable(settings.qr_ordering_enable)
            .build()
            .unwrap();
        let qr = QrSymbolic::new(&kkt, &qr_settings)?;

        Ok(Self {
            nx,
            na,
            nz,
            dmin: settings.dmin,
            inf: settings.inf,
            du_to_pr: settings.du_to_pr,
            sing_tol: settings.sing_tol,
            step_zero_tol: settings.step_zero_tol,
            tol_pr: settings.tol_pr,
            tol_du: settings.tol_du,
            H: H.clone(),
            A: A.clone(),
            AT,
            at_map,
            kkt,
            kkt_tmap,
            h_to_kkt: maps.h_to_kkt,
            a_to_kkt: maps.a_to_kkt,
            at_to_kkt: maps.at_to_kkt,
            kkt_diag: maps.diag,
            qr,
        })
    }

    /// Floating point and integer scratch required by one solver state
    pub fn work_size(&self) -> WorkSize {
        let nz = self.nz;
        let nnz_kkt = self.kkt.nnz();
        let nnz_vr = self.qr.nnz_v() + self.qr.nnz_r();

        let mut nf = 0;
        nf += nnz_kkt; // kkt
        nf += 6 * nz; // z, lbz, ubz, lam, dz, dlam
        nf += usize::max(nnz_vr, nnz_kkt); // [v,r] or trans(kkt)
        nf += nz; // beta
        nf += self.A.nnz(); // trans(a)
        nf += 2 * self.nx; // infeas, tinfeas
        nf += nz + 1; // w, breakpoints
        nf += nz; // y
        nf += self.qr.work_len(); // qr

        WorkSize { nf, ni: nz + 1 }
    }
}

struct KktMaps {
    h_to_kkt: Vec<usize>,
    a_to_kkt: Vec<usize>,
    at_to_kkt: Vec<usize>,
    diag: Vec<usize>,
}

// Union of the KKT columns over all active sets:
//
//  column i <  nx : H(:,i), e_i and A(:,i) shifted by nx
//  column i >= nx : AT(:,i-nx) and e_i
//
// The pattern is structurally symmetric whenever H is.
fn _kkt_pattern(H: &CscPattern, A: &CscPattern, AT: &CscPattern) -> (CscPattern, KktMaps) {
    let nx = H.n;
    let nz = nx + A.m;

    let mut colptr = Vec::with_capacity(nz + 1);
    let mut rowval = Vec::with_capacity(H.nnz() + 2 * A.nnz() + nz);
    let mut maps = KktMaps {
        h_to_kkt: vec![0; H.nnz()],
        a_to_kkt: vec![0; A.nnz()],
        at_to_kkt: vec![0; AT.nnz()],
        diag: vec![0; nz],
    };
    colptr.push(0);

    for c in 0..nx {
        let mut has_diag = false;
        for p in H.col_range(c) {
            let r = H.rowval[p];
            if r > c && !has_diag {
                maps.diag[c] = rowval.len();
                rowval.push(c);
                has_diag = true;
            }
            if r == c {
                maps.diag[c] = rowval.len();
                has_diag = true;
            }
            maps.h_to_kkt[p] = rowval.len();
            rowval.push(r);
        }
        if !has_diag {
            maps.diag[c] = rowval.len();
            rowval.push(c);
        }
        for p in A.col_range(c) {
            maps.a_to_kkt[p] = rowval.len();
            rowval.push(nx + A.rowval[p]);
        }
        colptr.push(rowval.len());
    }

    for j in 0..A.m {
        for p in AT.col_range(j) {
            maps.at_to_kkt[p] = rowval.len();
            rowval.push(AT.rowval[p]);
        }
        maps.diag[nx + j] = rowval.len();
        rowval.push(nx + j);
        colptr.push(rowval.len());
    }

    (CscPattern::new(nz, nz, colptr, rowval), maps)
}
