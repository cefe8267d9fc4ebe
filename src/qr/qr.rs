#![allow(non_snake_case)]
use crate::algebra::*;
use derive_builder::Builder;
use std::collections::BTreeSet;
use thiserror::Error;

/// Error codes returnable from [`QrSymbolic`](QrSymbolic) construction

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QrError {
    #[error("Matrix must be square")]
    NotSquare,
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    #[error("AMD column ordering failed")]
    OrderingFailed,
}

/// Settings for the symbolic phase of [`QrSymbolic`](QrSymbolic)

#[derive(Builder, Debug, Clone)]
pub struct QrSettings {
    /// order columns with AMD applied to the (symmetric) pattern
    #[builder(default = "true")]
    amd_enable: bool,
    #[builder(default = "1.0")]
    amd_dense_scale: f64,
    /// user supplied column ordering.  Overrides `amd_enable`
    #[builder(default = "None", setter(strip_option))]
    perm: Option<Vec<usize>>,
}

impl Default for QrSettings {
    fn default() -> QrSettings {
        QrSettingsBuilder::default().build().unwrap()
    }
}

/// Smallest diagonal of R and the number of near-zero diagonals

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrRank<T> {
    /// number of diagonal entries of R below the threshold
    pub nullity: usize,
    /// smallest |R(k,k)|
    pub min_diag: T,
    /// factorization step attaining `min_diag`
    pub min_step: usize,
    /// matrix column attaining `min_diag`
    pub min_col: usize,
}

/// Symbolic Householder QR factorization of a square sparse matrix `A`.
///
/// Column `pc[k]` of `A` is eliminated at step `k`.  Each step produces a
/// Householder vector (column `k` of `V`, pivot row first) and column `k`
/// of the upper triangular factor `R`, whose rows are indexed by step and
/// sorted with the diagonal last.  Columns that are structurally dependent
/// on earlier ones receive a fictitious row, so `V` may have more rows than
/// `A`.  With `Q = H_0 H_1 ... H_{n-1}` the factorization satisfies
///
/// ```text
/// A[:, pc] = Q * P * R
/// ```
///
/// where `P` places row `k` of `R` at the pivot row of step `k`.
#[derive(Debug, Clone)]
pub struct QrSymbolic {
    /// pattern of the factored matrix
    pub A: CscPattern,
    /// column ordering
    pub pc: Vec<usize>,
    /// row (including fictitious rows) to pivot step.  Rows that are never
    /// pivoted are numbered `n..nrow_ext` in order of appearance.
    pub prinv: Vec<usize>,
    /// Householder vector pattern (`nrow_ext x n`)
    pub V: CscPattern,
    /// upper triangular factor pattern (`n x n`)
    pub R: CscPattern,
}

impl QrSymbolic {
    pub fn new(A: &CscPattern, settings: &QrSettings) -> Result<Self, QrError> {
        if A.m != A.n {
            return Err(QrError::NotSquare);
        }

        let pc = match settings.perm {
            Some(ref perm) => {
                _invperm(perm)?;
                if perm.len() != A.n {
                    return Err(QrError::InvalidPermutation);
                }
                perm.clone()
            }
            None if settings.amd_enable => _get_amd_ordering(A, settings.amd_dense_scale)?,
            None => (0..A.n).collect(),
        };

        let (V, R, prinv) = _symbolic(A, &pc);

        Ok(Self {
            A: A.clone(),
            pc,
            prinv,
            V,
            R,
        })
    }

    /// matrix dimension
    pub fn n(&self) -> usize {
        self.A.n
    }

    /// row count including fictitious rows
    pub fn nrow_ext(&self) -> usize {
        self.V.m
    }

    pub fn nnz_v(&self) -> usize {
        self.V.nnz()
    }

    pub fn nnz_r(&self) -> usize {
        self.R.nnz()
    }

    /// required length of the `work` argument to the numeric routines
    pub fn work_len(&self) -> usize {
        self.nrow_ext()
    }

    #[inline]
    fn pivot(&self, k: usize) -> usize {
        self.V.rowval[self.V.colptr[k]]
    }

    #[inline]
    fn diag_index(&self, k: usize) -> usize {
        self.R.colptr[k + 1] - 1
    }

    /// Numeric factorization of the matrix with nonzeros `nzval`.
    ///
    /// Writes the Householder vectors to `nz_v`, their scalars to `beta`
    /// and the upper triangular factor to `nz_r`.
    pub fn factor<T: FloatT>(
        &self,
        nzval: &[T],
        nz_v: &mut [T],
        nz_r: &mut [T],
        beta: &mut [T],
        work: &mut [T],
    ) {
        assert_eq!(nzval.len(), self.A.nnz());
        assert!(nz_v.len() >= self.nnz_v() && nz_r.len() >= self.nnz_r());
        let w = &mut work[0..self.work_len()];
        w.fill(T::zero());

        for (k, &col) in self.pc.iter().enumerate() {
            // scatter the column to dense work
            for p in self.A.col_range(col) {
                w[self.A.rowval[p]] = nzval[p];
            }

            // apply earlier reflections and gather the R column
            let diag = self.diag_index(k);
            for p in self.R.colptr[k]..diag {
                let j = self.R.rowval[p];
                self._apply_householder(j, nz_v, beta[j], w);
                let pivot = self.pivot(j);
                nz_r[p] = w[pivot];
                w[pivot] = T::zero();
            }

            // remaining entries define the new reflection
            let rng = self.V.col_range(k);
            for p in rng.clone() {
                let row = self.V.rowval[p];
                nz_v[p] = w[row];
                w[row] = T::zero();
            }
            let (b, s) = _house(&mut nz_v[rng]);
            beta[k] = b;
            nz_r[diag] = s;
        }
    }

    /// Solves `A x = b`.  Solves in place (x replaces b)
    pub fn solve<T: FloatT>(&self, nz_v: &[T], nz_r: &[T], beta: &[T], x: &mut [T], work: &mut [T]) {
        let n = self.n();
        assert_eq!(x.len(), n);
        let w = &mut work[0..self.work_len()];
        w.fill(T::zero());
        w[0..n].copy_from_slice(x);

        // w = Q'*b
        for k in 0..n {
            self._apply_householder(k, nz_v, beta[k], w);
        }

        // backward substitution with R, pivot rows hold the iterate
        for k in (0..n).rev() {
            let diag = self.diag_index(k);
            let pk = self.pivot(k);
            let zk = w[pk] / nz_r[diag];
            w[pk] = zk;
            for p in self.R.colptr[k]..diag {
                w[self.pivot(self.R.rowval[p])] -= nz_r[p] * zk;
            }
        }

        for (k, &col) in self.pc.iter().enumerate() {
            x[col] = w[self.pivot(k)];
        }
    }

    /// Solves `A' x = b`.  Solves in place (x replaces b)
    pub fn solve_transposed<T: FloatT>(
        &self,
        nz_v: &[T],
        nz_r: &[T],
        beta: &[T],
        x: &mut [T],
        work: &mut [T],
    ) {
        let n = self.n();
        assert_eq!(x.len(), n);
        let w = &mut work[0..self.work_len()];
        w.fill(T::zero());

        // forward substitution with R'
        for (k, &col) in self.pc.iter().enumerate() {
            let diag = self.diag_index(k);
            let mut s = x[col];
            for p in self.R.colptr[k]..diag {
                s -= nz_r[p] * w[self.pivot(self.R.rowval[p])];
            }
            w[self.pivot(k)] = s / nz_r[diag];
        }

        // x = Q*w
        for k in (0..n).rev() {
            self._apply_householder(k, nz_v, beta[k], w);
        }

        x.copy_from_slice(&w[0..n]);
    }

    /// Count diagonal entries of R with magnitude below `eps` and
    /// locate the smallest one.
    pub fn singular<T: FloatT>(&self, nz_r: &[T], eps: T) -> QrRank<T> {
        let mut rank = QrRank {
            nullity: 0,
            min_diag: T::infinity(),
            min_step: 0,
            min_col: 0,
        };
        for k in 0..self.n() {
            let d = T::abs(nz_r[self.diag_index(k)]);
            if d < eps {
                rank.nullity += 1;
            }
            if d < rank.min_diag {
                rank.min_diag = d;
                rank.min_step = k;
                rank.min_col = self.pc[k];
            }
        }
        rank
    }

    /// Factorization steps whose diagonal of R is below `eps`
    pub fn singular_steps<'a, T: FloatT>(
        &'a self,
        nz_r: &'a [T],
        eps: T,
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.n()).filter(move |&k| T::abs(nz_r[self.diag_index(k)]) < eps)
    }

    /// Linear combination of the columns of `A` that vanishes, built
    /// from the near-zero pivot of step `step`.
    ///
    /// Sets `v[pc[step]] = 1` and back-substitutes through the leading
    /// block of R.  Columns of other near-zero pivots are left out.
    pub fn null_vector<T: FloatT>(&self, nz_r: &[T], step: usize, eps: T, v: &mut [T]) {
        assert_eq!(v.len(), self.n());
        v.fill(T::zero());

        // v is indexed by column, so entry pc[j] holds step j
        let pc = &self.pc;
        let diag = self.diag_index(step);
        for p in self.R.colptr[step]..diag {
            v[pc[self.R.rowval[p]]] = -nz_r[p];
        }
        v[pc[step]] = T::one();

        for k in (0..step).rev() {
            let diag = self.diag_index(k);
            let d = nz_r[diag];
            if T::abs(d) < eps {
                v[pc[k]] = T::zero();
                continue;
            }
            let zk = v[pc[k]] / d;
            v[pc[k]] = zk;
            for p in self.R.colptr[k]..diag {
                v[pc[self.R.rowval[p]]] -= nz_r[p] * zk;
            }
        }
    }

    // w = (I - beta*v*v')*w for Householder vector k
    #[inline]
    fn _apply_householder<T: FloatT>(&self, k: usize, nz_v: &[T], beta: T, w: &mut [T]) {
        let rng = self.V.col_range(k);
        let rows = &self.V.rowval[rng.clone()];
        let vals = &nz_v[rng];

        let mut s = T::zero();
        for (&r, &v) in rows.iter().zip(vals) {
            s += v * w[r];
        }
        s *= beta;
        if s == T::zero() {
            return;
        }
        for (&r, &v) in rows.iter().zip(vals) {
            w[r] -= s * v;
        }
    }
}

// Householder reflection zeroing x[1..].  On exit x holds the
// Householder vector and the return value is (beta, norm(x)).
pub(crate) fn _house<T: FloatT>(x: &mut [T]) -> (T, T) {
    let sigma = x[1..].iter().fold(T::zero(), |acc, &v| acc + v * v);
    let x0 = x[0];

    if sigma == T::zero() {
        let s = T::abs(x0);
        let beta = if x0 <= T::zero() {
            (2.).as_T()
        } else {
            T::zero()
        };
        x[0] = T::one();
        (beta, s)
    } else {
        let s = T::sqrt(x0 * x0 + sigma);
        x[0] = if x0 <= T::zero() {
            x0 - s
        } else {
            -sigma / (x0 + s)
        };
        let beta = -T::recip(s * x[0]);
        (beta, s)
    }
}

// Structural elimination.  Returns the patterns of V and R and the
// row to step map.
fn _symbolic(A: &CscPattern, pc: &[usize]) -> (CscPattern, CscPattern, Vec<usize>) {
    const UNSET: usize = usize::MAX;
    let n = A.n;

    // per row: reflections containing it, step pivoting it, last visit
    let mut row_house: Vec<Vec<usize>> = vec![Vec::new(); A.m];
    let mut prinv = vec![UNSET; A.m];
    let mut mark = vec![UNSET; A.m];

    let mut v_colptr = Vec::with_capacity(n + 1);
    let mut v_rowval = Vec::new();
    let mut r_colptr = Vec::with_capacity(n + 1);
    let mut r_rowval = Vec::new();
    v_colptr.push(0);
    r_colptr.push(0);

    let mut rows = Vec::new();
    let mut candidates = BTreeSet::new();

    for (k, &col) in pc.iter().enumerate() {
        rows.clear();
        for &r in A.col_rows(col) {
            mark[r] = k;
            rows.push(r);
            candidates.extend(row_house[r].iter().copied());
        }

        // reflections are applied in increasing order.  Applying
        // reflection j spreads the column over the rows of V_j.
        while let Some(j) = candidates.pop_first() {
            r_rowval.push(j);
            for &r in &v_rowval[v_colptr[j]..v_colptr[j + 1]] {
                if mark[r] != k {
                    mark[r] = k;
                    rows.push(r);
                    candidates.extend(row_house[r].iter().copied().filter(|&h| h > j));
                }
            }
        }
        r_rowval.push(k);
        r_colptr.push(r_rowval.len());

        // unpivoted rows form the new reflection, smallest row first
        rows.retain(|&r| prinv[r] == UNSET);
        rows.sort_unstable();
        if rows.is_empty() {
            let r = prinv.len();
            prinv.push(UNSET);
            mark.push(k);
            row_house.push(Vec::new());
            rows.push(r);
        }
        prinv[rows[0]] = k;
        for &r in &rows {
            row_house[r].push(k);
        }
        v_rowval.extend_from_slice(&rows);
        v_colptr.push(v_rowval.len());
    }

    // number the rows that were never pivoted
    let nrow_ext = prinv.len();
    let mut next = n;
    for p in prinv.iter_mut().filter(|p| **p == UNSET) {
        *p = next;
        next += 1;
    }

    let V = CscPattern::new(nrow_ext, n, v_colptr, v_rowval);
    let R = CscPattern::new(n, n, r_colptr, r_rowval);
    (V, R, prinv)
}

fn _get_amd_ordering(A: &CscPattern, amd_dense_scale: f64) -> Result<Vec<usize>, QrError> {
    if A.n == 0 {
        return Ok(vec![]);
    }
    let mut control = amd::Control::default();
    control.dense *= amd_dense_scale;
    let (perm, _iperm, _info) = amd::order(A.n, &A.colptr, &A.rowval, &control)
        .map_err(|_| QrError::OrderingFailed)?;
    Ok(perm)
}

// Construct an inverse permutation from a permutation
fn _invperm(p: &[usize]) -> Result<Vec<usize>, QrError> {
    let mut b = vec![usize::MAX; p.len()];

    for (i, &j) in p.iter().enumerate() {
        if j < p.len() && b[j] == usize::MAX {
            b[j] = i;
        } else {
            return Err(QrError::InvalidPermutation);
        }
    }
    Ok(b)
}

//configure tests of internals
#[path = "test.rs"]
#[cfg(test)]
mod test;
