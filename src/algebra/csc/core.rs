#![allow(non_snake_case)]

use crate::algebra::{CscPattern, CscView, FloatT, SparseFormatError};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use qrqp::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// ```
///

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// Ths field should have length `n+1`. The last entry corresponds
    /// to the the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__
    /// ensure that rows indices are all in bounds or that data is arranged
    /// such that entries within each column appear in order of increasing
    /// row index.   Responsibility for ensuring these conditions hold
    /// is left to the caller.
    ///

    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for a sparse matrix with `nnz` elements
    ///
    /// To make an m x n matrix of zeros, use
    /// ```no_run
    /// use qrqp::algebra::CscMatrix;
    /// let m = 3;
    /// let n = 4;
    /// let A : CscMatrix<f64> = CscMatrix::spalloc(m,n,0);
    /// ```

    pub fn spalloc(m: usize, n: usize, nnz: usize) -> Self {
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// Diagonal matrix with entries `d`
    pub fn from_diag(d: &[T]) -> Self {
        let mut M = Self::identity(d.len());
        M.nzval.copy_from_slice(d);
        M
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// number of rows
    pub fn nrows(&self) -> usize {
        self.m
    }

    /// number of columns
    pub fn ncols(&self) -> usize {
        self.n
    }

    /// true if the matrix is square
    pub fn is_square(&self) -> bool {
        self.m == self.n
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity
        if self.colptr[0] != 0 || self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }

    /// Copy of the sparsity pattern, without the nonzero values
    pub fn pattern(&self) -> CscPattern {
        CscPattern::new(self.m, self.n, self.colptr.clone(), self.rowval.clone())
    }

    /// Borrowed view of the matrix for matrix-vector products
    pub fn view(&self) -> CscView<'_, T> {
        CscView::new(self.m, self.n, &self.colptr, &self.rowval, &self.nzval)
    }

    /// True if the matrix is square and every entry (i,j) in the
    /// pattern has a matching entry (j,i).  Values are not compared.
    pub fn is_structurally_symmetric(&self) -> bool {
        self.is_square() && self.pattern().is_symmetric()
    }
}

#[test]
fn test_csc_check_format() {
    let A = CscMatrix::new(
        3,
        3,
        vec![0, 2, 4, 7],
        vec![0, 1, 0, 2, 0, 1, 2],
        vec![1., 2., 3., 4., 5., 6., 7.],
    );
    assert!(A.check_format().is_ok());

    let mut B = A.clone();
    B.rowval.swap(0, 1);
    assert_eq!(B.check_format(), Err(SparseFormatError::BadRowOrdering));

    let mut B = A.clone();
    B.rowval[6] = 3;
    assert_eq!(B.check_format(), Err(SparseFormatError::BadRowval));

    let mut B = A.clone();
    B.colptr[1] = 5;
    assert_eq!(B.check_format(), Err(SparseFormatError::BadColptr));

    let mut B = A;
    B.nzval.pop();
    assert_eq!(
        B.check_format(),
        Err(SparseFormatError::IncompatibleDimension)
    );
}

#[test]
fn test_csc_symmetry() {
    // [1 2 .]
    // [2 . 3]
    // [. 3 4]
    let A = CscMatrix::new(
        3,
        3,
        vec![0, 2, 4, 6],
        vec![0, 1, 0, 2, 1, 2],
        vec![1., 2., 2., 3., 3., 4.],
    );
    assert!(A.is_structurally_symmetric());

    // upper triangle only
    let U = CscMatrix::new(3, 3, vec![0, 1, 3, 5], vec![0, 0, 1, 1, 2], vec![1.; 5]);
    assert!(!U.is_structurally_symmetric());

    let R = CscMatrix::<f64>::spalloc(3, 2, 0);
    assert!(!R.is_structurally_symmetric());
}
