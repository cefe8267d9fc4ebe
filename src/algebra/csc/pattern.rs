use crate::algebra::{CscView, FloatT};
use std::ops::Range;

/// Sparsity pattern of a matrix in compressed sparse column format.
///
/// A `CscPattern` carries structure only.  Numeric values live in a
/// separate slice of length [`nnz`](CscPattern::nnz) so that a fixed
/// pattern can be paired with nonzeros that change between factorizations.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscPattern {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer of length `n+1`
    pub colptr: Vec<usize>,
    /// vector of row indices, sorted within each column
    pub rowval: Vec<usize>,
}

impl CscPattern {
    /// `CscPattern` constructor.
    ///
    /// # Panics
    /// Panics if `colptr` does not have length `n+1` or if its last
    /// entry disagrees with the length of `rowval`.
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>) -> Self {
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        Self {
            m,
            n,
            colptr,
            rowval,
        }
    }

    /// Pattern with no entries
    pub fn empty(m: usize, n: usize) -> Self {
        Self::new(m, n, vec![0; n + 1], vec![])
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// range of nonzero indices in column `col`
    #[inline]
    pub fn col_range(&self, col: usize) -> Range<usize> {
        self.colptr[col]..self.colptr[col + 1]
    }

    /// row indices of column `col`
    #[inline]
    pub fn col_rows(&self, col: usize) -> &[usize] {
        &self.rowval[self.col_range(col)]
    }

    /// Transposed pattern together with a map from each nonzero
    /// index of `self` to its position in the transpose.
    pub fn transpose(&self) -> (CscPattern, Vec<usize>) {
        // count entries in each row
        let mut colptr = vec![0; self.m + 1];
        for &r in &self.rowval {
            colptr[r + 1] += 1;
        }
        for i in 0..self.m {
            colptr[i + 1] += colptr[i];
        }

        // columns are visited in order, so rows of
        // the transpose come out sorted
        let mut next = colptr.clone();
        let mut rowval = vec![0; self.nnz()];
        let mut map = vec![0; self.nnz()];
        for col in 0..self.n {
            for k in self.col_range(col) {
                let r = self.rowval[k];
                let dest = next[r];
                rowval[dest] = col;
                map[k] = dest;
                next[r] += 1;
            }
        }

        (CscPattern::new(self.n, self.m, colptr, rowval), map)
    }

    /// True if the pattern is square and equal to its own transpose.
    pub fn is_symmetric(&self) -> bool {
        if self.m != self.n {
            return false;
        }
        let (t, _) = self.transpose();
        t.colptr == self.colptr && t.rowval == self.rowval
    }

    /// Borrowed view of this pattern with the nonzero values `nzval`
    pub fn view<'a, T: FloatT>(&'a self, nzval: &'a [T]) -> CscView<'a, T> {
        CscView::new(self.m, self.n, &self.colptr, &self.rowval, nzval)
    }
}

/// Scatter `src` into `dst` through a transpose map produced
/// by [`CscPattern::transpose`].
pub fn transpose_values<T: Copy>(map: &[usize], src: &[T], dst: &mut [T]) {
    assert_eq!(map.len(), src.len());
    for (&k, &v) in map.iter().zip(src) {
        dst[k] = v;
    }
}

#[test]
fn test_pattern_transpose() {
    // [x . x]
    // [x x .]
    let p = CscPattern::new(2, 3, vec![0, 2, 3, 4], vec![0, 1, 1, 0]);
    let (t, map) = p.transpose();

    assert_eq!(t.m, 3);
    assert_eq!(t.n, 2);
    assert_eq!(t.colptr, vec![0, 2, 4]);
    assert_eq!(t.rowval, vec![0, 2, 0, 1]);
    assert_eq!(map, vec![0, 2, 3, 1]);

    let vals = [1., 2., 3., 4.];
    let mut tvals = [0.; 4];
    transpose_values(&map, &vals, &mut tvals);
    assert_eq!(tvals, [1., 4., 2., 3.]);
}
