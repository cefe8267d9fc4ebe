#![allow(non_snake_case)]
use crate::algebra::*;
use std::iter::zip;

/// Borrowed compressed sparse column matrix: a pattern plus a slice of
/// nonzero values.  All products are computed without allocation.
#[derive(Debug, Clone, Copy)]
pub struct CscView<'a, T> {
    pub m: usize,
    pub n: usize,
    pub colptr: &'a [usize],
    pub rowval: &'a [usize],
    pub nzval: &'a [T],
}

impl<'a, T> CscView<'a, T>
where
    T: FloatT,
{
    pub fn new(
        m: usize,
        n: usize,
        colptr: &'a [usize],
        rowval: &'a [usize],
        nzval: &'a [T],
    ) -> Self {
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(rowval.len(), nzval.len());
        Self {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// row indices and values of column `col`
    #[inline]
    pub fn col(&self, col: usize) -> impl Iterator<Item = (usize, T)> + 'a {
        let (rowval, nzval) = (self.rowval, self.nzval);
        let rng = self.colptr[col]..self.colptr[col + 1];
        zip(&rowval[rng.clone()], &nzval[rng]).map(|(&r, &v)| (r, v))
    }

    /// Transposed product.  Produces `y = a*self'*x + b*y`
    pub fn gemv_t(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_T(self, y, x, a, b);
    }

    /// Dot product of `x` with column `col`
    #[inline]
    pub fn col_dot(&self, col: usize, x: &[T]) -> T {
        self.col(col).fold(T::zero(), |acc, (r, v)| acc + v * x[r])
    }

    /// Bilinear form `x'*self*y`
    pub fn bilinear(&self, x: &[T], y: &[T]) -> T {
        assert_eq!(x.len(), self.m);
        assert_eq!(y.len(), self.n);
        let mut out = T::zero();
        for (col, &ycol) in y.iter().enumerate() {
            if ycol == T::zero() {
                continue;
            }
            out += self.col_dot(col, x) * ycol;
        }
        out
    }
}

impl<T: FloatT> MatrixVectorMultiply for CscView<'_, T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_N(self, y, x, a, b);
    }
}

fn _scale_y<T: FloatT>(y: &mut [T], b: T) {
    if b == T::zero() {
        y.fill(T::zero());
    } else if b == T::one() {
    } else if b == -T::one() {
        y.negate();
    } else {
        y.scale(b);
    }
}

fn _csc_axpby_N<T: FloatT>(A: &CscView<'_, T>, y: &mut [T], x: &[T], a: T, b: T) {
    assert_eq!(x.len(), A.n);
    assert_eq!(y.len(), A.m);

    //first do the b*y part
    _scale_y(y, b);

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    //y += a*A*x
    for (j, &xj) in x.iter().enumerate() {
        if xj == T::zero() {
            continue;
        }
        for (row, Aij) in A.col(j) {
            y[row] += a * Aij * xj;
        }
    }
}

fn _csc_axpby_T<T: FloatT>(A: &CscView<'_, T>, y: &mut [T], x: &[T], a: T, b: T) {
    assert_eq!(x.len(), A.m);
    assert_eq!(y.len(), A.n);

    //first do the b*y part
    _scale_y(y, b);

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    //y += a*A'*x
    for (j, yj) in y.iter_mut().enumerate() {
        *yj += a * A.col_dot(j, x);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_matrix() -> CscMatrix<f64> {
        // A =
        //[ 1.  .   2.]
        //[ .   3.  4.]
        CscMatrix::new(2, 3, vec![0, 1, 2, 4], vec![0, 1, 0, 1], vec![1., 3., 2., 4.])
    }

    #[test]
    fn test_gemv() {
        let A = test_matrix();
        let x = vec![1., 2., 3.];
        let mut y = vec![1., -1.];
        A.view().gemv(&mut y, &x, 1., 2.);
        assert_eq!(y, vec![9., 16.]);
    }

    #[test]
    fn test_gemv_t() {
        let A = test_matrix();
        let x = vec![1., 2.];
        let mut y = vec![1., 1., 1.];
        A.view().gemv_t(&mut y, &x, -1., 0.);
        assert_eq!(y, vec![-1., -6., -10.]);
    }

    #[test]
    fn test_bilinear() {
        let A = test_matrix();
        let x = vec![1., 2.];
        let y = vec![1., 2., 3.];
        // x'*A*y = [1 2]*[7 18]'
        assert_eq!(A.view().bilinear(&x, &y), 43.);
    }

    #[test]
    fn test_view_of_pattern() {
        let A = test_matrix();
        let p = A.pattern();
        let nz = vec![2., 6., 4., 8.];
        let mut y = vec![0., 0.];
        p.view(&nz).gemv(&mut y, &[1., 1., 1.], 1., 0.);
        assert_eq!(y, vec![6., 14.]);
    }
}
