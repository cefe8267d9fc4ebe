use super::{FloatT, VectorMath};
use itertools::izip;
use std::iter::zip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn scalarop(&mut self, op: impl Fn(T) -> T) -> &mut Self {
        for x in &mut *self {
            *x = op(*x);
        }
        self
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.scalarop(|x| x * c)
    }

    fn negate(&mut self) -> &mut Self {
        self.scalarop(|x| -x)
    }

    fn snap_to_zero(&mut self, tol: T) -> &mut Self {
        self.scalarop(|x| if x.abs() < tol { T::zero() } else { x })
    }

    fn dot(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        zip(self, y).fold(T::zero(), |acc, (&x, &y)| acc + x * y)
    }

    fn sumsq(&self) -> T {
        self.dot(self)
    }

    fn norm(&self) -> T {
        T::sqrt(self.sumsq())
    }

    fn dist(&self, y: &Self) -> T {
        assert_eq!(self.len(), y.len());
        let dist2 = zip(self, y).fold(T::zero(), |acc, (&x, &y)| acc + T::powi(x - y, 2));
        T::sqrt(dist2)
    }

    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for v in self.iter().map(|v| v.abs()) {
            if v.is_nan() {
                return T::nan();
            }
            out = if v > out { v } else { out };
        }
        out
    }

    fn normalize(&mut self) -> T {
        let norm = self.norm();
        if norm == T::zero() {
            return T::zero();
        }
        self.scalarop(|x| x / norm);
        norm
    }

    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        assert_eq!(self.len(), x.len());

        //handle b = 1 / b = 0 separately
        if b == T::zero() {
            for (y, &x) in izip!(&mut *self, x) {
                *y = a * x;
            }
        } else if b == T::one() {
            for (y, &x) in izip!(&mut *self, x) {
                *y += a * x;
            }
        } else {
            for (y, &x) in izip!(&mut *self, x) {
                *y = a * x + b * *y;
            }
        }
        self
    }
}

#[test]
fn test_dot_product() {
    let x = vec![1., 2., 3., 4.];
    let y = vec![4., 5., 6., 7.];
    assert_eq!(x.dot(&y), 60.);
}

#[test]
fn test_norms() {
    let x = vec![3., -4.];
    assert_eq!(x.norm(), 5.);
    assert_eq!(x.norm_inf(), 4.);
    assert!(vec![1., f64::NAN].norm_inf().is_nan());
}

#[test]
fn test_normalize() {
    let mut x = vec![0., 3., 4.];
    assert_eq!(x.normalize(), 5.);
    assert_eq!(x, vec![0., 0.6, 0.8]);

    let mut z = vec![0.; 3];
    assert_eq!(z.normalize(), 0.);
    assert_eq!(z, vec![0.; 3]);
}

#[test]
fn test_axpby() {
    let x = vec![1., 2., 3.];
    let mut y = vec![1., 1., 1.];
    y.axpby(2., &x, 1.);
    assert_eq!(y, vec![3., 5., 7.]);
    y.axpby(1., &x, 0.);
    assert_eq!(y, x);
    y.axpby(1., &x, -1.);
    assert_eq!(y, vec![0.; 3]);
}

#[test]
fn test_snap_to_zero() {
    let mut x = vec![1e-15, -2e-14, 1.];
    x.snap_to_zero(1e-14);
    assert_eq!(x, vec![0., -2e-14, 1.]);
}
